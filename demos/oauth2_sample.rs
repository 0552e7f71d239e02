use apicall::prelude::*;

async fn run() -> anyhow::Result<()> {
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", "Abc1234567"),
        ("client_secret", "ENDWzXfqenUbDd0zKVz"),
    ];

    // The request itself is the token request: its body becomes the OAuth2 form.
    let rs = ApiCall::post("https://httpbin.org/anything")
        .oauth2(params)
        .execute()
        .await?;

    // A real token endpoint answers with `access_token`, which then goes into
    // `bearer_auth` of the next call.
    let json: serde_json::Value = serde_json::from_str(rs.body().unwrap_or("{}"))?;
    if let Some(token) = json["access_token"].as_str() {
        ApiCall::get("https://httpbin.org/bearer")
            .bearer_auth(token)
            .execute()
            .await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    run().await.unwrap();
}
