use apicall::prelude::*;

async fn run() -> anyhow::Result<()> {
    let body = r#"{
    "title": "foo",
    "body": "bar",
    "userId": 1
}"#;

    let rs = ApiCall::post("https://jsonplaceholder.typicode.com/posts")
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .body(body)
        .execute()
        .await?;

    let json: serde_json::Value = serde_json::from_str(rs.body().unwrap_or("null"))?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    run().await.unwrap();
}
