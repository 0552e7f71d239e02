use apicall::prelude::*;

async fn run() -> anyhow::Result<()> {
    ApiCall::get("https://jsonplaceholder.typicode.com/posts")
        .header("Accept", "application/json")
        .query_param("userId", "1")
        // Pick at most one auth scheme, the last one set wins:
        // .basic_auth("username", "password")
        // .bearer_auth("your-token")
        // .api_key_auth("X-API-Key", "your-api-key")
        .execute()
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    run().await.unwrap();
}
