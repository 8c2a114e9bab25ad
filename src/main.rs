use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    planboard::cli::run().await
}
