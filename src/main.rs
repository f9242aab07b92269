#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fleetscan::run().await?;
    Ok(())
}
