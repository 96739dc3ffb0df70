use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    campuseats_cli::run_cli().await
}
