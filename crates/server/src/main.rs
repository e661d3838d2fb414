//! apimount server binary
//!
//! Reads `.env`, the optional `server` config file and `APIMOUNT_SERVER__*`
//! environment variables, then serves the configured mount.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
