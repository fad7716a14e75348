use catclash_server::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("CATCLASH_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let server = Server::builder().bind(&addr).build().await?;
    server.run().await?;
    Ok(())
}
