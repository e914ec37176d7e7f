use neptune::NeptuneProvider;
use tfplug::{LogLevel, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries the plugin handshake
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::from(LogLevel::from_env()))
        .init();

    let provider = NeptuneProvider::new();
    tfplug::serve(provider, ServerConfig::from_env()).await?;

    Ok(())
}
