use anyhow::Result;
use bosnian_translate::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bosnian_translate=info".parse()?),
        )
        .init();

    info!("Starting translation service");

    let config = config::Config::from_env()?;
    info!(
        "Chunk sizes: {} interactive / {} batch, {} attempts per chunk",
        config.max_chunk_size, config.batch_chunk_size, config.max_attempts
    );
    if config.api_key.is_none() {
        info!("API_KEY not set, /api/translate is open");
    }

    server::serve(&config).await
}
