//! API Server Binary Entry Point

use sprite_parts_api_server::{start_server, ApiState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sprite_parts_api_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Bind address and segmentation backend from environment or defaults
    let addr =
        std::env::var("SPRITE_PARTS_ADDR").unwrap_or_else(|_| "127.0.0.1:8765".to_string());
    let segmenter_url = std::env::var("SPRITE_PARTS_SEGMENTER_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8901".to_string());

    let state = ApiState::new(segmenter_url);

    tracing::info!("Starting Sprite Part Decomposition API Server");
    start_server(&addr, state).await?;

    Ok(())
}
