//! REST API Server for Sprite Part Decomposition
//!
//! Exposes the decomposition pipeline over HTTP:
//! - `POST /api/v1/segment`: Raw segmentation, returns the combined candidate mask as PNG
//! - `POST /api/v1/parts`: Full decomposition with labeled parts and overlay previews
//! - `GET /health`: Service health and backend configuration

mod data_url;
mod handlers;
mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use sprite_parts_decomposition::DecomposerConfig;
use sprite_parts_preview::PreviewRenderer;
use sprite_parts_segmenter::{HttpMaskGenerator, MaskGenerator};

pub use handlers::*;
pub use types::*;

/// API server state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    /// Base decomposition configuration (`max_regions` is overridden per request)
    pub config: DecomposerConfig,
    /// Overlay renderer shared across requests
    pub renderer: Arc<PreviewRenderer>,
    /// Segmentation backend client
    pub segmenter: Arc<dyn MaskGenerator>,
    /// Backend URL reported by the health endpoint
    pub segmenter_url: String,
}

impl ApiState {
    /// Create state backed by the HTTP segmentation client at `segmenter_url`
    #[must_use]
    pub fn new(segmenter_url: impl Into<String>) -> Self {
        let url = segmenter_url.into();
        Self {
            config: DecomposerConfig::default(),
            renderer: Arc::new(PreviewRenderer::default()),
            segmenter: Arc::new(HttpMaskGenerator::new(url.clone())),
            segmenter_url: url,
        }
    }

    /// Create state with a custom mask generator
    #[must_use]
    pub fn with_segmenter(segmenter: Arc<dyn MaskGenerator>, label: impl Into<String>) -> Self {
        Self {
            config: DecomposerConfig::default(),
            renderer: Arc::new(PreviewRenderer::default()),
            segmenter,
            segmenter_url: label.into(),
        }
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Segmentation endpoints
        .route("/api/v1/segment", post(segment))
        .route("/api/v1/parts", post(parts))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server on the given address
pub async fn start_server(addr: &str, state: ApiState) -> Result<(), std::io::Error> {
    tracing::info!("Starting sprite parts API server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
