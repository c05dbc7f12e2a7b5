//! HTTP request handlers for API endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{error, info};

use crate::data_url::decode_image;
use crate::types::{HealthResponse, PartsRequest, PartsResponse, SegmentRequest};
use crate::ApiState;
use sprite_parts_decomposition::{combined_candidate_mask, DecomposerConfig, PartDecomposer};
use sprite_parts_preview::{mask_png, png_data_url};
use sprite_parts_segmenter::SegmenterError;

/// Health check endpoint
pub async fn health_check(State(state): State<ApiState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        segmenter: state.segmenter_url.clone(),
    })
}

/// Raw segmentation: returns the union of all candidate masks as a PNG
pub async fn segment(
    State(state): State<ApiState>,
    Json(request): Json<SegmentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let image = decode_image(&request.image).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let (width, height) = image.dimensions();
    info!("Segmentation request: {}x{} sprite", width, height);

    let params = request.segmentation_params();
    params
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let candidates = state
        .segmenter
        .generate(&image, &params)
        .await
        .map_err(map_segmenter_error)?;
    info!("Backend returned {} candidate masks", candidates.len());

    let combined = combined_candidate_mask(&candidates, width, height);
    let bytes = mask_png(&combined).map_err(|e| {
        error!("Failed to encode mask PNG: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

/// Part decomposition: labeled anatomical parts with overlay previews
pub async fn parts(
    State(state): State<ApiState>,
    Json(request): Json<PartsRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    request
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let image = decode_image(&request.image).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let (width, height) = image.dimensions();
    info!(
        "Parts request: {}x{} sprite, max_regions={}",
        width, height, request.max_regions
    );

    let params = request.segmentation_params();
    params
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let candidates = state
        .segmenter
        .generate(&image, &params)
        .await
        .map_err(map_segmenter_error)?;
    info!("Backend returned {} candidate masks", candidates.len());

    let decomposer = PartDecomposer::new(DecomposerConfig {
        max_regions: request.max_regions,
        ..state.config.clone()
    });
    let decomposition = decomposer.decompose(&image, candidates);

    let (parts_overlay, part_summaries) = state.renderer.render_parts(
        &image,
        &decomposition.character_mask,
        &decomposition.merged_parts,
    );
    let (regions_overlay, region_summaries) = state.renderer.render_regions(
        &image,
        &decomposition.character_mask,
        &decomposition.labeled_regions,
    );

    let preview = png_data_url(&parts_overlay).map_err(|e| {
        error!("Failed to encode parts overlay: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let regions_preview = png_data_url(&regions_overlay).map_err(|e| {
        error!("Failed to encode regions overlay: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(PartsResponse {
        ok: true,
        image_width: width,
        image_height: height,
        total_parts: part_summaries.len(),
        preview,
        regions_preview,
        parts: part_summaries,
        regions: region_summaries,
    }))
}

fn map_segmenter_error(err: SegmenterError) -> (StatusCode, String) {
    match &err {
        SegmenterError::InvalidParams(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        _ => {
            error!("Segmentation backend failure: {}", err);
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}
