//! Integration tests for the API server
//!
//! These tests start the API server with a stubbed segmentation backend,
//! send real HTTP requests, and verify the wire responses end to end.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};

use sprite_parts_api_server::{start_server, ApiState};
use sprite_parts_common::Mask;
use sprite_parts_preview::png_data_url;
use sprite_parts_segmenter::{MaskGenerator, SegmentationParams, SegmenterError};

struct StubGenerator {
    masks: Vec<Mask>,
}

#[async_trait]
impl MaskGenerator for StubGenerator {
    async fn generate(
        &self,
        _image: &RgbaImage,
        _params: &SegmentationParams,
    ) -> Result<Vec<Mask>, SegmenterError> {
        Ok(self.masks.clone())
    }
}

/// 48x72 humanoid sprite (head, torso, arms, legs) plus matching masks.
fn sprite_fixture() -> (RgbaImage, Vec<Mask>) {
    let blocks = [
        (18u32, 4u32, 30u32, 14u32),
        (14, 14, 34, 40),
        (6, 16, 13, 34),
        (35, 16, 42, 34),
        (15, 40, 23, 62),
        (25, 40, 33, 62),
    ];

    let mut image = RgbaImage::from_pixel(48, 72, Rgba([0, 0, 0, 0]));
    for &(x0, y0, x1, y1) in &blocks {
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, Rgba([160, 110, 80, 255]));
            }
        }
    }

    let masks = blocks
        .iter()
        .map(|&(x0, y0, x1, y1)| Mask::from_window(48, 72, x0, y0, x1, y1))
        .collect();

    (image, masks)
}

async fn spawn_server(addr: &'static str, masks: Vec<Mask>) -> tokio::task::JoinHandle<()> {
    let state = ApiState::with_segmenter(Arc::new(StubGenerator { masks }), "stub://segmenter");
    let handle = tokio::spawn(async move {
        start_server(addr, state)
            .await
            .expect("Failed to start server");
    });

    // Give the server time to bind
    sleep(Duration::from_millis(200)).await;
    handle
}

#[tokio::test]
async fn test_health_endpoint() {
    let handle = spawn_server("127.0.0.1:18765", Vec::new()).await;

    let client = reqwest::Client::new();
    let response = client
        .get("http://127.0.0.1:18765/health")
        .send()
        .await
        .expect("Failed to send health check request");

    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["ok"], true);
    assert_eq!(json["segmenter"], "stub://segmenter");
    assert!(json["version"].is_string());

    handle.abort();
}

#[tokio::test]
async fn test_parts_endpoint_full_pipeline() {
    let (image, masks) = sprite_fixture();
    let handle = spawn_server("127.0.0.1:18766", masks).await;

    let payload = serde_json::json!({
        "image": png_data_url(&image).expect("sprite should encode"),
        "max_regions": 8,
    });

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:18766/api/v1/parts")
        .json(&payload)
        .send()
        .await
        .expect("Failed to send parts request");

    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["ok"], true);
    assert_eq!(json["image_width"], 48);
    assert_eq!(json["image_height"], 72);

    let parts = json["parts"].as_array().expect("parts array");
    assert_eq!(json["total_parts"].as_u64(), Some(parts.len() as u64));
    assert!(!parts.is_empty());

    // Every part carries a label, geometry, and a display color
    for part in parts {
        assert!(part["label"].is_string());
        assert!(part["area"].as_u64().is_some());
        assert_eq!(part["bbox"].as_array().map(Vec::len), Some(4));
        assert_eq!(part["centroid"].as_array().map(Vec::len), Some(2));
        assert!(part["color"].as_str().is_some_and(|c| c.starts_with("rgb(")));
    }

    // The torso block dominates the fixture
    assert_eq!(parts[0]["label"], "torso");

    let regions = json["regions"].as_array().expect("regions array");
    assert!(!regions.is_empty());
    for region in regions {
        assert!(region["id"].as_str().is_some_and(|id| id.starts_with("region_")));
        assert!(region["suggested_label"].is_string());
    }

    for key in ["preview", "regions_preview"] {
        let data_url = json[key].as_str().expect("overlay data URL");
        assert!(data_url.starts_with("data:image/png;base64,"));
    }

    handle.abort();
}

#[tokio::test]
async fn test_parts_endpoint_rejects_plain_url() {
    let handle = spawn_server("127.0.0.1:18767", Vec::new()).await;

    let payload = serde_json::json!({
        "image": "https://example.com/sprite.png",
    });

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:18767/api/v1/parts")
        .json(&payload)
        .send()
        .await
        .expect("Failed to send parts request");

    assert_eq!(response.status(), 400);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Only data URL images are supported"));

    handle.abort();
}

#[tokio::test]
async fn test_segment_endpoint_returns_png() {
    let (image, masks) = sprite_fixture();
    let handle = spawn_server("127.0.0.1:18768", masks).await;

    let payload = serde_json::json!({
        "image": png_data_url(&image).expect("sprite should encode"),
    });

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:18768/api/v1/segment")
        .json(&payload)
        .send()
        .await
        .expect("Failed to send segment request");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );

    let bytes = response.bytes().await.expect("Failed to read body");
    let mask = image::load_from_memory(&bytes)
        .expect("body should be a PNG")
        .to_luma8();
    assert_eq!(mask.dimensions(), (48, 72));
    // Torso pixel is foreground, corner is background
    assert_eq!(mask.get_pixel(20, 30).0[0], 255);
    assert_eq!(mask.get_pixel(0, 0).0[0], 0);

    handle.abort();
}
