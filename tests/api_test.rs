use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use std::io::Cursor;
use tower::ServiceExt; // for `oneshot`

use shotlink::api::{self, models::UploadResponse, state::AppState};
use shotlink::config::Config;
use shotlink::storage::ScreenshotStore;

const BOUNDARY: &str = "shotlink-test-boundary";

/// Creates a minimal config for testing, bypassing file-based loading
fn create_test_config() -> Config {
    let config_toml = r#"
[server]
bind_addr = "127.0.0.1:8787"
public_url = "http://localhost:8787"

[storage]
provider = "memory"
    "#;

    toml::from_str(config_toml).expect("Failed to parse test config")
}

/// Builds a test app with an isolated in-memory store
fn build_test_app() -> Router {
    let config = create_test_config();
    let store = ScreenshotStore::from_config(&config).expect("Failed to build store");
    api::router(AppState::new(config, store))
}

/// A small but real PNG so retrieval checks can decode what they get back
fn test_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([200, 60, 60, 255]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

/// Hand-rolled multipart body; `content_type` marks a file part
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match content_type {
            Some(ct) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"screenshot.png\"\r\nContent-Type: {ct}\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn days_from_now(expires_at: DateTime<Utc>) -> i64 {
    let minutes = (expires_at - Utc::now()).num_minutes();
    // Round to whole days; uploads take well under a minute
    (minutes + 1) / (24 * 60)
}

#[tokio::test]
async fn upload_and_fetch_round_trip() {
    let app = build_test_app();
    let png = test_png();

    let body = multipart_body(&[
        ("screenshot", Some("image/png"), &png),
        ("metadata", None, br#"{"source": "test-suite"}"#),
    ]);

    let response = app.clone().oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let uploaded: UploadResponse =
        serde_json::from_value(json_body(response).await).expect("valid upload response");
    assert!(uploaded.success);
    assert_eq!(uploaded.url, format!("http://localhost:8787/{}", uploaded.id));

    // Retrieval via both route shapes yields byte-identical content
    for uri in [
        format!("/{}", uploaded.id),
        format!("/upload/{}", uploaded.id),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("image/png")
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], &png[..]);
    }
}

#[tokio::test]
async fn upload_without_screenshot_is_missing_file() {
    let app = build_test_app();

    let body = multipart_body(&[("metadata", None, br#"{"source": "test"}"#)]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "MISSING_FILE");
}

#[tokio::test]
async fn upload_at_size_limit_passes() {
    let app = build_test_app();

    let payload = vec![0u8; 5 * 1024 * 1024];
    let body = multipart_body(&[("screenshot", Some("image/png"), &payload)]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn upload_over_size_limit_is_rejected() {
    let app = build_test_app();

    let payload = vec![0u8; 5 * 1024 * 1024 + 1];
    let body = multipart_body(&[("screenshot", Some("image/png"), &payload)]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "FILE_TOO_LARGE");
}

#[tokio::test]
async fn upload_with_wrong_mime_type_is_rejected() {
    let app = build_test_app();
    let png = test_png();

    let body = multipart_body(&[("screenshot", Some("image/jpeg"), &png)]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_FORMAT");
}

#[tokio::test]
async fn invalid_metadata_still_uploads_with_default_expiry() {
    let app = build_test_app();
    let png = test_png();

    let body = multipart_body(&[
        ("screenshot", Some("image/png"), &png),
        ("metadata", None, b"{definitely not json"),
    ]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let uploaded: UploadResponse =
        serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(days_from_now(uploaded.expires_at), 7);
}

#[tokio::test]
async fn out_of_range_retention_falls_back_to_default() {
    let app = build_test_app();
    let png = test_png();

    for retention in ["0", "31"] {
        let metadata = format!(r#"{{"retention": {retention}}}"#);
        let body = multipart_body(&[
            ("screenshot", Some("image/png"), &png),
            ("metadata", None, metadata.as_bytes()),
        ]);
        let response = app.clone().oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let uploaded: UploadResponse =
            serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(days_from_now(uploaded.expires_at), 7, "retention {retention}");
    }
}

#[tokio::test]
async fn in_range_retention_sets_expiry() {
    let app = build_test_app();
    let png = test_png();

    let body = multipart_body(&[
        ("screenshot", Some("image/png"), &png),
        ("metadata", None, br#"{"retention": 14}"#),
    ]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let uploaded: UploadResponse =
        serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(days_from_now(uploaded.expires_at), 14);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let app = build_test_app();

    let uri = format!("/{}", uuid::Uuid::new_v4());
    let response = app
        .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn blank_id_is_missing_id() {
    let app = build_test_app();

    let response = app
        .oneshot(Request::builder().uri("/%20").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "MISSING_ID");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
