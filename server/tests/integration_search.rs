use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use invidx_core::persist::save_index;
use invidx_core::{CodecKind, FixedWidthCodec, InvertedIndex};
use serde_json::Value;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_index(path: &std::path::Path) {
    let index = InvertedIndex::from_postings([
        ("The", vec![547, 645]),
        ("Adventures", vec![547]),
        ("House", vec![645]),
        ("rust", vec![1, 547]),
    ]);
    save_index(path, &FixedWidthCodec, &index).unwrap();
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

fn tiny_app() -> Router {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiny.idx");
    build_tiny_index(&path);
    server::build_app(path.to_str().unwrap(), CodecKind::Fixed).unwrap()
}

#[tokio::test]
async fn query_intersects_terms() {
    let (status, body) = call(tiny_app(), "/query?q=The%20Adventures").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 1);
    assert_eq!(json["doc_ids"], serde_json::json!([547]));
    assert_eq!(json["terms"], serde_json::json!(["The", "Adventures"]));
}

#[tokio::test]
async fn query_with_unknown_term_is_empty() {
    let (status, body) = call(tiny_app(), "/query?q=The+Unforgiven").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 0);
    assert_eq!(json["doc_ids"], serde_json::json!([]));
}

#[tokio::test]
async fn term_lookup_and_404() {
    let app = tiny_app();
    let (status, body) = call(app.clone(), "/terms/The").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["doc_ids"], serde_json::json!([547, 645]));

    let (status, _) = call(app, "/terms/the").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_and_health() {
    let app = tiny_app();
    let (status, body) = call(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");

    let (_, body) = call(app, "/stats").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["terms"], 4);
    assert_eq!(json["max_doc_id"], 645);
    assert_eq!(json["value_width"], 2);
}

#[test]
fn missing_index_fails_to_start() {
    assert!(server::build_app("/nonexistent/index.bin", CodecKind::Fixed).is_err());
}

async fn allowed_origin_for(app: Router, origin: &str) -> Option<String> {
    let req = Request::get("/health").header(header::ORIGIN, origin).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    resp.headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string())
}

fn health_only(allowed: Option<&str>) -> Router {
    Router::new().route("/health", get(|| async { "ok" })).layer(server::cors_layer(allowed))
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    assert_eq!(allowed_origin_for(health_only(None), "http://a.example").await.as_deref(), Some("*"));
    assert_eq!(allowed_origin_for(health_only(Some(" , ")), "http://a.example").await.as_deref(), Some("*"));
}

#[tokio::test]
async fn cors_restricts_to_listed_origins() {
    let allowed = Some("http://a.example, http://b.example");
    assert_eq!(
        allowed_origin_for(health_only(allowed), "http://b.example").await.as_deref(),
        Some("http://b.example")
    );
    assert_eq!(allowed_origin_for(health_only(allowed), "http://evil.example").await, None);
}
