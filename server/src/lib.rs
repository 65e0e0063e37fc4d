use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use invidx_core::persist::load_index;
use invidx_core::{CodecKind, DocId, IndexStats, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct QueryParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub terms: Vec<String>,
    pub took_s: f64,
    pub total_hits: usize,
    pub doc_ids: Vec<DocId>,
}

#[derive(Serialize)]
pub struct TermResponse {
    pub term: String,
    pub doc_ids: Vec<DocId>,
}

/// The index is immutable, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
}

pub fn build_app(index_path: &str, codec: CodecKind) -> Result<Router> {
    let index = load_index(index_path, codec.codec().as_ref())?;
    Ok(router(Arc::new(index)))
}

pub fn router(index: Arc<InvertedIndex>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/query", get(query_handler))
        .route("/terms/:term", get(term_handler))
        .route("/stats", get(stats_handler))
        .with_state(AppState { index })
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref()))
}

/// The service is read-only, so only GET is allowed. `allowed` is a
/// comma-separated origin list; unset or unparsable means any origin.
pub fn cors_layer(allowed: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed
        .into_iter()
        .flat_map(|val| val.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    let base = CorsLayer::new().allow_methods([Method::GET]).allow_headers(Any);
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        tracing::info!(origins = origins.len(), "restricting CORS origins");
        base.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn query_handler(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Json<QueryResponse> {
    let start = std::time::Instant::now();
    let terms: Vec<String> = params.q.split_whitespace().map(str::to_string).collect();
    let doc_ids: Vec<DocId> = state.index.query(&terms).into_iter().collect();
    tracing::debug!(query = %params.q, hits = doc_ids.len(), "query answered");
    let elapsed = start.elapsed();
    Json(QueryResponse { query: params.q, terms, took_s: elapsed.as_secs_f64(), total_hits: doc_ids.len(), doc_ids })
}

pub async fn term_handler(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<TermResponse>, (StatusCode, String)> {
    match state.index.postings(&term) {
        Some(postings) => {
            let doc_ids = postings.iter().copied().collect();
            Ok(Json(TermResponse { term, doc_ids }))
        }
        None => Err((StatusCode::NOT_FOUND, format!("term {term:?} not in index"))),
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.stats())
}
