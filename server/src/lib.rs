use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use booksearch_core::{DocId, Document, InvertedIndex};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

type ApiError = (StatusCode, Json<serde_json::Value>);

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct TermsBody {
    pub terms: Vec<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub title: String,
}

#[derive(Serialize)]
pub struct IndexView {
    pub num_docs: usize,
    pub num_terms: usize,
    pub terms: BTreeMap<String, Vec<DocId>>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub num_docs: usize,
    pub num_terms: usize,
}

/// Shared handler state. The index is replaced wholesale on reload, never
/// edited in place.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<RwLock<InvertedIndex>>,
    pub corpus_path: PathBuf,
    pub admin_token: Option<String>,
}

impl AppState {
    /// Index `corpus_path` and wrap the result for sharing between handlers.
    pub fn load(corpus_path: impl Into<PathBuf>, admin_token: Option<String>) -> Result<Self> {
        let corpus_path = corpus_path.into();
        let mut index = InvertedIndex::new();
        index
            .create_index_from_path(&corpus_path)
            .with_context(|| format!("failed to index {}", corpus_path.display()))?;
        tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "index ready");
        Ok(Self { index: Arc::new(RwLock::new(index)), corpus_path, admin_token })
    }
}

pub fn build_app(corpus_path: String) -> Result<Router> {
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let state = AppState::load(corpus_path, admin_token)?;

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Ok(router(state).layer(cors))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_text).post(search_terms))
        .route("/books", get(books_handler))
        .route("/books/:doc_id", get(book_handler))
        .route("/index", get(index_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_text(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let index = state.index.read();
    let ids = index.search(&params.q);
    Json(respond(&index, params.q.clone(), ids, start))
}

pub async fn search_terms(State(state): State<AppState>, Json(body): Json<TermsBody>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let index = state.index.read();
    let ids = index.search(&body.terms);
    Json(respond(&index, body.terms.join(" "), ids, start))
}

fn respond(index: &InvertedIndex, query: String, ids: Vec<DocId>, start: std::time::Instant) -> SearchResponse {
    let results: Vec<SearchHit> = ids
        .into_iter()
        .filter_map(|doc_id| index.book(doc_id).map(|b| SearchHit { doc_id, title: b.title.clone() }))
        .collect();
    SearchResponse { query, took_s: start.elapsed().as_secs_f64(), total_hits: results.len(), results }
}

pub async fn books_handler(State(state): State<AppState>) -> Json<Vec<Document>> {
    Json(state.index.read().books().to_vec())
}

pub async fn book_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<serde_json::Value>, ApiError> {
    let index = state.index.read();
    match index.book(doc_id) {
        Some(book) => Ok(Json(serde_json::json!({
            "doc_id": doc_id,
            "title": book.title,
            "text": book.text,
        }))),
        None => Err(error(StatusCode::NOT_FOUND, "not found")),
    }
}

pub async fn index_handler(State(state): State<AppState>) -> Json<IndexView> {
    let index = state.index.read();
    let terms = index
        .sorted_terms()
        .into_iter()
        .map(|(term, ids)| (term.to_string(), ids))
        .collect();
    Json(IndexView { num_docs: index.num_docs(), num_terms: index.num_terms(), terms })
}

/// Rebuild from the corpus file off to the side, then swap it in. A failed
/// load leaves the served index as it was.
pub async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ReloadResponse>, ApiError> {
    authorize(&state, &headers)?;
    let config = state.index.read().config().clone();
    let path = state.corpus_path.clone();
    let built = tokio::task::spawn_blocking(move || {
        let mut fresh = InvertedIndex::with_config(config);
        fresh.create_index_from_path(&path).map(|_| fresh)
    })
    .await
    .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;

    let fresh = match built {
        Ok(fresh) => fresh,
        Err(e) => {
            tracing::warn!(error = %e, "reload failed, keeping current index");
            return Err(error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()));
        }
    };
    let resp = ReloadResponse { num_docs: fresh.num_docs(), num_terms: fresh.num_terms() };
    *state.index.write() = fresh;
    tracing::info!(num_docs = resp.num_docs, num_terms = resp.num_terms, "index reloaded");
    Ok(Json(resp))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(error(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set")),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        tracing::warn!("rejected admin request");
        Err(error(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}

fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(serde_json::json!({ "error": message })))
}
