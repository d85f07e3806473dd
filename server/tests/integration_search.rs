use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server::{router, AppState};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

const BOOKS: &str = r#"[
  {"title": "Alice in Wonderland", "text": "Alice falls into a rabbit hole and enters a world full of imagination."},
  {"title": "The Lord of the Rings: The Fellowship of the Ring.", "text": "An unusual alliance of man, elf, dwarf, wizard and hobbit seek to destroy a powerful ring."}
]"#;

fn write_corpus(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("books.json");
    fs::write(&path, body).unwrap();
    path
}

fn app(dir: &Path) -> (Router, AppState) {
    let state = AppState::load(write_corpus(dir, BOOKS), Some("secret".into())).unwrap();
    (router(state.clone()), state)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn hit_ids(json: &Value) -> Vec<u64> {
    json["results"].as_array().unwrap().iter().map(|h| h["doc_id"].as_u64().unwrap()).collect()
}

#[tokio::test]
async fn text_search_orders_by_query_terms() {
    let dir = tempdir().unwrap();
    let (app, _) = app(dir.path());

    let (status, json) = call(app.clone(), get("/search?q=fellowship+world")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hit_ids(&json), vec![1, 0]);
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["query"], "fellowship world");
    assert_eq!(json["results"][1]["title"], "Alice in Wonderland");

    let (_, json) = call(app.clone(), get("/search?q=")).await;
    assert!(hit_ids(&json).is_empty());
    let (_, json) = call(app, get("/search")).await;
    assert!(hit_ids(&json).is_empty());
}

#[tokio::test]
async fn term_search_matches_text_search() {
    let dir = tempdir().unwrap();
    let (app, _) = app(dir.path());
    let req = Request::post("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"terms": ["ALICE", "wonderland"]}"#))
        .unwrap();
    let (status, json) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hit_ids(&json), vec![0]);
}

#[tokio::test]
async fn serves_books_and_index() {
    let dir = tempdir().unwrap();
    let (app, _) = app(dir.path());

    let (_, json) = call(app.clone(), get("/books")).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (status, json) = call(app.clone(), get("/books/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["doc_id"], 1);
    assert_eq!(json["title"], "The Lord of the Rings: The Fellowship of the Ring.");

    let (status, json) = call(app.clone(), get("/books/7")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");

    let (_, json) = call(app, get("/index")).await;
    assert_eq!(json["num_docs"], 2);
    assert_eq!(json["terms"]["world"], serde_json::json!([0]));
    assert_eq!(json["terms"]["ring"], serde_json::json!([1]));
    assert!(json["terms"].get("the").is_none());
}

#[tokio::test]
async fn reload_requires_admin_token() {
    let dir = tempdir().unwrap();
    let (app, _) = app(dir.path());
    let req = Request::builder().method(Method::POST).uri("/index/reload").body(Body::empty()).unwrap();
    let (status, _) = call(app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reload_swaps_in_rebuilt_index() {
    let dir = tempdir().unwrap();
    let (app, state) = app(dir.path());
    write_corpus(dir.path(), r#"[{"title": "Dune", "text": "A desert planet"}]"#);

    let req = Request::post("/index/reload").header("X-ADMIN-TOKEN", "secret").body(Body::empty()).unwrap();
    let (status, json) = call(app.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["num_docs"], 1);
    assert_eq!(state.index.read().num_docs(), 1);

    let (_, json) = call(app, get("/search?q=alice+desert")).await;
    assert_eq!(hit_ids(&json), vec![0]);
}

#[tokio::test]
async fn failed_reload_keeps_serving_old_index() {
    let dir = tempdir().unwrap();
    let (app, state) = app(dir.path());
    write_corpus(dir.path(), "   ");

    let req = Request::post("/index/reload").header("X-ADMIN-TOKEN", "secret").body(Body::empty()).unwrap();
    let (status, json) = call(app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().starts_with("The file is empty"));
    assert_eq!(state.index.read().search("alice"), vec![0]);
}

#[test]
fn startup_fails_on_missing_corpus() {
    let dir = tempdir().unwrap();
    assert!(AppState::load(dir.path().join("missing.json"), None).is_err());
}
