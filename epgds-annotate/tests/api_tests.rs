//! Integration tests for the annotation API
//!
//! Drives the router the way the browser form does: read the current
//! record, submit annotations, and verify what lands in the subset file.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use epgds_annotate::session::AnnotationSession;
use epgds_annotate::{build_router, AppState};
use epgds_common::dataset::SubsetRecord;
use epgds_common::jsonl::read_jsonl;

fn subset_lines() -> String {
    let mut lines = String::new();
    for i in 0..3 {
        lines.push_str(&format!(
            r#"{{"id":"20230601210{i}-NID32736-SID01024-EID0000{i}","network_id":32736,"service_id":1024,"transport_stream_id":32736,"event_id":{i},"start_time":"2023-06-01T21:0{i}:00+09:00","duration":1800,"title":"番組{i}","title_without_symbols":"番組{i}","description":"概要{i}","description_without_symbols":"概要{i}","major_genre_id":3,"middle_genre_id":0,"series_title":"","episode_number":null,"subtitle":null}}"#
        ));
        lines.push('\n');
    }
    lines
}

fn setup(dir: &tempfile::TempDir, start_index: usize) -> axum::Router {
    let path = dir.path().join("subset.jsonl");
    std::fs::write(&path, subset_lines()).unwrap();
    let session = AnnotationSession::load(path, start_index).unwrap();
    build_router(AppState::new(session))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_module() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(&dir, 0);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "epgds-annotate");
}

#[tokio::test]
async fn current_returns_the_record_under_the_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(&dir, 1);

    let response = app.oneshot(get("/api/current")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["done"], false);
    assert_eq!(body["total"], 3);
    assert_eq!(body["remaining"], 2);
    assert_eq!(body["record"]["index"], 1);
    assert_eq!(body["record"]["title"], "番組1");
}

#[tokio::test]
async fn annotate_persists_and_advances_to_the_next_record() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(&dir, 0);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/annotate",
            json!({
                "series_title": "シリーズ名",
                "episode_number": "第1話",
                "subtitle": ""
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["record"]["index"], 1);
    assert_eq!(body["remaining"], 2);

    let records: Vec<SubsetRecord> = read_jsonl(&dir.path().join("subset.jsonl")).unwrap();
    assert_eq!(records[0].series_title, "シリーズ名");
    assert_eq!(records[0].episode_number.as_deref(), Some("第1話"));
    assert_eq!(records[0].subtitle, None);
    assert_eq!(records[1].series_title, "");
}

#[tokio::test]
async fn annotation_write_path_keeps_other_fields_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(&dir, 0);
    let path = dir.path().join("subset.jsonl");
    let before: Vec<SubsetRecord> = read_jsonl(&path).unwrap();

    let response = app
        .oneshot(post_json(
            "/api/annotate",
            json!({
                "series_title": "シリーズ",
                "episode_number": "#1・#2",
                "subtitle": "前編／後編"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let after: Vec<SubsetRecord> = read_jsonl(&path).unwrap();
    assert_eq!(after.len(), before.len());
    let mut reverted = after[0].clone();
    reverted.series_title = before[0].series_title.clone();
    reverted.episode_number = before[0].episode_number.clone();
    reverted.subtitle = before[0].subtitle.clone();
    assert_eq!(reverted, before[0]);
    assert_eq!(after[1], before[1]);
    assert_eq!(after[2], before[2]);
}

#[tokio::test]
async fn session_completes_after_the_last_record() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(&dir, 2);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/annotate",
            json!({"series_title": "最後", "episode_number": "", "subtitle": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["done"], true);
    assert_eq!(body["record"], Value::Null);

    // Further submissions are rejected, not silently applied
    let response = app
        .oneshot(post_json(
            "/api/annotate",
            json!({"series_title": "x", "episode_number": "", "subtitle": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn annotation_page_serves_the_form() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup(&dir, 0);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("シリーズタイトル"));
    assert!(page.contains("/api/annotate"));
}
