//! In-process scenario tests for the status/control HTTP endpoints.
//!
//! These tests spin up the Axum router **without** binding a TCP socket.
//! Each test calls `routes::build_router` and drives it via
//! `tower::ServiceExt::oneshot` — no network I/O required.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sigex_daemon::{routes, state};
use tower::ServiceExt;

fn make_router() -> (axum::Router, Arc<state::AppState>) {
    let st = Arc::new(state::AppState::new());
    (routes::build_router(Arc::clone(&st)), st)
}

async fn call(router: axum::Router, req: Request<axum::body::Body>) -> (StatusCode, bytes::Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp.into_body().collect().await.expect("body collect failed").to_bytes();
    (status, body)
}

fn parse_json(b: bytes::Bytes) -> serde_json::Value {
    serde_json::from_slice(&b).expect("body is not valid JSON")
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder().method("GET").uri(uri).body(axum::body::Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<axum::body::Body> {
    Request::builder().method("POST").uri(uri).body(axum::body::Body::empty()).unwrap()
}

#[tokio::test]
async fn health_returns_200_ok_true() {
    let (router, _st) = make_router();
    let (status, body) = call(router, get("/v1/health")).await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "sigex-daemon");
}

#[tokio::test]
async fn fresh_status_is_idle_with_no_active_run() {
    let (router, _st) = make_router();
    let (status, body) = call(router, get("/v1/status")).await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    assert_eq!(json["state"], "idle");
    assert_eq!(json["active_run_id"], serde_json::Value::Null);
    assert_eq!(json["kill_switched"], false);
}

#[tokio::test]
async fn run_start_transitions_to_running_and_assigns_a_run_id() {
    let (router, _st) = make_router();
    let (status, body) = call(router, post("/v1/run/start")).await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    assert_eq!(json["state"], "running");
    assert!(!json["active_run_id"].is_null());
}

#[tokio::test]
async fn run_stop_returns_to_idle_and_clears_the_run_id() {
    let (router, st) = make_router();
    call(router.clone(), post("/v1/run/start")).await;
    let (status, body) = call(router, post("/v1/run/stop")).await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    assert_eq!(json["state"], "idle");
    assert_eq!(json["active_run_id"], serde_json::Value::Null);
    assert!(!st.risk_ledger.try_read().unwrap().kill_switched);
}

#[tokio::test]
async fn run_halt_trips_the_kill_switch_and_blocks_a_subsequent_start() {
    let (router, _st) = make_router();
    call(router.clone(), post("/v1/run/start")).await;

    let (status, body) = call(router.clone(), post("/v1/run/halt")).await;
    assert_eq!(status, StatusCode::OK);
    let json = parse_json(body);
    assert_eq!(json["state"], "halted");
    assert_eq!(json["kill_switched"], true);

    let (status, _) = call(router, post("/v1/run/start")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
