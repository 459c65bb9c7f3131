//! Axum router and all HTTP handlers for the status/control surface.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. All handlers are `pub(crate)` so the scenario tests in
//! `tests/` can compose the router directly.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::info;
use uuid::Uuid;

use crate::{
    api_types::HealthResponse,
    state::{uptime_secs, AppState, BusMsg},
};

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/status", get(status_handler))
        .route("/v1/stream", get(stream))
        .route("/v1/run/start", post(run_start))
        .route("/v1/run/stop", post(run_stop))
        .route("/v1/run/halt", post(run_halt))
        .with_state(state)
}

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

pub(crate) async fn status_handler(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let mut snap = st.status.read().await.clone();
    snap.daemon_uptime_secs = uptime_secs();

    {
        let ledger = st.risk_ledger.read().await;
        snap.kill_switched = ledger.kill_switched;
    }

    let _ = st.bus.send(BusMsg::Status(snap.clone()));
    (StatusCode::OK, Json(snap))
}

/// Start a live run.
///
/// Returns `403 Forbidden` if the risk ledger's kill switch is tripped —
/// the pipeline gates on the same `kill_switched` flag the risk engine
/// trips on a daily-loss breach, so a start request after a breach is
/// refused the same way a new candidate would be.
pub(crate) async fn run_start(State(st): State<Arc<AppState>>) -> Response {
    {
        let ledger = st.risk_ledger.read().await;
        if ledger.kill_switched {
            return (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({
                    "error": "kill switch tripped; clear it before starting a new run",
                })),
            )
                .into_response();
        }
    }

    let mut s = st.status.write().await;

    if s.state != "running" {
        s.active_run_id = Some(derive_daemon_run_id(st.build.service, st.build.version));
    }
    s.state = "running".to_string();
    s.notes = None;
    s.daemon_uptime_secs = uptime_secs();

    let snap = s.clone();
    drop(s);

    info!(run_id = ?snap.active_run_id, "run/start");
    let _ = st.bus.send(BusMsg::Status(snap.clone()));
    (StatusCode::OK, Json(snap)).into_response()
}

pub(crate) async fn run_stop(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let mut s = st.status.write().await;

    s.active_run_id = None;
    s.state = "idle".to_string();
    s.notes = Some("run stopped".to_string());
    s.daemon_uptime_secs = uptime_secs();

    let snap = s.clone();
    drop(s);

    info!("run/stop");
    let _ = st.bus.send(BusMsg::Status(snap.clone()));
    (StatusCode::OK, Json(snap))
}

/// Manual halt: trips the risk ledger's kill switch the same way a daily-loss
/// breach does, so `run_start` refuses until an operator clears it directly
/// against the ledger (there is no separate "disarm" concept here).
pub(crate) async fn run_halt(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    {
        let mut ledger = st.risk_ledger.write().await;
        ledger.kill_switched = true;
    }

    let mut s = st.status.write().await;
    s.state = "halted".to_string();
    s.notes = Some("halt asserted by operator".to_string());
    s.daemon_uptime_secs = uptime_secs();
    s.kill_switched = true;

    let snap = s.clone();
    drop(s);

    info!("run/halt");
    let _ = st.bus.send(BusMsg::Status(snap.clone()));
    (StatusCode::OK, Json(snap))
}

/// Derive a deterministic in-memory run ID from build metadata.
///
/// No RNG: uses `Uuid::new_v5` over the DNS namespace so the same binary
/// version always derives the same in-memory session label.
fn derive_daemon_run_id(service: &'static str, version: &'static str) -> Uuid {
    let data = format!("sigex-daemon.run.v1|{service}|{version}");
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, data.as_bytes())
}

pub(crate) async fn stream(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));

    let rx = st.bus.subscribe();
    let events = broadcast_to_sse(rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<BusMsg>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(m) => {
                let event_name = match &m {
                    BusMsg::Heartbeat { .. } => "heartbeat",
                    BusMsg::Status(_) => "status",
                    BusMsg::LogLine { .. } => "log",
                };
                let data = serde_json::to_string(&m).ok()?;
                Some(Ok(Event::default().event(event_name).data(data)))
            }
            Err(_) => None,
        }
    })
}
