//! In-process HTTP mock of the Judge0 endpoints the playground calls

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// What the mock answers. Each poll entry is a status code and a JSON body.
#[derive(Debug, Clone)]
pub struct JudgeScript {
    pub languages_status: u16,
    pub languages: Value,
    pub submit_status: u16,
    pub token: String,
    pub polls: Vec<(u16, Value)>,
}

impl Default for JudgeScript {
    fn default() -> Self {
        Self {
            languages_status: 200,
            languages: json!([]),
            submit_status: 201,
            token: "mock-token".to_string(),
            polls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Option<String>,
    pub host_header: Option<String>,
    pub key_header: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct MockJudgeState {
    script: Arc<JudgeScript>,
    polls: Arc<Mutex<VecDeque<(u16, Value)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockJudgeState {
    fn record(&self, method: &'static str, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(|q| q.to_string()),
            host_header: header("x-rapidapi-host"),
            key_header: header("x-rapidapi-key"),
            body,
        });
    }
}

fn reply(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

async fn languages_handler(
    State(state): State<MockJudgeState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record("GET", &uri, &headers, None);
    reply(state.script.languages_status, state.script.languages.clone())
}

async fn submit_handler(
    State(state): State<MockJudgeState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = serde_json::from_slice::<Value>(&body).ok();
    state.record("POST", &uri, &headers, payload);
    reply(
        state.script.submit_status,
        json!({ "token": state.script.token }),
    )
}

async fn status_handler(
    State(state): State<MockJudgeState>,
    Path(token): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record("GET", &uri, &headers, None);

    if token != state.script.token {
        return reply(404, json!({ "error": "submission not found" }));
    }

    match state.polls.lock().unwrap().pop_front() {
        Some((status, body)) => reply(status, body),
        None => reply(200, json!({ "status": { "id": 2, "description": "Processing" } })),
    }
}

pub struct MockJudgeServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    recorded_requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockJudgeServer {
    pub async fn start(script: JudgeScript) -> Self {
        let state = MockJudgeState {
            polls: Arc::new(Mutex::new(VecDeque::from(script.polls.clone()))),
            script: Arc::new(script),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let recorded_requests = state.requests.clone();

        let app = Router::new()
            .route("/languages", get(languages_handler))
            .route("/submissions", post(submit_handler))
            .route("/submissions/{token}", get(status_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock server to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock judge server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| log::error!("Mock judge server error: {}", e));
        });

        Self {
            addr,
            shutdown_tx,
            recorded_requests,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded_requests.lock().unwrap().clone()
    }

    pub fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock judge server already stopped");
        }
    }
}
