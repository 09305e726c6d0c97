//! Stub analysis API for upload tests
//!
//! Serves the upload-target endpoint and a signed-URL bucket on one
//! ephemeral port, counting every call per file name.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use rdt_common::api::ApiClient;
use rdt_common::config::{ClientConfig, RetryPolicy};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the stub answers for particular file names
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// Statuses returned by successive upload-target calls before a 200
    pub target_statuses: HashMap<String, Vec<u16>>,
    /// Answer 200 without a signed URL
    pub missing_signed_url: HashSet<String>,
    /// PUT handler sleeps past the transfer timeout
    pub slow_transfer: HashSet<String>,
    /// PUT handler answers 403
    pub rejected_transfer: HashSet<String>,
}

#[derive(Clone)]
struct StubState {
    base_url: String,
    behavior: Arc<Behavior>,
    target_calls: Arc<Mutex<HashMap<String, usize>>>,
    transfers: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

/// Running stub API
pub struct StubApi {
    pub base_url: String,
    state: StubState,
}

impl StubApi {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = StubState {
            base_url: base_url.clone(),
            behavior: Arc::new(behavior),
            target_calls: Arc::new(Mutex::new(HashMap::new())),
            transfers: Arc::new(Mutex::new(Vec::new())),
        };

        let router = Router::new()
            .route("/api/files/aws-presigned", post(upload_target))
            .route("/bucket/:name", put(transfer))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, state }
    }

    /// Client with short retry delay and transfer timeout
    pub fn client(&self) -> ApiClient {
        let mut config = ClientConfig::new("test-key", &self.base_url);
        config.retry = RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        };
        config.transfer_timeout = Duration::from_millis(200);
        ApiClient::new(config).unwrap()
    }

    /// Upload-target calls seen for `file_name`
    pub fn target_calls(&self, file_name: &str) -> usize {
        self.state
            .target_calls
            .lock()
            .unwrap()
            .get(file_name)
            .copied()
            .unwrap_or(0)
    }

    /// Completed PUTs as (file name, bytes)
    pub fn transfers(&self) -> Vec<(String, Vec<u8>)> {
        self.state.transfers.lock().unwrap().clone()
    }
}

async fn upload_target(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let file_name = body["fileName"].as_str().unwrap_or_default().to_string();

    let call = {
        let mut calls = state.target_calls.lock().unwrap();
        let count = calls.entry(file_name.clone()).or_insert(0);
        *count += 1;
        *count
    };

    if let Some(statuses) = state.behavior.target_statuses.get(&file_name) {
        if let Some(&status) = statuses.get(call - 1) {
            let status = StatusCode::from_u16(status).unwrap();
            return (status, "upstream failure").into_response();
        }
    }

    let request_id = format!("req-{}", file_name);
    if state.behavior.missing_signed_url.contains(&file_name) {
        return Json(json!({"response": {}, "requestId": request_id})).into_response();
    }

    Json(json!({
        "response": {"signedUrl": format!("{}/bucket/{}", state.base_url, file_name)},
        "requestId": request_id
    }))
    .into_response()
}

async fn transfer(
    State(state): State<StubState>,
    Path(name): Path<String>,
    body: Bytes,
) -> StatusCode {
    if state.behavior.slow_transfer.contains(&name) {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    if state.behavior.rejected_transfer.contains(&name) {
        return StatusCode::FORBIDDEN;
    }
    state.transfers.lock().unwrap().push((name, body.to_vec()));
    StatusCode::OK
}
