//! Stub analysis API for result tests
//!
//! Serves the media detail, media listing and audio-enable endpoints on an
//! ephemeral port and records every call.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rdt_common::api::ApiClient;
use rdt_common::config::ClientConfig;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Reply for one listing page
#[derive(Debug, Clone)]
pub enum PageReply {
    Body(Value),
    Status(u16),
}

/// Canned responses
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// Detail bodies by job id; unknown ids get 404
    pub items: HashMap<String, Value>,
    /// Listing replies by page index; pages past the end get 404
    pub pages: Vec<PageReply>,
    /// Audio ids whose enable call answers 500
    pub enable_failures: HashSet<String>,
}

impl Behavior {
    pub fn with_item(mut self, request_id: &str, body: Value) -> Self {
        self.items.insert(request_id.to_string(), body);
        self
    }

    pub fn with_page(mut self, body: Value) -> Self {
        self.pages.push(PageReply::Body(body));
        self
    }

    pub fn with_failed_page(mut self, status: u16) -> Self {
        self.pages.push(PageReply::Status(status));
        self
    }
}

#[derive(Clone, Default)]
struct Calls {
    details: Arc<Mutex<Vec<String>>>,
    pages: Arc<Mutex<Vec<u32>>>,
    enables: Arc<Mutex<Vec<(String, String)>>>,
}

#[derive(Clone)]
struct StubState {
    behavior: Arc<Behavior>,
    calls: Calls,
}

/// Running stub API
pub struct StubApi {
    pub base_url: String,
    calls: Calls,
}

impl StubApi {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let calls = Calls::default();
        let state = StubState {
            behavior: Arc::new(behavior),
            calls: calls.clone(),
        };

        let router = Router::new()
            .route("/api/media/users", get(media_page))
            .route("/api/media/users/:id", get(media_detail))
            .route("/api/files/show-audio-result", post(enable_audio))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, calls }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::new("test-key", &self.base_url)).unwrap()
    }

    /// Ids requested from the detail endpoint, in order
    pub fn detail_calls(&self) -> Vec<String> {
        self.calls.details.lock().unwrap().clone()
    }

    /// Page indexes requested from the listing endpoint, in order
    pub fn page_calls(&self) -> Vec<u32> {
        self.calls.pages.lock().unwrap().clone()
    }

    /// (audio id, video id) pairs sent to the enable endpoint
    pub fn enable_calls(&self) -> Vec<(String, String)> {
        self.calls.enables.lock().unwrap().clone()
    }
}

fn api_key_ok(headers: &axum::http::HeaderMap) -> bool {
    headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some("test-key")
}

async fn media_detail(
    State(state): State<StubState>,
    headers: axum::http::HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.calls.details.lock().unwrap().push(id.clone());
    if !api_key_ok(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.behavior.items.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

async fn media_page(
    State(state): State<StubState>,
    headers: axum::http::HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page_index: u32 = params
        .get("pageIndex")
        .and_then(|p| p.parse().ok())
        .unwrap_or(u32::MAX);
    state.calls.pages.lock().unwrap().push(page_index);
    if !api_key_ok(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.behavior.pages.get(page_index as usize) {
        Some(PageReply::Body(body)) => Json(body.clone()).into_response(),
        Some(PageReply::Status(status)) => StatusCode::from_u16(*status).unwrap().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn enable_audio(State(state): State<StubState>, Json(body): Json<Value>) -> StatusCode {
    let audio = body["audioRequestId"].as_str().unwrap_or_default().to_string();
    let video = body["videoRequestId"].as_str().unwrap_or_default().to_string();
    state
        .calls
        .enables
        .lock()
        .unwrap()
        .push((audio.clone(), video));

    if state.behavior.enable_failures.contains(&audio) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}
