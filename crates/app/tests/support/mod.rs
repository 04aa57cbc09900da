//! In-process `/posts` server with json-server semantics.
//!
//! Test fixture only: seeded posts with ids 1..=60, repeatable `?id=`
//! filtering, create with server-assigned ids, replace-on-PUT, 404 on
//! missing ids, a 401 protected route, and a slow route for timeout
//! tests. Every handled request is recorded for no-network-attempt
//! assertions.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

struct ServerState {
    posts: Mutex<BTreeMap<u64, Value>>,
    next_id: AtomicU64,
    requests: Mutex<Vec<String>>,
}

impl ServerState {
    fn seeded() -> Self {
        let mut posts = BTreeMap::new();
        for id in 1..=60u64 {
            posts.insert(
                id,
                json!({
                    "id": id,
                    "title": format!("Post {id}"),
                    "body": format!("Body of post {id}"),
                    "userId": (id % 10) + 1
                }),
            );
        }
        Self {
            posts: Mutex::new(posts),
            next_id: AtomicU64::new(61),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, line: impl Into<String>) {
        self.requests.lock().unwrap().push(line.into());
    }
}

/// Handle to a running mock server.
pub struct MockPosts {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl MockPosts {
    /// Starts the server on an ephemeral local port.
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::seeded());
        let app = Router::new()
            .route("/posts", get(list).post(create))
            .route("/posts/{id}", get(read).put(update).delete(remove))
            .route("/664/posts", post(protected))
            .route("/slow", get(slow))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Base URL of the running server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests the server has handled.
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Handled requests as `METHOD path` lines, in arrival order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn list(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Value> {
    state.record("GET /posts");
    let ids: Vec<u64> = params
        .iter()
        .filter(|(key, _)| key == "id")
        .filter_map(|(_, value)| value.parse().ok())
        .collect();

    let posts = state.posts.lock().unwrap();
    let selected: Vec<Value> = posts
        .iter()
        .filter(|(id, _)| ids.is_empty() || ids.contains(id))
        .map(|(_, post)| post.clone())
        .collect();
    Json(Value::Array(selected))
}

async fn read(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> (StatusCode, Json<Value>) {
    state.record(format!("GET /posts/{id}"));
    let posts = state.posts.lock().unwrap();
    posts.get(&id).map_or_else(
        || (StatusCode::NOT_FOUND, Json(json!({}))),
        |post| (StatusCode::OK, Json(post.clone())),
    )
}

async fn create(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("POST /posts");
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let mut post = body;
    if let Some(object) = post.as_object_mut() {
        object.insert("id".to_string(), json!(id));
    }
    state.posts.lock().unwrap().insert(id, post.clone());
    (StatusCode::CREATED, Json(post))
}

async fn update(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record(format!("PUT /posts/{id}"));
    let mut posts = state.posts.lock().unwrap();
    if !posts.contains_key(&id) {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    // json-server PUT replaces the entity wholesale, keeping the id.
    let mut post = body;
    if let Some(object) = post.as_object_mut() {
        object.insert("id".to_string(), json!(id));
    }
    posts.insert(id, post.clone());
    (StatusCode::OK, Json(post))
}

async fn remove(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> (StatusCode, Json<Value>) {
    state.record(format!("DELETE /posts/{id}"));
    let removed = state.posts.lock().unwrap().remove(&id);
    if removed.is_some() {
        (StatusCode::OK, Json(json!({})))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({})))
    }
}

async fn protected(State(state): State<Arc<ServerState>>) -> (StatusCode, Json<Value>) {
    state.record("POST /664/posts");
    (StatusCode::UNAUTHORIZED, Json(json!({})))
}

async fn slow(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.record("GET /slow");
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!([]))
}
