//! In-process Task Service used by the integration tests.
//!
//! Runs a real HTTP server on an ephemeral port so requests go through the
//! whole client stack. Every route can be forced to fail with a status code.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    tasks: Vec<Value>,
    next_id: i64,
    failures: Vec<(String, u16)>,
    garbage_body: bool,
    requests: Vec<String>,
}

type Shared = Arc<Mutex<Inner>>;

#[derive(Clone)]
pub struct StubService {
    inner: Shared,
    base_url: String,
}

impl StubService {
    /// `tasks` must be a JSON array; new ids continue after its length.
    pub fn start(tasks: Value) -> Self {
        let tasks = tasks.as_array().cloned().unwrap_or_default();
        let inner = Arc::new(Mutex::new(Inner {
            next_id: tasks.len() as i64 + 1,
            tasks,
            ..Inner::default()
        }));

        let app = Router::new()
            .route("/tasks", get(list_tasks).post(create_task))
            .route("/tasks/{id}/toggle", patch(toggle_task))
            .route("/tasks/{id}", delete(delete_task))
            .with_state(Arc::clone(&inner));

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub listener");
                tx.send(listener.local_addr().expect("stub addr"))
                    .expect("send stub addr");
                axum::serve(listener, app).await.expect("stub server");
            });
        });

        let addr = rx.recv().expect("stub server did not start");
        Self {
            inner,
            base_url: format!("http://{addr}"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every request fails with `status`.
    pub fn fail_with(&self, status: u16) {
        self.fail_route("", status);
    }

    /// Requests whose `"METHOD /path"` label starts with `prefix` fail.
    pub fn fail_route(&self, prefix: &str, status: u16) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .push((prefix.to_string(), status));
    }

    pub fn serve_garbage(&self) {
        self.inner.lock().unwrap().garbage_body = true;
    }

    pub fn recover(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.failures.clear();
        inner.garbage_body = false;
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn tasks(&self) -> Vec<Value> {
        self.inner.lock().unwrap().tasks.clone()
    }
}

/// Base URL on which nothing is listening.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn id_matches(task: &Value, raw: &str) -> bool {
    match &task["id"] {
        Value::Number(number) => number.to_string() == raw,
        Value::String(text) => text == raw,
        _ => false,
    }
}

fn begin(inner: &mut Inner, request: String) -> Option<Response> {
    let failure = inner
        .failures
        .iter()
        .find(|(prefix, _)| request.starts_with(prefix.as_str()))
        .map(|(_, code)| *code);
    inner.requests.push(request);
    if let Some(code) = failure {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Some((status, "stub failure").into_response());
    }
    if inner.garbage_body {
        return Some((StatusCode::OK, "definitely not json").into_response());
    }
    None
}

async fn list_tasks(State(state): State<Shared>) -> Response {
    let mut inner = state.lock().unwrap();
    if let Some(response) = begin(&mut inner, "GET /tasks".into()) {
        return response;
    }
    Json(Value::Array(inner.tasks.clone())).into_response()
}

async fn create_task(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut inner = state.lock().unwrap();
    if let Some(response) = begin(&mut inner, "POST /tasks".into()) {
        return response;
    }
    let task = serde_json::json!({
        "id": inner.next_id,
        "title": body["title"],
        "description": body["description"],
        "completed": false,
    });
    inner.next_id += 1;
    inner.tasks.push(task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn toggle_task(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut inner = state.lock().unwrap();
    if let Some(response) = begin(&mut inner, format!("PATCH /tasks/{id}/toggle")) {
        return response;
    }
    match inner.tasks.iter_mut().find(|task| id_matches(task, &id)) {
        Some(task) => {
            let completed = task["completed"].as_bool().unwrap_or(false);
            task["completed"] = Value::Bool(!completed);
            Json(task.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_task(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut inner = state.lock().unwrap();
    if let Some(response) = begin(&mut inner, format!("DELETE /tasks/{id}")) {
        return response;
    }
    let before = inner.tasks.len();
    inner.tasks.retain(|task| !id_matches(task, &id));
    if inner.tasks.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
