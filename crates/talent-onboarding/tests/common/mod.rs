#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use talent_onboarding::api::{ApiClient, SessionStore};
use talent_onboarding::config::ApiConfig;
use talent_onboarding::storage::KeyValueStore;

pub const TOKEN: &str = "test-token";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub file_name: String,
    pub content_type: String,
    pub len: usize,
}

/// One request as the mock server saw it.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub bearer: Option<String>,
    pub json: Option<Value>,
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl Recorded {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn files_named(&self, name: &str) -> Vec<&FilePart> {
        self.files.iter().filter(|part| part.name == name).collect()
    }
}

/// In-process stand-in for the registration API.
#[derive(Default)]
pub struct MockApi {
    requests: Mutex<Vec<Recorded>>,
    progress: Mutex<Option<Value>>,
    failure: Mutex<Option<(StatusCode, String)>>,
}

impl MockApi {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("mock mutex poisoned").clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("at least one request")
    }

    pub fn set_progress(&self, progress: Option<Value>) {
        *self.progress.lock().expect("mock mutex poisoned") = progress;
    }

    /// Fail the next registration step submission with the given status and raw body.
    pub fn fail_next(&self, status: StatusCode, body: impl Into<String>) {
        *self.failure.lock().expect("mock mutex poisoned") = Some((status, body.into()));
    }

    fn record(&self, request: Recorded) {
        self.requests
            .lock()
            .expect("mock mutex poisoned")
            .push(request);
    }

    fn take_failure(&self) -> Option<Response> {
        self.failure
            .lock()
            .expect("mock mutex poisoned")
            .take()
            .map(|(status, body)| (status, body).into_response())
    }
}

pub async fn spawn_mock() -> (String, Arc<MockApi>) {
    let api = Arc::new(MockApi::default());
    let router = Router::new()
        .route("/api/models/register/profile", post(multipart_step))
        .route("/api/models/register/documents", post(multipart_step))
        .route("/api/models/register/identity", post(multipart_step))
        .route("/api/hostesses/register/profile", post(multipart_step))
        .route("/api/hostesses/register/documents", post(multipart_step))
        .route("/api/hostesses/register/identity", post(multipart_step))
        .fallback(json_endpoint)
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let address = listener.local_addr().expect("mock api address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock api serves");
    });

    (format!("http://{address}"), api)
}

pub fn client_for<K: KeyValueStore>(base_url: &str, storage: Arc<K>) -> ApiClient<K> {
    let config = ApiConfig {
        base_url: base_url.parse().expect("mock url parses"),
        timeout: Some(std::time::Duration::from_secs(10)),
    };
    ApiClient::new(&config, SessionStore::new(storage)).expect("client builds")
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthenticated." })),
    )
        .into_response()
}

fn account_json() -> Value {
    json!({
        "id": 1,
        "email": "ana.silva@example.com",
        "first_name": "Ana",
        "last_name": "Silva",
        "role": "model",
        "created_at": "2024-05-01T09:30:00Z"
    })
}

async fn multipart_step(
    State(api): State<Arc<MockApi>>,
    uri: Uri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut recorded = Recorded {
        method: "POST".to_string(),
        path: uri.to_string(),
        bearer: bearer(&headers),
        ..Recorded::default()
    };

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.expect("file part");
                recorded.files.push(FilePart {
                    name,
                    file_name,
                    content_type,
                    len: bytes.len(),
                });
            }
            None => {
                let value = field.text().await.expect("text part");
                recorded.fields.push((name, value));
            }
        }
    }

    let authorized = recorded.bearer.as_deref() == Some(TOKEN);
    api.record(recorded);
    if !authorized {
        return unauthorized();
    }
    if let Some(failure) = api.take_failure() {
        return failure;
    }
    Json(json!({ "message": "saved" })).into_response()
}

async fn json_endpoint(
    State(api): State<Arc<MockApi>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method: method.to_string(),
        path: uri.to_string(),
        bearer: bearer(&headers),
        json: serde_json::from_slice(&body).ok(),
        ..Recorded::default()
    };
    let authorized = recorded.bearer.as_deref() == Some(TOKEN);
    let payload = recorded.json.clone().unwrap_or(Value::Null);
    api.record(recorded);

    let path = uri.path();
    match (method.as_str(), path) {
        ("POST", "/api/auth/login") => {
            if payload["password"] == PASSWORD {
                Json(json!({ "token": TOKEN, "user": account_json() })).into_response()
            } else {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "message": "Invalid credentials" })),
                )
                    .into_response()
            }
        }
        ("GET", "/api/models/gallery") | ("GET", "/api/hostesses/gallery") => Json(json!([
            {
                "id": 11,
                "display_name": "Ana S.",
                "role": "model",
                "height": "178",
                "photos": ["https://cdn.example.com/11/1.jpg"]
            }
        ]))
        .into_response(),
        _ if !authorized => unauthorized(),
        ("POST", "/api/models/register/personal-info")
        | ("POST", "/api/hostesses/register/personal-info") => match api.take_failure() {
            Some(failure) => failure,
            None => (
                StatusCode::CREATED,
                Json(json!({ "id": 42, "message": "created" })),
            )
                .into_response(),
        },
        ("GET", "/api/models/register/progress") | ("GET", "/api/hostesses/register/progress") => {
            match api.progress.lock().expect("mock mutex poisoned").clone() {
                Some(progress) => Json(progress).into_response(),
                None => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "message": "No registration in progress" })),
                )
                    .into_response(),
            }
        }
        ("GET", "/api/account") => Json(json!({ "user": account_json() })).into_response(),
        ("PUT", "/api/account") | ("PATCH", "/api/account") => {
            let mut user = account_json();
            if let (Some(user), Some(changes)) = (user.as_object_mut(), payload.as_object()) {
                for (key, value) in changes {
                    user.insert(key.clone(), value.clone());
                }
            }
            Json(json!({ "user": user })).into_response()
        }
        ("GET", "/api/models/applications") => Json(json!({
            "applications": [
                {
                    "id": 42,
                    "role": "model",
                    "full_name": "Ana Silva",
                    "email": "ana.silva@example.com",
                    "status": "pending",
                    "submitted_at": "2024-05-02T12:00:00Z"
                }
            ]
        }))
        .into_response(),
        ("DELETE", path) if path.starts_with("/api/models/applications/") => {
            StatusCode::NO_CONTENT.into_response()
        }
        ("GET", "/api/admin/hostesses") => Json(json!([
            {
                "id": "h-7",
                "full_name": "Marta Costa",
                "email": "marta@example.com",
                "status": "pending"
            },
            {
                "id": "h-8",
                "full_name": "Rita Lopes",
                "email": "rita@example.com",
                "status": "rejected",
                "rejection_reason": "Photos too dark"
            }
        ]))
        .into_response(),
        ("POST", path) if path.starts_with("/api/admin/") => {
            Json(json!({ "message": "updated" })).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Not Found" })),
        )
            .into_response(),
    }
}
