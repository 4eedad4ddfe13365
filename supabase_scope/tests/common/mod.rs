//! Axum-based mock of the GoTrue auth API
//!
//! Each test starts its own server on an ephemeral port inside the test's
//! runtime, so servers never outlive the test that created them.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub const TEST_KEY: &str = "test-anon-key";
pub const VALID_TOKEN: &str = "valid-user-token";
pub const TEST_USER_ID: &str = "5f0c4a8e-7f6b-4a53-9a57-0d1c2b3a4e5f";

/// Headers seen by the mock, in arrival order
#[derive(Clone, Default)]
pub struct MockGoTrueState {
    pub requests: Arc<Mutex<Vec<HeaderMap>>>,
}

impl MockGoTrueState {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_header(&self, name: &str) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|headers| headers.get(name))
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

pub struct MockGoTrue {
    pub base_url: String,
    pub state: MockGoTrueState,
}

pub async fn start_mock_gotrue() -> MockGoTrue {
    let state = MockGoTrueState::default();
    let app = Router::new()
        .route("/auth/v1/user", get(get_user))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock GoTrue server");
    let addr = listener.local_addr().expect("Mock server has no address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Mock GoTrue server failed");
    });

    MockGoTrue {
        base_url: format!("http://{addr}"),
        state,
    }
}

async fn get_user(
    State(state): State<MockGoTrueState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(headers.clone());

    let api_key_ok = headers
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == TEST_KEY);
    let bearer_ok = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"));

    if !api_key_ok {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid API key"})),
        );
    }
    if !bearer_ok {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "code": 403,
                "error_code": "bad_jwt",
                "msg": "invalid JWT: unable to parse or verify signature"
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": TEST_USER_ID,
            "aud": "authenticated",
            "role": "authenticated",
            "email": "user@example.com",
            "phone": "",
            "app_metadata": {"provider": "github", "providers": ["github"]},
            "user_metadata": {"user_name": "octocat"},
            "identities": [],
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-02T08:30:00Z"
        })),
    )
}
