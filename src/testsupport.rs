//! Shared test fixtures: scripted transport and token builders.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::TransportError;
use crate::session::UserRecord;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Build a structurally valid signed token with the given `exp` claim.
/// The signature segment is garbage; this client never verifies it.
pub fn signed_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
    format!("{header}.{payload}.sig")
}

/// Minimal user record fixture.
pub fn sample_user(name: &str) -> UserRecord {
    UserRecord {
        id: 1,
        name: name.to_string(),
        tagline: None,
        roles: Vec::new(),
        project_count: 0,
        locked: false,
        language: None,
    }
}

/// Scripted [`Transport`]: replays queued responses in order and records
/// every dispatched request for assertions.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ApiResponse) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(response));
    }

    pub fn push_err(&self, error: TransportError) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
    }

    /// All requests dispatched so far, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Unreachable(
                    "mock transport script exhausted".to_string(),
                ))
            })
    }
}

/// Bare response with the given status.
pub fn response(status: u16) -> ApiResponse {
    ApiResponse {
        status,
        set_cookie: Vec::new(),
        body: Vec::new(),
    }
}

/// Response carrying `Set-Cookie` directives.
pub fn response_with_cookies(status: u16, directives: &[&str]) -> ApiResponse {
    ApiResponse {
        status,
        set_cookie: directives.iter().map(|s| s.to_string()).collect(),
        body: Vec::new(),
    }
}

/// Response with a JSON body.
pub fn json_response(status: u16, body: serde_json::Value) -> ApiResponse {
    ApiResponse {
        status,
        set_cookie: Vec::new(),
        body: serde_json::to_vec(&body).unwrap_or_default(),
    }
}
