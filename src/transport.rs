//! Transport seam: request/response value types and the HTTP implementation.
//!
//! The gate and authority never talk to reqwest directly; they dispatch
//! [`ApiRequest`] values through the [`Transport`] trait. Responses carry
//! their HTTP status as data — only network-level failures are errors —
//! so the gate can apply its forbidden-status retry policy uniformly.

use async_trait::async_trait;
use reqwest::header::SET_COOKIE;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::AuthConfig;
use crate::error::{RequestError, TransportError};

/// HTTP status signaling a rejected credential, distinct from all other
/// failure classes. Exactly 403: a 401 from a wrapped API call is an
/// ordinary failure and passes through to the caller untouched.
const FORBIDDEN_STATUS: u16 = 403;

/// One outgoing API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: reqwest::Method,
    /// Path relative to the configured base URL, leading slash included.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: reqwest::Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(reqwest::Method::GET, path)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// First value of a named header, case-insensitive.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A completed HTTP round-trip.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// All `Set-Cookie` directives on the response, in order.
    pub set_cookie: Vec<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for the forbidden status that triggers the gate's single
    /// retry cycle.
    pub fn is_forbidden(&self) -> bool {
        self.status == FORBIDDEN_STATUS
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON into the requested type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        serde_json::from_slice(&self.body).map_err(|err| RequestError::Decode(err.to_string()))
    }
}

/// Dispatches API requests; implemented over reqwest in production and by a
/// scripted mock in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and surface the response regardless of status.
    /// Only network-level failures return an error.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// [`Transport`] over a shared `reqwest::Client`.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport from resolved configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let set_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok().map(str::to_string))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse {
            status,
            set_cookie,
            body,
        })
    }
}
