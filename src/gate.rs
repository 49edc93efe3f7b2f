//! The authenticated request gate.
//!
//! Wraps arbitrary API calls: attaches the current valid token as an
//! `Authorization` header, and on a forbidden (403) response drives exactly one
//! refresh-and-retry cycle through the token authority before tearing the
//! session down. Two properties carry the correctness weight here: a call
//! that cannot obtain a token aborts before anything is sent (no stale
//! header ever leaks), and the retry budget is a hard bound of one (a
//! broken auth server cannot cause a retry loop).

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::authority;
use crate::context::ClientContext;
use crate::cookies::parse_set_cookie;
use crate::error::RequestError;
use crate::transport::{ApiRequest, ApiResponse};

/// Stats cookie the server may piggyback on API responses; mirrored into
/// the local jar, unrelated to auth.
const STATS_COOKIE: &str = "hangar_stats";

/// Additional attempts permitted after a forbidden response.
const MAX_AUTH_RETRIES: u8 = 1;

/// Issue a request through the gate.
///
/// With `authed`, a token is resolved up front; failure to obtain one
/// surfaces as [`RequestError::Auth`] without the request being attempted.
pub async fn send(
    ctx: &ClientContext,
    mut request: ApiRequest,
    authed: bool,
) -> Result<ApiResponse, RequestError> {
    if authed {
        let result = authority::request_token(ctx, false).await;
        if let Some(error) = result.error {
            return Err(RequestError::Auth(error));
        }
        if let Some(token) = result.token {
            request = with_authorization(request, &token);
        }
    }
    dispatch(ctx, request).await
}

/// Typed JSON call against the public API (`/api/v1/...`).
pub async fn api_request<T: DeserializeOwned>(
    ctx: &ClientContext,
    method: reqwest::Method,
    path: &str,
    body: Option<serde_json::Value>,
    authed: bool,
) -> Result<T, RequestError> {
    debug!(target: "fetch", path, "api");
    json_request(ctx, method, format!("/api/v1/{path}"), body, authed).await
}

/// Typed JSON call against the internal API (`/api/internal/...`).
pub async fn internal_api_request<T: DeserializeOwned>(
    ctx: &ClientContext,
    method: reqwest::Method,
    path: &str,
    body: Option<serde_json::Value>,
    authed: bool,
) -> Result<T, RequestError> {
    debug!(target: "fetch", path, "internal api");
    json_request(ctx, method, format!("/api/internal/{path}"), body, authed).await
}

async fn json_request<T: DeserializeOwned>(
    ctx: &ClientContext,
    method: reqwest::Method,
    path: String,
    body: Option<serde_json::Value>,
    authed: bool,
) -> Result<T, RequestError> {
    let mut request = ApiRequest::new(method, path);
    if let Some(body) = body {
        request = request.json_body(body);
    }
    let response = send(ctx, request, authed).await?;
    response.json()
}

/// Dispatch with a bounded forbidden-retry loop.
///
/// The retry budget is an explicit counter rather than call-depth
/// inference, so the bound holds no matter how the gate is reached.
async fn dispatch(ctx: &ClientContext, request: ApiRequest) -> Result<ApiResponse, RequestError> {
    let mut request = request;
    let mut attempt: u8 = 0;
    loop {
        let response = ctx
            .transport
            .execute(request.clone())
            .await
            .map_err(RequestError::Transport)?;

        if response.is_success() {
            mirror_stats_cookie(ctx, &response);
            return Ok(response);
        }

        if !response.is_forbidden() {
            // Non-auth failures pass through untouched.
            return Err(status_error(response));
        }

        if attempt >= MAX_AUTH_RETRIES {
            debug!(target: "auth", "request forbidden on retry, invalidating");
            authority::invalidate(ctx).await;
            return Err(status_error(response));
        }

        // First forbidden response: try to obtain a fresh token once.
        let result = authority::request_token(ctx, false).await;
        match result.token {
            Some(token) => {
                debug!(target: "auth", "retrying request with fresh token");
                request = with_authorization(request, &token);
                attempt += 1;
            }
            None => {
                debug!(target: "auth", "not retrying since refresh failed, invalidating");
                authority::invalidate(ctx).await;
                return Err(status_error(response));
            }
        }
    }
}

/// Replace (or add) the Authorization header with the scheme-tagged token.
fn with_authorization(mut request: ApiRequest, token: &str) -> ApiRequest {
    request
        .headers
        .retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
    request.header(
        "Authorization",
        format!("{} {token}", authority::AUTH_HEADER_SCHEME),
    )
}

/// Best-effort mirror of the server's stats cookie into the local jar.
fn mirror_stats_cookie(ctx: &ClientContext, response: &ApiResponse) {
    let directive = response
        .set_cookie
        .iter()
        .find(|directive| directive.starts_with(STATS_COOKIE));
    if let Some(directive) = directive {
        if let Some((name, value)) = parse_set_cookie(directive) {
            if name == STATS_COOKIE {
                ctx.cookies.set_value(&name, &value);
            }
        }
    }
}

fn status_error(response: ApiResponse) -> RequestError {
    RequestError::Status(response.status, response.text())
}
