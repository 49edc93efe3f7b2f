//! The token authority: validation, refresh, and invalidation of the
//! authentication token.
//!
//! The authority holds no state of its own. Auth state is re-derived from
//! durable cookie contents on every call ([`derive_auth_state`]), which
//! makes every operation safe to invoke from independent request handlers.
//! Two handlers observing an expired token concurrently may each perform a
//! refresh round-trip, each rotating the refresh token; the last persisted
//! rotation wins and the refresh endpoint is expected to tolerate the
//! stale one. That race is accepted rather than locked away.

use tracing::{debug, warn};

use crate::context::{ClientContext, RenderMode};
use crate::cookies::{cookie_from_set_cookie, AUTH_COOKIE_OPTIONS};
use crate::error::AuthError;
use crate::gate;
use crate::session::UserRecord;
use crate::token::{derive_auth_state, unix_now_secs, AuthState};
use crate::transport::ApiRequest;

/// Access token cookie name.
pub const ACCESS_TOKEN_COOKIE: &str = "HangarAuth";
/// Refresh token cookie name.
pub const REFRESH_TOKEN_COOKIE: &str = "HangarAuth_REFRESH";
/// Scheme token prefixed onto the outgoing `Authorization` header.
pub const AUTH_HEADER_SCHEME: &str = "HangarAuth";

/// Outcome of one token request.
///
/// When no pre-existing valid token was found, exactly one of `token` and
/// `error` is meaningful. `refreshed` is true whenever a network round-trip
/// to mint a new token occurred, even a failed one; false when an existing
/// valid token was reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequestResult {
    pub token: Option<String>,
    pub refreshed: bool,
    pub error: Option<AuthError>,
}

impl TokenRequestResult {
    fn reused(token: String) -> Self {
        Self {
            token: Some(token),
            refreshed: false,
            error: None,
        }
    }

    fn no_credential() -> Self {
        Self {
            token: None,
            refreshed: false,
            error: Some(AuthError::no_session(["no token or refresh token"])),
        }
    }

    fn refresh_failed(reason: impl Into<String>) -> Self {
        Self {
            token: None,
            refreshed: true,
            error: Some(AuthError::no_session([reason.into()])),
        }
    }
}

/// Obtain a token usable for an authenticated API call.
///
/// Fast path: a valid access cookie is returned as-is with no side effects
/// and no network call (unless `force_refetch`). Otherwise the refresh
/// cookie is exchanged for a new token pair at the authority's refresh
/// endpoint. Without either credential the result is a terminal,
/// non-retriable error: the caller has no session at all.
pub async fn request_token(ctx: &ClientContext, force_refetch: bool) -> TokenRequestResult {
    let access = ctx.cookies.get(ACCESS_TOKEN_COOKIE);
    let refresh = ctx.cookies.get(REFRESH_TOKEN_COOKIE);
    let state = derive_auth_state(access.as_deref(), refresh.as_deref(), unix_now_secs());

    let refresh_token = match state {
        AuthState::Valid(token) if !force_refetch => {
            debug!(target: "auth", "found existing valid token in cookies, returning");
            return TokenRequestResult::reused(token);
        }
        // Forced refetch ignores the (still valid) access token but still
        // needs a refresh credential to mint a new one.
        AuthState::Valid(_) => match refresh {
            Some(token) if !token.is_empty() => token,
            _ => {
                debug!(target: "auth", "forced refetch without refresh token, erroring");
                return TokenRequestResult::no_credential();
            }
        },
        AuthState::NeedsRefresh(refresh_token) => {
            debug!(target: "auth", "current token not valid, using refresh token");
            refresh_token
        }
        AuthState::NoCredential => {
            debug!(target: "auth", "no valid token or refresh token, erroring");
            return TokenRequestResult::no_credential();
        }
    };

    refresh_access_token(ctx, &refresh_token).await
}

/// Exchange the refresh token for a new token pair and persist it.
///
/// The refresh token travels as a `Cookie` header, never in a body or URL,
/// so it cannot leak into request logs.
async fn refresh_access_token(ctx: &ClientContext, refresh_token: &str) -> TokenRequestResult {
    debug!(target: "auth", "requesting new token from auth server");
    let request = ApiRequest::get("/refresh").header(
        "Cookie",
        format!("{REFRESH_TOKEN_COOKIE}={refresh_token}"),
    );

    let response = match ctx.transport.execute(request).await {
        Ok(response) => response,
        Err(err) => {
            debug!(target: "auth", error = %err, "failed to refresh token due to request failure");
            return TokenRequestResult::refresh_failed(err.to_string());
        }
    };

    if !response.is_success() {
        debug!(target: "auth", status = response.status, "auth server rejected refresh");
        return TokenRequestResult::refresh_failed(format!(
            "auth server refresh failed with status {}",
            response.status
        ));
    }
    if response.set_cookie.is_empty() {
        debug!(target: "auth", "auth server did not respond with set-cookie header");
        return TokenRequestResult::refresh_failed(
            "auth server did not provide expected set-cookie headers",
        );
    }

    let Some(token) = cookie_from_set_cookie(&response.set_cookie, ACCESS_TOKEN_COOKIE) else {
        debug!(target: "auth", "auth server's set-cookie header did not contain a token");
        return TokenRequestResult::refresh_failed("auth server did not provide token");
    };

    debug!(target: "auth", "found refreshed token, updating token and refresh token in cookies");
    ctx.cookies
        .set(ACCESS_TOKEN_COOKIE, &token, AUTH_COOKIE_OPTIONS);
    // The authority rotates the refresh token on every use; keep the old
    // one when the response omits the rotated cookie.
    if let Some(rotated) = cookie_from_set_cookie(&response.set_cookie, REFRESH_TOKEN_COOKIE) {
        ctx.cookies
            .set(REFRESH_TOKEN_COOKIE, &rotated, AUTH_COOKIE_OPTIONS);
    }

    TokenRequestResult {
        token: Some(token),
        refreshed: true,
        error: None,
    }
}

/// Tear down the session.
///
/// Clears the session record, best-effort notifies the server to drop its
/// side of the session (failures are logged and swallowed, never surfaced),
/// and in browser context deletes both auth cookies. In server-rendering
/// context cookie deletion is skipped because the response is not owned by
/// this call.
pub async fn invalidate(ctx: &ClientContext) {
    ctx.session.clear();

    if let Err(err) = ctx.transport.execute(ApiRequest::get("/invalidate")).await {
        warn!(target: "auth", error = %err, "server-side session invalidation failed");
    }

    if ctx.mode == RenderMode::Browser {
        ctx.cookies.remove(REFRESH_TOKEN_COOKIE);
        ctx.cookies.remove(ACCESS_TOKEN_COOKIE);
        debug!(target: "auth", "invalidated auth cookies");
    }
}

/// Refresh the session record from the authority's who-am-i endpoint.
///
/// On success stores the user and marks the session authenticated; on any
/// failure the session is invalidated and left cleared.
pub async fn update_user(ctx: &ClientContext) {
    match gate::internal_api_request::<UserRecord>(ctx, reqwest::Method::GET, "users/@me", None, true)
        .await
    {
        Ok(user) => {
            debug!(target: "auth", user = %user.name, "updating session user");
            ctx.session.set_user(user);
        }
        Err(err) => {
            debug!(target: "auth", error = %err, "who-am-i failed, invalidating");
            invalidate(ctx).await;
        }
    }
}

/// Login redirect URL for the given return path.
pub fn login_url(ctx: &ClientContext, return_path: &str) -> String {
    let return_path = return_path
        .strip_suffix("?loggedOut")
        .unwrap_or(return_path);
    format!(
        "/login?returnUrl={}{}",
        ctx.config.public_host, return_path
    )
}

/// Logout redirect URL; the landing page is tagged `?loggedOut` so a later
/// login does not bounce straight back into logout.
pub fn logout_url(ctx: &ClientContext) -> String {
    format!("/logout?returnUrl={}?loggedOut", ctx.config.public_host)
}
