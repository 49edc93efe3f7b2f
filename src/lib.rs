//! Hangar auth client — token lifecycle for authenticated API calls.
//!
//! This crate owns the client side of the authentication token lifecycle:
//! obtaining, validating, refreshing, and attaching a bearer token to API
//! calls, with a single bounded retry on authorization failure and safe
//! session teardown when nothing recoverable remains.
//!
//! Auth state is never held in memory between calls; it is re-derived from
//! cookie contents on every invocation, so the token authority is stateless
//! and safe to call from independent request handlers.
//!
//! # Quick start
//!
//! ```no_run
//! use hangar_auth::config::AuthConfig;
//! use hangar_auth::context::ClientContext;
//! use hangar_auth::transport::{ApiRequest, HttpTransport};
//! use hangar_auth::{authority, gate};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = AuthConfig::from_env().unwrap();
//! let transport = Arc::new(HttpTransport::new(&config));
//! let ctx = ClientContext::browser(config, transport);
//!
//! authority::update_user(&ctx).await;
//! if ctx.session.snapshot().authenticated {
//!     let response = gate::send(&ctx, ApiRequest::get("/api/v1/projects"), true)
//!         .await
//!         .unwrap();
//!     println!("{}", response.text());
//! }
//! # }
//! ```

pub mod authority;
pub mod config;
pub mod context;
pub mod cookies;
pub mod error;
pub mod gate;
pub mod session;
#[cfg(test)]
pub mod testsupport;
pub mod token;
pub mod transport;

pub use authority::{
    request_token, ACCESS_TOKEN_COOKIE, AUTH_HEADER_SCHEME, REFRESH_TOKEN_COOKIE,
};
pub use error::{AuthError, RequestError};
pub use token::{validate_token, AuthState};
