//! Per-context bundle of everything the auth subsystem touches.
//!
//! The original design kept a single process-global "current request" slot
//! for server rendering; here that is an explicit context object built once
//! per browser session or per inbound request and passed down the call
//! chain, so concurrent request handlers can never observe each other's
//! cookies.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::cookies::CookieJar;
use crate::session::SessionStore;
use crate::transport::Transport;

/// Execution context the client runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Cookie jar is owned by this process and writable end to end.
    Browser,
    /// Cookies sourced from an inbound request; the response is not owned
    /// by this client, so invalidation must not delete cookies.
    Server,
}

/// Explicit client context: config, cookie jar, session record, transport.
pub struct ClientContext {
    pub config: AuthConfig,
    pub mode: RenderMode,
    pub cookies: CookieJar,
    pub session: SessionStore,
    pub transport: Arc<dyn Transport>,
}

impl ClientContext {
    /// Context for a browser-style session with a fresh writable jar.
    pub fn browser(config: AuthConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            mode: RenderMode::Browser,
            cookies: CookieJar::new(),
            session: SessionStore::new(),
            transport,
        }
    }

    /// Context for serving one inbound request, cookies sourced from its
    /// `Cookie` header. Build one per request; never share across requests.
    pub fn for_request(
        config: AuthConfig,
        transport: Arc<dyn Transport>,
        cookie_header: &str,
    ) -> Self {
        Self {
            config,
            mode: RenderMode::Server,
            cookies: CookieJar::from_request_header(cookie_header),
            session: SessionStore::new(),
            transport,
        }
    }
}
