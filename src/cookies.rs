//! Named-cookie accessor over either execution context.
//!
//! A [`CookieJar`] is the single cookie store a [`ClientContext`] reads and
//! writes. In browser-style contexts it starts empty and is owned by the
//! process; in server-rendering contexts it is seeded from the inbound
//! request's `Cookie` header, so cookie reads transparently source from the
//! request being served.
//!
//! [`ClientContext`]: crate::context::ClientContext

use std::collections::BTreeMap;
use std::sync::Mutex;

/// `SameSite` cookie attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

/// Attributes recorded alongside a stored cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
}

/// Attributes used for both auth cookies: `HttpOnly; Secure; SameSite=Lax`.
pub const AUTH_COOKIE_OPTIONS: SetOptions = SetOptions {
    http_only: true,
    secure: true,
    same_site: SameSite::Lax,
};

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    options: Option<SetOptions>,
}

/// Shared named-cookie store.
///
/// Interior mutability so one jar can be shared across the tasks of a
/// logical execution context; the lock is never held across an await.
#[derive(Debug, Default)]
pub struct CookieJar {
    inner: Mutex<BTreeMap<String, StoredCookie>>,
}

impl CookieJar {
    /// Empty jar for a browser-style context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jar seeded from an inbound request's `Cookie` header
    /// (`name=value; name2=value2`).
    pub fn from_request_header(header: &str) -> Self {
        let jar = Self::new();
        {
            let mut inner = jar.inner.lock().unwrap_or_else(|e| e.into_inner());
            for (name, value) in parse_cookie_header(header) {
                inner.insert(
                    name,
                    StoredCookie {
                        value,
                        options: None,
                    },
                );
            }
        }
        jar
    }

    /// Current value of the named cookie, if present.
    pub fn get(&self, name: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.get(name).map(|cookie| cookie.value.clone())
    }

    /// Store a cookie with explicit attributes.
    pub fn set(&self, name: &str, value: &str, options: SetOptions) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                options: Some(options),
            },
        );
    }

    /// Store a cookie without attributes (mirrored server directives such as
    /// the stats cookie).
    pub fn set_value(&self, name: &str, value: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                options: None,
            },
        );
    }

    /// Delete the named cookie. Returns `true` when it was present.
    ///
    /// A browser jar removes with an explicit `path: "/"`; this jar keys
    /// cookies by name alone, so there is no path scoping to pass.
    pub fn remove(&self, name: &str) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.remove(name).is_some()
    }

    /// Attributes recorded for a cookie, when it was set with any.
    pub fn options(&self, name: &str) -> Option<SetOptions> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.get(name).and_then(|cookie| cookie.options)
    }
}

/// Parse an inbound `Cookie` request header into name/value pairs.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Parse one `Set-Cookie` directive into its leading name/value pair,
/// ignoring attributes (`Path`, `Max-Age`, ...).
pub fn parse_set_cookie(directive: &str) -> Option<(String, String)> {
    let first = directive.split(';').next()?;
    let (name, value) = first.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

/// Find the value of a named cookie among a response's `Set-Cookie`
/// directives.
pub fn cookie_from_set_cookie(directives: &[String], name: &str) -> Option<String> {
    directives.iter().find_map(|directive| {
        let (found, value) = parse_set_cookie(directive)?;
        if found == name && !value.is_empty() {
            Some(value)
        } else {
            None
        }
    })
}
