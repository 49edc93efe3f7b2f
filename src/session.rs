//! Process-wide session state: the current user and authenticated flag.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// User record returned by the authority's who-am-i endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub project_count: i64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub language: Option<String>,
}

/// Snapshot of the session record exposed to UI layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<UserRecord>,
    pub authenticated: bool,
}

/// Mutable session record.
///
/// Only the token authority mutates this, and always as a single update of
/// both fields under one lock acquisition — observers never see a user
/// without the authenticated flag or vice versa.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state.
    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Record a successful who-am-i fetch: user set, authenticated true.
    pub(crate) fn set_user(&self, user: UserRecord) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner = SessionState {
            user: Some(user),
            authenticated: true,
        };
    }

    /// Tear down the session record: user cleared, authenticated false.
    pub(crate) fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner = SessionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::sample_user;

    #[test]
    fn starts_logged_out() {
        let store = SessionStore::new();
        assert_eq!(store.snapshot(), SessionState::default());
    }

    // Verifies both fields change together on login and teardown.
    #[test]
    fn set_user_and_clear_update_both_fields() {
        let store = SessionStore::new();
        store.set_user(sample_user("minidigger"));

        let state = store.snapshot();
        assert!(state.authenticated);
        assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some("minidigger"));

        store.clear();
        let state = store.snapshot();
        assert!(!state.authenticated);
        assert!(state.user.is_none());
    }

    // Verifies the camelCase wire shape of the user record.
    #[test]
    fn user_record_decodes_from_camel_case_json() {
        let user: UserRecord = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "minidigger",
                "tagline": "hello",
                "roles": ["Hangar_Admin"],
                "projectCount": 3,
                "locked": false,
                "language": "en"
            }"#,
        )
        .unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.project_count, 3);
        assert_eq!(user.roles, vec!["Hangar_Admin"]);
    }

    // Verifies optional fields default when the endpoint omits them.
    #[test]
    fn user_record_tolerates_minimal_payload() {
        let user: UserRecord = serde_json::from_str(r#"{"id": 1, "name": "x"}"#).unwrap();
        assert_eq!(user.tagline, None);
        assert!(user.roles.is_empty());
        assert!(!user.locked);
    }
}
