//! Client configuration with environment overrides.

use crate::error::ConfigError;

/// Public host default used when nothing else is configured.
const DEFAULT_PUBLIC_HOST: &str = "https://hangar.papermc.io";
/// API base default: same origin, relative paths.
const DEFAULT_BASE_URL: &str = "";
/// Default HTTP timeout for auth and API round-trips, in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Public host embedded into login/logout return URLs.
    pub public_host: String,
    /// Base URL prefixed onto every request path; empty for same-origin.
    pub base_url: String,
    /// Request timeout applied by the HTTP transport.
    pub http_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_host: DEFAULT_PUBLIC_HOST.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl AuthConfig {
    /// Defaults with process-environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides(&|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply env overrides through an injectable lookup, so tests can drive
    /// this without touching process state.
    pub fn apply_env_overrides<FEnv>(&mut self, env_lookup: &FEnv) -> Result<(), ConfigError>
    where
        FEnv: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env_lookup("HANGAR_PUBLIC_HOST") {
            self.public_host = host.trim_end_matches('/').to_string();
        }
        if let Some(url) = env_lookup("HANGAR_API_BASE_URL") {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = env_lookup("HANGAR_HTTP_TIMEOUT_SECS") {
            // Clamp to at least 1 second to avoid "no-timeout" accidental behavior.
            let parsed = timeout.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!(
                    "invalid HANGAR_HTTP_TIMEOUT_SECS value `{timeout}`: expected positive integer seconds"
                ))
            })?;
            self.http_timeout_secs = parsed.max(1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let mut config = AuthConfig::default();
        config.apply_env_overrides(&|_| None).unwrap();
        assert_eq!(config, AuthConfig::default());
    }

    // Verifies overrides are applied and trailing slashes trimmed.
    #[test]
    fn env_overrides_apply() {
        let mut config = AuthConfig::default();
        config
            .apply_env_overrides(&|name| match name {
                "HANGAR_PUBLIC_HOST" => Some("https://hangar.test/".to_string()),
                "HANGAR_API_BASE_URL" => Some("https://api.hangar.test".to_string()),
                "HANGAR_HTTP_TIMEOUT_SECS" => Some("5".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.public_host, "https://hangar.test");
        assert_eq!(config.base_url, "https://api.hangar.test");
        assert_eq!(config.http_timeout_secs, 5);
    }

    #[test]
    fn zero_timeout_clamps_to_one_second() {
        let mut config = AuthConfig::default();
        config
            .apply_env_overrides(&|name| {
                (name == "HANGAR_HTTP_TIMEOUT_SECS").then(|| "0".to_string())
            })
            .unwrap();
        assert_eq!(config.http_timeout_secs, 1);
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let mut config = AuthConfig::default();
        let err = config
            .apply_env_overrides(&|name| {
                (name == "HANGAR_HTTP_TIMEOUT_SECS").then(|| "soon".to_string())
            })
            .unwrap_err();
        assert!(err.to_string().contains("HANGAR_HTTP_TIMEOUT_SECS"));
    }
}
