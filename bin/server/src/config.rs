//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.
//!
//! See [`AccessConfig`](hrdesk_access::AccessConfig) for role resolution
//! settings (`ACCESS__ROLE_SOURCE`, `ACCESS__PRIVILEGED_ROLES`).

use hrdesk_access::AccessConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration composed from library configs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Where unauthenticated page requests are redirected.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// JSON file with the roles, employees and users to serve.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Role resolution configuration.
    #[serde(default)]
    pub access: AccessConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session duration in minutes.
    #[serde(default = "default_session_duration_minutes")]
    pub duration_minutes: i64,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_session_duration_minutes() -> i64 {
    120
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_secure_cookies() -> bool {
    true
}

fn default_cookie_name() -> String {
    "session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_session_duration_minutes(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_secure_cookies(),
            cookie_name: default_cookie_name(),
        }
    }
}

impl SessionConfig {
    /// Session lifetime as a chrono duration.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.duration_minutes)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            login_path: default_login_path(),
            seed_path: None,
            session: SessionConfig::default(),
            access: AccessConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrdesk_access::RoleSourceKind;

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.duration_minutes, 120);
        assert_eq!(config.cleanup_interval_seconds, 300);
        assert!(config.secure_cookies);
        assert_eq!(config.cookie_name, "session");
        assert_eq!(config.duration(), chrono::Duration::hours(2));
    }

    #[test]
    fn server_config_fills_defaults_from_empty_source() {
        let config: ServerConfig = config::Config::builder()
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize");

        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.login_path, "/login");
        assert!(config.seed_path.is_none());
        assert_eq!(config.access.role_source_kind(), RoleSourceKind::Employee);
    }

    #[test]
    fn nested_keys_override_defaults() {
        let config: ServerConfig = config::Config::builder()
            .set_override("login_path", "/auth/login")
            .expect("override")
            .set_override("session.secure_cookies", false)
            .expect("override")
            .set_override("access.role_source", "column")
            .expect("override")
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize");

        assert_eq!(config.login_path, "/auth/login");
        assert!(!config.session.secure_cookies);
        assert_eq!(config.access.role_source_kind(), RoleSourceKind::Column);
    }
}
