//! Configuration management for Reel Server

use serde::Deserialize;
use std::env;

/// Default cap on upload bodies: 500MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Default session cookie lifetime: 30 days
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding stored objects; also the prefix of every reference
    pub root: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret the session cookie signing key is derived from
    pub secret: String,
    pub cookie_name: String,
    pub max_age_secs: u64,
    pub secure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                root: "./uploads".to_string(),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            session: SessionConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            secret: "reel-dev-secret-change-me".to_string(),
            cookie_name: "app".to_string(),
            max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            secure: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from `lookup`, defaulting each missing value
    ///
    /// A missing `SESSION_SECRET` falls back to the development secret on its
    /// own; every other setting is still honoured.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        let secret = lookup("SESSION_SECRET").unwrap_or_else(|| {
            tracing::warn!(
                "SESSION_SECRET is not set; session cookies are signed with the built-in development secret"
            );
            defaults.session.secret.clone()
        });

        Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: lookup("SERVER_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            storage: StorageConfig {
                root: lookup("UPLOAD_DIR").unwrap_or(defaults.storage.root),
                max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.storage.max_upload_bytes),
            },
            session: SessionConfig {
                secret,
                cookie_name: lookup("SESSION_COOKIE_NAME").unwrap_or(defaults.session.cookie_name),
                max_age_secs: lookup("SESSION_MAX_AGE_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.session.max_age_secs),
                secure: matches!(lookup("SESSION_COOKIE_SECURE").as_deref(), Some("1") | Some("true")),
            },
        }
    }
}
