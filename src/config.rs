//! Environment-driven application configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::transition::TransitionConfig;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// The single administrator address mutating admin routes check
    /// the session email against.
    pub admin_email: String,
    /// HTTP listen port.
    pub port: u16,
    /// Root directory of the disk-backed image store.
    pub storage_root: PathBuf,
    /// Base URL prepended to public image paths.
    pub public_base_url: String,
    /// Transition timing policy handed to `spawn_coordinator`.
    pub transition: TransitionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql:///festival".to_string(),
            admin_email: String::new(),
            port: 3000,
            storage_root: PathBuf::from("data/storage"),
            public_base_url: "http://localhost:3000".to_string(),
            transition: TransitionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, falling back to the
    /// defaults above. Reads a `.env` file when present. Transition
    /// timings come from `TRANSITION_MIN_MS`, `TRANSITION_MAX_MS` and
    /// `TRANSITION_POLL_MS`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            port: env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_root),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
            transition: TransitionConfig {
                min_duration: env_millis("TRANSITION_MIN_MS", defaults.transition.min_duration),
                max_duration: env_millis("TRANSITION_MAX_MS", defaults.transition.max_duration),
                poll_interval: env_millis("TRANSITION_POLL_MS", defaults.transition.poll_interval),
            },
        }
    }
}

fn env_millis(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
