// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Everything has a local-development default; a `.env` file is honored
//! when present.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID for Firestore.
    ///
    /// For local development with the emulator, set FIRESTORE_EMULATOR_HOST
    /// and any project id will do.
    pub gcp_project_id: String,
    /// Directory for local device state (view options, backups).
    pub data_dir: PathBuf,
    /// Snapshot poll interval in seconds.
    pub poll_interval_secs: u64,
    /// Run against the in-memory store instead of Firestore.
    pub offline: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            data_dir: PathBuf::from("./data"),
            poll_interval_secs: 5,
            offline: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let poll_interval_secs = match env::var("SYNC_POLL_INTERVAL_SECS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::Invalid("SYNC_POLL_INTERVAL_SECS")),
            },
            Err(_) => 5,
        };

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            poll_interval_secs,
            offline: env::var("OFFLINE_MODE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: env vars are process-global, so defaults and the
    // invalid-interval case must not run concurrently.
    #[test]
    fn test_config_from_env() {
        env::remove_var("GCP_PROJECT_ID");
        env::remove_var("SYNC_POLL_INTERVAL_SECS");
        env::remove_var("OFFLINE_MODE");

        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.gcp_project_id, "local-dev");
        assert_eq!(config.poll_interval_secs, 5);
        assert!(!config.offline);

        env::set_var("SYNC_POLL_INTERVAL_SECS", "0");
        assert!(Config::from_env().is_err());
        env::remove_var("SYNC_POLL_INTERVAL_SECS");
    }
}
