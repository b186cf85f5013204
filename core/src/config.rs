//! Configuration module for Tickler.
//!
//! This module handles parsing configuration from environment variables. The
//! library types take their settings as constructor arguments; only the
//! binary reads the environment, through [`Config::from_env`].
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `TICKLER_DATA_DIR` | No | `~/.tickler` | Directory holding the stored todos and theme |
//! | `TICKLER_SAVE_DEBOUNCE_MS` | No | 300 | Debounce window for collection writes |
//!
//! # Example
//!
//! ```no_run
//! use tickler_core::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Data directory: {}", config.data_dir.display());
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use thiserror::Error;

use crate::utils::debounce::DEFAULT_DEBOUNCE_MS;

/// Default data directory name relative to home.
const DEFAULT_DATA_DIR: &str = ".tickler";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to determine home directory.
    #[error("failed to determine home directory")]
    NoHomeDirectory,
}

/// Configuration for Tickler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory backing the file store.
    pub data_dir: PathBuf,

    /// How long collection writes wait for further changes before hitting disk.
    pub save_debounce: Duration,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `TICKLER_SAVE_DEBOUNCE_MS` is set but is not a non-negative integer
    /// - `TICKLER_DATA_DIR` is unset and the home directory cannot be determined
    pub fn from_env() -> Result<Self, ConfigError> {
        // Optional: TICKLER_DATA_DIR (default: ~/.tickler)
        let data_dir = match env::var("TICKLER_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
                base_dirs.home_dir().join(DEFAULT_DATA_DIR)
            }
        };

        // Optional: TICKLER_SAVE_DEBOUNCE_MS (default: 300)
        let save_debounce_ms = match env::var("TICKLER_SAVE_DEBOUNCE_MS") {
            Ok(val) => val
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "TICKLER_SAVE_DEBOUNCE_MS".to_string(),
                    message: format!("expected non-negative integer, got '{val}'"),
                })?,
            Err(_) => DEFAULT_DEBOUNCE_MS,
        };

        Ok(Self {
            data_dir,
            save_debounce: Duration::from_millis(save_debounce_ms),
        })
    }
}
