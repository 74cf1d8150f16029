//! Runtime configuration
//!
//! Resolves where the subscription store lives. An explicit path (from
//! `--data-file` or `SUBTRACK_DATA_FILE`) wins; otherwise the store is kept
//! in the platform data directory, e.g. `~/.local/share/subtrack` on Linux.

use std::path::{Path, PathBuf};
use subtrack_core::error::{Result, SubtrackError};
use tracing::debug;

/// File name of the default store
pub const DEFAULT_STORE_FILE: &str = "subscriptions.json";

/// Configuration resolved from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON document holding every subscription
    pub data_file: PathBuf,
}

impl Config {
    /// Create a configuration from CLI arguments
    pub fn from_cli(data_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = data_file {
            if path.as_os_str().is_empty() {
                return Err(SubtrackError::Config(
                    "data file path must not be empty".to_string(),
                ));
            }
            debug!("Using data file from arguments: {}", path.display());
            return Ok(Self {
                data_file: path.to_path_buf(),
            });
        }

        let data_file = default_data_file()?;
        debug!("Using default data file: {}", data_file.display());
        Ok(Self { data_file })
    }
}

/// Default store location inside the user's data directory
pub fn default_data_file() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("subtrack").join(DEFAULT_STORE_FILE))
        .ok_or_else(|| {
            SubtrackError::Config(
                "could not determine a data directory; pass --data-file or set SUBTRACK_DATA_FILE"
                    .to_string(),
            )
        })
}
