//! # config
//!
//! why: decide where error records live without hard-coding a path
//! relations: consumed by FileLogStore::from_config
//! what: StoreConfig

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable naming the log root for `StoreConfig::from_env`
pub const LOG_ROOT_ENV: &str = "ERRLOG_ROOT";

/// Where the error log directory is
///
/// Records land in `<log_root>/<dir_name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub log_root: PathBuf,
    pub dir_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            log_root: PathBuf::from("logs"),
            dir_name: "syserrs".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(log_root: impl Into<PathBuf>) -> Self {
        Self {
            log_root: log_root.into(),
            ..Self::default()
        }
    }

    /// Default config with the log root taken from `ERRLOG_ROOT` when set
    pub fn from_env() -> Self {
        match env::var_os(LOG_ROOT_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::default(),
        }
    }

    /// The directory holding the record files
    pub fn error_dir(&self) -> PathBuf {
        self.log_root.join(&self.dir_name)
    }
}
