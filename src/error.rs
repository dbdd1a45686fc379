//! Error types for the effect expiry crate.
//!
//! Duration underflow is not an error: a finite duration going negative is
//! the normal removal path of a sweep.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a sweep pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SweepError {
    /// The iteration capability yielded a handle whose collection is gone.
    ///
    /// This points at an entity-lifecycle bug upstream; the pass is aborted
    /// instead of skipping the handle.
    #[error("timed effects collection missing for {handle} during sweep")]
    MissingCollection { handle: String },
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("failed to save config file {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value for [{section}] {key}: {value}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}

/// Scenario file errors.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
}
