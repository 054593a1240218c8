//! Error types for Shield Core.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for shield operations.
///
/// Sanitizing a request never fails; these errors come from loading and
/// validating configuration.
#[derive(Debug, Error)]
pub enum ShieldError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`ShieldConfig`](crate::ShieldConfig).
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Sanitizer construction error passthrough.
    #[error("Sanitizer error: {0}")]
    Sanitizer(#[from] shield_sanitizer::SanitizeError),
}
