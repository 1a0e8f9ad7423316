//! Error types for liveconfig.

use std::path::PathBuf;

/// Result type alias for liveconfig operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or watching configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    ///
    /// Checked explicitly before the read is attempted, so a missing file is
    /// distinguishable from a file that failed to read.
    #[error("configuration file does not exist: {0}")]
    NotFound(PathBuf),

    /// IO error while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The file content could not be decoded into the document type.
    #[error("failed to decode {format} configuration: {message}")]
    Decode {
        /// The on-disk format that was being decoded.
        format: &'static str,
        /// The underlying decoder error.
        message: String,
    },

    /// The document could not be re-encoded for change detection.
    #[error("failed to encode configuration for comparison: {0}")]
    Encode(#[source] serde_json::Error),

    /// The file extension does not map to a supported format.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// The underlying file-system subscription failed.
    #[error("file watch error: {0}")]
    Subscription(#[from] notify::Error),
}
