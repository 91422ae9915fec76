//! Vision error types

use std::path::PathBuf;

use thiserror::Error;

/// Camera failures. Fatal for both recognition and enrollment capture.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("camera {device} unavailable: {reason}")]
    Unavailable { device: String, reason: String },

    #[error("failed to read frame: {0}")]
    ReadFailed(String),

    #[error("camera already released")]
    Released,
}

/// Face detection failed on a frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("face detection failed: {0}")]
pub struct DetectorError(pub String);

/// A replay script could not be loaded.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read replay script at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse replay script at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
