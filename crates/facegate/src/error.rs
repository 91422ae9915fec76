//! Error types for the Facegate session.

use facegate_store::StoreError;
use facegate_vision::{DetectorError, DeviceError};
use thiserror::Error;

/// Result type for Facegate operations.
pub type Result<T> = std::result::Result<T, FacegateError>;

/// Errors surfaced by the session and its control operations.
///
/// An access check with no recognized identity is not an error; it is
/// reported as [`AccessDecision::NoIdentity`](facegate_rbac::AccessDecision).
#[derive(Debug, Error)]
pub enum FacegateError {
    /// The enrollment frame contained no face.
    #[error("no face detected; look at the camera and try again")]
    NoFaceDetected,

    /// The entered role is not part of the hierarchy.
    #[error("invalid role {role:?}; valid roles are: {}", .valid_roles.join(", "))]
    InvalidRole {
        role: String,
        valid_roles: Vec<String>,
    },

    /// Role input ended before a valid role was entered.
    #[error("enrollment cancelled before a role was chosen")]
    EnrollmentCancelled,

    /// The recognition worker stopped after a device or detector failure.
    #[error("recognition has halted after a device failure")]
    RecognizerHalted,

    #[error("failed to spawn recognition worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("recognition worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
