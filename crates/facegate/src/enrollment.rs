//! Enrollment: bind the face in front of the camera to a role.
//!
//! ```text
//! AwaitingCapture ──no face──▶ NoFaceDetected
//!       │
//!       ▼
//! AwaitingRoleInput ◀──rejected (valid roles reported)──┐
//!       │                                               │
//!       ├──────── role not in hierarchy ────────────────┘
//!       ▼
//!     Bound (persisted, published as current identity)
//! ```

use std::collections::BTreeSet;

use facegate_rbac::RoleHierarchy;
use facegate_store::SharedStore;
use facegate_types::{CurrentIdentity, FileId, Signature};
use facegate_vision::{DetectorError, FaceDetector};
use tracing::{info, warn};

use crate::capture::CaptureGate;
use crate::session::SessionState;
use crate::{FacegateError, Result};

/// Source of role names typed by whoever is enrolling.
pub trait RolePrompt {
    /// The next role entered, or `None` when input has ended.
    fn request_role(&mut self) -> Option<String>;

    /// Reports a rejected entry ([`FacegateError::InvalidRole`]). Another
    /// [`request_role`](Self::request_role) follows.
    fn reject(&mut self, error: &FacegateError);
}

/// Outcome of a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrolled {
    /// Canonical role name from the hierarchy.
    pub role: String,
    /// Entitlements frozen into the identity record.
    pub files: BTreeSet<FileId>,
    /// Whether an earlier identity for this role was overwritten.
    pub replaced: bool,
}

/// One run of the enrollment state machine.
pub struct EnrollmentProtocol<'a> {
    hierarchy: &'a RoleHierarchy,
    store: &'a SharedStore,
    state: &'a SessionState,
    gate: &'a CaptureGate,
    detector: &'a dyn FaceDetector,
}

impl<'a> EnrollmentProtocol<'a> {
    pub fn new(
        hierarchy: &'a RoleHierarchy,
        store: &'a SharedStore,
        state: &'a SessionState,
        gate: &'a CaptureGate,
        detector: &'a dyn FaceDetector,
    ) -> Self {
        Self {
            hierarchy,
            store,
            state,
            gate,
            detector,
        }
    }

    /// Captures one frame, asks for a role until a valid one is entered,
    /// then binds, persists and publishes it.
    ///
    /// # Errors
    ///
    /// - [`FacegateError::NoFaceDetected`] if the frame has no face; nothing is bound.
    /// - [`FacegateError::Detector`] if the signature has NaN or infinite
    ///   components. The role is never requested.
    /// - [`FacegateError::EnrollmentCancelled`] if role input ends.
    /// - Device, detector and store failures.
    pub fn run(&self, prompt: &mut dyn RolePrompt) -> Result<Enrolled> {
        let signature = self.capture_signature()?;

        let (role, files) = loop {
            let Some(input) = prompt.request_role() else {
                info!("Enrollment cancelled");
                return Err(FacegateError::EnrollmentCancelled);
            };
            match self.resolve(&input) {
                Ok(resolved) => break resolved,
                Err(error) => {
                    warn!(role = %input.trim(), "Enrollment rejected unknown role");
                    prompt.reject(&error);
                }
            }
        };

        let previous = self.store.bind_and_save(&role, signature, files.clone())?;
        self.state.publish(CurrentIdentity::Role(role.clone()));
        info!(
            role = %role,
            files = files.len(),
            replaced = previous.is_some(),
            "Identity enrolled"
        );

        Ok(Enrolled {
            role,
            files,
            replaced: previous.is_some(),
        })
    }

    fn capture_signature(&self) -> Result<Signature> {
        let frame = self.gate.capture()?;
        match self.detector.extract_signature(&frame)? {
            Some(signature) if signature.is_finite() => Ok(signature),
            Some(_) => {
                warn!(sequence = frame.sequence, "Non-finite signature in enrollment frame");
                Err(DetectorError("detector returned a non-finite signature".to_string()).into())
            }
            None => {
                warn!(sequence = frame.sequence, "No face in enrollment frame");
                Err(FacegateError::NoFaceDetected)
            }
        }
    }

    /// Canonical role name and entitlements for `input`.
    fn resolve(&self, input: &str) -> Result<(String, BTreeSet<FileId>)> {
        let trimmed = input.trim();
        self.hierarchy
            .find(trimmed)
            .filter(|node| !node.owned_files().is_empty())
            .map(|node| (node.role_name().to_string(), node.owned_files().clone()))
            .ok_or_else(|| FacegateError::InvalidRole {
                role: trimmed.to_string(),
                valid_roles: self.hierarchy.get_all_roles(),
            })
    }
}
