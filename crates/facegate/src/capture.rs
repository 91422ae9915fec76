//! Single gate in front of the camera.

use std::sync::{Mutex, MutexGuard};

use facegate_types::Frame;
use facegate_vision::{Camera, DeviceError};
use tracing::info;

/// Serializes every capture against the one camera handle.
///
/// The recognition worker and enrollment both capture through the gate, so
/// an enrollment capture simply waits for the worker's capture in flight.
/// Once released, the camera is gone and captures fail.
pub struct CaptureGate {
    camera: Mutex<Option<Box<dyn Camera>>>,
}

impl CaptureGate {
    pub fn new(camera: Box<dyn Camera>) -> Self {
        Self {
            camera: Mutex::new(Some(camera)),
        }
    }

    fn camera(&self) -> MutexGuard<'_, Option<Box<dyn Camera>>> {
        self.camera
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn capture(&self) -> Result<Frame, DeviceError> {
        match self.camera().as_mut() {
            Some(camera) => camera.capture(),
            None => Err(DeviceError::Released),
        }
    }

    /// Releases the camera. Only the first call reaches the device; it
    /// returns `true` when this call did the release.
    pub fn release(&self) -> bool {
        let Some(mut camera) = self.camera().take() else {
            return false;
        };
        camera.release();
        info!("Camera released");
        true
    }

    pub fn is_released(&self) -> bool {
        self.camera().is_none()
    }
}

impl std::fmt::Debug for CaptureGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureGate")
            .field("released", &self.is_released())
            .finish()
    }
}
