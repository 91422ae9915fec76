//! facegate-vision: the camera-facing collaborators of Facegate
//!
//! Frame acquisition, face detection, signature matching and on-screen
//! overlays are external to the authorization engine. This crate defines
//! the seams the engine consumes them through, plus the pieces Facegate
//! ships itself:
//!
//! - [`DistanceMatcher`]: Euclidean-distance matcher with a tolerance
//! - [`replay`]: a scripted camera/detector pair for demos and tests
//! - [`TracingRenderer`]: overlays emitted as tracing events
//!
//! # Example
//!
//! ```
//! use facegate_types::Signature;
//! use facegate_vision::{DistanceMatcher, SignatureMatcher};
//!
//! let matcher = DistanceMatcher::default();
//! let query = Signature::new(vec![0.0, 0.0]);
//! let references = [Signature::new(vec![0.3, 0.4]), Signature::new(vec![3.0, 4.0])];
//!
//! assert_eq!(matcher.compare(&query, &references), vec![true, false]);
//! ```

use facegate_types::{DetectedFace, FaceRegion, Frame, Signature};

mod error;
mod matcher;
mod render;
pub mod replay;

pub use error::{DetectorError, DeviceError, ScriptError};
pub use matcher::{DEFAULT_TOLERANCE, DistanceMatcher};
pub use render::TracingRenderer;

/// Exclusive handle to a frame source.
///
/// Only one capture may run against a device at a time; callers share a
/// camera through a single gate rather than by cloning handles.
pub trait Camera: Send {
    /// Captures the next frame.
    fn capture(&mut self) -> Result<Frame, DeviceError>;

    /// Releases the device. Captures after release fail with
    /// [`DeviceError::Released`].
    fn release(&mut self);
}

/// Turns frames into face regions and signatures.
pub trait FaceDetector: Send + Sync {
    /// Every face found in `frame`, in detection order.
    fn detect_faces(&self, frame: &Frame) -> Result<Vec<DetectedFace>, DetectorError>;

    /// Signature of the first face in `frame`, if any.
    fn extract_signature(&self, frame: &Frame) -> Result<Option<Signature>, DetectorError> {
        Ok(self
            .detect_faces(frame)?
            .into_iter()
            .next()
            .map(|face| face.signature))
    }
}

/// Compares one signature against a list of references.
pub trait SignatureMatcher: Send + Sync {
    /// One flag per reference, in reference order.
    fn compare(&self, query: &Signature, references: &[Signature]) -> Vec<bool>;
}

/// A labelled rectangle drawn over a detected face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub region: FaceRegion,
    pub label: String,
}

impl Overlay {
    /// Overlay for a face identified as `role` (`"Role: <role>"`).
    pub fn for_role(region: FaceRegion, role: &str) -> Self {
        Self {
            region,
            label: format!("Role: {role}"),
        }
    }
}

/// Operator-facing display of recognition results.
///
/// Purely a side effect; nothing the renderer does feeds back into
/// authorization.
pub trait OverlayRenderer: Send {
    fn draw(&mut self, overlay: &Overlay);

    /// Shows `frame` with the overlays drawn since the previous present.
    fn present(&mut self, frame: &Frame);

    /// Tears down the display surface.
    fn close(&mut self);
}
