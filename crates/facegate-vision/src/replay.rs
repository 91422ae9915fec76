//! Scripted camera and detector.
//!
//! A replay script lists, per frame, the faces a detector would report.
//! [`ReplayCamera`] hands out frames in script order and [`ReplayDetector`]
//! answers with the faces scripted for each frame's sequence number.
//!
//! ```json
//! {
//!   "width": 640,
//!   "height": 480,
//!   "frames": [
//!     { "faces": [ { "region": { "top": 40, "right": 200, "bottom": 180, "left": 60 },
//!                    "signature": [0.12, -0.08, 0.33] } ] },
//!     { "faces": [] }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use facegate_types::{DetectedFace, Frame};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Camera, DetectorError, DeviceError, FaceDetector, ScriptError};

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

/// Faces present in one scripted frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptedFrame {
    #[serde(default)]
    pub faces: Vec<DetectedFace>,
}

/// A sequence of scripted frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    pub frames: Vec<ScriptedFrame>,
}

impl ReplayScript {
    pub fn new(frames: Vec<ScriptedFrame>) -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            frames,
        }
    }

    /// Reads a script from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ScriptError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds a camera and detector sharing this script.
    pub fn into_devices(self, loop_replay: bool) -> Result<(ReplayCamera, ReplayDetector), DeviceError> {
        let script = Arc::new(self);
        let camera = ReplayCamera::open(Arc::clone(&script), loop_replay)?;
        Ok((camera, ReplayDetector::new(script)))
    }

    fn frame_index(&self, sequence: u64) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        Some((sequence % self.frames.len() as u64) as usize)
    }
}

/// Camera that yields the frames of a [`ReplayScript`].
#[derive(Debug)]
pub struct ReplayCamera {
    script: Arc<ReplayScript>,
    loop_replay: bool,
    next_sequence: u64,
    released: bool,
}

impl ReplayCamera {
    /// Opens a camera over `script`.
    ///
    /// # Errors
    ///
    /// [`DeviceError::Unavailable`] if the script has no frames.
    pub fn open(script: Arc<ReplayScript>, loop_replay: bool) -> Result<Self, DeviceError> {
        if script.frames.is_empty() {
            return Err(DeviceError::Unavailable {
                device: "replay".to_string(),
                reason: "replay script has no frames".to_string(),
            });
        }
        info!(frames = script.frames.len(), loop_replay, "Replay camera opened");
        Ok(Self {
            script,
            loop_replay,
            next_sequence: 0,
            released: false,
        })
    }
}

impl Camera for ReplayCamera {
    fn capture(&mut self) -> Result<Frame, DeviceError> {
        if self.released {
            return Err(DeviceError::Released);
        }
        if !self.loop_replay && self.next_sequence >= self.script.frames.len() as u64 {
            return Err(DeviceError::ReadFailed("replay script exhausted".to_string()));
        }

        let frame = Frame::new(
            self.next_sequence,
            self.script.width,
            self.script.height,
            Bytes::new(),
        );
        self.next_sequence += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            info!(frames_captured = self.next_sequence, "Replay camera released");
        }
    }
}

/// Detector that reports the faces scripted for each frame.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    script: Arc<ReplayScript>,
}

impl ReplayDetector {
    pub fn new(script: Arc<ReplayScript>) -> Self {
        Self { script }
    }
}

impl FaceDetector for ReplayDetector {
    fn detect_faces(&self, frame: &Frame) -> Result<Vec<DetectedFace>, DetectorError> {
        let index = self
            .script
            .frame_index(frame.sequence)
            .ok_or_else(|| DetectorError("replay script has no frames".to_string()))?;
        Ok(self.script.frames[index].faces.clone())
    }
}
