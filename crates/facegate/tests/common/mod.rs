//! Scripted collaborators for session tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use facegate::{Devices, FacegateError, RolePrompt};
use facegate_types::{DetectedFace, FaceRegion, Frame, Signature};
use facegate_vision::{
    Camera, DetectorError, DeviceError, DistanceMatcher, FaceDetector, Overlay, OverlayRenderer,
    SignatureMatcher,
};

pub fn face(values: &[f64]) -> DetectedFace {
    DetectedFace {
        region: FaceRegion::new(40, 200, 180, 60),
        signature: Signature::new(values.to_vec()),
    }
}

/// Polls `condition` until it holds or five seconds pass.
pub fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[derive(Debug, Default)]
pub struct CameraCounters {
    pub captures: AtomicUsize,
    pub releases: AtomicUsize,
}

impl CameraCounters {
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// Camera that counts captures and releases, optionally failing after a
/// fixed number of frames.
pub struct CountingCamera {
    counters: Arc<CameraCounters>,
    fail_after: Option<usize>,
    released: bool,
}

impl CountingCamera {
    pub fn new(counters: Arc<CameraCounters>) -> Self {
        Self {
            counters,
            fail_after: None,
            released: false,
        }
    }

    pub fn failing_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self
    }
}

impl Camera for CountingCamera {
    fn capture(&mut self) -> Result<Frame, DeviceError> {
        if self.released {
            return Err(DeviceError::Released);
        }
        let sequence = self.counters.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| sequence >= limit) {
            return Err(DeviceError::ReadFailed("sensor unplugged".to_string()));
        }
        Ok(Frame::new(sequence as u64, 640, 480, Bytes::new()))
    }

    fn release(&mut self) {
        self.released = true;
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reports `frames[sequence % len]` for each frame.
pub struct ScriptedDetector {
    frames: Vec<Vec<DetectedFace>>,
}

impl ScriptedDetector {
    pub fn new(frames: Vec<Vec<DetectedFace>>) -> Self {
        Self { frames }
    }

    pub fn always(faces: Vec<DetectedFace>) -> Self {
        Self::new(vec![faces])
    }
}

impl FaceDetector for ScriptedDetector {
    fn detect_faces(&self, frame: &Frame) -> Result<Vec<DetectedFace>, DetectorError> {
        if self.frames.is_empty() {
            return Ok(Vec::new());
        }
        let index = (frame.sequence % self.frames.len() as u64) as usize;
        Ok(self.frames[index].clone())
    }
}

/// Flags every reference, whatever the distance.
pub struct MatchEverything;

impl SignatureMatcher for MatchEverything {
    fn compare(&self, _query: &Signature, references: &[Signature]) -> Vec<bool> {
        vec![true; references.len()]
    }
}

#[derive(Debug, Default)]
pub struct RenderLog {
    pub labels: Mutex<Vec<String>>,
    pub presented: AtomicUsize,
    pub closes: AtomicUsize,
}

impl RenderLog {
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub struct RecordingRenderer {
    log: Arc<RenderLog>,
}

impl RecordingRenderer {
    pub fn new(log: Arc<RenderLog>) -> Self {
        Self { log }
    }
}

impl OverlayRenderer for RecordingRenderer {
    fn draw(&mut self, overlay: &Overlay) {
        self.log.labels.lock().unwrap().push(overlay.label.clone());
    }

    fn present(&mut self, _frame: &Frame) {
        self.log.presented.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&mut self) {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Answers role prompts from a fixed list and records rejections.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    inputs: VecDeque<String>,
    pub rejections: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(ToString::to_string).collect(),
            rejections: Vec::new(),
        }
    }
}

impl RolePrompt for ScriptedPrompt {
    fn request_role(&mut self) -> Option<String> {
        self.inputs.pop_front()
    }

    fn reject(&mut self, error: &FacegateError) {
        self.rejections.push(error.to_string());
    }
}

/// Handles kept by a test to observe the devices after handing them over.
pub struct Observers {
    pub camera: Arc<CameraCounters>,
    pub render: Arc<RenderLog>,
}

pub fn devices(detector: ScriptedDetector, matcher: Box<dyn SignatureMatcher>) -> (Devices, Observers) {
    devices_with_camera(detector, matcher, |camera| camera)
}

pub fn devices_with_camera(
    detector: ScriptedDetector,
    matcher: Box<dyn SignatureMatcher>,
    configure: impl FnOnce(CountingCamera) -> CountingCamera,
) -> (Devices, Observers) {
    let observers = Observers {
        camera: Arc::new(CameraCounters::default()),
        render: Arc::new(RenderLog::default()),
    };
    let devices = Devices {
        camera: Box::new(configure(CountingCamera::new(Arc::clone(&observers.camera)))),
        detector: Arc::new(detector),
        matcher,
        renderer: Box::new(RecordingRenderer::new(Arc::clone(&observers.render))),
    };
    (devices, observers)
}

pub fn distance_matcher() -> Box<dyn SignatureMatcher> {
    Box::new(DistanceMatcher::default())
}
