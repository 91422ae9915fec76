//! Background recognition worker.
//!
//! The worker runs on its own named thread for the life of the session. It
//! blocks while recognition is paused and otherwise loops capture → detect →
//! match → draw → publish. A device or detector failure halts it for good;
//! the failure is returned through the join handle.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use facegate_store::SharedStore;
use facegate_types::{CurrentIdentity, Signature};
use facegate_vision::{FaceDetector, Overlay, OverlayRenderer, SignatureMatcher};
use tracing::{debug, error, info, warn};

use crate::capture::CaptureGate;
use crate::session::SessionState;
use crate::Result;

const THREAD_NAME: &str = "facegate-recognizer";

type Job = Box<dyn FnOnce() -> Result<()> + Send>;

/// Resolves `query` to the role of the first flagged reference.
///
/// `roles` and `references` are parallel, in store order. Only the flags
/// matter: when several references match, the earliest wins regardless of
/// how close each one is.
pub fn identify(
    matcher: &dyn SignatureMatcher,
    query: &Signature,
    roles: &[String],
    references: &[Signature],
) -> CurrentIdentity {
    matcher
        .compare(query, references)
        .iter()
        .position(|&matched| matched)
        .and_then(|index| roles.get(index))
        .map_or(CurrentIdentity::Unknown, |role| {
            CurrentIdentity::Role(role.clone())
        })
}

pub(crate) struct Recognizer {
    pub(crate) state: Arc<SessionState>,
    pub(crate) store: Arc<SharedStore>,
    pub(crate) gate: Arc<CaptureGate>,
    pub(crate) detector: Arc<dyn FaceDetector>,
    pub(crate) matcher: Box<dyn SignatureMatcher>,
    pub(crate) renderer: Box<dyn OverlayRenderer>,
    pub(crate) frame_interval: Duration,
}

impl Recognizer {
    pub(crate) fn spawn(self) -> io::Result<JoinHandle<Result<()>>> {
        self.spawn_with(|job| thread::Builder::new().name(THREAD_NAME.to_string()).spawn(job))
    }

    /// Hands the worker to `spawn`. If no thread starts, the recognizer is
    /// taken back and its renderer closed before the error is returned.
    fn spawn_with<F>(self, spawn: F) -> io::Result<JoinHandle<Result<()>>>
    where
        F: FnOnce(Job) -> io::Result<JoinHandle<Result<()>>>,
    {
        let slot = Arc::new(Mutex::new(Some(self)));
        let job: Job = {
            let slot = Arc::clone(&slot);
            Box::new(move || {
                let recognizer = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
                recognizer.map_or(Ok(()), Recognizer::run)
            })
        };

        spawn(job).inspect_err(|error| {
            let recognizer = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(mut recognizer) = recognizer {
                warn!(%error, "Recognition worker failed to start");
                recognizer.renderer.close();
            }
        })
    }

    fn run(mut self) -> Result<()> {
        info!(frame_interval = ?self.frame_interval, "Recognition worker started");

        let outcome = self.run_loop();
        if let Err(error) = &outcome {
            self.state.mark_halted();
            error!(%error, "Recognition halted");
        }

        self.renderer.close();
        info!("Recognition worker stopped");
        outcome
    }

    fn run_loop(&mut self) -> Result<()> {
        while self.state.wait_until_active() {
            self.process_frame()?;
            if !self.state.pause(self.frame_interval) {
                break;
            }
        }
        Ok(())
    }

    fn process_frame(&mut self) -> Result<()> {
        let frame = self.gate.capture()?;
        let faces = self.detector.detect_faces(&frame)?;

        if !faces.is_empty() {
            // Snapshot once per frame; later enrollments show up next frame.
            let (roles, references): (Vec<String>, Vec<Signature>) =
                self.store.all_signatures()?.into_iter().unzip();

            let mut last = None;
            for face in &faces {
                let identity = identify(self.matcher.as_ref(), &face.signature, &roles, &references);
                self.renderer
                    .draw(&Overlay::for_role(face.region, identity.label()));
                last = Some(identity);
            }

            if let Some(identity) = last {
                debug!(sequence = frame.sequence, faces = faces.len(), identity = %identity, "Frame recognized");
                self.state.publish(identity);
            }
        }

        self.renderer.present(&frame);
        Ok(())
    }
}
