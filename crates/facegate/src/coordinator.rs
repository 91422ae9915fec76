//! Session coordinator.
//!
//! [`Gatekeeper`] owns the lifecycle: startup loads the identity store and
//! launches the recognition worker, shutdown stops the worker, persists the
//! store and releases the camera. Shutdown runs at most once and also runs
//! on drop, so every exit path cleans up.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use facegate_rbac::{AccessDecision, AccessEnforcer, RoleHierarchy};
use facegate_store::{SharedStore, StoreFile};
use facegate_types::CurrentIdentity;
use facegate_vision::{Camera, FaceDetector, OverlayRenderer, SignatureMatcher};
use tracing::{error, info, warn};

use crate::access::AccessController;
use crate::capture::CaptureGate;
use crate::enrollment::{Enrolled, EnrollmentProtocol, RolePrompt};
use crate::recognition::Recognizer;
use crate::session::SessionState;
use crate::{FacegateError, Result};

/// External collaborators handed to a session.
pub struct Devices {
    pub camera: Box<dyn Camera>,
    pub detector: Arc<dyn FaceDetector>,
    pub matcher: Box<dyn SignatureMatcher>,
    pub renderer: Box<dyn OverlayRenderer>,
}

impl Devices {
    fn discard(mut self) {
        self.camera.release();
        self.renderer.close();
    }
}

/// Session tuning.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Pause between frames while recognizing.
    pub frame_interval: Duration,
    /// Begin recognizing immediately instead of paused.
    pub start_active: bool,
    /// Log every access decision.
    pub audit: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(33),
            start_active: false,
            audit: true,
        }
    }
}

/// A running Facegate session.
///
/// # Lifecycle
///
/// 1. [`Gatekeeper::start`] loads the store and spawns the worker.
/// 2. Control operations: [`enroll`](Self::enroll),
///    [`toggle_recognition`](Self::toggle_recognition),
///    [`show_hierarchy`](Self::show_hierarchy),
///    [`check_access`](Self::check_access).
/// 3. [`shutdown`](Self::shutdown) (or drop).
pub struct Gatekeeper {
    hierarchy: RoleHierarchy,
    store: Arc<SharedStore>,
    state: Arc<SessionState>,
    gate: Arc<CaptureGate>,
    detector: Arc<dyn FaceDetector>,
    access: AccessController,
    worker: Option<JoinHandle<Result<()>>>,
    shut_down: bool,
}

impl Gatekeeper {
    /// Loads the store from `store_file` and starts a session with the
    /// standard hierarchy.
    ///
    /// A missing store file starts empty; a corrupt one fails startup.
    pub fn start(store_file: StoreFile, devices: Devices, options: SessionOptions) -> Result<Self> {
        let store = match SharedStore::open(store_file) {
            Ok(store) => store,
            Err(error) => {
                devices.discard();
                return Err(error.into());
            }
        };
        Self::with_store(Arc::new(store), RoleHierarchy::standard(), devices, options)
    }

    /// Starts a session over an already opened store.
    pub fn with_store(
        store: Arc<SharedStore>,
        hierarchy: RoleHierarchy,
        devices: Devices,
        options: SessionOptions,
    ) -> Result<Self> {
        let Devices {
            camera,
            detector,
            matcher,
            renderer,
        } = devices;

        let state = Arc::new(SessionState::new(options.start_active));
        let gate = Arc::new(CaptureGate::new(camera));
        let enforcer = if options.audit {
            AccessEnforcer::new()
        } else {
            AccessEnforcer::new().without_audit()
        };

        let recognizer = Recognizer {
            state: Arc::clone(&state),
            store: Arc::clone(&store),
            gate: Arc::clone(&gate),
            detector: Arc::clone(&detector),
            matcher,
            renderer,
            frame_interval: options.frame_interval,
        };
        // A failed spawn has already closed the renderer.
        let worker = match recognizer.spawn() {
            Ok(handle) => handle,
            Err(source) => {
                gate.release();
                return Err(FacegateError::Spawn(source));
            }
        };

        info!(recognizing = options.start_active, "Session started");
        Ok(Self {
            access: AccessController::new(Arc::clone(&store), Arc::clone(&state), enforcer),
            hierarchy,
            store,
            state,
            gate,
            detector,
            worker: Some(worker),
            shut_down: false,
        })
    }

    /// Enrolls the face currently in front of the camera.
    pub fn enroll(&self, prompt: &mut dyn RolePrompt) -> Result<Enrolled> {
        EnrollmentProtocol::new(
            &self.hierarchy,
            &self.store,
            &self.state,
            &self.gate,
            self.detector.as_ref(),
        )
        .run(prompt)
    }

    /// Pauses or resumes recognition; returns whether it is now on.
    pub fn toggle_recognition(&self) -> Result<bool> {
        let recognizing = self.state.toggle()?;
        if recognizing {
            info!("Recognition resumed");
        } else {
            info!("Recognition paused");
        }
        Ok(recognizing)
    }

    /// Role names, depth-first.
    pub fn show_hierarchy(&self) -> Vec<String> {
        self.hierarchy.get_all_roles()
    }

    pub fn check_access(&self, file_path: &str) -> Result<AccessDecision> {
        self.access.check_access(file_path)
    }

    pub fn current_identity(&self) -> CurrentIdentity {
        self.state.current()
    }

    pub fn is_recognizing(&self) -> bool {
        self.state.is_recognizing()
    }

    /// Whether the worker died on a device or detector failure.
    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Stops the worker, persists the store and releases the camera.
    ///
    /// Idempotent: only the first call does anything. Cleanup always runs
    /// to completion; the first failure is returned afterwards.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;
        info!("Shutting down session");

        self.state.request_stop();
        let joined = match self.worker.take().map(JoinHandle::join) {
            Some(Ok(Ok(()))) | None => Ok(()),
            Some(Ok(Err(error))) => {
                // Already reported when the worker halted.
                warn!(%error, "Recognition worker had halted");
                Ok(())
            }
            Some(Err(_)) => {
                error!("Recognition worker panicked");
                Err(FacegateError::WorkerPanicked)
            }
        };

        let saved = self.store.save();
        self.gate.release();

        saved?;
        joined?;
        info!("Session shut down");
        Ok(())
    }
}

impl Drop for Gatekeeper {
    fn drop(&mut self) {
        if let Err(error) = self.shutdown() {
            error!(%error, "Shutdown on drop failed");
        }
    }
}
