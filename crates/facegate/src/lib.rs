//! # Facegate
//!
//! Role-based file access where identity comes from a face in front of the
//! camera. A person enrolls once by choosing a role; from then on the
//! recognition worker matches faces against enrolled signatures and keeps a
//! single "current identity" that file access checks are made against.
//!
//! ## Architecture
//!
//! ```text
//!              control path                      recognition worker
//!   ┌───────────────────────────────┐      ┌──────────────────────────┐
//!   │ enroll / toggle / hierarchy / │      │ wait while paused        │
//!   │ check_access / shutdown       │      │ capture → detect → match │
//!   └──────┬──────────────┬─────────┘      │ draw "Role: X" → publish │
//!          │              │                └───┬──────────┬───────────┘
//!          ▼              ▼                    │          │
//!   ┌─────────────┐ ┌──────────────┐           │          │
//!   │ CaptureGate │◀┼──────────────┼───────────┘          │
//!   └─────────────┘ │ SessionState │◀─────────────────────┘
//!                   │ (flags, one  │
//!                   │  identity)   │   ┌───────────────┐
//!                   └──────────────┘   │ SharedStore   │◀── both
//!                                      └───────────────┘
//! ```
//!
//! Camera, detector, matcher and renderer are external collaborators
//! ([`facegate_vision`]); the role tree and access decision live in
//! [`facegate_rbac`]; enrolled identities persist through [`facegate_store`].
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use facegate::{Devices, Gatekeeper, SessionOptions};
//! use facegate_store::StoreFile;
//! use facegate_vision::replay::ReplayScript;
//! use facegate_vision::{DistanceMatcher, TracingRenderer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (camera, detector) = ReplayScript::load("lobby.json")?.into_devices(true)?;
//! let devices = Devices {
//!     camera: Box::new(camera),
//!     detector: Arc::new(detector),
//!     matcher: Box::new(DistanceMatcher::default()),
//!     renderer: Box::new(TracingRenderer::new()),
//! };
//!
//! let mut session = Gatekeeper::start(
//!     StoreFile::new(".facegate/identities.json"),
//!     devices,
//!     SessionOptions::default(),
//! )?;
//! session.toggle_recognition()?;
//! println!("{}", session.check_access("/srv/Manager_Level_Files/q3.xlsx")?);
//! session.shutdown()?;
//! # Ok(())
//! # }
//! ```

mod access;
mod capture;
mod coordinator;
mod enrollment;
mod error;
mod recognition;
mod session;

pub use access::AccessController;
pub use capture::CaptureGate;
pub use coordinator::{Devices, Gatekeeper, SessionOptions};
pub use enrollment::{Enrolled, EnrollmentProtocol, RolePrompt};
pub use error::{FacegateError, Result};
pub use recognition::identify;
pub use session::SessionState;

pub use facegate_rbac::{AccessDecision, RoleHierarchy, RoleNode};
pub use facegate_types::{CurrentIdentity, FileId};
