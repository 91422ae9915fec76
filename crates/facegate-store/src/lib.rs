//! facegate-store: Enrolled identities and their durable storage
//!
//! The identity store maps a role name to the facial signature enrolled for
//! it, together with the entitlements resolved when the role was enrolled.
//! Entitlements are frozen at enrollment time; later hierarchy changes do
//! not reach identities that already exist.
//!
//! # Layers
//!
//! - [`IdentityStore`]: the in-memory mapping (insertion ordered, one entry per role)
//! - [`StoreFile`]: JSON persistence with atomic replace
//! - [`SharedStore`]: a guarded store shared by the control path and the
//!   recognition worker
//!
//! # Example
//!
//! ```
//! use facegate_store::IdentityStore;
//! use facegate_types::{FileId, Signature};
//!
//! let mut store = IdentityStore::new();
//! store.bind("Manager", Signature::new(vec![0.1, 0.2]), [FileId::new("Manager_Level_Files")].into());
//! store.bind("Manager", Signature::new(vec![0.3, 0.4]), [FileId::new("Manager_Level_Files")].into());
//!
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.get("Manager").unwrap().signature.as_slice(), &[0.3, 0.4]);
//! ```

use std::path::PathBuf;

mod file;
mod identity;
mod shared;

pub use file::{STORE_FORMAT_VERSION, StoreFile};
pub use identity::{EnrolledIdentity, IdentityStore};
pub use shared::SharedStore;

/// Errors that can occur while loading or persisting identities.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file exists but could not be read or written.
    #[error("identity store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The store file is present but unreadable as an identity store.
    #[error("identity store at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The store file was written by an incompatible format version.
    #[error("identity store at {path} has unsupported format version {found}")]
    UnsupportedVersion { path: PathBuf, found: u32 },

    /// A signature has NaN or infinite components, which JSON cannot hold.
    #[error("signature for role {role:?} has non-finite components")]
    NonFiniteSignature { role: String },

    /// Encoding the store failed.
    #[error("failed to encode identity store: {0}")]
    Encode(#[from] serde_json::Error),

    /// A thread panicked while holding the store lock.
    #[error("identity store lock poisoned")]
    LockPoisoned,
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
