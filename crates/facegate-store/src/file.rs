//! JSON store file.
//!
//! Layout:
//!
//! ```json
//! { "version": 1, "identities": [ { "role": "CEO", "signature": [..], "files": ["All_Files"] } ] }
//! ```
//!
//! Saves go to a sibling `*.tmp` file which is fsynced and then renamed
//! over the target, so a reader sees either the old or the new document.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::identity::{EnrolledIdentity, IdentityStore};
use crate::{Result, StoreError};

/// Format version written by this build.
pub const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    identities: Vec<&'a EnrolledIdentity>,
}

#[derive(Deserialize)]
struct Document {
    version: u32,
    identities: Vec<EnrolledIdentity>,
}

/// Location of a persisted identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFile {
    path: PathBuf,
}

impl StoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads the store. A missing file is an empty store, not an error.
    ///
    /// # Errors
    ///
    /// [`StoreError::Corrupt`] for malformed JSON or duplicated roles,
    /// [`StoreError::UnsupportedVersion`] for a foreign format version.
    pub fn load(&self) -> Result<IdentityStore> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No identity store found, starting empty");
                return Ok(IdentityStore::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let document: Document =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        if document.version != STORE_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.clone(),
                found: document.version,
            });
        }

        let store = IdentityStore::from_identities(document.identities).map_err(|role| {
            StoreError::Corrupt {
                path: self.path.clone(),
                reason: format!("role {role:?} enrolled more than once"),
            }
        })?;

        info!(path = %self.path.display(), identities = store.len(), "Identity store loaded");
        Ok(store)
    }

    /// Writes the full store, replacing the previous file atomically.
    ///
    /// # Errors
    ///
    /// [`StoreError::NonFiniteSignature`] before anything is written if a
    /// signature would not survive a reload.
    pub fn save(&self, store: &IdentityStore) -> Result<()> {
        if let Some(identity) = store.iter().find(|identity| !identity.signature.is_finite()) {
            return Err(StoreError::NonFiniteSignature {
                role: identity.role.clone(),
            });
        }

        let document = DocumentRef {
            version: STORE_FORMAT_VERSION,
            identities: store.iter().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        {
            let mut file = File::create(&temp).map_err(|e| self.io_error(e))?;
            file.write_all(&bytes).map_err(|e| self.io_error(e))?;
            file.sync_all().map_err(|e| self.io_error(e))?;
        }
        fs::rename(&temp, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), identities = store.len(), "Identity store written");
        Ok(())
    }
}
