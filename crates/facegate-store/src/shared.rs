//! Guarded store shared between the control path and the recognition worker.
//!
//! The lock covers mapping access only. Readers take a snapshot and release
//! the lock before doing any matching, so an enrollment that lands mid-frame
//! may or may not be visible to that frame. Saves serialize on their own
//! mutex so two writers never race on the temporary file.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use facegate_types::{FileId, Signature};
use tracing::info;

use crate::file::StoreFile;
use crate::identity::{EnrolledIdentity, IdentityStore};
use crate::{Result, StoreError};

/// Identity store behind a read/write guard, bound to its backing file.
#[derive(Debug)]
pub struct SharedStore {
    file: StoreFile,
    identities: RwLock<IdentityStore>,
    save_gate: Mutex<()>,
    saves: AtomicU64,
}

impl SharedStore {
    /// Loads the store from `file` (missing file → empty store).
    pub fn open(file: StoreFile) -> Result<Self> {
        let identities = file.load()?;
        Ok(Self::with_identities(file, identities))
    }

    /// Wraps an already loaded store.
    pub fn with_identities(file: StoreFile, identities: IdentityStore) -> Self {
        Self {
            file,
            identities: RwLock::new(identities),
            save_gate: Mutex::new(()),
            saves: AtomicU64::new(0),
        }
    }

    pub fn file(&self) -> &StoreFile {
        &self.file
    }

    /// Inserts or overwrites `role`, then persists the whole store.
    ///
    /// A non-finite signature is rejected before the mapping changes, so
    /// memory and disk stay in step.
    pub fn bind_and_save(
        &self,
        role: &str,
        signature: Signature,
        files: BTreeSet<FileId>,
    ) -> Result<Option<EnrolledIdentity>> {
        if !signature.is_finite() {
            return Err(StoreError::NonFiniteSignature {
                role: role.to_string(),
            });
        }

        let previous = {
            let mut identities = self
                .identities
                .write()
                .map_err(|_| StoreError::LockPoisoned)?;
            identities.bind(role, signature, files)
        };
        self.save()?;
        Ok(previous)
    }

    /// Persists the current contents.
    pub fn save(&self) -> Result<()> {
        let _gate = self.save_gate.lock().map_err(|_| StoreError::LockPoisoned)?;
        let snapshot = self.snapshot()?;
        self.file.save(&snapshot)?;

        let count = self.saves.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            path = %self.file.path().display(),
            identities = snapshot.len(),
            save = count,
            "Identity store persisted"
        );
        Ok(())
    }

    /// Number of completed saves since this store was opened.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the full mapping as of this call.
    pub fn snapshot(&self) -> Result<IdentityStore> {
        self.identities
            .read()
            .map(|identities| identities.clone())
            .map_err(|_| StoreError::LockPoisoned)
    }

    /// Role/signature pairs for matching, in store-iteration order.
    pub fn all_signatures(&self) -> Result<Vec<(String, Signature)>> {
        self.identities
            .read()
            .map(|identities| identities.all_signatures())
            .map_err(|_| StoreError::LockPoisoned)
    }

    /// The identity enrolled for `role`, if any.
    pub fn get(&self, role: &str) -> Result<Option<EnrolledIdentity>> {
        self.identities
            .read()
            .map(|identities| identities.get(role).cloned())
            .map_err(|_| StoreError::LockPoisoned)
    }
}
