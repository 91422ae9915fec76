//! In-memory identity mapping.

use std::collections::BTreeSet;

use facegate_types::{FileId, Signature};
use serde::{Deserialize, Serialize};

/// A signature bound to a role, plus the role's entitlements at enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolledIdentity {
    pub role: String,
    pub signature: Signature,
    pub files: BTreeSet<FileId>,
}

/// Mapping from role name to its enrolled identity.
///
/// Iteration order is enrollment order. Re-enrolling a role replaces its
/// signature and files in place, so the role keeps its original position.
/// Role keys are compared exactly; callers bind canonical role names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityStore {
    identities: Vec<EnrolledIdentity>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the identity for `role`.
    ///
    /// No validation happens here: the role is trusted to exist in the
    /// hierarchy. Returns the previous identity if one was replaced.
    pub fn bind(
        &mut self,
        role: impl Into<String>,
        signature: Signature,
        files: BTreeSet<FileId>,
    ) -> Option<EnrolledIdentity> {
        let identity = EnrolledIdentity {
            role: role.into(),
            signature,
            files,
        };

        match self.identities.iter_mut().find(|i| i.role == identity.role) {
            Some(existing) => Some(std::mem::replace(existing, identity)),
            None => {
                self.identities.push(identity);
                None
            }
        }
    }

    pub fn get(&self, role: &str) -> Option<&EnrolledIdentity> {
        self.identities.iter().find(|i| i.role == role)
    }

    /// Role and signature pairs in store-iteration order.
    pub fn all_signatures(&self) -> Vec<(String, Signature)> {
        self.identities
            .iter()
            .map(|i| (i.role.clone(), i.signature.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrolledIdentity> {
        self.identities.iter()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(|i| i.role.as_str())
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Builds a store from persisted records; `Err` carries the first
    /// duplicated role.
    pub(crate) fn from_identities(
        identities: Vec<EnrolledIdentity>,
    ) -> std::result::Result<Self, String> {
        let mut store = Self::new();
        for identity in identities {
            if store.get(&identity.role).is_some() {
                return Err(identity.role);
            }
            store.identities.push(identity);
        }
        Ok(store)
    }
}
