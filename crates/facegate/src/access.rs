//! File access checks against the current identity.

use std::sync::Arc;

use facegate_rbac::{AccessDecision, AccessEnforcer, Grant};
use facegate_store::SharedStore;

use crate::session::SessionState;
use crate::Result;

/// Decides file access for whoever the session currently recognizes.
///
/// The entitlement set comes from the identity record, not the hierarchy:
/// it is whatever was frozen in at enrollment.
#[derive(Debug)]
pub struct AccessController {
    store: Arc<SharedStore>,
    state: Arc<SessionState>,
    enforcer: AccessEnforcer,
}

impl AccessController {
    pub fn new(store: Arc<SharedStore>, state: Arc<SessionState>, enforcer: AccessEnforcer) -> Self {
        Self {
            store,
            state,
            enforcer,
        }
    }

    /// `NoIdentity` when nobody (or only an unknown face) is recognized, or
    /// when the recognized role has no identity record.
    pub fn check_access(&self, file_path: &str) -> Result<AccessDecision> {
        let current = self.state.current();
        let Some(role) = current.role() else {
            return Ok(self.enforcer.check(None, file_path));
        };

        let identity = self.store.get(role)?;
        let grant = identity
            .as_ref()
            .map(|identity| Grant::new(&identity.role, &identity.files));
        Ok(self.enforcer.check(grant, file_path))
    }
}
