//! Access enforcement.
//!
//! Decides whether the currently recognized role may open a path. A role is
//! allowed when any of its entitled file identifiers occurs in the path as a
//! case-insensitive substring. The match is deliberately not path-aware:
//! `Employee_Level_Files` also matches `not_Employee_Level_Files_related.txt`.

use std::collections::BTreeSet;
use std::fmt::Display;

use facegate_types::FileId;
use tracing::{info, warn};

/// Entitlements of the role attempting access.
#[derive(Debug, Clone, Copy)]
pub struct Grant<'a> {
    pub role: &'a str,
    pub files: &'a BTreeSet<FileId>,
}

impl<'a> Grant<'a> {
    pub fn new(role: &'a str, files: &'a BTreeSet<FileId>) -> Self {
        Self { role, files }
    }

    /// First entitled file (in set order) that occurs within `path`.
    pub fn covering_file(&self, path: &str) -> Option<&'a FileId> {
        self.files.iter().find(|file| file.is_within(path))
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The role is entitled to the path via `matched`.
    Allowed { role: String, matched: FileId },

    /// The role holds no entitlement covering the path.
    Denied { role: String },

    /// Nobody is currently recognized or enrolled.
    NoIdentity,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed { .. })
    }

    /// Role the decision was made for, if any.
    pub fn role(&self) -> Option<&str> {
        match self {
            AccessDecision::Allowed { role, .. } | AccessDecision::Denied { role } => Some(role),
            AccessDecision::NoIdentity => None,
        }
    }
}

impl Display for AccessDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessDecision::Allowed { role, matched } => {
                write!(f, "allowed for {role} (via {matched})")
            }
            AccessDecision::Denied { role } => write!(f, "denied for {role}"),
            AccessDecision::NoIdentity => f.write_str("no recognized identity"),
        }
    }
}

/// Access enforcement engine.
///
/// Stateless apart from the audit switch; every decision is logged unless
/// audit is disabled.
#[derive(Debug, Clone)]
pub struct AccessEnforcer {
    audit_enabled: bool,
}

impl AccessEnforcer {
    pub fn new() -> Self {
        Self {
            audit_enabled: true,
        }
    }

    /// Disables audit logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Decides access to `path` for `grant`.
    ///
    /// `None` means no identity is currently established.
    ///
    /// **Audit:** Logs every decision.
    pub fn check(&self, grant: Option<Grant<'_>>, path: &str) -> AccessDecision {
        let Some(grant) = grant else {
            if self.audit_enabled {
                warn!(path = %path, "Access check without a recognized identity");
            }
            return AccessDecision::NoIdentity;
        };

        match grant.covering_file(path) {
            Some(file) => {
                if self.audit_enabled {
                    info!(path = %path, role = %grant.role, entitlement = %file, "File access granted");
                }
                AccessDecision::Allowed {
                    role: grant.role.to_string(),
                    matched: file.clone(),
                }
            }
            None => {
                if self.audit_enabled {
                    warn!(path = %path, role = %grant.role, "File access denied");
                }
                AccessDecision::Denied {
                    role: grant.role.to_string(),
                }
            }
        }
    }
}

impl Default for AccessEnforcer {
    fn default() -> Self {
        Self::new()
    }
}
