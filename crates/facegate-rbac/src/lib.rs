//! # facegate-rbac: Role hierarchy and file entitlements
//!
//! Provides the authorization half of Facegate:
//! - **Role hierarchy** (a fixed tree: CEO → Manager → Employee)
//! - **Entitlement resolution** (role name → file identifiers)
//! - **Access enforcement** (case-insensitive substring match of entitlements
//!   against a requested path, with audit logging)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  check_access(path)                          │
//! └─────────────────┬───────────────────────────┘
//!                   │  current role + frozen entitlements
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  AccessEnforcer                              │
//! │  ├─ no role         → NoIdentity             │
//! │  ├─ any file ⊂ path → Allowed                │
//! │  └─ otherwise       → Denied                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Standard hierarchy
//!
//! | Role     | Owned files            | Parent  |
//! |----------|------------------------|---------|
//! | CEO      | `All_Files`            | (root)  |
//! | Manager  | `Manager_Level_Files`  | CEO     |
//! | Employee | `Employee_Level_Files` | Manager |
//!
//! ## Examples
//!
//! ```
//! use facegate_rbac::{AccessDecision, AccessEnforcer, Grant, RoleHierarchy};
//!
//! let hierarchy = RoleHierarchy::standard();
//! assert_eq!(hierarchy.get_all_roles(), vec!["CEO", "Manager", "Employee"]);
//!
//! let files = hierarchy.get_files_for_role("employee").unwrap();
//! let enforcer = AccessEnforcer::new().without_audit();
//!
//! let decision = enforcer.check(
//!     Some(Grant::new("Employee", files)),
//!     "C:/data/Employee_Level_Files/report.txt",
//! );
//! assert!(decision.is_allowed());
//! ```

pub mod enforcement;
pub mod hierarchy;

// Re-export commonly used types
pub use enforcement::{AccessDecision, AccessEnforcer, Grant};
pub use hierarchy::{HierarchyError, RoleHierarchy, RoleNode};
