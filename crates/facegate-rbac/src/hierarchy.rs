//! Role hierarchy.
//!
//! A fixed tree of roles, each owning a set of file identifiers. The tree is
//! built once at startup and never mutated. Lookups are case-insensitive
//! and walk the tree depth-first in declaration order.

use std::collections::{BTreeSet, HashSet};

use facegate_types::FileId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Case folding shared by lookups and the uniqueness check, so a name that
/// is unique at construction can always be found again.
fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// Errors raised while constructing a hierarchy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// Two nodes share a role name (compared case-insensitively).
    #[error("duplicate role in hierarchy: {0}")]
    DuplicateRole(String),

    /// A node has a blank role name.
    #[error("role names must not be empty")]
    EmptyRoleName,
}

/// One role in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleNode {
    role_name: String,
    owned_files: BTreeSet<FileId>,
    children: Vec<RoleNode>,
}

impl RoleNode {
    /// Creates a leaf role with no files.
    pub fn new(role_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            owned_files: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    /// Adds a file identifier this role may access.
    pub fn with_file(mut self, file: impl Into<FileId>) -> Self {
        self.owned_files.insert(file.into());
        self
    }

    /// Appends a child role. Children keep declaration order.
    pub fn with_child(mut self, child: RoleNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn owned_files(&self) -> &BTreeSet<FileId> {
        &self.owned_files
    }

    /// `folded` is the query after [`fold_case`].
    fn find(&self, folded: &str) -> Option<&RoleNode> {
        if fold_case(&self.role_name) == folded {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(folded))
    }

    fn walk<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a RoleNode)>) {
        out.push((depth, self));
        for child in &self.children {
            child.walk(depth + 1, out);
        }
    }
}

/// Read-only tree of roles with a single root (the highest privilege).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleHierarchy {
    root: RoleNode,
}

impl RoleHierarchy {
    /// Builds a hierarchy, rejecting blank or duplicate role names.
    pub fn new(root: RoleNode) -> Result<Self, HierarchyError> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        root.walk(0, &mut nodes);

        for (_, node) in nodes {
            let name = node.role_name.trim();
            if name.is_empty() {
                return Err(HierarchyError::EmptyRoleName);
            }
            if !seen.insert(fold_case(name)) {
                return Err(HierarchyError::DuplicateRole(node.role_name.clone()));
            }
        }

        Ok(Self { root })
    }

    /// The reference configuration: CEO owns `All_Files`, Manager (child of
    /// CEO) owns `Manager_Level_Files`, Employee (child of Manager) owns
    /// `Employee_Level_Files`.
    pub fn standard() -> Self {
        Self {
            root: RoleNode::new("CEO").with_file("All_Files").with_child(
                RoleNode::new("Manager")
                    .with_file("Manager_Level_Files")
                    .with_child(RoleNode::new("Employee").with_file("Employee_Level_Files")),
            ),
        }
    }

    /// Finds the node for `role`, ignoring case.
    ///
    /// The root is checked first, then children depth-first in declaration
    /// order; the first match wins.
    pub fn find(&self, role: &str) -> Option<&RoleNode> {
        self.root.find(&fold_case(role))
    }

    /// Returns the files owned by `role`, or `None` if no node matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use facegate_rbac::RoleHierarchy;
    ///
    /// let hierarchy = RoleHierarchy::standard();
    /// assert!(hierarchy.get_files_for_role("MANAGER").is_some());
    /// assert!(hierarchy.get_files_for_role("intern").is_none());
    /// ```
    pub fn get_files_for_role(&self, role: &str) -> Option<&BTreeSet<FileId>> {
        self.find(role).map(RoleNode::owned_files)
    }

    /// Every role name, depth-first pre-order (node before its children).
    pub fn get_all_roles(&self) -> Vec<String> {
        self.depth_first()
            .into_iter()
            .map(|(_, node)| node.role_name.clone())
            .collect()
    }

    /// Every node with its depth (root = 0), in the same order as
    /// [`get_all_roles`](Self::get_all_roles).
    pub fn depth_first(&self) -> Vec<(usize, &RoleNode)> {
        let mut out = Vec::new();
        self.root.walk(0, &mut out);
        out
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn files(ids: &[&str]) -> BTreeSet<FileId> {
        ids.iter().map(|id| FileId::new(*id)).collect()
    }

    #[test]
    fn test_standard_roles_in_depth_first_order() {
        let hierarchy = RoleHierarchy::standard();
        assert_eq!(hierarchy.get_all_roles(), vec!["CEO", "Manager", "Employee"]);
    }

    #[test]
    fn test_standard_files_per_role() {
        let hierarchy = RoleHierarchy::standard();

        assert_eq!(
            hierarchy.get_files_for_role("CEO"),
            Some(&files(&["All_Files"]))
        );
        assert_eq!(
            hierarchy.get_files_for_role("Manager"),
            Some(&files(&["Manager_Level_Files"]))
        );
        assert_eq!(
            hierarchy.get_files_for_role("Employee"),
            Some(&files(&["Employee_Level_Files"]))
        );
    }

    #[test]
    fn test_lookup_ignores_case() {
        let hierarchy = RoleHierarchy::standard();
        let node = hierarchy.find("eMpLoYeE").expect("employee exists");
        assert_eq!(node.role_name(), "Employee");
    }

    #[test]
    fn test_non_ascii_roles_fold_like_ascii() {
        let root = RoleNode::new("Klinik")
            .with_child(RoleNode::new("Ärztin").with_file("Befunde"));
        let hierarchy = RoleHierarchy::new(root).unwrap();

        let node = hierarchy.find("ÄRZTIN").expect("role exists");
        assert_eq!(node.role_name(), "Ärztin");
        assert_eq!(hierarchy.get_files_for_role("ärztin"), Some(&files(&["Befunde"])));

        let clash = RoleNode::new("Ärztin").with_child(RoleNode::new("ÄRZTIN"));
        assert_eq!(
            RoleHierarchy::new(clash),
            Err(HierarchyError::DuplicateRole("ÄRZTIN".to_string()))
        );
    }

    #[test]
    fn test_unknown_role_not_found() {
        let hierarchy = RoleHierarchy::standard();
        assert!(hierarchy.get_files_for_role("unknown-role").is_none());
        assert!(hierarchy.get_files_for_role("").is_none());
    }

    #[test]
    fn test_children_searched_in_declaration_order() {
        let root = RoleNode::new("Board")
            .with_child(RoleNode::new("Ops").with_child(RoleNode::new("Night")))
            .with_child(RoleNode::new("Sales").with_file("Sales_Files"));
        let hierarchy = RoleHierarchy::new(root).unwrap();

        assert_eq!(
            hierarchy.get_all_roles(),
            vec!["Board", "Ops", "Night", "Sales"]
        );
        assert_eq!(
            hierarchy.get_files_for_role("sales"),
            Some(&files(&["Sales_Files"]))
        );
    }

    #[test]
    fn test_depth_first_reports_depth() {
        let hierarchy = RoleHierarchy::standard();
        let depths: Vec<usize> = hierarchy.depth_first().iter().map(|(d, _)| *d).collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let root = RoleNode::new("CEO").with_child(RoleNode::new("ceo"));
        assert_eq!(
            RoleHierarchy::new(root),
            Err(HierarchyError::DuplicateRole("ceo".to_string()))
        );
    }

    #[test]
    fn test_blank_role_rejected() {
        let root = RoleNode::new("CEO").with_child(RoleNode::new("  "));
        assert_eq!(RoleHierarchy::new(root), Err(HierarchyError::EmptyRoleName));
    }

    #[test]
    fn test_file_sets_may_overlap() {
        let root = RoleNode::new("A")
            .with_file("Shared")
            .with_child(RoleNode::new("B").with_file("Shared"));
        let hierarchy = RoleHierarchy::new(root).unwrap();
        assert_eq!(hierarchy.get_files_for_role("A"), hierarchy.get_files_for_role("B"));
    }

    proptest! {
        #[test]
        fn prop_every_role_resolves_to_stable_non_empty_files(upper in any::<bool>()) {
            let hierarchy = RoleHierarchy::standard();
            for role in hierarchy.get_all_roles() {
                let query = if upper { role.to_uppercase() } else { role.to_lowercase() };
                let first = hierarchy.get_files_for_role(&query).cloned();
                let second = hierarchy.get_files_for_role(&query).cloned();
                prop_assert!(first.as_ref().is_some_and(|f| !f.is_empty()));
                prop_assert_eq!(first, second);
            }
        }

        #[test]
        fn prop_unlisted_names_never_resolve(name in "[a-z]{1,12}") {
            let hierarchy = RoleHierarchy::standard();
            let listed = hierarchy
                .get_all_roles()
                .iter()
                .any(|r| r.to_lowercase() == name);
            prop_assert_eq!(hierarchy.get_files_for_role(&name).is_some(), listed);
        }
    }
}
