//! Role hierarchy display.

use facegate_rbac::RoleHierarchy;

use crate::style::colors::SemanticStyle;

pub fn run() {
    let hierarchy = RoleHierarchy::standard();
    print_tree(&hierarchy);
    println!();
    println!("Valid roles are: {}", hierarchy.get_all_roles().join(", "));
}

/// Prints the hierarchy indented by depth, each role followed by its files.
pub fn print_tree(hierarchy: &RoleHierarchy) {
    for (depth, node) in hierarchy.depth_first() {
        let files = node
            .owned_files()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}{} {}",
            "  ".repeat(depth),
            node.role_name().role(),
            format!("[{files}]").muted()
        );
    }
}
