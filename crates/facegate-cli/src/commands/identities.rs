//! Enrolled identity listing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use facegate_store::StoreFile;

use crate::style::colors::SemanticStyle;
use crate::style::{list_table, print_hint};

pub fn run(project_dir: &Path, store: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(project_dir, store)?;
    let file = StoreFile::new(&config.store.path);
    let identities = file
        .load()
        .with_context(|| format!("Failed to read identity store {}", file.path().display()))?;

    println!("{} {}", "Identity store:".header(), file.path().display());
    if identities.is_empty() {
        println!("{}", "No identities enrolled.".muted());
        print_hint("Run 'facegate run' and press 'l' to enroll.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = identities
        .iter()
        .map(|identity| {
            vec![
                identity.role.clone(),
                identity
                    .files
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                identity.signature.dimensions().to_string(),
            ]
        })
        .collect();
    println!("{}", list_table(&["Role", "Files", "Signature dims"], &rows));

    let count = identities.len();
    let word = if count == 1 { "identity" } else { "identities" };
    println!("{}", format!("({count} {word})").muted());
    Ok(())
}
