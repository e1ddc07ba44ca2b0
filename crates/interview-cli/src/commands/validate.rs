//! The `interview validate` command.

use std::path::PathBuf;

use anyhow::Result;

use interview_core::catalog::validate_catalog;

pub fn execute(catalog_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (config, catalog) = super::load_catalog(catalog_path.clone(), config_path.as_deref())?;
    let path = catalog_path.unwrap_or(config.catalog);

    println!("Catalog: {} ({} questions)", path.display(), catalog.len());

    let warnings = validate_catalog(&catalog);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
