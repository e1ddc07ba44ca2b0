pub mod health;
pub mod init;
pub mod questions;
pub mod run;
pub mod score;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use interview_core::catalog::QuestionCatalog;
use interview_similarity::{load_config_from, InterviewConfig};

/// Load the config and the catalog it points at, honouring a `--catalog`
/// override.
pub(crate) fn load_catalog(
    catalog: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<(InterviewConfig, QuestionCatalog)> {
    let config = load_config_from(config_path)?;
    let path = catalog.unwrap_or_else(|| config.catalog.clone());
    let catalog = QuestionCatalog::load(&path)?;
    Ok((config, catalog))
}
