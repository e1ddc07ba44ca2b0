//! The `interview score` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use interview_core::evaluator::Evaluator;
use interview_core::store::InMemoryEvaluationStore;
use interview_similarity::create_similarity;

pub async fn execute(
    question_id: usize,
    answer: String,
    session: Option<String>,
    catalog_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, catalog) = super::load_catalog(catalog_path, config_path.as_deref())?;

    let evaluator = Evaluator::new(
        Arc::new(catalog),
        create_similarity(&config.similarity)?,
        Arc::new(InMemoryEvaluationStore::new()),
        config.evaluator_config(),
    );

    let stored = evaluator
        .evaluate(question_id, &answer, session.as_deref())
        .await?;

    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(())
}
