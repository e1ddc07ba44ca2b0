//! The `interview health` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use interview_similarity::http::HttpSimilarity;
use interview_similarity::{load_config_from, SimilarityConfig};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    match &config.similarity {
        SimilarityConfig::Disabled => {
            println!("Similarity scoring is disabled; answers are scored on keywords only.");
        }
        SimilarityConfig::Http {
            base_url,
            timeout_secs,
        } => {
            let client = HttpSimilarity::new(base_url, Duration::from_secs(*timeout_secs))?;
            let health = client.health().await.with_context(|| {
                format!("similarity service at {} is unhealthy", client.base_url())
            })?;
            println!(
                "Similarity service at {}: status={} model={} ready={}",
                client.base_url(),
                health.status,
                health.model,
                health.ready
            );
        }
    }

    Ok(())
}
