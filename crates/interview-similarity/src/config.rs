//! Interview configuration and similarity provider factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use interview_core::evaluator::{EvaluatorConfig, MIN_ANSWER_CHARS, SKIP_MARKER};
use interview_core::session::{SessionConfig, DEFAULT_SESSION_SIZE};
use interview_core::traits::SimilarityProvider;

use crate::http::HttpSimilarity;
use crate::mock::DisabledSimilarity;

/// How similarity scores are obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SimilarityConfig {
    /// Call the embedding service over HTTP.
    Http {
        #[serde(default = "default_similarity_url")]
        base_url: String,
        #[serde(default = "default_similarity_timeout")]
        timeout_secs: u64,
    },
    /// Keyword-only scoring.
    Disabled,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        SimilarityConfig::Http {
            base_url: default_similarity_url(),
            timeout_secs: default_similarity_timeout(),
        }
    }
}

impl SimilarityConfig {
    /// Timeout the orchestrator should wrap similarity calls in.
    pub fn timeout(&self) -> Duration {
        match self {
            SimilarityConfig::Http { timeout_secs, .. } => Duration::from_secs(*timeout_secs),
            SimilarityConfig::Disabled => Duration::from_secs(default_similarity_timeout()),
        }
    }
}

fn default_similarity_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_similarity_timeout() -> u64 {
    5
}

/// Skip detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSettings {
    #[serde(default = "default_min_answer_chars")]
    pub min_answer_chars: usize,
    #[serde(default = "default_skip_marker")]
    pub skip_marker: String,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            min_answer_chars: default_min_answer_chars(),
            skip_marker: default_skip_marker(),
        }
    }
}

fn default_min_answer_chars() -> usize {
    MIN_ANSWER_CHARS
}

fn default_skip_marker() -> String {
    SKIP_MARKER.to_string()
}

/// Top-level interview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Path to the question catalog JSON file.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Questions per session.
    #[serde(default = "default_session_size")]
    pub session_size: usize,
    /// Output directory for summaries.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Max concurrent similarity calls when scoring a batch.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    #[serde(default)]
    pub evaluation: EvaluationSettings,
    #[serde(default)]
    pub similarity: SimilarityConfig,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("questions/java-backend.json")
}
fn default_session_size() -> usize {
    DEFAULT_SESSION_SIZE
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./interview-results")
}
fn default_parallelism() -> usize {
    4
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            session_size: default_session_size(),
            output_dir: default_output_dir(),
            parallelism: default_parallelism(),
            evaluation: EvaluationSettings::default(),
            similarity: SimilarityConfig::default(),
        }
    }
}

impl InterviewConfig {
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            similarity_timeout: self.similarity.timeout(),
            min_answer_chars: self.evaluation.min_answer_chars,
            skip_marker: self.evaluation.skip_marker.clone(),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            session_size: self.session_size,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `interview.toml` in the current directory
/// 2. `~/.config/interview/config.toml`
///
/// Environment variable override: `INTERVIEW_SIMILARITY_URL`.
pub fn load_config() -> Result<InterviewConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<InterviewConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("interview.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => InterviewConfig::default(),
    };

    Ok(apply_env_overrides(config))
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<InterviewConfig> {
    let config: InterviewConfig = toml::from_str(content)?;
    anyhow::ensure!(config.session_size >= 1, "session_size must be at least 1");
    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");
    Ok(config)
}

fn apply_env_overrides(mut config: InterviewConfig) -> InterviewConfig {
    if let Ok(url) = std::env::var("INTERVIEW_SIMILARITY_URL") {
        match &mut config.similarity {
            SimilarityConfig::Http { base_url, .. } => *base_url = url,
            SimilarityConfig::Disabled => {
                tracing::info!("INTERVIEW_SIMILARITY_URL set but similarity is disabled, ignoring");
            }
        }
    }

    if let SimilarityConfig::Http { base_url, .. } = &mut config.similarity {
        *base_url = resolve_env_vars(base_url);
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("interview"))
}

/// Create a similarity provider from its configuration.
pub fn create_similarity(config: &SimilarityConfig) -> Result<Arc<dyn SimilarityProvider>> {
    match config {
        SimilarityConfig::Http {
            base_url,
            timeout_secs,
        } => Ok(Arc::new(HttpSimilarity::new(
            base_url,
            Duration::from_secs(*timeout_secs),
        )?)),
        SimilarityConfig::Disabled => Ok(Arc::new(DisabledSimilarity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_INTERVIEW_TEST_VAR", "embedder:8000");
        assert_eq!(resolve_env_vars("${_INTERVIEW_TEST_VAR}"), "embedder:8000");
        assert_eq!(
            resolve_env_vars("http://${_INTERVIEW_TEST_VAR}/"),
            "http://embedder:8000/"
        );
        assert_eq!(resolve_env_vars("${_INTERVIEW_UNSET_VAR}"), "");
        assert_eq!(resolve_env_vars("no vars ${unterminated"), "no vars ${unterminated");
        std::env::remove_var("_INTERVIEW_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_INTERVIEW_SELF_REF", "x${_INTERVIEW_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_INTERVIEW_SELF_REF}"),
            "x${_INTERVIEW_SELF_REF}"
        );
        assert_eq!(
            resolve_env_vars("a${_INTERVIEW_SELF_REF}b${_INTERVIEW_UNSET_VAR}c"),
            "ax${_INTERVIEW_SELF_REF}bc"
        );
        std::env::remove_var("_INTERVIEW_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = InterviewConfig::default();
        assert_eq!(config.session_size, 10);
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.evaluation.min_answer_chars, 10);
        assert_eq!(config.evaluation.skip_marker, "— skipped —");
        assert_eq!(config.similarity.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
catalog = "data/questions.json"
session_size = 5
output_dir = "out"
parallelism = 2

[evaluation]
min_answer_chars = 20

[similarity]
type = "http"
base_url = "http://embedder:8000"
timeout_secs = 3
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.catalog, PathBuf::from("data/questions.json"));
        assert_eq!(config.session_size, 5);
        assert_eq!(config.evaluation.min_answer_chars, 20);
        assert_eq!(config.evaluation.skip_marker, SKIP_MARKER);
        assert_eq!(
            config.similarity,
            SimilarityConfig::Http {
                base_url: "http://embedder:8000".into(),
                timeout_secs: 3
            }
        );

        let evaluator = config.evaluator_config();
        assert_eq!(evaluator.similarity_timeout, Duration::from_secs(3));
        assert_eq!(evaluator.min_answer_chars, 20);
        assert_eq!(config.session_config().session_size, 5);
    }

    #[test]
    fn parse_disabled_similarity() {
        let config = parse_config("[similarity]\ntype = \"disabled\"\n").unwrap();
        assert_eq!(config.similarity, SimilarityConfig::Disabled);
        assert_eq!(config.session_size, 10);
        let provider = create_similarity(&config.similarity).unwrap();
        assert_eq!(provider.name(), "disabled");
    }

    #[test]
    fn reject_zero_session_size() {
        assert!(parse_config("session_size = 0").is_err());
        assert!(parse_config("parallelism = 0").is_err());
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.toml");
        std::fs::write(&path, "session_size = 3\n[similarity]\ntype = \"disabled\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.session_size, 3);
        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn http_factory_builds_client() {
        let provider = create_similarity(&SimilarityConfig::default()).unwrap();
        assert_eq!(provider.name(), "http");
    }
}
