//! Evaluation orchestrator.
//!
//! Sits between answer submission and the scoring engine: detects skipped
//! answers, asks the similarity provider for a score under a timeout, runs
//! the scoring engine and persists the outcome.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::{InterviewError, SimilarityError};
use crate::model::{EvaluationOutcome, Question, ScoringResult, StoredEvaluation};
use crate::scoring;
use crate::traits::{CatalogProvider, EvaluationStore, SimilarityProvider};

/// Literal answer the UI sends when the candidate presses "Skip".
pub const SKIP_MARKER: &str = "— skipped —";

/// Trimmed answers shorter than this (in chars) count as skipped.
pub const MIN_ANSWER_CHARS: usize = 10;

/// Configuration for the evaluation orchestrator.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Upper bound on a single similarity call.
    pub similarity_timeout: Duration,
    /// Minimum trimmed answer length before an answer is scored.
    pub min_answer_chars: usize,
    /// Answer literal treated as an explicit non-attempt.
    pub skip_marker: String,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            similarity_timeout: Duration::from_secs(5),
            min_answer_chars: MIN_ANSWER_CHARS,
            skip_marker: SKIP_MARKER.to_string(),
        }
    }
}

/// Scores answers and records the outcomes.
pub struct Evaluator {
    catalog: Arc<dyn CatalogProvider>,
    similarity: Arc<dyn SimilarityProvider>,
    store: Arc<dyn EvaluationStore>,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        similarity: Arc<dyn SimilarityProvider>,
        store: Arc<dyn EvaluationStore>,
        config: EvaluatorConfig,
    ) -> Self {
        Self {
            catalog,
            similarity,
            store,
            config,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Returns `true` if the answer should not be scored.
    pub fn is_skipped(&self, answer: &str) -> bool {
        let trimmed = answer.trim();
        trimmed.is_empty()
            || trimmed == self.config.skip_marker
            || trimmed.chars().count() < self.config.min_answer_chars
    }

    /// Score an answer without persisting it.
    pub async fn assess(
        &self,
        question_id: usize,
        answer: &str,
        session_id: Option<&str>,
    ) -> Result<EvaluationOutcome, InterviewError> {
        let question = self
            .catalog
            .get(question_id)
            .ok_or(InterviewError::QuestionNotFound(question_id))?;

        let (score, embedding_used) = if self.is_skipped(answer) {
            tracing::debug!(question_id, "answer skipped, scoring as zero");
            (
                ScoringResult::skipped(
                    question.required_concepts.len(),
                    question.advanced_concepts.len(),
                ),
                false,
            )
        } else {
            let similarity = self.fetch_similarity(answer, &question).await;
            let score = scoring::score(
                answer,
                &question.required_concepts,
                &question.advanced_concepts,
                similarity,
            );
            (score, similarity.is_some())
        };

        Ok(EvaluationOutcome {
            session_id: session_id.map(str::to_string),
            question_id,
            question_text: question.question,
            user_answer: answer.to_string(),
            experience: question.experience,
            score,
            embedding_used,
            submitted_at: Utc::now(),
        })
    }

    /// Score an answer and persist the outcome.
    pub async fn evaluate(
        &self,
        question_id: usize,
        answer: &str,
        session_id: Option<&str>,
    ) -> Result<StoredEvaluation, InterviewError> {
        let outcome = self.assess(question_id, answer, session_id).await?;
        let final_score = outcome.score.final_score;
        let stored = self
            .store
            .save(outcome)
            .await
            .map_err(InterviewError::Storage)?;
        tracing::info!(
            "saved evaluation id={} questionId={} finalScore={}",
            stored.id,
            question_id,
            final_score
        );
        Ok(stored)
    }

    /// Score a batch of `(question_id, answer)` pairs concurrently, then
    /// persist them in submission order.
    ///
    /// Nothing is written unless every answer could be assessed.
    pub async fn evaluate_batch(
        &self,
        session_id: Option<&str>,
        answers: Vec<(usize, String)>,
        parallelism: usize,
    ) -> Result<Vec<StoredEvaluation>, InterviewError> {
        let outcomes: Vec<EvaluationOutcome> = stream::iter(answers)
            .map(|(question_id, answer)| async move {
                self.assess(question_id, &answer, session_id).await
            })
            .buffered(parallelism.max(1))
            .try_collect()
            .await?;

        let mut stored = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            stored.push(
                self.store
                    .save(outcome)
                    .await
                    .map_err(InterviewError::Storage)?,
            );
        }
        tracing::info!("saved {} evaluations in batch", stored.len());
        Ok(stored)
    }

    /// Fetch a stored evaluation by identity.
    pub async fn get(&self, id: u64) -> Result<Option<StoredEvaluation>, InterviewError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(InterviewError::Storage)
    }

    /// Every stored evaluation, in insertion order.
    pub async fn list(&self) -> Result<Vec<StoredEvaluation>, InterviewError> {
        self.store.all().await.map_err(InterviewError::Storage)
    }

    /// One attempt, bounded by the configured timeout. Every failure becomes
    /// `None`.
    async fn fetch_similarity(&self, answer: &str, question: &Question) -> Option<f64> {
        let timeout = self.config.similarity_timeout;
        let result = match tokio::time::timeout(
            timeout,
            self.similarity.similarity(answer, &question.ideal_answer),
        )
        .await
        {
            Ok(inner) => inner,
            Err(_) => Err(SimilarityError::Timeout(timeout)),
        };

        match result {
            Ok(value) if value.is_finite() => {
                tracing::info!("embedding similarity: {value}");
                Some(value.clamp(0.0, 1.0))
            }
            Ok(value) => {
                tracing::warn!(
                    provider = self.similarity.name(),
                    "discarding non-finite similarity {value}"
                );
                None
            }
            Err(SimilarityError::Disabled) => None,
            Err(e) => {
                tracing::warn!(
                    provider = self.similarity.name(),
                    "embedding service unavailable: {e}"
                );
                None
            }
        }
    }
}
