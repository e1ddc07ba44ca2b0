//! Seams between the engine and its collaborators.
//!
//! The catalog and session store are synchronous in-process lookups. The
//! similarity provider and the evaluation store may sit behind a network or
//! a database, so they are async.

use async_trait::async_trait;

use crate::error::SimilarityError;
use crate::model::{EvaluationOutcome, Question, SessionMeta, StoredEvaluation};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Read-only access to the question catalog.
pub trait CatalogProvider: Send + Sync {
    /// Look up a question by its positional id.
    fn get(&self, id: usize) -> Option<Question>;

    /// Every question, in load order.
    fn all(&self) -> Vec<Question>;
}

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

/// Source of semantic similarity between a candidate answer and the ideal one.
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    /// Human-readable provider name (e.g. "http").
    fn name(&self) -> &str;

    /// Similarity in [0, 1]. An error means "unavailable" and is never fatal.
    async fn similarity(
        &self,
        user_answer: &str,
        ideal_answer: &str,
    ) -> Result<f64, SimilarityError>;
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Persistence for evaluation outcomes.
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    /// Persist an outcome and return it with its assigned identity.
    async fn save(&self, outcome: EvaluationOutcome) -> anyhow::Result<StoredEvaluation>;

    /// All evaluations recorded for a session, in insertion order.
    async fn find_by_session(&self, session_id: &str) -> anyhow::Result<Vec<StoredEvaluation>>;

    async fn find_by_id(&self, id: u64) -> anyhow::Result<Option<StoredEvaluation>>;

    /// Every stored evaluation, in insertion order.
    async fn all(&self) -> anyhow::Result<Vec<StoredEvaluation>>;
}

/// Concurrency-safe home for session metadata.
pub trait SessionStore: Send + Sync {
    fn insert(&self, meta: SessionMeta);

    /// Returns `None` for unknown or expired sessions.
    fn get(&self, session_id: &str) -> Option<SessionMeta>;

    fn remove(&self, session_id: &str) -> Option<SessionMeta>;

    /// Number of sessions currently held, expired ones included until evicted.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired sessions and return how many were removed.
    fn evict_expired(&self) -> usize;
}
