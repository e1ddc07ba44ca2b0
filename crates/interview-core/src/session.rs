//! Session manager: tiered question selection and summary aggregation.
//!
//! Selection fills a session of `session_size` questions in three tiers, each
//! shuffled and each excluding what earlier tiers already picked:
//!
//! 1. role AND experience match
//! 2. role match, any experience
//! 3. anything left in the catalog
//!
//! A small catalog simply yields a shorter session.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::catalog::{matches_experience, matches_role};
use crate::error::InterviewError;
use crate::model::{Grade, Question, SessionMeta, SessionStart, StoredEvaluation};
use crate::report::{QuestionSummary, SessionSummary};
use crate::scoring::round2;
use crate::traits::{CatalogProvider, EvaluationStore, SessionStore};

/// Default number of questions per session.
pub const DEFAULT_SESSION_SIZE: usize = 10;

/// Placeholder ideal answer for questions no longer in the catalog.
pub const MISSING_IDEAL_ANSWER: &str = "N/A";

/// Configuration for the session manager.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub session_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_size: DEFAULT_SESSION_SIZE,
        }
    }
}

pub struct SessionManager {
    catalog: Arc<dyn CatalogProvider>,
    evaluations: Arc<dyn EvaluationStore>,
    sessions: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        evaluations: Arc<dyn EvaluationStore>,
        sessions: Arc<dyn SessionStore>,
        config: SessionConfig,
    ) -> Result<Self, InterviewError> {
        if config.session_size == 0 {
            return Err(InterviewError::InvalidConfig(
                "session_size must be at least 1".into(),
            ));
        }
        Ok(Self {
            catalog,
            evaluations,
            sessions,
            config,
        })
    }

    /// Start a session and record its metadata.
    pub fn start_session(&self, role: &str, experience: Option<&str>) -> SessionStart {
        let session_id = Uuid::new_v4().to_string();
        let selected = select_questions(
            &self.catalog.all(),
            role,
            experience,
            self.config.session_size,
            &mut rand::thread_rng(),
        );

        let experience = experience
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        self.sessions.insert(SessionMeta {
            session_id: session_id.clone(),
            role: role.to_string(),
            experience: experience.clone(),
            question_ids: selected.iter().map(|q| q.id).collect(),
            created_at: Utc::now(),
        });
        tracing::info!(
            %session_id,
            "started session for role='{role}' with {} questions",
            selected.len()
        );

        SessionStart {
            session_id,
            role: role.to_string(),
            experience,
            questions: selected,
        }
    }

    /// Metadata of a live session.
    pub fn session(&self, session_id: &str) -> Option<SessionMeta> {
        self.sessions.get(session_id)
    }

    /// Aggregate a session's stored evaluations. `None` for unknown sessions.
    pub async fn get_summary(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionSummary>, InterviewError> {
        let Some(meta) = self.sessions.get(session_id) else {
            return Ok(None);
        };

        let records = self
            .evaluations
            .find_by_session(session_id)
            .await
            .map_err(InterviewError::Storage)?;

        let total_score = mean_final_score(&records);
        let results = records
            .iter()
            .enumerate()
            .map(|(i, r)| self.question_summary(i + 1, r))
            .collect();

        Ok(Some(SessionSummary {
            session_id: meta.session_id,
            role: meta.role,
            experience: meta.experience,
            total_questions: records.len(),
            total_score,
            grade: Grade::from_score(total_score),
            results,
        }))
    }

    fn question_summary(&self, number: usize, record: &StoredEvaluation) -> QuestionSummary {
        let o = &record.outcome;
        let ideal_answer = self
            .catalog
            .get(o.question_id)
            .map(|q| q.ideal_answer)
            .unwrap_or_else(|| MISSING_IDEAL_ANSWER.to_string());

        QuestionSummary {
            question_number: number,
            question_id: o.question_id,
            question: o.question_text.clone(),
            user_answer: o.user_answer.clone(),
            ideal_answer,
            final_score: o.score.final_score,
            required_concept_score: o.score.required_concept_score,
            advanced_bonus: o.score.advanced_bonus,
            similarity_score: o.score.similarity_score,
            matched_required: o.score.matched_required.clone(),
            matched_advanced: o.score.matched_advanced.clone(),
            embedding_used: o.embedding_used,
        }
    }
}

/// Mean of the final scores, rounded to 2 decimals. 0.0 for no records.
pub fn mean_final_score(records: &[StoredEvaluation]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records
        .iter()
        .map(|r| {
            let s = r.outcome.score.final_score;
            if s.is_finite() {
                s
            } else {
                0.0
            }
        })
        .sum();
    round2(sum / records.len() as f64)
}

/// Pick up to `size` distinct questions using the three-tier fallback.
pub fn select_questions<R: rand::Rng + ?Sized>(
    all: &[Question],
    role: &str,
    experience: Option<&str>,
    size: usize,
    rng: &mut R,
) -> Vec<Question> {
    let role_filter = Some(role);
    let mut selected: Vec<Question> = Vec::with_capacity(size.min(all.len()));
    let mut taken: HashSet<usize> = HashSet::new();

    let mut take_tier = |selected: &mut Vec<Question>, pred: &dyn Fn(&Question) -> bool| {
        let need = size.saturating_sub(selected.len());
        if need == 0 {
            return 0;
        }
        let mut pool: Vec<&Question> = all
            .iter()
            .filter(|q| !taken.contains(&q.id) && pred(q))
            .collect();
        pool.shuffle(&mut *rng);
        let added = pool.len().min(need);
        for q in pool.into_iter().take(need) {
            taken.insert(q.id);
            selected.push(q.clone());
        }
        added
    };

    let primary = take_tier(&mut selected, &|q: &Question| {
        matches_role(q, role_filter) && matches_experience(q, experience)
    });
    tracing::info!(
        "primary pool for role='{role}' experience='{}': took {primary}",
        experience.unwrap_or("")
    );

    let same_role = take_tier(&mut selected, &|q: &Question| matches_role(q, role_filter));
    if same_role > 0 {
        tracing::info!("padded with {same_role} same-role questions");
    }

    let any = take_tier(&mut selected, &|_: &Question| true);
    if any > 0 {
        tracing::info!("final pad to {} questions", selected.len());
    }

    selected
}
