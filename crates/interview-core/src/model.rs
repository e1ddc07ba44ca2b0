//! Core data model types.
//!
//! Questions come from the catalog, scoring results from the scoring engine,
//! and evaluation outcomes and session metadata are produced by the
//! orchestrator and session manager.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single interview question as loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Position in the catalog (0-based). Assigned on load.
    #[serde(default)]
    pub id: usize,
    /// The prompt shown to the candidate.
    pub question: String,
    /// Reference answer used for similarity scoring.
    #[serde(default)]
    pub ideal_answer: String,
    /// Concepts a correct answer must mention.
    #[serde(default)]
    pub required_concepts: Vec<String>,
    /// Concepts that earn a bonus.
    #[serde(default)]
    pub advanced_concepts: Vec<String>,
    /// Difficulty label (e.g. "medium").
    #[serde(default)]
    pub difficulty: String,
    /// Experience bracket label (e.g. "mid").
    #[serde(default)]
    pub experience: String,
    /// Role label (e.g. "backend").
    #[serde(default)]
    pub role: String,
}

/// Structured score for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Blended score in [0, 1].
    pub final_score: f64,
    /// matched required / total required.
    pub required_concept_score: f64,
    /// matched advanced / total advanced.
    pub advanced_bonus: f64,
    /// Similarity that was blended in, if one was obtained.
    #[serde(default)]
    pub similarity_score: Option<f64>,
    pub matched_required: Vec<String>,
    pub matched_advanced: Vec<String>,
    pub total_required: usize,
    pub total_advanced: usize,
}

impl ScoringResult {
    /// The result recorded for a skipped answer.
    ///
    /// Same shape as a real score, with every score at zero and nothing
    /// matched. Totals still report the question's concept counts.
    pub fn skipped(total_required: usize, total_advanced: usize) -> Self {
        Self {
            final_score: 0.0,
            required_concept_score: 0.0,
            advanced_bonus: 0.0,
            similarity_score: None,
            matched_required: Vec::new(),
            matched_advanced: Vec::new(),
            total_required,
            total_advanced,
        }
    }
}

/// A scored answer submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    #[serde(default)]
    pub session_id: Option<String>,
    pub question_id: usize,
    pub question_text: String,
    pub user_answer: String,
    /// Experience bracket of the answered question.
    #[serde(default)]
    pub experience: String,
    #[serde(flatten)]
    pub score: ScoringResult,
    /// `true` iff a similarity value was obtained and blended in.
    pub embedding_used: bool,
    pub submitted_at: DateTime<Utc>,
}

/// An evaluation outcome together with the identity the store assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvaluation {
    pub id: u64,
    #[serde(flatten)]
    pub outcome: EvaluationOutcome,
}

/// Metadata recorded when a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub session_id: String,
    pub role: String,
    #[serde(default)]
    pub experience: Option<String>,
    /// Selected question ids, in presentation order.
    pub question_ids: Vec<usize>,
    pub created_at: DateTime<Utc>,
}

/// What a caller receives when a session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStart {
    pub session_id: String,
    pub role: String,
    #[serde(default)]
    pub experience: Option<String>,
    pub questions: Vec<Question>,
}

impl SessionStart {
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}

/// Letter grade derived from an averaged score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a score in [0, 1] onto the fixed grade thresholds.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Grade::A
        } else if score >= 0.70 {
            Grade::B
        } else if score >= 0.55 {
            Grade::C
        } else if score >= 0.40 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::from_score(1.0), Grade::A);
        assert_eq!(Grade::from_score(0.85), Grade::A);
        assert_eq!(Grade::from_score(0.84), Grade::B);
        assert_eq!(Grade::from_score(0.70), Grade::B);
        assert_eq!(Grade::from_score(0.55), Grade::C);
        assert_eq!(Grade::from_score(0.40), Grade::D);
        assert_eq!(Grade::from_score(0.39), Grade::F);
        assert_eq!(Grade::from_score(0.0), Grade::F);
    }

    #[test]
    fn grade_serializes_as_letter() {
        assert_eq!(Grade::C.to_string(), "C");
        assert_eq!(serde_json::to_string(&Grade::F).unwrap(), "\"F\"");
    }

    #[test]
    fn question_parses_camel_case_without_advanced_concepts() {
        let json = r#"{
            "question": "What is a HashMap?",
            "idealAnswer": "A hash table keyed by hashCode.",
            "requiredConcepts": ["hashCode", "buckets"],
            "difficulty": "easy",
            "experience": "junior",
            "role": "backend"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.ideal_answer, "A hash table keyed by hashCode.");
        assert_eq!(q.required_concepts, vec!["hashCode", "buckets"]);
        assert!(q.advanced_concepts.is_empty());
        assert_eq!(q.id, 0);
    }

    #[test]
    fn skipped_result_is_all_zero() {
        let r = ScoringResult::skipped(3, 2);
        assert_eq!(r.final_score, 0.0);
        assert_eq!(r.required_concept_score, 0.0);
        assert_eq!(r.advanced_bonus, 0.0);
        assert!(r.similarity_score.is_none());
        assert!(r.matched_required.is_empty());
        assert!(r.matched_advanced.is_empty());
        assert_eq!((r.total_required, r.total_advanced), (3, 2));
    }

    #[test]
    fn stored_evaluation_flattens_score_fields() {
        let stored = StoredEvaluation {
            id: 7,
            outcome: EvaluationOutcome {
                session_id: Some("s-1".into()),
                question_id: 2,
                question_text: "Q".into(),
                user_answer: "A".into(),
                experience: "mid".into(),
                score: ScoringResult::skipped(1, 0),
                embedding_used: false,
                submitted_at: Utc::now(),
            },
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["final_score"], 0.0);
        assert_eq!(value["embedding_used"], false);
        assert!(value["similarity_score"].is_null());
    }
}
