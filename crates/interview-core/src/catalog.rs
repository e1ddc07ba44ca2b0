//! JSON question catalog loader.
//!
//! Loads the static question file, assigns positional ids, and validates the
//! result for common authoring mistakes.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;

use crate::model::Question;
use crate::traits::CatalogProvider;

/// An immutable, in-memory question catalog.
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question catalog: {}", path.display()))?;

        let catalog = Self::from_json_str(&content)
            .with_context(|| format!("failed to parse question catalog: {}", path.display()))?;
        tracing::info!(
            "loaded {} questions from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a JSON array of questions (useful for testing).
    pub fn from_json_str(content: &str) -> Result<Self> {
        let questions: Vec<Question> =
            serde_json::from_str(content).context("catalog must be a JSON array of questions")?;
        Ok(Self::from_questions(questions))
    }

    /// Build a catalog from questions, reassigning ids by position.
    pub fn from_questions(mut questions: Vec<Question>) -> Self {
        for (i, q) in questions.iter_mut().enumerate() {
            q.id = i;
        }
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions matching role and experience. Blank filters match everything.
    pub fn filter(&self, role: Option<&str>, experience: Option<&str>) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| matches_role(q, role) && matches_experience(q, experience))
            .collect()
    }

    /// A random question for an experience bracket.
    ///
    /// Falls back to the whole catalog when nothing matches the bracket.
    pub fn random(&self, experience: Option<&str>) -> Option<&Question> {
        let mut pool = self.filter(None, experience);
        if pool.is_empty() {
            if let Some(exp) = experience {
                tracing::warn!(
                    "no questions found for experience='{exp}', falling back to full catalog"
                );
            }
            pool = self.questions.iter().collect();
        }
        pool.choose(&mut rand::thread_rng()).copied()
    }
}

impl CatalogProvider for QuestionCatalog {
    fn get(&self, id: usize) -> Option<Question> {
        self.questions.get(id).cloned()
    }

    fn all(&self) -> Vec<Question> {
        self.questions.clone()
    }
}

/// Case-insensitive exact role match; a blank or absent filter matches all.
pub fn matches_role(question: &Question, role: Option<&str>) -> bool {
    matches_label(&question.role, role)
}

/// Case-insensitive exact experience match; a blank or absent filter matches all.
pub fn matches_experience(question: &Question, experience: Option<&str>) -> bool {
    matches_label(&question.experience, experience)
}

fn matches_label(label: &str, filter: Option<&str>) -> bool {
    match filter.map(str::trim) {
        None | Some("") => true,
        Some(wanted) => label.to_lowercase() == wanted.to_lowercase(),
    }
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common authoring issues.
pub fn validate_catalog(catalog: &QuestionCatalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate prompts
    let mut seen = HashSet::new();
    for q in catalog.questions() {
        let key = q.question.trim().to_lowercase();
        if !key.is_empty() && !seen.insert(key) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: "duplicate question text".into(),
            });
        }
    }

    for q in catalog.questions() {
        let mut warn = |message: &str| {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: message.to_string(),
            })
        };

        if q.question.trim().is_empty() {
            warn("question text is empty");
        }
        if q.ideal_answer.trim().is_empty() {
            warn("ideal answer is empty; similarity scoring has nothing to compare against");
        }
        if q.required_concepts.is_empty() {
            warn("no required concepts; keyword score will always be 0.0");
        }
        if q
            .required_concepts
            .iter()
            .chain(&q.advanced_concepts)
            .any(|c| c.trim().is_empty())
        {
            warn("blank concept entry matches every answer");
        }
        if q.role.trim().is_empty() {
            warn("role is blank");
        }
        if q.experience.trim().is_empty() {
            warn("experience is blank");
        }
    }

    warnings
}
