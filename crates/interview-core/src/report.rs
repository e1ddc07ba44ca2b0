//! Session summary types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Grade;

/// Graded summary of one interview session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub role: String,
    #[serde(default)]
    pub experience: Option<String>,
    /// Number of evaluated answers.
    pub total_questions: usize,
    /// Mean final score across all answers, rounded to 2 decimals.
    pub total_score: f64,
    pub grade: Grade,
    pub results: Vec<QuestionSummary>,
}

/// One answered question inside a session summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSummary {
    /// 1-based position in submission order.
    pub question_number: usize,
    pub question_id: usize,
    pub question: String,
    pub user_answer: String,
    /// Ideal answer from the catalog, or "N/A" if the question is gone.
    pub ideal_answer: String,
    pub final_score: f64,
    pub required_concept_score: f64,
    pub advanced_bonus: f64,
    #[serde(default)]
    pub similarity_score: Option<f64>,
    pub matched_required: Vec<String>,
    pub matched_advanced: Vec<String>,
    pub embedding_used: bool,
}

impl SessionSummary {
    /// Save the summary as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        let summary: SessionSummary =
            serde_json::from_str(&content).context("failed to parse summary JSON")?;
        Ok(summary)
    }

    /// Number of answers scored with a similarity signal.
    pub fn embedding_count(&self) -> usize {
        self.results.iter().filter(|r| r.embedding_used).count()
    }

    /// Format the summary as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Interview summary: {}\n\n", self.role));
        if let Some(exp) = &self.experience {
            md.push_str(&format!("**Experience:** {exp}\n\n"));
        }
        md.push_str(&format!(
            "**Grade:** {} ({:.0}% over {} questions)\n\n",
            self.grade,
            self.total_score * 100.0,
            self.total_questions
        ));

        if self.results.is_empty() {
            md.push_str("No answers were submitted.\n");
            return md;
        }

        md.push_str("| # | Question | Score | Required | Advanced | Similarity |\n");
        md.push_str("|---|----------|-------|----------|----------|------------|\n");
        for r in &self.results {
            let similarity = r
                .similarity_score
                .map(|s| format!("{:.0}%", s * 100.0))
                .unwrap_or_else(|| "n/a".to_string());
            md.push_str(&format!(
                "| {} | {} | {:.0}% | {:.0}% | {:.0}% | {} |\n",
                r.question_number,
                r.question.replace('|', "\\|"),
                r.final_score * 100.0,
                r.required_concept_score * 100.0,
                r.advanced_bonus * 100.0,
                similarity
            ));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_summary(scores: &[f64]) -> SessionSummary {
        let results = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| QuestionSummary {
                question_number: i + 1,
                question_id: i,
                question: format!("Question {i} | with pipe"),
                user_answer: "answer".into(),
                ideal_answer: "ideal".into(),
                final_score: s,
                required_concept_score: s,
                advanced_bonus: 0.0,
                similarity_score: (i % 2 == 0).then_some(s),
                matched_required: vec![],
                matched_advanced: vec![],
                embedding_used: i % 2 == 0,
            })
            .collect();
        SessionSummary {
            session_id: "s-1".into(),
            role: "backend".into(),
            experience: Some("mid".into()),
            total_questions: scores.len(),
            total_score: 0.5,
            grade: Grade::D,
            results,
        }
    }

    #[test]
    fn json_roundtrip() {
        let summary = make_summary(&[1.0, 0.5, 0.0]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.json");

        summary.save_json(&path).unwrap();
        let loaded = SessionSummary::load_json(&path).unwrap();

        assert_eq!(loaded.session_id, "s-1");
        assert_eq!(loaded.grade, Grade::D);
        assert_eq!(loaded.results.len(), 3);
        assert_eq!(loaded.results[1].similarity_score, None);
    }

    #[test]
    fn markdown_output() {
        let summary = make_summary(&[1.0, 0.5, 0.0]);
        let md = summary.to_markdown();
        assert!(md.contains("**Grade:** D (50% over 3 questions)"));
        assert!(md.contains("| 1 | Question 0 \\| with pipe | 100% |"));
        assert!(md.contains("n/a"));
        assert_eq!(summary.embedding_count(), 2);
    }

    #[test]
    fn markdown_without_answers() {
        let mut summary = make_summary(&[]);
        summary.total_score = 0.0;
        summary.grade = Grade::F;
        assert!(summary.to_markdown().contains("No answers were submitted."));
    }
}
