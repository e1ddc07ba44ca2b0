//! The `interview run` command.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use interview_core::evaluator::Evaluator;
use interview_core::model::SessionStart;
use interview_core::report::SessionSummary;
use interview_core::session::SessionManager;
use interview_core::store::{InMemoryEvaluationStore, InMemorySessionStore};
use interview_similarity::create_similarity;

pub async fn execute(
    role: String,
    experience: Option<String>,
    catalog_path: Option<PathBuf>,
    answers_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!role.trim().is_empty(), "role must not be blank");

    let (config, catalog) = super::load_catalog(catalog_path, config_path.as_deref())?;
    anyhow::ensure!(!catalog.is_empty(), "question catalog is empty");

    let catalog = Arc::new(catalog);
    let evaluations = Arc::new(InMemoryEvaluationStore::new());
    let similarity = create_similarity(&config.similarity)?;

    let evaluator = Evaluator::new(
        catalog.clone(),
        similarity.clone(),
        evaluations.clone(),
        config.evaluator_config(),
    );
    let manager = SessionManager::new(
        catalog,
        evaluations,
        Arc::new(InMemorySessionStore::new()),
        config.session_config(),
    )?;

    let session = manager.start_session(&role, experience.as_deref());
    eprintln!(
        "interview v{}: {} questions for role '{}' (similarity: {})",
        env!("CARGO_PKG_VERSION"),
        session.total_questions(),
        session.role,
        similarity.name()
    );
    eprintln!();

    let answers = match &answers_path {
        Some(path) => read_answers_file(path)?,
        None => read_answers_stdin(&session)?,
    };
    if answers.len() > session.total_questions() {
        tracing::warn!(
            "{} answers supplied for {} questions, ignoring the extra ones",
            answers.len(),
            session.total_questions()
        );
    }

    let pairs = pair_answers(&session, answers);
    evaluator
        .evaluate_batch(Some(&session.session_id), pairs, config.parallelism)
        .await?;

    let summary = manager
        .get_summary(&session.session_id)
        .await?
        .context("session disappeared before it could be summarised")?;

    print_summary(&summary);

    let output = output.unwrap_or(config.output_dir);
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("session-{timestamp}.json"));
                summary.save_json(&path)?;
                eprintln!("Summary saved to: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("session-{timestamp}.md"));
                std::fs::write(&path, summary.to_markdown())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Markdown summary: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

/// Answers file: a JSON array of strings, one per question in order.
fn read_answers_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("answers must be a JSON array of strings: {}", path.display()))
}

/// One line per question. An empty line or end of input skips the question.
fn read_answers_stdin(session: &SessionStart) -> Result<Vec<String>> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut answers = Vec::with_capacity(session.total_questions());

    for (i, question) in session.questions.iter().enumerate() {
        eprintln!(
            "[{}/{}] ({}) {}",
            i + 1,
            session.total_questions(),
            question.difficulty,
            question.question
        );
        match lines.next() {
            Some(line) => answers.push(line.context("failed to read answer from stdin")?),
            None => break,
        }
    }

    Ok(answers)
}

/// Pair answers with the session's questions. Missing answers become empty,
/// which the evaluator scores as skipped.
fn pair_answers(session: &SessionStart, answers: Vec<String>) -> Vec<(usize, String)> {
    let mut answers = answers.into_iter();
    session
        .questions
        .iter()
        .map(|q| (q.id, answers.next().unwrap_or_default()))
        .collect()
}

fn print_summary(summary: &SessionSummary) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Question",
        "Score",
        "Required",
        "Advanced",
        "Similarity",
    ]);

    for r in &summary.results {
        let similarity = r
            .similarity_score
            .map(|s| format!("{:.1}%", s * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        table.add_row(vec![
            Cell::new(r.question_number),
            Cell::new(truncate(&r.question, 60)),
            Cell::new(format!("{:.1}%", r.final_score * 100.0)),
            Cell::new(format!("{:.1}%", r.required_concept_score * 100.0)),
            Cell::new(format!("{:.1}%", r.advanced_bonus * 100.0)),
            Cell::new(similarity),
        ]);
    }

    println!("{table}");
    println!(
        "Session {}: total score {:.0}%, Grade: {} ({} of {} answers used similarity)",
        summary.session_id,
        summary.total_score * 100.0,
        summary.grade,
        summary.embedding_count(),
        summary.total_questions
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::model::Question;

    fn session_with(ids: &[usize]) -> SessionStart {
        SessionStart {
            session_id: "s".into(),
            role: "backend".into(),
            experience: None,
            questions: ids
                .iter()
                .map(|&id| Question {
                    id,
                    question: format!("q{id}"),
                    ideal_answer: String::new(),
                    required_concepts: vec![],
                    advanced_concepts: vec![],
                    difficulty: "easy".into(),
                    experience: "junior".into(),
                    role: "backend".into(),
                })
                .collect(),
        }
    }

    #[test]
    fn missing_answers_become_empty() {
        let session = session_with(&[4, 7, 9]);
        let pairs = pair_answers(&session, vec!["first answer".into()]);
        assert_eq!(
            pairs,
            vec![
                (4, "first answer".to_string()),
                (7, String::new()),
                (9, String::new())
            ]
        );
    }

    #[test]
    fn extra_answers_are_dropped() {
        let session = session_with(&[1]);
        let pairs = pair_answers(&session, vec!["a".into(), "b".into()]);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
