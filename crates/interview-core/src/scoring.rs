//! Keyword scoring blended with an optional semantic similarity.
//!
//! Final score:
//!
//! ```text
//! with similarity:    0.6 * similarity + 0.3 * required + 0.1 * advanced
//! without similarity: required
//! ```
//!
//! Concept matching is a case-insensitive literal substring test; there is no
//! tokenization, stemming or word-boundary check.

use crate::model::ScoringResult;

const SIMILARITY_WEIGHT: f64 = 0.6;
const REQUIRED_WEIGHT: f64 = 0.3;
const ADVANCED_WEIGHT: f64 = 0.1;

/// Score an answer against its concept lists.
pub fn score(
    answer: &str,
    required_concepts: &[String],
    advanced_concepts: &[String],
    similarity: Option<f64>,
) -> ScoringResult {
    let normalized = answer.to_lowercase();

    let matched_required = matched_concepts(&normalized, required_concepts);
    let matched_advanced = matched_concepts(&normalized, advanced_concepts);

    let required_score = ratio(matched_required.len(), required_concepts.len());
    let advanced_bonus = ratio(matched_advanced.len(), advanced_concepts.len());

    let final_score = match similarity {
        Some(sim) => {
            SIMILARITY_WEIGHT * sim
                + REQUIRED_WEIGHT * required_score
                + ADVANCED_WEIGHT * advanced_bonus
        }
        None => required_score,
    };

    ScoringResult {
        final_score: round2(final_score),
        required_concept_score: round2(required_score),
        advanced_bonus: round2(advanced_bonus),
        similarity_score: similarity.map(round2),
        matched_required,
        matched_advanced,
        total_required: required_concepts.len(),
        total_advanced: advanced_concepts.len(),
    }
}

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn matched_concepts(normalized_answer: &str, concepts: &[String]) -> Vec<String> {
    concepts
        .iter()
        .filter(|c| normalized_answer.contains(&c.to_lowercase()))
        .cloned()
        .collect()
}

fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concepts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keyword_only_matches_case_insensitively() {
        let required = concepts(&["Garbage Collection", "heap", "stack"]);
        let advanced = concepts(&["G1", "ZGC"]);
        let result = score(
            "The JVM uses garbage collection on the HEAP; g1 is the default.",
            &required,
            &advanced,
            None,
        );

        assert_eq!(result.matched_required, vec!["Garbage Collection", "heap"]);
        assert_eq!(result.matched_advanced, vec!["G1"]);
        assert_eq!(result.required_concept_score, 0.67);
        assert_eq!(result.advanced_bonus, 0.5);
        assert_eq!(result.total_required, 3);
        assert_eq!(result.total_advanced, 2);
        assert!(result.similarity_score.is_none());
    }

    #[test]
    fn without_similarity_final_equals_required() {
        let required = concepts(&["thread", "lock"]);
        let advanced = concepts(&["volatile"]);
        let result = score("a thread takes a lock, volatile too", &required, &advanced, None);
        assert_eq!(result.final_score, result.required_concept_score);
        assert_eq!(result.final_score, 1.0);
    }

    #[test]
    fn blended_formula() {
        let required = concepts(&["bean", "container"]);
        let result = score("a bean lives somewhere", &required, &[], Some(0.8));
        // round(0.6*0.8 + 0.3*0.5 + 0.1*0.0, 2)
        assert_eq!(result.required_concept_score, 0.5);
        assert_eq!(result.advanced_bonus, 0.0);
        assert_eq!(result.final_score, 0.63);
        assert_eq!(result.similarity_score, Some(0.8));
    }

    #[test]
    fn empty_required_concepts_score_zero() {
        let result = score("anything at all", &[], &concepts(&["anything"]), None);
        assert_eq!(result.required_concept_score, 0.0);
        assert_eq!(result.final_score, 0.0);
        assert_eq!(result.total_required, 0);
        assert_eq!(result.advanced_bonus, 1.0);
    }

    #[test]
    fn empty_advanced_concepts_never_divide() {
        let result = score("transaction isolation", &concepts(&["isolation"]), &[], Some(1.0));
        assert_eq!(result.advanced_bonus, 0.0);
        assert_eq!(result.total_advanced, 0);
        assert!(result.matched_advanced.is_empty());
        assert_eq!(result.final_score, 0.9);
    }

    #[test]
    fn empty_answer_matches_nothing() {
        let result = score("", &concepts(&["index"]), &concepts(&["b-tree"]), None);
        assert!(result.matched_required.is_empty());
        assert!(result.matched_advanced.is_empty());
        assert_eq!(result.final_score, 0.0);
    }

    #[test]
    fn substring_match_has_no_word_boundaries() {
        // "map" is found inside "HashMap"
        let result = score("I would use a HashMap", &concepts(&["map"]), &[], None);
        assert_eq!(result.matched_required, vec!["map"]);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let required = concepts(&["a", "b", "c"]);
        let advanced = concepts(&["d"]);
        for sim in [None, Some(0.0), Some(0.33), Some(1.0)] {
            for answer in ["", "a", "a b c d", "xyz"] {
                let r = score(answer, &required, &advanced, sim);
                for v in [r.final_score, r.required_concept_score, r.advanced_bonus] {
                    assert!((0.0..=1.0).contains(&v), "{v} out of range for {answer:?}/{sim:?}");
                }
                assert!(r.matched_required.iter().all(|c| required.contains(c)));
                assert!(r.matched_advanced.iter().all(|c| advanced.contains(c)));
            }
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let required = concepts(&["commit", "rollback"]);
        let a = score("commit then rollback", &required, &[], Some(0.42));
        let b = score("commit then rollback", &required, &[], Some(0.42));
        assert_eq!(a, b);
    }

    #[test]
    fn round2_half_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.5), 0.5);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(0.0), 0.0);
    }
}
