//! Mock and disabled similarity providers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use interview_core::error::SimilarityError;
use interview_core::traits::SimilarityProvider;

/// A mock similarity provider for exercising the orchestrator without a
/// running embedding service.
///
/// Returns configurable scores based on answer content matching.
pub struct MockSimilarity {
    /// Map of answer substring → similarity.
    responses: HashMap<String, f64>,
    /// Score if no answer matches. `None` makes the call fail.
    default_score: Option<f64>,
    /// Artificial latency before answering.
    delay: Option<Duration>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last (user_answer, ideal_answer) pair received.
    last_request: Mutex<Option<(String, String)>>,
}

impl MockSimilarity {
    /// Create a mock with the given answer-substring → score mappings.
    pub fn new(responses: HashMap<String, f64>, default_score: f64) -> Self {
        Self {
            responses,
            default_score: Some(default_score),
            delay: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same score.
    pub fn with_fixed_score(score: f64) -> Self {
        Self::new(HashMap::new(), score)
    }

    /// Create a mock whose every call fails as if the service were down.
    pub fn unavailable() -> Self {
        Self {
            default_score: None,
            ..Self::with_fixed_score(0.0)
        }
    }

    /// Delay every answer by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<(String, String)> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl SimilarityProvider for MockSimilarity {
    fn name(&self) -> &str {
        "mock"
    }

    async fn similarity(
        &self,
        user_answer: &str,
        ideal_answer: &str,
    ) -> Result<f64, SimilarityError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some((user_answer.to_string(), ideal_answer.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let matched = self
            .responses
            .iter()
            .find(|(key, _)| user_answer.contains(key.as_str()))
            .map(|(_, v)| *v);

        matched
            .or(self.default_score)
            .ok_or_else(|| SimilarityError::Network("mock similarity service is down".into()))
    }
}

/// Provider used when similarity scoring is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSimilarity;

#[async_trait]
impl SimilarityProvider for DisabledSimilarity {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn similarity(&self, _: &str, _: &str) -> Result<f64, SimilarityError> {
        Err(SimilarityError::Disabled)
    }
}
