//! HTTP client for the embedding service's `/similarity` endpoint.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use interview_core::error::SimilarityError;
use interview_core::traits::SimilarityProvider;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Similarity provider backed by the embedding service.
pub struct HttpSimilarity {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpSimilarity {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base = if base_url.trim().is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url.trim_end_matches('/')
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base.to_string(),
            timeout,
            client,
        })
    }

    /// Client for the default local service with the default timeout.
    pub fn local() -> anyhow::Result<Self> {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, SimilarityError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SimilarityError::Api {
                status,
                message: body,
            });
        }

        response.json::<HealthStatus>().await.map_err(|e| {
            SimilarityError::InvalidResponse(format!("failed to parse health response: {e}"))
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> SimilarityError {
        if e.is_timeout() {
            SimilarityError::Timeout(self.timeout)
        } else if e.is_connect() {
            SimilarityError::Network(format!(
                "embedding service not reachable at {}",
                self.base_url
            ))
        } else {
            SimilarityError::Network(e.to_string())
        }
    }
}

#[derive(Serialize)]
struct SimilarityRequest<'a> {
    user_answer: &'a str,
    ideal_answer: &'a str,
}

#[derive(Deserialize)]
struct SimilarityResponse {
    similarity: f64,
}

/// Body of the embedding service's health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub ready: bool,
}

#[async_trait]
impl SimilarityProvider for HttpSimilarity {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip_all, fields(base_url = %self.base_url))]
    async fn similarity(
        &self,
        user_answer: &str,
        ideal_answer: &str,
    ) -> Result<f64, SimilarityError> {
        let body = SimilarityRequest {
            user_answer,
            ideal_answer,
        };

        let response = self
            .client
            .post(format!("{}/similarity", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SimilarityError::Api {
                status,
                message: body,
            });
        }

        let parsed: SimilarityResponse = response.json().await.map_err(|e| {
            SimilarityError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        tracing::debug!("similarity service returned {}", parsed.similarity);
        Ok(parsed.similarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn successful_similarity() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/similarity"))
            .and(body_json(serde_json::json!({
                "user_answer": "beans are managed objects",
                "ideal_answer": "A bean is an object managed by the container."
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "similarity": 0.8123,
                "user_answer": "beans are managed objects",
                "ideal_answer": "A bean is an object managed by the container."
            })))
            .mount(&server)
            .await;

        let provider = HttpSimilarity::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let value = provider
            .similarity(
                "beans are managed objects",
                "A bean is an object managed by the container.",
            )
            .await
            .unwrap();
        assert!((value - 0.8123).abs() < 1e-9);
    }

    #[tokio::test]
    async fn service_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/similarity"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Model not loaded yet"))
            .mount(&server)
            .await;

        let provider = HttpSimilarity::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = provider.similarity("a", "b").await.unwrap_err();
        assert!(matches!(err, SimilarityError::Api { status: 503, .. }));
        assert!(err.to_string().contains("Model not loaded yet"));
    }

    #[tokio::test]
    async fn malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/similarity"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = HttpSimilarity::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = provider.similarity("a", "b").await.unwrap_err();
        assert!(matches!(err, SimilarityError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/similarity"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"similarity": 0.5}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let provider = HttpSimilarity::new(&server.uri(), Duration::from_millis(100)).unwrap();
        let err = provider.similarity("a", "b").await.unwrap_err();
        assert!(matches!(err, SimilarityError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_service() {
        // Nothing listens on port 9 (discard) in the test environment.
        let provider =
            HttpSimilarity::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = provider.similarity("a", "b").await.unwrap_err();
        assert!(matches!(
            err,
            SimilarityError::Network(_) | SimilarityError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn health_check() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "model": "all-MiniLM-L6-v2",
                "ready": true
            })))
            .mount(&server)
            .await;

        let provider = HttpSimilarity::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        assert_eq!(provider.base_url(), server.uri());
        let health = provider.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.model, "all-MiniLM-L6-v2");
        assert!(health.ready);
    }

    #[test]
    fn blank_base_url_uses_default() {
        let provider = HttpSimilarity::new("  ", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
        assert_eq!(HttpSimilarity::local().unwrap().base_url(), DEFAULT_BASE_URL);
    }
}
