//! interview-similarity — Semantic similarity clients for interview-core.
//!
//! Implements the `SimilarityProvider` trait against the embedding service
//! over HTTP, plus mock and disabled providers, and owns the TOML
//! configuration that wires them together.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{
    create_similarity, load_config, load_config_from, InterviewConfig, SimilarityConfig,
};
pub use interview_core::error::SimilarityError;
