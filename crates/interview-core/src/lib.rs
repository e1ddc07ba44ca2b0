//! interview-core — Evaluation and session engine for mock technical interviews.
//!
//! This crate defines the data model, the collaborator traits, the scoring
//! engine, the evaluation orchestrator and the session manager that the rest
//! of the workspace builds on.

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod report;
pub mod scoring;
pub mod session;
pub mod store;
pub mod traits;

pub use error::{InterviewError, SimilarityError};
