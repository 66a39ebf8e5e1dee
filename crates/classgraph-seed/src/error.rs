//! Error types for the classgraph-seed crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Unknown seed step: {0}")]
    UnknownStep(String),

    #[error("Seed step {step} failed: {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Graph error: {0}")]
    Graph(#[from] classgraph_graph::GraphError),
}

pub type Result<T> = std::result::Result<T, SeedError>;
