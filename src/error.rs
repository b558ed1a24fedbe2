//! Error types shared by the analysis pipeline

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("PageRank did not converge after {iterations} iterations (mean delta {mean_delta:.3e})")]
    NonConvergence { iterations: usize, mean_delta: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl AnalyzerError {
    pub(crate) fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound { kind, key: key.into() }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
