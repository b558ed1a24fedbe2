//! Core library functions for the co-authorship graph analyzer

pub mod analytics;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod storage;
pub mod viz;

pub use error::{AnalyzerError, Result};
