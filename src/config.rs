//! Configuration management for the collaboration graph analyzer

use crate::error::{AnalyzerError, Result};

/// Default configuration for the collaboration graph analyzer
#[derive(Debug, Clone)]
pub struct Config {
    /// PageRank damping factor, strictly between 0 and 1
    pub damping: f64,

    /// Mean absolute rank change below which PageRank stops
    pub alpha: f64,

    /// Upper bound on PageRank iterations
    pub max_iterations: usize,

    /// Host used to build public profile links
    pub profile_host: String,

    /// Louvain resolution parameter
    pub resolution: f64,

    /// Upper bound on Louvain local-moving passes per level
    pub max_passes: usize,

    /// Smallest clique reported
    pub min_clique_size: usize,

    /// Central authors listed per community
    pub central_nodes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: 0.85,
            alpha: 0.0005,
            max_iterations: 1000,
            profile_host: "dblp.org".to_string(),
            resolution: 1.0,
            max_passes: 100,
            min_clique_size: 4,
            central_nodes: 5,
        }
    }
}

impl Config {
    /// Create a new configuration with custom PageRank values
    pub fn new(damping: f64, alpha: f64, max_iterations: usize) -> Self {
        Self {
            damping,
            alpha,
            max_iterations,
            ..Self::default()
        }
    }

    /// Reject parameter combinations the solvers cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(AnalyzerError::invalid(format!(
                "damping factor must be in (0, 1), got {}",
                self.damping
            )));
        }
        if !(self.alpha > 0.0) {
            return Err(AnalyzerError::invalid(format!(
                "convergence threshold must be positive, got {}",
                self.alpha
            )));
        }
        if self.max_iterations == 0 {
            return Err(AnalyzerError::invalid("max_iterations must be at least 1"));
        }
        if !(self.resolution > 0.0) {
            return Err(AnalyzerError::invalid(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.damping, 0.85);
        assert_eq!(config.alpha, 0.0005);
    }

    #[test]
    fn rejects_out_of_range_damping() {
        for d in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let config = Config::new(d, 0.0005, 100);
            assert!(matches!(config.validate(), Err(AnalyzerError::InvalidInput(_))));
        }
    }

    #[test]
    fn rejects_non_positive_alpha() {
        let config = Config::new(0.85, 0.0, 100);
        assert!(config.validate().is_err());
    }
}
