//! Weighted PageRank over the collaboration graph
//!
//! Every author starts at `1/N`. One pass computes, from the previous table
//! only,
//!
//! ```text
//! new(a) = (1 - d) * wdeg(a) / W  +  d * Σ_{c ∈ coauthors(a)} prev(c) / wdeg(c)
//! ```
//!
//! where `wdeg` is the sum of incident edge weights and `W = Σ wdeg` over all
//! authors. Iteration stops once the mean absolute change drops below
//! `alpha`. Ranks are not renormalised between passes.

use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use crate::graph::CollaborationGraph;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// PageRank configuration
#[derive(Debug, Clone, Copy)]
pub struct PageRankConfig {
    /// Damping factor, in (0, 1)
    pub damping: f64,
    /// Convergence threshold on the mean absolute rank change
    pub alpha: f64,
    /// Iteration cap; exceeding it is reported as NonConvergence
    pub max_iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            alpha: 0.0005,
            max_iterations: 1000,
        }
    }
}

impl From<&Config> for PageRankConfig {
    fn from(config: &Config) -> Self {
        Self {
            damping: config.damping,
            alpha: config.alpha,
            max_iterations: config.max_iterations,
        }
    }
}

/// Author id -> rank, produced by one PageRank run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankTable {
    ranks: HashMap<String, f64>,
    /// Passes performed until convergence
    pub iterations: usize,
    /// Mean absolute change of the last pass
    pub mean_delta: f64,
}

impl RankTable {
    pub fn get(&self, id: &str) -> Option<f64> {
        self.ranks.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ranks.iter().map(|(id, &r)| (id.as_str(), r))
    }

    /// Authors by descending rank, ties broken by id
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        self.iter()
            .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            .collect()
    }

    pub fn sum(&self) -> f64 {
        self.ranks.values().sum()
    }
}

/// Compute the weighted PageRank of every author
pub fn page_rank(graph: &CollaborationGraph, config: &PageRankConfig) -> Result<RankTable> {
    if !(config.damping > 0.0 && config.damping < 1.0) {
        return Err(AnalyzerError::invalid(format!(
            "damping factor must be in (0, 1), got {}",
            config.damping
        )));
    }
    if !(config.alpha > 0.0) {
        return Err(AnalyzerError::invalid(format!(
            "convergence threshold must be positive, got {}",
            config.alpha
        )));
    }
    if config.max_iterations == 0 {
        return Err(AnalyzerError::invalid("max_iterations must be at least 1"));
    }

    let n = graph.node_count();
    let weighted_degree: Vec<f64> = (0..n as u32)
        .map(|idx| graph.weighted_degree(idx) as f64)
        .collect();
    let total_weight: f64 = weighted_degree.iter().sum();

    if n == 0 || total_weight == 0.0 {
        return Err(AnalyzerError::invalid(
            "PageRank needs a graph with at least one weighted edge",
        ));
    }

    log::info!(
        "Running PageRank on {} authors (d = {}, alpha = {})",
        n,
        config.damping,
        config.alpha
    );

    let d = config.damping;
    let teleport: Vec<f64> = weighted_degree
        .iter()
        .map(|w| (1.0 - d) * w / total_weight)
        .collect();

    let mut ranks = vec![1.0 / n as f64; n];
    let mut next_ranks = vec![0.0; n];
    let mut mean_delta = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let mut total_delta = 0.0;

        for idx in 0..n {
            let mut propagated = 0.0;
            for (coauthor, _) in graph.neighbors(idx as u32) {
                let coauthor_weight = weighted_degree[coauthor as usize];
                if coauthor_weight == 0.0 {
                    return Err(AnalyzerError::invalid(format!(
                        "coauthor {} of {} has zero total weight",
                        graph.node(coauthor).id,
                        graph.node(idx as u32).id
                    )));
                }
                propagated += ranks[coauthor as usize] / coauthor_weight;
            }

            next_ranks[idx] = teleport[idx] + d * propagated;
            total_delta += (next_ranks[idx] - ranks[idx]).abs();
        }

        std::mem::swap(&mut ranks, &mut next_ranks);
        mean_delta = total_delta / n as f64;
        log::debug!("PageRank iteration {}: mean delta {:.3e}", iteration, mean_delta);

        if mean_delta < config.alpha {
            log::info!(
                "PageRank converged after {} iterations (mean delta {:.3e})",
                iteration,
                mean_delta
            );
            let ranks = graph
                .nodes()
                .map(|(idx, node)| (node.id.clone(), ranks[idx as usize]))
                .collect();
            return Ok(RankTable {
                ranks,
                iterations: iteration,
                mean_delta,
            });
        }
    }

    log::warn!(
        "PageRank stopped after {} iterations without converging",
        config.max_iterations
    );
    Err(AnalyzerError::NonConvergence {
        iterations: config.max_iterations,
        mean_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AuthorRecord, AuthorStore};
    use crate::graph::build_collaboration_graph;

    fn graph_of(entries: &[(&str, &[&str])]) -> CollaborationGraph {
        let store: AuthorStore = entries
            .iter()
            .map(|(id, pubs)| (*id, AuthorRecord::new(id, "", pubs.iter().copied())))
            .collect();
        build_collaboration_graph(&store)
    }

    fn triangle() -> CollaborationGraph {
        graph_of(&[("a", &["p1", "p3"]), ("b", &["p1", "p2"]), ("c", &["p2", "p3"])])
    }

    #[test]
    fn triangle_converges_to_equal_positive_ranks() {
        let table = page_rank(&triangle(), &PageRankConfig::default()).unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.iterations < 100);
        let ra = table.get("a").unwrap();
        for id in ["a", "b", "c"] {
            let r = table.get(id).unwrap();
            assert!(r.is_finite() && r > 0.0);
            assert!((r - ra).abs() < 1e-9);
        }
        assert!((ra - 1.0 / 3.0).abs() < 1e-3);
    }

    fn star() -> CollaborationGraph {
        graph_of(&[
            ("hub", &["p1", "p2", "p3"]),
            ("x", &["p1"]),
            ("y", &["p2"]),
            ("z", &["p3"]),
        ])
    }

    #[test]
    fn hub_outranks_leaves() {
        let g = star();
        let table = page_rank(&g, &PageRankConfig::default()).unwrap();

        let ranked = table.ranked();
        assert_eq!(ranked[0].0, "hub");
        assert!(ranked[0].1 > ranked[1].1);
        assert!((ranked[0].1 - 0.5).abs() < 1e-2);
        assert!((table.sum() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn coauthor_mass_is_split_by_weight_sum() {
        // a-b weight 2, b-c weight 1: one pass from the uniform prior
        let g = graph_of(&[("a", &["p1", "p2"]), ("b", &["p1", "p2", "p3"]), ("c", &["p3"])]);
        let config = PageRankConfig {
            damping: 0.85,
            alpha: 10.0,
            max_iterations: 1,
        };
        let table = page_rank(&g, &config).unwrap();

        let third = 1.0 / 3.0;
        let total = 6.0;
        let expected_a = 0.15 * 2.0 / total + 0.85 * (third / 3.0);
        let expected_b = 0.15 * 3.0 / total + 0.85 * (third / 2.0 + third / 1.0);
        let expected_c = 0.15 * 1.0 / total + 0.85 * (third / 3.0);
        assert!((table.get("a").unwrap() - expected_a).abs() < 1e-12);
        assert!((table.get("b").unwrap() - expected_b).abs() < 1e-12);
        assert!((table.get("c").unwrap() - expected_c).abs() < 1e-12);
    }

    #[test]
    fn isolated_authors_decay_to_zero() {
        let g = graph_of(&[("a", &["p1"]), ("b", &["p1"]), ("loner", &["p7"])]);
        let table = page_rank(&g, &PageRankConfig::default()).unwrap();
        assert_eq!(table.get("loner"), Some(0.0));
    }

    #[test]
    fn graph_without_edges_is_invalid() {
        let g = graph_of(&[("a", &["p1"]), ("b", &["p2"])]);
        let err = page_rank(&g, &PageRankConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidInput(_)));

        let err = page_rank(&CollaborationGraph::default(), &PageRankConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidInput(_)));
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let config = PageRankConfig {
            damping: 0.85,
            alpha: 1e-12,
            max_iterations: 3,
        };
        let err = page_rank(&star(), &config).unwrap_err();
        assert!(matches!(err, AnalyzerError::NonConvergence { iterations: 3, .. }));
    }

    #[test]
    fn rejects_bad_damping() {
        let config = PageRankConfig {
            damping: 1.0,
            ..PageRankConfig::default()
        };
        assert!(page_rank(&triangle(), &config).is_err());
    }

    #[test]
    fn zero_iteration_cap_is_invalid() {
        let config = PageRankConfig {
            max_iterations: 0,
            ..PageRankConfig::default()
        };
        let err = page_rank(&triangle(), &config).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidInput(_)));
    }

    fn dense_store() -> AuthorStore {
        (0..40usize)
            .map(|a| {
                let id = format!("author{:02}", a);
                let pubs: Vec<String> = (0..120usize)
                    .filter(|p| (p * 7 + a) % 9 == 0 || (p + a) % 13 == 0)
                    .map(|p| format!("p{}", p))
                    .collect();
                let record = AuthorRecord::new(&id, "", pubs);
                (id, record)
            })
            .collect()
    }

    #[test]
    fn rebuilt_graph_gives_bitwise_identical_ranks() {
        let store = dense_store();
        let reference = page_rank(&build_collaboration_graph(&store), &PageRankConfig::default()).unwrap();

        for _ in 0..10 {
            let table = page_rank(&build_collaboration_graph(&store), &PageRankConfig::default()).unwrap();
            assert_eq!(table.iterations, reference.iterations);
            for (id, rank) in reference.iter() {
                assert_eq!(table.get(id).unwrap().to_bits(), rank.to_bits(), "rank of {}", id);
            }
        }
    }
}
