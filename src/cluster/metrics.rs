//! Graph and community statistics

use crate::cluster::Partition;
use crate::graph::algorithms::induced_subgraph;
use crate::graph::CollaborationGraph;
use itertools::Itertools;
use petgraph::algo::dijkstra;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashSet};

/// An author paired with a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorScore {
    pub id: String,
    pub name: String,
    pub value: f64,
}

/// One entry of the degree distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeBucket {
    pub degree: usize,
    pub count: usize,
    pub probability: f64,
}

/// Summary metrics of a collaboration graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    /// Number of authors
    pub n: usize,
    /// Number of collaboration edges
    pub m: usize,
    /// Total collaboration weight
    pub size: u64,
    pub av_degree: f64,
    pub density: f64,
    pub max_degree: Option<AuthorScore>,
    /// Most probable degree
    pub max_degree_p: Option<DegreeBucket>,
    pub clustering_coefficient: f64,
    pub max_closeness: Option<AuthorScore>,
}

/// Calculate the summary metrics of a graph
pub fn calculate_metrics(graph: &CollaborationGraph) -> GraphMetrics {
    let n = graph.node_count();
    let m = graph.edge_count();
    log::info!("Calculating metrics for graph with {} nodes and {} edges", n, m);

    let av_degree = if n > 0 { 2.0 * m as f64 / n as f64 } else { 0.0 };
    let density = if n > 1 {
        2.0 * m as f64 / (n as f64 * (n - 1) as f64)
    } else {
        0.0
    };

    let max_degree = graph
        .nodes()
        .max_by(|a, b| graph.degree(a.0).cmp(&graph.degree(b.0)).then_with(|| b.1.id.cmp(&a.1.id)))
        .map(|(idx, node)| AuthorScore {
            id: node.id.clone(),
            name: node.name.clone(),
            value: graph.degree(idx) as f64,
        });

    let max_degree_p = degree_distribution(graph)
        .into_iter()
        .fold(None, |best: Option<DegreeBucket>, bucket| match best {
            Some(b) if b.probability >= bucket.probability => Some(b),
            _ => Some(bucket),
        });

    let closeness = closeness_centrality(graph);
    let max_closeness = top_scores(graph, &closeness, 1).into_iter().next();

    GraphMetrics {
        n,
        m,
        size: graph.total_weight(),
        av_degree,
        density,
        max_degree,
        max_degree_p,
        clustering_coefficient: average_clustering(graph),
        max_closeness,
    }
}

/// Number and share of authors per degree, for every degree up to the maximum
pub fn degree_distribution(graph: &CollaborationGraph) -> Vec<DegreeBucket> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let degrees: Vec<usize> = graph.nodes().map(|(idx, _)| graph.degree(idx)).collect();
    let max = degrees.iter().copied().max().unwrap_or(0);
    let mut counts = vec![0usize; max + 1];
    for d in degrees {
        counts[d] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(degree, count)| DegreeBucket {
            degree,
            count,
            probability: count as f64 / n as f64,
        })
        .collect()
}

/// Local clustering coefficient of every author (unweighted)
pub fn local_clustering(graph: &CollaborationGraph) -> Vec<f64> {
    graph
        .nodes()
        .map(|(idx, _)| {
            let k = graph.degree(idx);
            if k < 2 {
                return 0.0;
            }
            let neighbors: Vec<u32> = graph.neighbors(idx).map(|(n, _)| n).collect();
            let links = neighbors
                .iter()
                .tuple_combinations()
                .filter(|&(&u, &v)| graph.weight(u, v).is_some())
                .count();
            2.0 * links as f64 / (k * (k - 1)) as f64
        })
        .collect()
}

/// Mean of the local clustering coefficients
pub fn average_clustering(graph: &CollaborationGraph) -> f64 {
    if graph.is_empty() {
        return 0.0;
    }
    local_clustering(graph).iter().mean()
}

/// Closeness centrality scaled by the reachable fraction of the graph
///
/// `((r - 1) / Σ d) * ((r - 1) / (n - 1))` with `r` the number of authors
/// reachable from the node (itself included), hop distances only.
pub fn closeness_centrality(graph: &CollaborationGraph) -> Vec<f64> {
    let network = graph.to_petgraph();
    let n = network.node_count();

    network
        .node_indices()
        .map(|source| {
            let distances = dijkstra(&network, source, None, |_| 1u64);
            let reachable = distances.len();
            let total: u64 = distances.values().sum();
            if total == 0 || n < 2 {
                return 0.0;
            }
            let r = (reachable - 1) as f64;
            (r / total as f64) * (r / (n - 1) as f64)
        })
        .collect()
}

/// Mean closeness of the authors sharing each degree, by ascending degree
///
/// Only degrees that occur in the graph are listed.
pub fn closeness_by_degree(graph: &CollaborationGraph, closeness: &[f64]) -> Vec<(usize, f64)> {
    let mut by_degree: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for (idx, _) in graph.nodes() {
        by_degree
            .entry(graph.degree(idx))
            .or_default()
            .push(closeness[idx as usize]);
    }

    by_degree
        .into_iter()
        .map(|(degree, values)| (degree, values.iter().mean()))
        .collect()
}

/// Highest `limit` scores, ties broken by author id
pub fn top_scores(graph: &CollaborationGraph, scores: &[f64], limit: usize) -> Vec<AuthorScore> {
    graph
        .nodes()
        .map(|(idx, node)| (node, scores[idx as usize]))
        .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)))
        .take(limit)
        .map(|(node, value)| AuthorScore {
            id: node.id.clone(),
            name: node.name.clone(),
            value,
        })
        .collect()
}

/// Density of a member set: internal edges / potential edges
pub fn community_density(graph: &CollaborationGraph, members: &[u32]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton communities have density 1
    }

    let member_set: HashSet<u32> = members.iter().copied().collect();
    let internal_edges: usize = members
        .iter()
        .map(|&idx| {
            graph
                .neighbors(idx)
                .filter(|(other, _)| *other > idx && member_set.contains(other))
                .count()
        })
        .sum();

    (2 * internal_edges) as f32 / (n * (n - 1)) as f32
}

/// Members with the highest collaboration weight towards other members
pub fn central_authors(graph: &CollaborationGraph, members: &[u32], top_n: usize) -> Vec<u32> {
    let member_set: HashSet<u32> = members.iter().copied().collect();

    members
        .iter()
        .map(|&idx| {
            let internal: u64 = graph
                .neighbors(idx)
                .filter(|(other, _)| member_set.contains(other))
                .map(|(_, w)| w as u64)
                .sum();
            (idx, internal)
        })
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(top_n)
        .map(|(idx, _)| idx)
        .collect()
}

/// Descriptive statistics of one metric across communities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }
        let std_dev = if values.len() > 1 { values.iter().std_dev() } else { 0.0 };
        Self {
            count: values.len(),
            mean: values.iter().mean(),
            std_dev,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        }
    }
}

/// Metrics of one community's induced subgraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityMetrics {
    pub id: u32,
    pub central_authors: Vec<String>,
    pub metrics: GraphMetrics,
}

/// Per-community metrics plus their spread across the partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityReport {
    pub modularity: f64,
    pub communities: Vec<CommunityMetrics>,
    pub size: Summary,
    pub density: Summary,
    pub av_degree: Summary,
    pub clustering_coefficient: Summary,
}

/// Compute metrics for every community with at least `min_size` members
pub fn community_report(graph: &CollaborationGraph, partition: &Partition, min_size: usize) -> CommunityReport {
    let communities: Vec<CommunityMetrics> = partition
        .communities
        .iter()
        .filter(|c| c.size >= min_size)
        .map(|c| {
            let subgraph = induced_subgraph(graph, &c.member_ids(graph));
            CommunityMetrics {
                id: c.id,
                central_authors: c
                    .central_nodes
                    .iter()
                    .map(|&idx| graph.node(idx).id.clone())
                    .collect(),
                metrics: calculate_metrics(&subgraph),
            }
        })
        .collect();

    let column = |f: fn(&GraphMetrics) -> f64| -> Vec<f64> {
        communities.iter().map(|c| f(&c.metrics)).collect()
    };

    CommunityReport {
        modularity: partition.modularity,
        size: Summary::of(&column(|m| m.size as f64)),
        density: Summary::of(&column(|m| m.density)),
        av_degree: Summary::of(&column(|m| m.av_degree)),
        clustering_coefficient: Summary::of(&column(|m| m.clustering_coefficient)),
        communities,
    }
}
