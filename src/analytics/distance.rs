//! Collaboration distance ("Erdos number") from one source author

use crate::error::{AnalyzerError, Result};
use crate::graph::CollaborationGraph;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Author id -> hop count from `source`; unreachable authors are absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceTable {
    pub source: String,
    distances: HashMap<String, u32>,
}

impl DistanceTable {
    pub fn get(&self, id: &str) -> Option<u32> {
        self.distances.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.distances.iter().map(|(id, &d)| (id.as_str(), d))
    }

    /// Authors by ascending distance, ties broken by id
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        self.iter()
            .sorted_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
            .collect()
    }

    /// Largest finite distance from the source
    pub fn eccentricity(&self) -> u32 {
        self.distances.values().copied().max().unwrap_or(0)
    }
}

/// Breadth-first hop counts from `source` to every reachable author
///
/// Edge weights are ignored. A node is locked in when first dequeued; later
/// queue entries for it are dropped, and FIFO order guarantees the first
/// dequeue carries the minimal distance.
pub fn collaboration_distances(graph: &CollaborationGraph, source: &str) -> Result<DistanceTable> {
    let start = graph
        .index_of(source)
        .ok_or_else(|| AnalyzerError::not_found("author", source))?;

    let mut distance: Vec<Option<u32>> = vec![None; graph.node_count()];
    let mut queue = VecDeque::new();
    queue.push_back((start, 0u32));

    while let Some((idx, hops)) = queue.pop_front() {
        if distance[idx as usize].is_some() {
            continue;
        }
        distance[idx as usize] = Some(hops);

        for (coauthor, _) in graph.neighbors(idx) {
            if distance[coauthor as usize].is_none() {
                queue.push_back((coauthor, hops + 1));
            }
        }
    }

    let distances: HashMap<String, u32> = distance
        .iter()
        .enumerate()
        .filter_map(|(idx, d)| d.map(|d| (graph.node(idx as u32).id.clone(), d)))
        .collect();

    log::info!(
        "Reached {} of {} authors from {}",
        distances.len(),
        graph.node_count(),
        source
    );

    Ok(DistanceTable {
        source: source.to_string(),
        distances,
    })
}
