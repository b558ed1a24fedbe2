//! Community analysis module

pub mod cliques;
pub mod detection;
pub mod metrics;

use crate::graph::CollaborationGraph;
use serde::{Deserialize, Serialize};

/// A group of authors (connected component or detected community)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Position in the size-ordered list, 0 is the largest
    pub id: u32,

    /// Members of this community (node indices, ascending)
    pub members: Vec<u32>,

    /// Size of the community
    pub size: usize,

    /// Density: internal edges / potential edges
    pub density: f32,

    /// Members with the highest internal collaboration weight
    pub central_nodes: Vec<u32>,
}

impl Community {
    /// Author ids of the members
    pub fn member_ids<'a>(&self, graph: &'a CollaborationGraph) -> Vec<&'a str> {
        self.members
            .iter()
            .map(|&idx| graph.node(idx).id.as_str())
            .collect()
    }
}

/// Disjoint author groups covering every node of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Largest first
    pub communities: Vec<Community>,

    /// Modularity of the partition on the input graph
    pub modularity: f64,

    /// Aggregation levels performed
    pub levels: usize,
}

impl Partition {
    /// Author-id groups, largest first
    pub fn groups(&self, graph: &CollaborationGraph) -> Vec<Vec<String>> {
        self.communities
            .iter()
            .map(|c| c.member_ids(graph).into_iter().map(str::to_string).collect())
            .collect()
    }

    /// Community id of every node, indexed by node index
    pub fn membership(&self, node_count: usize) -> Vec<Option<u32>> {
        let mut membership = vec![None; node_count];
        for community in &self.communities {
            for &member in &community.members {
                membership[member as usize] = Some(community.id);
            }
        }
        membership
    }

    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }
}
