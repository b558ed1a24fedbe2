//! Weighted, undirected co-authorship graph

use crate::error::{AnalyzerError, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Node payload: author identity and display data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorNode {
    pub id: String,
    pub name: String,
    pub affiliation: String,
}

/// Undirected co-authorship graph with shared-publication counts as weights
///
/// Nodes are addressed by dense `u32` indices assigned in ascending id order.
/// Adjacency maps are ordered by neighbor index, so every traversal (and any
/// floating-point sum over it) is the same from one build to the next. Both
/// directions of an edge are always written together so the stored weights
/// are symmetric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphSnapshot", into = "GraphSnapshot")]
pub struct CollaborationGraph {
    nodes: Vec<AuthorNode>,
    index: HashMap<String, u32>,
    adjacency: Vec<BTreeMap<u32, u32>>,
}

impl CollaborationGraph {
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            index: HashMap::with_capacity(node_count),
            adjacency: Vec::with_capacity(node_count),
        }
    }

    /// Append a node, returning its index (or the existing index for a known id)
    pub(crate) fn add_node(&mut self, node: AuthorNode) -> u32 {
        if let Some(&idx) = self.index.get(&node.id) {
            return idx;
        }
        let idx = self.nodes.len() as u32;
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        self.adjacency.push(BTreeMap::new());
        idx
    }

    /// Set the weight of the undirected edge (a, b) on both sides at once
    pub(crate) fn insert_edge(&mut self, a: u32, b: u32, weight: u32) {
        debug_assert!(a != b, "self-loop on node {}", a);
        debug_assert!(weight > 0, "zero-weight edge ({}, {})", a, b);
        self.adjacency[a as usize].insert(b, weight);
        self.adjacency[b as usize].insert(a, weight);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: u32) -> &AuthorNode {
        &self.nodes[idx as usize]
    }

    pub fn index_of(&self, id: &str) -> Option<u32> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate over all nodes with their indices
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &AuthorNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Coauthors of a node with the shared-publication count, by ascending index
    pub fn neighbors(&self, idx: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.adjacency[idx as usize].iter().map(|(&n, &w)| (n, w))
    }

    /// Weight of the edge (a, b), `None` when they never published together
    pub fn weight(&self, a: u32, b: u32) -> Option<u32> {
        self.adjacency[a as usize].get(&b).copied()
    }

    /// Number of coauthors
    pub fn degree(&self, idx: u32) -> usize {
        self.adjacency[idx as usize].len()
    }

    /// Sum of the weights of all edges incident to a node
    pub fn weighted_degree(&self, idx: u32) -> u64 {
        self.adjacency[idx as usize].values().map(|&w| w as u64).sum()
    }

    /// Sum of all edge weights, each undirected edge counted once
    pub fn total_weight(&self) -> u64 {
        self.edges().map(|(_, _, w)| w as u64).sum()
    }

    /// Every undirected edge once, as (lower index, higher index, weight)
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, adj)| {
            let a = a as u32;
            adj.iter()
                .filter(move |&(&b, _)| a < b)
                .map(move |(&b, &w)| (a, b, w))
        })
    }

    /// Same graph as a petgraph `UnGraph`; node index `i` maps to `NodeIndex::new(i)`
    pub fn to_petgraph(&self) -> UnGraph<AuthorNode, u32> {
        let mut graph = UnGraph::with_capacity(self.node_count(), self.edge_count());
        for node in &self.nodes {
            graph.add_node(node.clone());
        }
        for (a, b, w) in self.edges() {
            graph.add_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), w);
        }
        graph
    }

    /// Serializable nested-map view `{id: {name, affiliation, pubs: {coauthor: {weight}}}}`
    pub fn to_snapshot(&self) -> GraphSnapshot {
        self.nodes
            .iter()
            .zip(&self.adjacency)
            .map(|(node, adj)| {
                let pubs = adj
                    .iter()
                    .map(|(&n, &weight)| (self.nodes[n as usize].id.clone(), SnapshotEdge { weight }))
                    .collect();
                (
                    node.id.clone(),
                    SnapshotAuthor {
                        name: node.name.clone(),
                        affiliation: node.affiliation.clone(),
                        pubs,
                    },
                )
            })
            .collect()
    }

    /// Rebuild a graph from a snapshot, checking the structural invariants
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let mut graph = Self::with_capacity(snapshot.len());
        for (id, author) in &snapshot {
            graph.add_node(AuthorNode {
                id: id.clone(),
                name: author.name.clone(),
                affiliation: author.affiliation.clone(),
            });
        }

        for (id, author) in &snapshot {
            for (coauthor, edge) in &author.pubs {
                if coauthor == id {
                    return Err(AnalyzerError::invalid(format!("self-loop on {}", id)));
                }
                if edge.weight == 0 {
                    return Err(AnalyzerError::invalid(format!(
                        "zero-weight edge between {} and {}",
                        id, coauthor
                    )));
                }
                let reverse = snapshot
                    .get(coauthor)
                    .ok_or_else(|| {
                        AnalyzerError::invalid(format!("{} lists unknown coauthor {}", id, coauthor))
                    })?
                    .pubs
                    .get(id)
                    .map(|e| e.weight);
                if reverse != Some(edge.weight) {
                    return Err(AnalyzerError::invalid(format!(
                        "asymmetric edge between {} and {}",
                        id, coauthor
                    )));
                }
                if id < coauthor {
                    let a = graph.index[id];
                    let b = graph.index[coauthor];
                    graph.insert_edge(a, b, edge.weight);
                }
            }
        }

        Ok(graph)
    }
}

impl PartialEq for CollaborationGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.adjacency == other.adjacency
    }
}

/// Persisted form of a CollaborationGraph, keyed by author id
pub type GraphSnapshot = BTreeMap<String, SnapshotAuthor>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotAuthor {
    pub name: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub pubs: BTreeMap<String, SnapshotEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub weight: u32,
}

impl TryFrom<GraphSnapshot> for CollaborationGraph {
    type Error = AnalyzerError;

    fn try_from(snapshot: GraphSnapshot) -> Result<Self> {
        Self::from_snapshot(snapshot)
    }
}

impl From<CollaborationGraph> for GraphSnapshot {
    fn from(graph: CollaborationGraph) -> Self {
        graph.to_snapshot()
    }
}
