//! Graph construction module

use crate::data::{AuthorRecord, AuthorStore};
use crate::graph::collab::{AuthorNode, CollaborationGraph};
use std::collections::{BTreeMap, BTreeSet};

/// Builder that turns per-author publication sets into a CollaborationGraph
pub struct GraphBuilder {
    /// Pending authors keyed by id, so node indices follow id order
    authors: BTreeMap<String, AuthorRecord>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            authors: BTreeMap::new(),
        }
    }

    /// Seed a builder with every record of an AuthorStore
    pub fn from_store(store: &AuthorStore) -> Self {
        let mut builder = Self::new();
        for (id, record) in store.iter() {
            builder.add_author(id, record.clone());
        }
        builder
    }

    /// Register an author, replacing an earlier record with the same id
    pub fn add_author(&mut self, id: &str, record: AuthorRecord) {
        self.authors.insert(id.to_string(), record);
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// Build the collaboration graph
    ///
    /// Authors form a pool that shrinks by one per step: the last author is
    /// popped and intersected with every author still in the pool. Each
    /// non-empty intersection sets the weight on both endpoints, so a popped
    /// author's adjacency is complete and every unordered pair is compared
    /// exactly once.
    pub fn build(self) -> CollaborationGraph {
        let author_count = self.authors.len();
        log::info!("Building collaboration graph for {} authors", author_count);

        let mut graph = CollaborationGraph::with_capacity(author_count);
        let mut pool: Vec<(u32, BTreeSet<String>)> = Vec::with_capacity(author_count);

        for (id, record) in self.authors {
            let idx = graph.add_node(AuthorNode {
                id,
                name: record.name,
                affiliation: record.affiliation,
            });
            pool.push((idx, record.pubs));
        }

        let report_every = (author_count / 20).max(1);
        let mut processed = 0usize;
        let mut comparisons = 0u64;

        while let Some((idx, pubs)) = pool.pop() {
            processed += 1;
            if pubs.is_empty() {
                continue;
            }

            for (other, other_pubs) in &pool {
                comparisons += 1;
                let shared = shared_count(&pubs, other_pubs);
                if shared > 0 {
                    graph.insert_edge(idx, *other, shared);
                }
            }

            if processed % report_every == 0 {
                log::debug!("Processed {}/{} authors", processed, author_count);
            }
        }

        log::info!(
            "Built graph with {} nodes and {} edges ({} pairwise comparisons)",
            graph.node_count(),
            graph.edge_count(),
            comparisons
        );

        graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the collaboration graph for a whole AuthorStore
pub fn build_collaboration_graph(store: &AuthorStore) -> CollaborationGraph {
    GraphBuilder::from_store(store).build()
}

/// Size of the intersection of two publication sets
fn shared_count(a: &BTreeSet<String>, b: &BTreeSet<String>) -> u32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|key| large.contains(*key)).count() as u32
}
