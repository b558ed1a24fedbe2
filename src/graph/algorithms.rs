//! Graph algorithms for analysis

use crate::cluster::detection::connected_components;
use crate::graph::CollaborationGraph;
use std::collections::HashSet;

/// Extract the subgraph induced by a set of author ids
///
/// Unknown ids are ignored. Edges are kept only when both endpoints are in
/// the set, with their weights unchanged.
pub fn induced_subgraph<S: AsRef<str>>(graph: &CollaborationGraph, ids: &[S]) -> CollaborationGraph {
    let keep: HashSet<u32> = ids
        .iter()
        .filter_map(|id| graph.index_of(id.as_ref()))
        .collect();
    induced_by_index(graph, |idx| keep.contains(&idx))
}

/// Keep only authors with at least `min_degree` coauthors
pub fn filter_by_min_degree(graph: &CollaborationGraph, min_degree: usize) -> CollaborationGraph {
    let filtered = induced_by_index(graph, |idx| graph.degree(idx) >= min_degree);
    log::info!(
        "Filtered graph to {} of {} authors with at least {} coauthors",
        filtered.node_count(),
        graph.node_count(),
        min_degree
    );
    filtered
}

/// Subgraph of the largest connected component
pub fn largest_component(graph: &CollaborationGraph) -> CollaborationGraph {
    let components = connected_components(graph, 1, 0);
    match components.first() {
        Some(component) => {
            log::info!(
                "Largest component holds {} of {} authors",
                component.size,
                graph.node_count()
            );
            let ids: Vec<&str> = component
                .members
                .iter()
                .map(|&idx| graph.node(idx).id.as_str())
                .collect();
            induced_subgraph(graph, &ids)
        }
        None => CollaborationGraph::default(),
    }
}

/// Nodes are visited in index order, so the subgraph keeps the id ordering
fn induced_by_index<F>(graph: &CollaborationGraph, keep: F) -> CollaborationGraph
where
    F: Fn(u32) -> bool,
{
    let mut sub = CollaborationGraph::with_capacity(graph.node_count());
    let mut orig_to_sub = vec![u32::MAX; graph.node_count()];

    for (idx, node) in graph.nodes() {
        if keep(idx) {
            orig_to_sub[idx as usize] = sub.add_node(node.clone());
        }
    }

    for (a, b, w) in graph.edges() {
        let (sa, sb) = (orig_to_sub[a as usize], orig_to_sub[b as usize]);
        if sa != u32::MAX && sb != u32::MAX {
            sub.insert_edge(sa, sb, w);
        }
    }

    sub
}
