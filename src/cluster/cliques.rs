//! Maximal clique enumeration

use crate::graph::CollaborationGraph;
use std::collections::BTreeSet;

/// Every maximal clique with at least `min_size` authors
///
/// Bron–Kerbosch with pivoting. Cliques are returned largest first, each
/// with ascending node indices.
pub fn maximal_cliques(graph: &CollaborationGraph, min_size: usize) -> Vec<Vec<u32>> {
    log::info!("Enumerating maximal cliques with {} or more authors", min_size);

    let candidates: BTreeSet<u32> = graph.nodes().map(|(idx, _)| idx).collect();
    let mut cliques = Vec::new();
    let mut current = Vec::new();

    expand(graph, &mut current, candidates, BTreeSet::new(), min_size, &mut cliques);

    for clique in cliques.iter_mut() {
        clique.sort_unstable();
    }
    cliques.sort_by(|a: &Vec<u32>, b: &Vec<u32>| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    log::info!("Found {} maximal cliques", cliques.len());
    cliques
}

fn expand(
    graph: &CollaborationGraph,
    current: &mut Vec<u32>,
    mut candidates: BTreeSet<u32>,
    mut excluded: BTreeSet<u32>,
    min_size: usize,
    cliques: &mut Vec<Vec<u32>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() && current.len() >= min_size && !current.is_empty() {
            cliques.push(current.clone());
        }
        return;
    }

    // Prune branches that can no longer reach the minimum size
    if current.len() + candidates.len() < min_size {
        return;
    }

    let adjacent = |a: u32, b: u32| graph.weight(a, b).is_some();

    let pivot = candidates
        .iter()
        .chain(excluded.iter())
        .copied()
        .max_by_key(|&u| candidates.iter().filter(|&&v| adjacent(u, v)).count())
        .unwrap_or_default();

    let branch: Vec<u32> = candidates
        .iter()
        .copied()
        .filter(|&v| !adjacent(pivot, v))
        .collect();

    for v in branch {
        current.push(v);
        let next_candidates = candidates.iter().copied().filter(|&w| adjacent(v, w)).collect();
        let next_excluded = excluded.iter().copied().filter(|&w| adjacent(v, w)).collect();
        expand(graph, current, next_candidates, next_excluded, min_size, cliques);
        current.pop();

        candidates.remove(&v);
        excluded.insert(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AuthorRecord, AuthorStore};
    use crate::graph::build_collaboration_graph;

    /// K4 on a-b-c-d (one shared paper) plus pendant e on d and isolated f
    fn k4_with_tail() -> CollaborationGraph {
        let store: AuthorStore = [
            ("a", vec!["abcd"]),
            ("b", vec!["abcd"]),
            ("c", vec!["abcd"]),
            ("d", vec!["abcd", "de"]),
            ("e", vec!["de"]),
            ("f", vec![]),
        ]
        .into_iter()
        .map(|(id, pubs)| (id, AuthorRecord::new(id, "", pubs)))
        .collect();
        build_collaboration_graph(&store)
    }

    #[test]
    fn finds_the_four_clique() {
        let g = k4_with_tail();
        assert_eq!(maximal_cliques(&g, 4), vec![vec![0, 1, 2, 3]]);
        assert_eq!(maximal_cliques(&g, 3), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn small_minimum_includes_edges_and_singletons() {
        let g = k4_with_tail();
        assert_eq!(
            maximal_cliques(&g, 1),
            vec![vec![0, 1, 2, 3], vec![3, 4], vec![5]]
        );
    }

    #[test]
    fn empty_graph_has_no_cliques() {
        assert!(maximal_cliques(&CollaborationGraph::default(), 1).is_empty());
    }
}
