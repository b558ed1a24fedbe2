//! Community detection algorithms

use crate::cluster::metrics::{central_authors, community_density};
use crate::cluster::{Community, Partition};
use crate::config::Config;
use crate::graph::CollaborationGraph;
use std::collections::{BTreeMap, HashMap};

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set, valid at roots (for union by size)
    size: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            size: vec![1; size],
        }
    }

    /// Find the root of the set containing x, compressing the path
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Attach the smaller tree under the root of the larger one
        let (big, small) = if self.size[root_x as usize] >= self.size[root_y as usize] {
            (root_x, root_y)
        } else {
            (root_y, root_x)
        };
        self.parent[small as usize] = big;
        self.size[big as usize] += self.size[small as usize];
    }

    /// Get the size of the set containing x
    pub fn size(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.size[root as usize]
    }
}

/// Find connected components with at least `min_size` authors, largest first
///
/// Each component lists up to `central_nodes` of its most connected members.
pub fn connected_components(graph: &CollaborationGraph, min_size: usize, central_nodes: usize) -> Vec<Community> {
    log::info!("Finding connected components of {} authors", graph.node_count());

    let mut sets = DisjointSets::new(graph.node_count());
    for (a, b, _) in graph.edges() {
        sets.union(a, b);
    }

    let mut groups: HashMap<u32, Vec<u32>> = HashMap::new();
    for (idx, _) in graph.nodes() {
        let root = sets.find(idx);
        groups.entry(root).or_default().push(idx);
    }

    let groups: Vec<Vec<u32>> = groups
        .into_values()
        .filter(|members| members.len() >= min_size)
        .collect();
    let components = into_communities(graph, groups, central_nodes);

    log::info!(
        "Found {} components with {} or more authors",
        components.len(),
        min_size
    );

    components
}

/// Louvain configuration
#[derive(Debug, Clone, Copy)]
pub struct LouvainConfig {
    pub resolution: f64,
    /// Cap on local-moving passes per level
    pub max_passes: usize,
    /// Central authors kept per community
    pub central_nodes: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 100,
            central_nodes: 5,
        }
    }
}

impl From<&Config> for LouvainConfig {
    fn from(config: &Config) -> Self {
        Self {
            resolution: config.resolution,
            max_passes: config.max_passes,
            central_nodes: config.central_nodes,
        }
    }
}

const GAIN_EPSILON: f64 = 1e-12;

/// Weighted graph of one Louvain level; self-loops hold internal weight
struct LevelGraph {
    adjacency: Vec<BTreeMap<usize, f64>>,
    self_loops: Vec<f64>,
}

impl LevelGraph {
    fn from_graph(graph: &CollaborationGraph) -> Self {
        let adjacency: Vec<BTreeMap<usize, f64>> = graph
            .nodes()
            .map(|(idx, _)| graph.neighbors(idx).map(|(n, w)| (n as usize, w as f64)).collect())
            .collect();
        Self {
            adjacency,
            self_loops: vec![0.0; graph.node_count()],
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    fn strength(&self, i: usize) -> f64 {
        self.adjacency[i].values().sum::<f64>() + 2.0 * self.self_loops[i]
    }

    /// Collapse every community into a single node
    fn aggregate(&self, community: &[usize], count: usize) -> Self {
        let mut adjacency: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut self_loops = vec![0.0; count];

        for i in 0..self.len() {
            let ci = community[i];
            self_loops[ci] += self.self_loops[i];
            for (&j, &w) in &self.adjacency[i] {
                if j <= i {
                    continue;
                }
                let cj = community[j];
                if ci == cj {
                    self_loops[ci] += w;
                } else {
                    *adjacency[ci].entry(cj).or_insert(0.0) += w;
                    *adjacency[cj].entry(ci).or_insert(0.0) += w;
                }
            }
        }

        Self { adjacency, self_loops }
    }
}

/// Louvain modularity optimisation
///
/// Each level greedily moves nodes (in index order) into the neighbouring
/// community with the best modularity gain until a pass makes no move, then
/// collapses communities into nodes. Stops when a level moves nothing.
pub fn louvain(graph: &CollaborationGraph, config: &LouvainConfig) -> Partition {
    let n = graph.node_count();
    log::info!("Running Louvain on {} authors", n);

    let total_weight = graph.total_weight() as f64;
    let mut membership: Vec<usize> = (0..n).collect();
    let mut levels = 0;

    if total_weight > 0.0 {
        let mut level = LevelGraph::from_graph(graph);
        loop {
            let (community, moved) = local_moving(&level, total_weight, config);
            if !moved {
                break;
            }
            levels += 1;

            let (community, count) = renumber(&community);
            for c in membership.iter_mut() {
                *c = community[*c];
            }
            log::debug!("Louvain level {}: {} communities", levels, count);

            if count == level.len() {
                break;
            }
            level = level.aggregate(&community, count);
        }
    }

    let modularity = modularity(graph, &membership, config.resolution);

    let mut groups: HashMap<usize, Vec<u32>> = HashMap::new();
    for (idx, &c) in membership.iter().enumerate() {
        groups.entry(c).or_default().push(idx as u32);
    }
    let communities = into_communities(graph, groups.into_values().collect(), config.central_nodes);

    log::info!(
        "Louvain found {} communities (modularity {:.4}, {} levels)",
        communities.len(),
        modularity,
        levels
    );

    Partition {
        communities,
        modularity,
        levels,
    }
}

/// One level of local moves; returns the community of each level node and
/// whether any node changed community
fn local_moving(level: &LevelGraph, total_weight: f64, config: &LouvainConfig) -> (Vec<usize>, bool) {
    let n = level.len();
    let two_m = 2.0 * total_weight;
    let strength: Vec<f64> = (0..n).map(|i| level.strength(i)).collect();

    let mut community: Vec<usize> = (0..n).collect();
    let mut community_strength = strength.clone();
    let mut moved_any = false;

    for _ in 0..config.max_passes {
        let mut moved = false;

        for i in 0..n {
            let current = community[i];

            let mut links: BTreeMap<usize, f64> = BTreeMap::new();
            for (&j, &w) in &level.adjacency[i] {
                *links.entry(community[j]).or_insert(0.0) += w;
            }
            let candidates: Vec<(usize, f64)> = links.into_iter().collect();

            community_strength[current] -= strength[i];

            let gain = |c: usize, weight_to_c: f64, sigma: &[f64]| {
                weight_to_c - config.resolution * sigma[c] * strength[i] / two_m
            };

            let weight_to_current = candidates
                .iter()
                .find(|&&(c, _)| c == current)
                .map_or(0.0, |&(_, w)| w);
            let mut best = current;
            let mut best_gain = gain(current, weight_to_current, &community_strength);

            for &(c, w) in &candidates {
                let g = gain(c, w, &community_strength);
                if g > best_gain + GAIN_EPSILON {
                    best = c;
                    best_gain = g;
                }
            }

            community_strength[best] += strength[i];
            if best != current {
                community[i] = best;
                moved = true;
                moved_any = true;
            }
        }

        if !moved {
            break;
        }
    }

    (community, moved_any)
}

/// Map community labels to 0..count in order of first appearance
fn renumber(community: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let renumbered = community
        .iter()
        .map(|&c| {
            let next = mapping.len();
            *mapping.entry(c).or_insert(next)
        })
        .collect();
    (renumbered, mapping.len())
}

/// Newman modularity of a node -> community assignment
pub fn modularity(graph: &CollaborationGraph, membership: &[usize], resolution: f64) -> f64 {
    let m = graph.total_weight() as f64;
    if m == 0.0 {
        return 0.0;
    }

    let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
    let mut strength: BTreeMap<usize, f64> = BTreeMap::new();

    for (a, b, w) in graph.edges() {
        if membership[a as usize] == membership[b as usize] {
            *internal.entry(membership[a as usize]).or_insert(0.0) += w as f64;
        }
    }
    for (idx, _) in graph.nodes() {
        *strength.entry(membership[idx as usize]).or_insert(0.0) += graph.weighted_degree(idx) as f64;
    }

    strength
        .iter()
        .map(|(c, &tot)| {
            let inner = internal.get(c).copied().unwrap_or(0.0);
            inner / m - resolution * (tot / (2.0 * m)).powi(2)
        })
        .sum()
}

/// Sort groups largest first (ties by smallest member) and attach statistics
fn into_communities(graph: &CollaborationGraph, mut groups: Vec<Vec<u32>>, top_n: usize) -> Vec<Community> {
    for members in groups.iter_mut() {
        members.sort_unstable();
    }
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.first().cmp(&b.first())));

    groups
        .into_iter()
        .enumerate()
        .map(|(id, members)| Community {
            id: id as u32,
            size: members.len(),
            density: community_density(graph, &members),
            central_nodes: central_authors(graph, &members, top_n),
            members,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AuthorRecord, AuthorStore};
    use crate::graph::build_collaboration_graph;

    /// Two triangles a-b-c and d-e-f joined by the single edge c-d
    fn barbell() -> CollaborationGraph {
        let store: AuthorStore = [
            ("a", vec!["ab", "ac"]),
            ("b", vec!["ab", "bc"]),
            ("c", vec!["ac", "bc", "cd"]),
            ("d", vec!["cd", "de", "df"]),
            ("e", vec!["de", "ef"]),
            ("f", vec!["df", "ef"]),
            ("g", vec![]),
        ]
        .into_iter()
        .map(|(id, pubs)| (id, AuthorRecord::new(id, "", pubs)))
        .collect();
        build_collaboration_graph(&store)
    }

    #[test]
    fn disjoint_sets_track_sizes() {
        let mut sets = DisjointSets::new(5);
        sets.union(0, 1);
        sets.union(1, 2);
        sets.union(3, 4);
        assert_eq!(sets.find(0), sets.find(2));
        assert_ne!(sets.find(0), sets.find(3));
        assert_eq!(sets.size(2), 3);
        assert_eq!(sets.size(4), 2);
    }

    #[test]
    fn components_are_sorted_and_filtered() {
        let g = barbell();
        let all = connected_components(&g, 1, 5);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].size, 6);
        assert_eq!(all[0].id, 0);
        assert_eq!(all[1].member_ids(&g), vec!["g"]);

        let big = connected_components(&g, 2, 5);
        assert_eq!(big.len(), 1);
    }

    #[test]
    fn components_keep_the_requested_central_nodes() {
        let g = barbell();
        assert_eq!(connected_components(&g, 1, 2)[0].central_nodes.len(), 2);
        assert!(connected_components(&g, 1, 0)[0].central_nodes.is_empty());
    }

    #[test]
    fn louvain_splits_the_barbell() {
        let g = barbell();
        let partition = louvain(&g, &LouvainConfig::default());

        let mut groups = partition.groups(&g);
        groups.sort();
        assert_eq!(
            groups,
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["d".to_string(), "e".to_string(), "f".to_string()],
                vec!["g".to_string()],
            ]
        );
        // 2 * (3/7 - (7/14)^2)
        assert!((partition.modularity - 2.0 * (3.0 / 7.0 - 0.25)).abs() < 1e-9);
        assert!(partition.levels >= 1);
    }

    #[test]
    fn louvain_assigns_every_author_once() {
        let g = barbell();
        let partition = louvain(&g, &LouvainConfig::default());
        let membership = partition.membership(g.node_count());
        assert!(membership.iter().all(Option::is_some));
        let total: usize = partition.communities.iter().map(|c| c.size).sum();
        assert_eq!(total, g.node_count());
    }

    #[test]
    fn louvain_is_deterministic() {
        let g = barbell();
        let first = louvain(&g, &LouvainConfig::default());
        let second = louvain(&g, &LouvainConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn louvain_on_edgeless_graph_keeps_singletons() {
        let store: AuthorStore = [("x", AuthorRecord::default()), ("y", AuthorRecord::default())]
            .into_iter()
            .collect();
        let g = build_collaboration_graph(&store);
        let partition = louvain(&g, &LouvainConfig::default());
        assert_eq!(partition.len(), 2);
        assert_eq!(partition.modularity, 0.0);
        assert_eq!(partition.levels, 0);
    }

    #[test]
    fn single_community_has_zero_modularity() {
        let g = barbell();
        let membership = vec![0; g.node_count()];
        assert!(modularity(&g, &membership, 1.0).abs() < 1e-12);
    }
}
