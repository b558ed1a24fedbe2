use coauthor_graph_analyzer::analytics::{collaboration_distances, page_rank, PageRankConfig};
use coauthor_graph_analyzer::cluster::detection::{louvain, LouvainConfig};
use coauthor_graph_analyzer::cluster::metrics::community_report;
use coauthor_graph_analyzer::data::json::{load_author_store, save_author_store};
use coauthor_graph_analyzer::data::{AuthorRecord, AuthorStore};
use coauthor_graph_analyzer::graph::{build_collaboration_graph, GraphBuilder};
use coauthor_graph_analyzer::storage::{load_graph, save_graph};
use coauthor_graph_analyzer::AnalyzerError;
use std::collections::{BTreeSet, HashMap};
use tempfile::TempDir;

fn store(entries: &[(&str, &[&str])]) -> AuthorStore {
    entries
        .iter()
        .map(|&(id, pubs)| (id, AuthorRecord::new(id, "", pubs.iter().copied())))
        .collect()
}

/// Two research groups bridged by one shared paper, plus a newcomer without papers
fn groups() -> AuthorStore {
    store(&[
        ("homepages/a", &["a1", "a2", "a3"]),
        ("homepages/b", &["a1", "a2", "bridge"]),
        ("homepages/c", &["a1", "a3"]),
        ("homepages/x", &["x1", "x2", "bridge"]),
        ("homepages/y", &["x1", "x2"]),
        ("homepages/z", &["x1"]),
        ("homepages/new", &[]),
    ])
}

#[test]
fn end_to_end_example() {
    let graph = build_collaboration_graph(&store(&[
        ("A", &["p1", "p2"]),
        ("B", &["p2", "p3"]),
        ("C", &["p3"]),
    ]));

    let a = graph.index_of("A").unwrap();
    let b = graph.index_of("B").unwrap();
    let c = graph.index_of("C").unwrap();
    assert_eq!(graph.weight(a, b), Some(1));
    assert_eq!(graph.weight(b, c), Some(1));
    assert_eq!(graph.weight(a, c), None);

    let distances = collaboration_distances(&graph, "A").unwrap();
    let table: HashMap<String, u32> = distances.iter().map(|(id, d)| (id.to_string(), d)).collect();
    assert_eq!(
        table,
        HashMap::from([("A".to_string(), 0), ("B".to_string(), 1), ("C".to_string(), 2)])
    );
}

#[test]
fn built_graph_is_symmetric_complete_and_loop_free() {
    let authors = groups();
    let graph = build_collaboration_graph(&authors);

    assert_eq!(graph.node_count(), authors.len());
    for (id, record) in authors.iter() {
        let i = graph.index_of(id).unwrap();
        assert_eq!(graph.weight(i, i), None);

        for (other, other_record) in authors.iter() {
            if id == other {
                continue;
            }
            let j = graph.index_of(other).unwrap();
            let shared = record.pubs.intersection(&other_record.pubs).count() as u32;
            assert_eq!(graph.weight(i, j), graph.weight(j, i));
            assert_eq!(graph.weight(i, j).unwrap_or(0), shared);
        }
    }
    assert_eq!(graph.degree(graph.index_of("homepages/new").unwrap()), 0);
}

#[test]
fn rebuild_ignores_insertion_order() {
    let authors = groups();
    let forward = build_collaboration_graph(&authors);

    let mut builder = GraphBuilder::new();
    let records: Vec<_> = authors.iter().collect();
    for (id, record) in records.into_iter().rev() {
        builder.add_author(id, record.clone());
    }
    assert_eq!(builder.build(), forward);
}

#[test]
fn analyses_run_on_a_reloaded_snapshot() {
    let dir = TempDir::new().unwrap();
    let dump = dir.path().join("authors.json");
    let snapshot = dir.path().join("data/colab_graph.json");

    save_author_store(&groups(), &dump).unwrap();
    let graph = build_collaboration_graph(&load_author_store(&dump).unwrap());
    save_graph(&graph, &snapshot).unwrap();
    let reloaded = load_graph(&snapshot).unwrap();
    assert_eq!(reloaded, graph);

    let ranks = page_rank(&reloaded, &PageRankConfig::default()).unwrap();
    assert_eq!(ranks.len(), reloaded.node_count());
    assert!(ranks.iter().all(|(_, r)| r.is_finite() && r >= 0.0));
    assert_eq!(ranks.get("homepages/new"), Some(0.0));
    let (top, _) = ranks.ranked()[0];
    assert!(top == "homepages/b" || top == "homepages/x");

    let distances = collaboration_distances(&reloaded, "homepages/c").unwrap();
    assert_eq!(distances.get("homepages/z"), Some(3));
    assert_eq!(distances.get("homepages/new"), None);
    assert_eq!(distances, collaboration_distances(&reloaded, "homepages/c").unwrap());
}

#[test]
fn unknown_source_and_missing_snapshot_are_not_found() {
    let graph = build_collaboration_graph(&groups());
    assert!(matches!(
        collaboration_distances(&graph, "homepages/nobody"),
        Err(AnalyzerError::NotFound { .. })
    ));

    let dir = TempDir::new().unwrap();
    assert!(matches!(
        load_graph(dir.path().join("colab_graph.bin")),
        Err(AnalyzerError::NotFound { .. })
    ));
}

#[test]
fn communities_separate_the_two_groups() {
    let graph = build_collaboration_graph(&groups());
    let partition = louvain(&graph, &LouvainConfig::default());

    let groups: Vec<BTreeSet<String>> = partition
        .groups(&graph)
        .into_iter()
        .map(|g| g.into_iter().collect())
        .collect();
    let abc: BTreeSet<String> = ["homepages/a", "homepages/b", "homepages/c"]
        .into_iter()
        .map(String::from)
        .collect();
    let xyz: BTreeSet<String> = ["homepages/x", "homepages/y", "homepages/z"]
        .into_iter()
        .map(String::from)
        .collect();
    assert!(groups.contains(&abc));
    assert!(groups.contains(&xyz));
    assert!(partition.modularity > 0.0);

    let report = community_report(&graph, &partition, 2);
    assert_eq!(report.communities.len(), 2);
    assert_eq!(report.size.mean, 3.0);
}
