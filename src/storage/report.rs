//! Semicolon-separated and JSON result reports

use crate::analytics::{DistanceTable, RankTable};
use crate::cluster::metrics::{degree_distribution, CommunityReport, GraphMetrics};
use crate::data::{profile_link, short_id};
use crate::error::{AnalyzerError, Result};
use crate::graph::CollaborationGraph;
use itertools::Itertools;
use regex_lite::Regex;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const SEPARATOR: &str = ";";

/// Keep free text from breaking the row layout
fn field(text: &str) -> String {
    text.replace(SEPARATOR, ",").replace(['\n', '\r'], " ")
}

/// Homonym suffix DBLP appends to author names ("Jane Doe 0002")
const HOMONYM_SUFFIX: &str = r"\s[0-9]+";

fn homonym_suffix() -> Result<Regex> {
    Regex::new(HOMONYM_SUFFIX).map_err(|e| AnalyzerError::invalid(format!("homonym pattern: {}", e)))
}

fn display_name(suffix: &Regex, name: &str) -> String {
    field(&suffix.replace_all(name, ""))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Write one `id;name;affiliation;<score columns>;link` row per author, in the given order
fn write_author_rows<W, I>(out: &mut W, graph: &CollaborationGraph, host: &str, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (u32, Vec<String>)>,
{
    for (idx, values) in rows {
        let node = graph.node(idx);
        writeln!(
            out,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            short_id(&node.id),
            field(&node.name),
            field(&node.affiliation),
            values.join(SEPARATOR),
            profile_link(host, &node.id),
            sep = SEPARATOR
        )?;
    }
    Ok(())
}

/// PageRank report sorted by descending rank
pub fn write_rank_report(
    graph: &CollaborationGraph,
    ranks: &RankTable,
    host: &str,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    log::info!("Exporting PageRank of {} authors to {}", ranks.len(), path.display());

    let mut out = create(path)?;
    writeln!(out, "id;name;affiliation;pr;link")?;
    let rows = ranks
        .ranked()
        .into_iter()
        .filter_map(|(id, rank)| graph.index_of(id).map(|idx| (idx, vec![rank.to_string()])));
    write_author_rows(&mut out, graph, host, rows)?;
    out.flush()?;
    Ok(())
}

/// Collaboration distance report sorted by ascending hop count
pub fn write_distance_report(
    graph: &CollaborationGraph,
    distances: &DistanceTable,
    host: &str,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    log::info!(
        "Exporting collaboration distances of {} authors to {}",
        distances.len(),
        path.display()
    );

    let mut out = create(path)?;
    writeln!(out, "id;name;affiliation;number;link")?;
    let rows = distances
        .sorted()
        .into_iter()
        .filter_map(|(id, hops)| graph.index_of(id).map(|idx| (idx, vec![hops.to_string()])));
    write_author_rows(&mut out, graph, host, rows)?;
    out.flush()?;
    Ok(())
}

/// Authors sorted by descending number of coauthors
pub fn write_degree_report(graph: &CollaborationGraph, host: &str, path: impl AsRef<Path>) -> Result<()> {
    let mut out = create(path.as_ref())?;
    writeln!(out, "id;name;affiliation;degree;link")?;
    let rows = graph
        .nodes()
        .map(|(idx, _)| idx)
        .sorted_by(|&a, &b| graph.degree(b).cmp(&graph.degree(a)).then_with(|| a.cmp(&b)))
        .map(|idx| (idx, vec![graph.degree(idx).to_string()]));
    write_author_rows(&mut out, graph, host, rows)?;
    out.flush()?;
    Ok(())
}

/// Per-author scores (clustering, closeness, ...) sorted descending
///
/// With `with_degree`, the degree is appended after the score as in the
/// clustering report.
pub fn write_score_report(
    graph: &CollaborationGraph,
    scores: &[f64],
    column: &str,
    with_degree: bool,
    host: &str,
    path: impl AsRef<Path>,
) -> Result<()> {
    let mut out = create(path.as_ref())?;
    if with_degree {
        writeln!(out, "id;name;affiliation;{};degree;link", column)?;
    } else {
        writeln!(out, "id;name;affiliation;{};link", column)?;
    }

    let rows = (0..graph.node_count() as u32)
        .sorted_by(|&a, &b| scores[b as usize].total_cmp(&scores[a as usize]).then_with(|| a.cmp(&b)))
        .map(|idx| {
            let mut values = vec![scores[idx as usize].to_string()];
            if with_degree {
                values.push(graph.degree(idx).to_string());
            }
            (idx, values)
        });
    write_author_rows(&mut out, graph, host, rows)?;
    out.flush()?;
    Ok(())
}

/// Degree distribution sorted by descending probability
pub fn write_degree_distribution(graph: &CollaborationGraph, path: impl AsRef<Path>) -> Result<()> {
    let mut out = create(path.as_ref())?;
    writeln!(out, "deg;P(deg);count")?;
    for bucket in degree_distribution(graph)
        .into_iter()
        .sorted_by(|a, b| b.probability.total_cmp(&a.probability).then_with(|| a.degree.cmp(&b.degree)))
    {
        writeln!(out, "{};{};{}", bucket.degree, bucket.probability, bucket.count)?;
    }
    out.flush()?;
    Ok(())
}

/// Mean closeness per degree as comma-separated `degree,closeness` rows
pub fn write_closeness_histogram(histogram: &[(usize, f64)], path: impl AsRef<Path>) -> Result<()> {
    let mut out = create(path.as_ref())?;
    writeln!(out, "degree,closeness")?;
    for &(degree, closeness) in histogram {
        writeln!(out, "{},{}", degree, closeness)?;
    }
    out.flush()?;
    Ok(())
}

/// Cliques as `clique no;nodes;total`, members listed by name without homonym suffixes
pub fn write_clique_report(graph: &CollaborationGraph, cliques: &[Vec<u32>], path: impl AsRef<Path>) -> Result<()> {
    let suffix = homonym_suffix()?;
    let mut out = create(path.as_ref())?;
    writeln!(out, "clique no;nodes;total")?;
    for (i, clique) in cliques.iter().enumerate() {
        let names = clique
            .iter()
            .map(|&idx| display_name(&suffix, &graph.node(idx).name))
            .join(", ");
        writeln!(out, "{};{};{}", i, names, clique.len())?;
    }
    out.flush()?;
    Ok(())
}

/// Whole-graph and largest-component metrics as JSON
pub fn write_metrics_summary(
    graph_metrics: &GraphMetrics,
    component_metrics: &GraphMetrics,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    log::info!("Saving graph metrics to {}", path.display());

    let summary = json!({
        "graph": graph_metrics,
        "largest_component": component_metrics,
    });
    let mut out = create(path)?;
    out.write_all(to_string_pretty(&summary)?.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Community metrics as JSON
pub fn write_community_report(report: &CommunityReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    log::info!(
        "Saving metrics of {} communities to {}",
        report.communities.len(),
        path.display()
    );

    let mut out = create(path)?;
    out.write_all(to_string_pretty(report)?.as_bytes())?;
    out.flush()?;
    Ok(())
}
