//! GraphML export for external graph tools

use crate::cluster::Partition;
use crate::error::Result;
use crate::graph::CollaborationGraph;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the collaboration graph as undirected GraphML
///
/// Nodes carry `name` and `affiliation`, plus `community` when a partition
/// is given. Edges carry their `weight`.
pub fn write_graphml(
    graph: &CollaborationGraph,
    partition: Option<&Partition>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    log::info!(
        "Writing GraphML with {} nodes and {} edges to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(file, "  <key id=\"name\" for=\"node\" attr.name=\"name\" attr.type=\"string\"/>")?;
    writeln!(
        file,
        "  <key id=\"affiliation\" for=\"node\" attr.name=\"affiliation\" attr.type=\"string\"/>"
    )?;
    if partition.is_some() {
        writeln!(file, "  <key id=\"community\" for=\"node\" attr.name=\"community\" attr.type=\"int\"/>")?;
    }
    writeln!(file, "  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"int\"/>")?;
    writeln!(file, "  <graph id=\"G\" edgedefault=\"undirected\">")?;

    let membership = partition.map(|p| p.membership(graph.node_count()));

    for (idx, node) in graph.nodes() {
        writeln!(file, "    <node id=\"{}\">", escape(&node.id))?;
        writeln!(file, "      <data key=\"name\">{}</data>", escape(&node.name))?;
        writeln!(file, "      <data key=\"affiliation\">{}</data>", escape(&node.affiliation))?;
        if let Some(community) = membership.as_ref().and_then(|m| m[idx as usize]) {
            writeln!(file, "      <data key=\"community\">{}</data>", community)?;
        }
        writeln!(file, "    </node>")?;
    }

    for (edge_id, (a, b, weight)) in graph.edges().enumerate() {
        writeln!(
            file,
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">",
            edge_id,
            escape(&graph.node(a).id),
            escape(&graph.node(b).id)
        )?;
        writeln!(file, "      <data key=\"weight\">{}</data>", weight)?;
        writeln!(file, "    </edge>")?;
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;
    file.flush()?;

    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
