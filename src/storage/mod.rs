//! Graph snapshot persistence

pub mod report;

use crate::error::{AnalyzerError, Result};
use crate::graph::{CollaborationGraph, GraphSnapshot};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Snapshot encoding, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Bincode,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Bincode,
        }
    }
}

/// Persist a collaboration graph as `{id: {name, affiliation, pubs: {coauthor: {weight}}}}`
pub fn save_graph(graph: &CollaborationGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    log::info!(
        "Saving graph with {} nodes and {} edges to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let snapshot = graph.to_snapshot();
    let mut writer = BufWriter::new(File::create(path)?);
    match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => serde_json::to_writer(&mut writer, &snapshot)?,
        SnapshotFormat::Bincode => bincode::serialize_into(&mut writer, &snapshot)?,
    }
    writer.flush()?;

    Ok(())
}

/// Load a collaboration graph snapshot written by `save_graph`
pub fn load_graph(path: impl AsRef<Path>) -> Result<CollaborationGraph> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnalyzerError::not_found(
            "collaboration graph snapshot",
            path.display().to_string(),
        ));
    }

    // Structural checks run in from_snapshot so both formats report InvalidInput
    let reader = BufReader::new(File::open(path)?);
    let snapshot: GraphSnapshot = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => serde_json::from_reader(reader)?,
        SnapshotFormat::Bincode => bincode::deserialize_from(reader)?,
    };
    let graph = CollaborationGraph::from_snapshot(snapshot)?;

    log::info!(
        "Loaded graph with {} nodes and {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );

    Ok(graph)
}
