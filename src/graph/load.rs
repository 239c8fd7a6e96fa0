use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{GraphData, ResolvedGraph};
use super::parse::parse_graph_json;

pub fn load_graph_data(path: &Path) -> Result<GraphData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph data from {}", path.display()))?;

    let data = parse_graph_json(&raw)
        .with_context(|| format!("failed to parse graph data in {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        nodes = data.node_count(),
        links = data.link_count(),
        "loaded graph data"
    );
    Ok(data)
}

/// Reads, parses and validates in one go, for callers that only want a
/// ready-to-simulate graph.
pub fn load_resolved_graph(path: &Path) -> Result<ResolvedGraph> {
    let data = load_graph_data(path)?;
    data.resolve()
        .with_context(|| format!("invalid graph data in {}", path.display()))
}
