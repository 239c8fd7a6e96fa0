use anyhow::{Context, Result};
use serde::Deserialize;

use super::model::{GraphData, LinkRecord, NodeRecord};

/// Ids show up as JSON numbers in hand-written data files and as strings
/// elsewhere; both normalize to the same string key.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_key(self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNode {
    pub(super) id: RawId,
    pub(super) name: String,
    pub(super) role: String,
    pub(super) zone: String,
    pub(super) influence: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawLink {
    pub(super) source: RawId,
    pub(super) target: RawId,
    pub(super) weight: f64,
    #[serde(default, rename = "type")]
    pub(super) kind: Option<String>,
    #[serde(default)]
    pub(super) overlap: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawGraph {
    pub(super) nodes: Vec<RawNode>,
    pub(super) links: Vec<RawLink>,
}

pub(super) fn parse_graph_json(raw: &str) -> Result<GraphData> {
    let parsed: RawGraph = serde_json::from_str(raw).context("invalid graph JSON")?;

    let nodes = parsed
        .nodes
        .into_iter()
        .map(|node| NodeRecord {
            id: node.id.into_key(),
            name: node.name,
            role: node.role,
            zone: node.zone,
            influence: node.influence,
        })
        .collect();

    let links = parsed
        .links
        .into_iter()
        .map(|link| LinkRecord {
            source: link.source.into_key(),
            target: link.target.into_key(),
            weight: link.weight,
            kind: link.kind.unwrap_or_default(),
            overlap: link.overlap,
        })
        .collect();

    Ok(GraphData { nodes, links })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_normalize() {
        let raw = r#"{
            "nodes": [
                {"id": 0, "name": "Ada", "role": "Chair", "zone": "north", "influence": 10},
                {"id": "b", "name": "Bo", "role": "Clerk", "zone": "south", "influence": 2.5}
            ],
            "links": [
                {"source": 0, "target": "b", "weight": 3, "type": "SUPERVISORY", "overlap": 1}
            ]
        }"#;

        let data = parse_graph_json(raw).unwrap();
        assert_eq!(data.nodes[0].id, "0");
        assert_eq!(data.nodes[1].id, "b");
        assert_eq!(data.links[0].source, "0");
        assert!(data.links[0].is_supervisory());
        assert_eq!(data.links[0].overlap, 1.0);
    }

    #[test]
    fn optional_link_fields_default() {
        let raw = r#"{
            "nodes": [{"id": 1, "name": "A", "role": "R", "zone": "z", "influence": 1}],
            "links": [{"source": 1, "target": 1, "weight": 0}]
        }"#;

        let data = parse_graph_json(raw).unwrap();
        assert_eq!(data.links[0].kind, "");
        assert_eq!(data.links[0].overlap, 0.0);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let raw = r#"{
            "nodes": [{"id": 1, "name": "A", "zone": "z", "influence": 1}],
            "links": []
        }"#;

        assert!(parse_graph_json(raw).is_err());
        assert!(parse_graph_json(r#"{"nodes": []}"#).is_err());
    }
}
