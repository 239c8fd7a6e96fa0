use std::collections::HashMap;

use super::error::{GraphError, LinkEnd};

pub const SUPERVISORY_LINK: &str = "SUPERVISORY";

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub role: String,
    pub zone: String,
    pub influence: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub kind: String,
    pub overlap: f64,
}

impl LinkRecord {
    pub fn is_supervisory(&self) -> bool {
        self.kind == SUPERVISORY_LINK
    }
}

/// Graph data as loaded, before link ends are resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLink {
    pub record: LinkRecord,
    pub source: usize,
    pub target: usize,
}

/// Validated graph whose links point at node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedGraph {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<ResolvedLink>,
}

fn check_value(what: &'static str, index: usize, value: f64) -> Result<(), GraphError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidValue { what, index, value })
    }
}

impl GraphData {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn resolve(self) -> Result<ResolvedGraph, GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::NoNodes);
        }
        if self.links.is_empty() {
            return Err(GraphError::NoLinks);
        }

        let mut index_by_id = HashMap::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            check_value("node influence", index, node.influence)?;
            if index_by_id.insert(node.id.clone(), index).is_some() {
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
        }

        let mut links = Vec::with_capacity(self.links.len());
        for (index, record) in self.links.into_iter().enumerate() {
            check_value("link weight", index, record.weight)?;
            check_value("link overlap", index, record.overlap)?;

            let lookup = |id: &str, end: LinkEnd| {
                index_by_id
                    .get(id)
                    .copied()
                    .ok_or_else(|| GraphError::DanglingLink {
                        link: index,
                        end,
                        id: id.to_owned(),
                    })
            };
            let source = lookup(&record.source, LinkEnd::Source)?;
            let target = lookup(&record.target, LinkEnd::Target)?;

            links.push(ResolvedLink {
                record,
                source,
                target,
            });
        }

        Ok(ResolvedGraph {
            nodes: self.nodes,
            links,
        })
    }
}

impl ResolvedGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn max_influence(&self) -> f64 {
        self.nodes
            .iter()
            .map(|node| node.influence)
            .fold(0.0, f64::max)
    }

    pub fn max_weight(&self) -> f64 {
        self.links
            .iter()
            .map(|link| link.record.weight)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
pub(crate) fn node(id: &str, influence: f64) -> NodeRecord {
    NodeRecord {
        id: id.to_owned(),
        name: format!("Node {id}"),
        role: format!("Role {id}"),
        zone: format!("zone-{id}"),
        influence,
    }
}

#[cfg(test)]
pub(crate) fn link(source: &str, target: &str, weight: f64, overlap: f64) -> LinkRecord {
    LinkRecord {
        source: source.to_owned(),
        target: target.to_owned(),
        weight,
        kind: String::new(),
        overlap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GraphData {
        GraphData {
            nodes: vec![node("0", 10.0), node("1", 50.0), node("2", 0.0)],
            links: vec![link("0", "1", 5.0, 0.0), link("1", "2", 2.0, 1.0)],
        }
    }

    #[test]
    fn resolves_link_ends_to_indices() {
        let graph = sample().resolve().unwrap();
        assert_eq!(graph.links[0].source, 0);
        assert_eq!(graph.links[0].target, 1);
        assert_eq!(graph.links[1].source, 1);
        assert_eq!(graph.links[1].target, 2);
        assert_eq!(graph.nodes[graph.links[1].target].id, "2");
    }

    #[test]
    fn dangling_target_fails_setup() {
        let mut data = sample();
        data.links.push(link("0", "9", 1.0, 0.0));
        assert_eq!(
            data.resolve().unwrap_err(),
            GraphError::DanglingLink {
                link: 2,
                end: LinkEnd::Target,
                id: "9".to_owned(),
            }
        );
    }

    #[test]
    fn empty_arrays_fail_setup() {
        let mut data = sample();
        data.links.clear();
        assert_eq!(data.resolve().unwrap_err(), GraphError::NoLinks);
        assert_eq!(GraphData::default().resolve().unwrap_err(), GraphError::NoNodes);
    }

    #[test]
    fn duplicate_ids_and_negative_values_are_rejected() {
        let mut data = sample();
        data.nodes.push(node("1", 3.0));
        assert_eq!(
            data.resolve().unwrap_err(),
            GraphError::DuplicateNodeId("1".to_owned())
        );

        let mut data = sample();
        data.links[1].weight = -1.0;
        assert!(matches!(
            data.resolve().unwrap_err(),
            GraphError::InvalidValue { what: "link weight", index: 1, .. }
        ));
    }

    #[test]
    fn maxima_ignore_order() {
        let graph = sample().resolve().unwrap();
        assert_eq!(graph.max_influence(), 50.0);
        assert_eq!(graph.max_weight(), 5.0);
    }
}
