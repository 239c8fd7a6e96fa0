mod error;
mod load;
mod model;
mod parse;

pub use error::{GraphError, LinkEnd};
pub use load::{load_graph_data, load_resolved_graph};
pub use model::{GraphData, LinkRecord, NodeRecord, ResolvedGraph, ResolvedLink};

#[cfg(test)]
pub(crate) use model::{link, node};
