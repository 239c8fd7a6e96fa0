use std::fmt;

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEnd {
    Source,
    Target,
}

impl fmt::Display for LinkEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Setup-time data errors. Any of these aborts session construction.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("graph data has no nodes")]
    NoNodes,
    #[error("graph data has no links")]
    NoLinks,
    #[error("duplicate node id {0:?}")]
    DuplicateNodeId(String),
    #[error("link {link} has a dangling {end} reference {id:?}")]
    DanglingLink {
        link: usize,
        end: LinkEnd,
        id: String,
    },
    #[error("{what} #{index} has invalid value {value}")]
    InvalidValue {
        what: &'static str,
        index: usize,
        value: f64,
    },
}
