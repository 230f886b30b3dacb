//! Layout errors.
//!
//! Every phase is deterministic, so an error here means the input graph violates a phase
//! precondition. Retrying with the same input fails the same way.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ranking requires a connected graph, found {components} components")]
    Disconnected { components: usize },

    #[error("ranking requires an acyclic graph (cycle through {node})")]
    Cyclic { node: String },

    #[error("node {node} has no rank")]
    MissingRank { node: String },

    #[error("node {node} has rank {rank}; ranks must be normalized to start at 0")]
    UnnormalizedRank { node: String, rank: i32 },

    #[error("invalid value {value:?} for option {name}")]
    InvalidOption { name: String, value: String },

    #[error("edge {v} -> {w} is incident on a compound node")]
    CompoundEdge { v: String, w: String },

    #[error(transparent)]
    Graph(#[from] stratum_graph::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_option(name: &str, value: impl ToString) -> Self {
        Self::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}
