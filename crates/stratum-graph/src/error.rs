//! Errors raised at the graph container boundary.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("edge {v} -> {w} (name: {name:?}) already exists")]
    DuplicateEdge {
        v: String,
        w: String,
        name: Option<String>,
    },

    #[error("node {id} does not exist")]
    MissingNode { id: String },

    #[error("setting parent of {child} to {parent} would create a cycle in the hierarchy")]
    HierarchyCycle { child: String, parent: String },

    #[error("graph is not acyclic (cycle through {node})")]
    Cycle { node: String },
}
