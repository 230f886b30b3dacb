//! Directed multigraph / compound graph container used by `stratum`.
//!
//! The API follows the usual graphlib shape: string node ids, `(v, w, name)` edge keys, label
//! values per node and edge, an optional parent/child hierarchy, and a small `alg` module with
//! traversal helpers.

pub mod error;
pub mod graph;

pub use error::{Error, Result};
pub use graph::{EdgeKey, Graph, GraphOptions, alg};
