//! Layered (Sugiyama-style) layout for directed graphs that may contain cycles and clusters.
//!
//! [`layout`] takes a [`LayoutGraph`] carrying node sizes and layout options and writes back node
//! coordinates, container sizes, edge routing points, edge label positions and the overall
//! bounding box. The individual phases are public so they can be run and inspected on their own.

pub use stratum_graph as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod data {
    pub mod list;
}

pub mod acyclic;
pub mod add_border_segments;
pub mod config;
pub mod coordinate_system;
pub mod error;
pub mod greedy_fas;
pub mod model;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod pipeline;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

pub use error::{Error, Result};
pub use model::{
    Acyclicer, Align, BorderSide, Dummy, DummyChain, EdgeLabel, GraphLabel, LabelPos, LayoutGraph,
    NodeLabel, Point, RankDir, Ranker, SelfEdge,
};
pub use pipeline::{Layout, layout};
pub use util::UniqueIds;
