//! Rank assignment.
//!
//! Every strategy requires a connected DAG and leaves `head.rank - tail.rank >= minlen` on every
//! edge. Ranks may be negative or non-contiguous; later phases normalize them.

pub mod feasible_tree;
pub mod network_simplex;
pub mod tree;
pub mod util;

use crate::error::{Error, Result};
use crate::graphlib::alg;
use crate::{LayoutGraph, Ranker};
use tracing::debug;

pub fn rank(g: &mut LayoutGraph) -> Result<()> {
    let components = alg::components(g).len();
    if components > 1 {
        return Err(Error::Disconnected { components });
    }

    let ranker = g.graph().ranker;
    debug!(?ranker, nodes = g.node_count(), "rank");
    match ranker {
        Ranker::NetworkSimplex => network_simplex::network_simplex(g)?,
        Ranker::TightTree => {
            util::longest_path(g)?;
            feasible_tree::feasible_tree(g);
        }
        Ranker::LongestPath => util::longest_path(g)?,
    }
    Ok(())
}
