//! Node ordering within ranks (crossing minimization).
//!
//! [`order`] seeds a layering with [`init_order`] and hands it to a [`CrossingMinimizer`]
//! ([`BarycenterSweep`] by default), then writes the refined layering back as node `order`.

pub mod barycenter;
pub mod constraints;
pub mod cross_count;
pub mod init_order;
pub mod layer_graph;
pub mod sweep;
pub mod types;

pub use barycenter::{
    BarycenterEntry, ResolvedEntry, SortResult, barycenter, resolve_conflicts, sort,
    sort_subgraph,
};
pub use constraints::add_subgraph_constraints;
pub use cross_count::cross_count;
pub use init_order::init_order;
pub use layer_graph::build_layer_graph;
pub use sweep::{BarycenterSweep, CrossingMinimizer};
pub use types::{
    ConstraintGraph, LayerGraph, LayerGraphLabel, LayerNode, Relationship, WeightLabel,
};

use crate::error::Result;
use crate::{LayoutGraph, UniqueIds};

pub fn order(
    g: &mut LayoutGraph,
    minimizer: &dyn CrossingMinimizer,
    ids: &mut UniqueIds,
) -> Result<()> {
    let layering = init_order(g)?;
    assign_order(g, &layering);
    let best = minimizer.refine(g, layering, ids)?;
    assign_order(g, &best);
    Ok(())
}

pub fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
    }
}
