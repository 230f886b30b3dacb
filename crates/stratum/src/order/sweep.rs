//! Layer-by-layer barycenter sweeps.

use super::barycenter::sort_subgraph;
use super::constraints::add_subgraph_constraints;
use super::cross_count::cross_count;
use super::layer_graph::{build_layer_graph, refresh_orders};
use super::types::{ConstraintGraph, LayerGraph, Relationship};
use crate::error::Result;
use crate::graphlib::GraphOptions;
use crate::util::{build_layer_matrix, max_rank};
use crate::{LayoutGraph, UniqueIds};
use tracing::{debug, trace};

/// Refines a seed layering into one with fewer edge crossings.
///
/// Implementations may read and write node `order` on `g`; the caller writes the returned
/// layering back as the final order.
pub trait CrossingMinimizer {
    fn refine(
        &self,
        g: &mut LayoutGraph,
        seed: Vec<Vec<String>>,
        ids: &mut UniqueIds,
    ) -> Result<Vec<Vec<String>>>;
}

/// Alternating down (in-edges) and up (out-edges) sweeps with a left or right tie bias, keeping
/// the layering with the fewest crossings. Stops after `max_stale_sweeps` sweeps without
/// improvement.
#[derive(Debug, Clone, Copy)]
pub struct BarycenterSweep {
    pub max_stale_sweeps: usize,
}

impl Default for BarycenterSweep {
    fn default() -> Self {
        Self {
            max_stale_sweeps: 4,
        }
    }
}

impl CrossingMinimizer for BarycenterSweep {
    fn refine(
        &self,
        g: &mut LayoutGraph,
        seed: Vec<Vec<String>>,
        ids: &mut UniqueIds,
    ) -> Result<Vec<Vec<String>>> {
        let Some(max) = max_rank(g) else {
            return Ok(seed);
        };

        let mut down: Vec<LayerGraph> = (1..=max)
            .map(|r| build_layer_graph(g, r, Relationship::InEdges, ids))
            .collect::<Result<_>>()?;
        let mut up: Vec<LayerGraph> = (0..max)
            .rev()
            .map(|r| build_layer_graph(g, r, Relationship::OutEdges, ids))
            .collect::<Result<_>>()?;

        let mut best = seed;
        let mut best_cc = f64::INFINITY;
        let mut i = 0usize;
        let mut last_best = 0usize;
        while last_best < self.max_stale_sweeps {
            let layer_graphs = if i % 2 == 1 { &mut down } else { &mut up };
            sweep_layer_graphs(g, layer_graphs, i % 4 >= 2);

            let layering = build_layer_matrix(g);
            let cc = cross_count(g, &layering);
            trace!(sweep = i, crossings = cc, "order sweep");
            if cc < best_cc {
                last_best = 0;
                best_cc = cc;
                best = layering;
            }
            i += 1;
            last_best += 1;
        }

        debug!(crossings = best_cc, sweeps = i, "order");
        Ok(best)
    }
}

fn sweep_layer_graphs(g: &mut LayoutGraph, layer_graphs: &mut [LayerGraph], bias_right: bool) {
    let mut cg: ConstraintGraph = ConstraintGraph::new(GraphOptions::default());
    for lg in layer_graphs {
        refresh_orders(lg, g);
        let root = lg.graph().root.clone();
        let sorted = sort_subgraph(lg, &root, &cg, bias_right);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
            if let Some(node) = lg.node_mut(v) {
                node.order = Some(i);
            }
        }
        add_subgraph_constraints(lg, &mut cg, &sorted.vs);
    }
}
