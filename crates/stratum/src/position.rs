//! Coordinate assignment for ranked and ordered graphs.
//!
//! y comes from stacking ranks; x comes from a [`Positioner`], [`MedianPlacement`] by default.
//! Both assume the top-to-bottom frame set up by `coordinate_system::adjust`.

pub mod placement;

pub use placement::{MedianPlacement, Positioner};

use crate::util::build_layer_matrix;
use crate::LayoutGraph;

pub fn position(g: &mut LayoutGraph, positioner: &dyn Positioner) {
    position_y(g);
    for (v, x) in positioner.position_x(g) {
        if let Some(node) = g.node_mut(&v) {
            node.x = Some(x);
        }
    }
}

/// Centres every rank on a line: each rank is as tall as its tallest node and consecutive
/// ranks are `ranksep` apart.
pub fn position_y(g: &mut LayoutGraph) {
    let rank_sep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in build_layer_matrix(g) {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in &layer {
            if let Some(node) = g.node_mut(v) {
                node.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + rank_sep;
    }
}
