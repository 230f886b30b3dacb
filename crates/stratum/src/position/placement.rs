//! Horizontal placement.
//!
//! [`MedianPlacement`] packs each layer left to right, then repeatedly pulls every node towards
//! the median x of its neighbours in the adjacent layer. Each pull is projected back onto the
//! separation constraints of its layer with a weighted isotonic regression (pool adjacent
//! violators), so layer order and the nodesep/edgesep gaps always hold.

use crate::util::build_layer_matrix;
use crate::{Dummy, LabelPos, LayoutGraph, NodeLabel};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Assigns x coordinates to every ranked node.
///
/// Implementations must keep each layer's order and leave at least the separation given by
/// `nodesep` (real nodes) or `edgesep` (dummy nodes) between neighbouring boxes.
pub trait Positioner {
    fn position_x(&self, g: &LayoutGraph) -> FxHashMap<String, f64>;
}

#[derive(Debug, Clone, Copy)]
pub struct MedianPlacement {
    /// Number of median passes after the initial packing.
    pub passes: usize,
}

impl Default for MedianPlacement {
    fn default() -> Self {
        Self { passes: 8 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Median {
    Mean,
    Lower,
    Upper,
}

impl Positioner for MedianPlacement {
    fn position_x(&self, g: &LayoutGraph) -> FxHashMap<String, f64> {
        let layering = build_layer_matrix(g);
        let gl = g.graph();
        let (node_sep, edge_sep) = (gl.nodesep, gl.edgesep);

        let mut xs: FxHashMap<String, f64> = FxHashMap::default();
        let mut gaps: Vec<Vec<f64>> = Vec::with_capacity(layering.len());
        for layer in &layering {
            let mut layer_gaps = Vec::with_capacity(layer.len().saturating_sub(1));
            let mut x = 0.0;
            for (i, v) in layer.iter().enumerate() {
                if i > 0 {
                    let gap = sep(g, &layer[i - 1], v, node_sep, edge_sep);
                    x += gap;
                    layer_gaps.push(gap);
                }
                xs.insert(v.clone(), x);
            }
            gaps.push(layer_gaps);
        }

        let (fixed_up, median) = match gl.align {
            Some(align) if align.is_left() => (Some(align.is_up()), Median::Lower),
            Some(align) => (Some(align.is_up()), Median::Upper),
            None => (None, Median::Mean),
        };

        for pass in 0..self.passes {
            // "Up" alignment follows predecessors, so it sweeps downwards.
            let downward = fixed_up.unwrap_or(pass % 2 == 0);
            let ranks: Vec<usize> = if downward {
                (1..layering.len()).collect()
            } else {
                (0..layering.len().saturating_sub(1)).rev().collect()
            };
            for r in ranks {
                let layer = &layering[r];
                let mut targets = Vec::with_capacity(layer.len());
                let mut weights = Vec::with_capacity(layer.len());
                for v in layer {
                    let current = xs.get(v).copied().unwrap_or(0.0);
                    let neighbours = if downward {
                        g.predecessors(v)
                    } else {
                        g.successors(v)
                    };
                    let mut positions: Vec<f64> = neighbours
                        .into_iter()
                        .filter_map(|u| xs.get(u).copied())
                        .collect();
                    positions.sort_by(f64::total_cmp);
                    targets.push(median_of(&positions, median).unwrap_or(current));
                    weights.push(node_weight(g.node(v)));
                }
                let placed = project(&targets, &weights, &gaps[r]);
                for (v, x) in layer.iter().zip(placed) {
                    xs.insert(v.clone(), x);
                }
            }
            trace!(pass, downward, "median placement pass");
        }

        xs
    }
}

/// Long-edge dummies pull harder so long edges stay straight.
fn node_weight(node: Option<&NodeLabel>) -> f64 {
    match node.and_then(|n| n.dummy.as_ref()) {
        Some(Dummy::Edge) => 2.0,
        _ => 1.0,
    }
}

fn median_of(sorted: &[f64], median: Median) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        return Some(sorted[mid]);
    }
    Some(match median {
        Median::Mean => (sorted[mid - 1] + sorted[mid]) / 2.0,
        Median::Lower => sorted[mid - 1],
        Median::Upper => sorted[mid],
    })
}

/// Minimum distance between the centres of `left` and `right` when adjacent in a layer.
/// Edge label dummies positioned left or right of their edge reserve their width on that side.
fn sep(g: &LayoutGraph, left: &str, right: &str, node_sep: f64, edge_sep: f64) -> f64 {
    let (Some(l), Some(r)) = (g.node(left), g.node(right)) else {
        return node_sep;
    };
    let spacing = |n: &NodeLabel| if n.is_dummy() { edge_sep } else { node_sep };

    let mut sum = l.width / 2.0 + spacing(l) / 2.0 + spacing(r) / 2.0 + r.width / 2.0;
    match label_pos(l) {
        Some(LabelPos::L) => sum += l.width / 2.0,
        Some(LabelPos::R) => sum -= l.width / 2.0,
        _ => {}
    }
    match label_pos(r) {
        Some(LabelPos::L) => sum -= r.width / 2.0,
        Some(LabelPos::R) => sum += r.width / 2.0,
        _ => {}
    }
    sum
}

fn label_pos(n: &NodeLabel) -> Option<LabelPos> {
    match n.dummy {
        Some(Dummy::EdgeLabel { labelpos }) => Some(labelpos),
        _ => None,
    }
}

/// Weighted least-squares fit of `targets` subject to `x[i + 1] - x[i] >= gaps[i]`.
///
/// Shifting by the cumulative gaps turns the constraints into plain monotonicity, which pool
/// adjacent violators solves exactly.
fn project(targets: &[f64], weights: &[f64], gaps: &[f64]) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(targets.len());
    let mut acc = 0.0;
    for i in 0..targets.len() {
        if i > 0 {
            acc += gaps.get(i - 1).copied().unwrap_or(0.0);
        }
        offsets.push(acc);
    }

    // (weighted sum, total weight, length)
    let mut blocks: Vec<(f64, f64, usize)> = Vec::new();
    for i in 0..targets.len() {
        let w = weights[i].max(f64::EPSILON);
        blocks.push((w * (targets[i] - offsets[i]), w, 1));
        while blocks.len() >= 2 {
            let (s2, w2, n2) = blocks[blocks.len() - 1];
            let (s1, w1, n1) = blocks[blocks.len() - 2];
            if s1 / w1 <= s2 / w2 {
                break;
            }
            blocks.pop();
            if let Some(last) = blocks.last_mut() {
                *last = (s1 + s2, w1 + w2, n1 + n2);
            }
        }
    }

    let mut out = Vec::with_capacity(targets.len());
    for (s, w, n) in blocks {
        let y = s / w;
        for _ in 0..n {
            out.push(y + offsets[out.len()]);
        }
    }
    out
}
