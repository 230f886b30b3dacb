//! Shared helpers: id generation, dummy nodes, layer matrices and rank bookkeeping.

use crate::graphlib::{Graph, GraphOptions};
use crate::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::debug;

/// Monotonic id source scoped to one layout run.
#[derive(Debug, Default, Clone)]
pub struct UniqueIds {
    counter: u64,
}

impl UniqueIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}{}", self.counter)
    }

    /// Next id with `prefix` that is not already a node of `g`.
    pub fn node_id<N, E, G>(&mut self, g: &Graph<N, E, G>, prefix: &str) -> String
    where
        N: Default + 'static,
        E: Default + 'static,
        G: Default,
    {
        loop {
            let v = self.next(prefix);
            if !g.has_node(&v) {
                return v;
            }
        }
    }
}

/// Adds a synthetic node of kind `dummy` with a fresh id and returns the id.
pub fn add_dummy_node(
    g: &mut LayoutGraph,
    ids: &mut UniqueIds,
    dummy: Dummy,
    mut label: NodeLabel,
    prefix: &str,
) -> String {
    let v = ids.node_id(g, prefix);
    label.dummy = Some(dummy);
    g.set_node(v.clone(), label);
    v
}

/// Collapses a multigraph into a simple graph: parallel edges merge with summed weight and the
/// largest minlen.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());
    g.for_each_node(|v, label| {
        simplified.set_node(v, label.clone());
    });
    g.for_each_edge(|e, label| {
        let merged = match simplified.edge(&e.v, &e.w, None) {
            Some(prev) => {
                EdgeLabel::weighted(prev.weight + label.weight, prev.minlen.max(label.minlen))
            }
            None => EdgeLabel::weighted(label.weight, label.minlen),
        };
        simplified.set_edge_with_label(e.v.clone(), e.w.clone(), merged);
    });
    simplified
}

/// Copy of `g` without hierarchy: leaf nodes and every edge. Nodes with children are dropped.
pub fn as_non_compound_graph(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions {
        multigraph: g.is_multigraph(),
        ..Default::default()
    });
    simplified.set_graph(g.graph().clone());
    g.for_each_node(|v, label| {
        if !g.has_children(v) {
            simplified.set_node(v, label.clone());
        }
    });
    g.for_each_edge(|e, label| {
        simplified.set_edge_key(e.clone(), label.clone());
    });
    simplified
}

/// Nodes grouped by rank and sorted by order. Nodes without a rank are skipped; nodes without an
/// order keep insertion order after the ordered ones.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let Some(max) = max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<(usize, String)>> = vec![Vec::new(); max.max(0) as usize + 1];
    g.for_each_node(|v, node| {
        let Some(rank) = node.rank else {
            return;
        };
        if rank < 0 {
            return;
        }
        let order = node.order.unwrap_or(usize::MAX);
        layers[rank as usize].push((order, v.to_string()));
    });
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(o, _)| *o);
            layer.into_iter().map(|(_, v)| v).collect()
        })
        .collect()
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    let mut max: Option<i32> = None;
    g.for_each_node(|_, n| {
        if let Some(rank) = n.rank {
            max = Some(max.map_or(rank, |m| m.max(rank)));
        }
    });
    max
}

/// Shifts ranks so the smallest rank is 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let mut min_rank: Option<i32> = None;
    g.for_each_node(|_, n| {
        if let Some(rank) = n.rank {
            min_rank = Some(min_rank.map_or(rank, |m| m.min(rank)));
        }
    });
    let Some(min_rank) = min_rank else {
        return;
    };
    g.for_each_node_mut(|_, n| {
        if let Some(rank) = n.rank.as_mut() {
            *rank -= min_rank;
        }
    });
}

/// Removes ranks that hold no node, except ranks that are multiples of the nesting
/// `node_rank_factor` (those keep room for cluster borders).
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let mut ranked: Vec<(String, i32)> = Vec::new();
    let mut occupied: BTreeSet<i32> = BTreeSet::new();
    g.for_each_node(|v, n| {
        let Some(rank) = n.rank else {
            return;
        };
        ranked.push((v.to_string(), rank));
        // A proxy whose midpoint falls between ranks does not pin its rank.
        if !matches!(n.dummy, Some(Dummy::EdgeProxy { on_rank: false, .. })) {
            occupied.insert(rank);
        }
    });
    let (Some(offset), Some(max)) = (
        ranked.iter().map(|(_, r)| *r).min(),
        ranked.iter().map(|(_, r)| *r).max(),
    ) else {
        return;
    };

    let factor = g.graph().node_rank_factor.unwrap_or(1).max(1);
    let mut delta = 0;
    let mut deltas: Vec<i32> = Vec::with_capacity((max - offset) as usize + 1);
    for i in 0..=(max - offset) {
        if !occupied.contains(&(i + offset)) && i % factor != 0 {
            delta -= 1;
        }
        deltas.push(delta);
    }

    for (v, rank) in ranked {
        let d = deltas[(rank - offset) as usize];
        if d == 0 {
            continue;
        }
        if let Some(r) = g.node_mut(&v).and_then(|n| n.rank.as_mut()) {
            *r += d;
        }
    }
}

/// Point where the segment from the centre of `rect` towards `point` leaves the rectangle.
///
/// If `point` is the centre itself the right edge midpoint is returned.
pub fn intersect_rect(rect: &NodeLabel, point: Point) -> Point {
    let x = rect.x.unwrap_or(0.0);
    let y = rect.y.unwrap_or(0.0);
    let dx = point.x - x;
    let dy = point.y - y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    if dx == 0.0 && dy == 0.0 {
        return Point { x: x + w, y };
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Point {
        x: x + sx,
        y: y + sy,
    }
}

/// Runs `f` and logs its duration at debug level.
pub fn time<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    debug!(phase = name, elapsed_us = start.elapsed().as_micros() as u64, "phase done");
    out
}
