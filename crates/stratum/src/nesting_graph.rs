//! Nesting graph construction for compound graphs.
//!
//! Adds a synthetic root, a top and bottom border node for every cluster and weighted nesting
//! edges so that ranking sees a connected graph and places every cluster member strictly
//! between its cluster's borders. Every edge minlen is scaled by `node_sep = 2 * height + 1` to
//! leave room for border ranks between real ranks.

use crate::graphlib::EdgeKey;
use crate::util::add_dummy_node;
use crate::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, UniqueIds};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Depth of every node in the hierarchy; top level nodes have depth 1.
fn tree_depths(g: &LayoutGraph) -> FxHashMap<String, i32> {
    let mut depths: FxHashMap<String, i32> = FxHashMap::default();
    let mut stack: Vec<(&str, i32)> = g.children_root().into_iter().map(|v| (v, 1)).collect();
    while let Some((v, depth)) = stack.pop() {
        depths.insert(v.to_string(), depth);
        for child in g.children(v) {
            stack.push((child, depth + 1));
        }
    }
    depths
}

fn nesting_edge(weight: f64, minlen: i32) -> EdgeLabel {
    EdgeLabel {
        nesting_edge: true,
        ..EdgeLabel::weighted(weight, minlen)
    }
}

fn add_border(g: &mut LayoutGraph, ids: &mut UniqueIds, dummy: Dummy, prefix: &str) -> String {
    add_dummy_node(g, ids, dummy, NodeLabel::default(), prefix)
}

struct Frame {
    v: String,
    children: Vec<String>,
    next: usize,
}

pub fn run(g: &mut LayoutGraph, ids: &mut UniqueIds) {
    let root = add_dummy_node(g, ids, Dummy::NestingRoot, NodeLabel::default(), "_root");
    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1).max(1) - 1;
    let node_sep = 2 * height + 1;

    g.graph_mut().nesting_root = Some(root.clone());
    g.for_each_edge_mut(|_, e| e.minlen = e.minlen.saturating_mul(node_sep));

    let mut total_weight = 0.0;
    g.for_each_edge(|_, e| total_weight += e.weight);
    let weight = total_weight + 1.0;

    let top_level: Vec<String> = g
        .children_root()
        .into_iter()
        .filter(|v| *v != root)
        .map(str::to_string)
        .collect();

    let mut borders = 0usize;
    for start in top_level {
        let mut stack: Vec<Frame> = Vec::new();
        enter(g, ids, &root, node_sep, &start, &mut stack, &mut borders);

        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.children.get(frame.next).cloned() {
                frame.next += 1;
                let v = frame.v.clone();
                enter(g, ids, &root, node_sep, &child, &mut stack, &mut borders);
                // A leaf is finished as soon as it is entered; clusters link when popped.
                if !g.has_children(&child) {
                    link_child(g, &v, &child, weight, height, &depths);
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            let v = done.v;
            if let Some(parent) = stack.last() {
                let p = parent.v.clone();
                link_child(g, &p, &v, weight, height, &depths);
            } else if g.parent(&v).is_none() {
                let top = g.node(&v).and_then(|n| n.border_top.clone());
                let depth = depths.get(&v).copied().unwrap_or(1);
                if let Some(top) = top {
                    g.set_edge_key(
                        EdgeKey::new(root.clone(), top, None::<String>),
                        nesting_edge(0.0, height + depth),
                    );
                }
            }
        }
    }

    g.graph_mut().node_rank_factor = Some(node_sep);
    debug!(height, node_sep, borders, "nesting graph");
}

/// Visits `v`: leaves are anchored on the root, clusters get border nodes and a frame.
fn enter(
    g: &mut LayoutGraph,
    ids: &mut UniqueIds,
    root: &str,
    node_sep: i32,
    v: &str,
    stack: &mut Vec<Frame>,
    borders: &mut usize,
) {
    let children: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();
    if children.is_empty() {
        if v != root {
            g.set_edge_key(
                EdgeKey::new(root, v, None::<String>),
                nesting_edge(0.0, node_sep),
            );
        }
        return;
    }

    let top = add_border(g, ids, Dummy::NestingBorderTop, "_bt");
    let bottom = add_border(g, ids, Dummy::NestingBorderBottom, "_bb");
    g.set_parent(top.clone(), v);
    g.set_parent(bottom.clone(), v);
    if let Some(label) = g.node_mut(v) {
        label.border_top = Some(top);
        label.border_bottom = Some(bottom);
    }
    *borders += 2;

    stack.push(Frame {
        v: v.to_string(),
        children,
        next: 0,
    });
}

/// Links cluster `v` to its finished `child`: `top(v) -> top(child)` and
/// `bottom(child) -> bottom(v)`.
fn link_child(
    g: &mut LayoutGraph,
    v: &str,
    child: &str,
    weight: f64,
    height: i32,
    depths: &FxHashMap<String, i32>,
) {
    let Some(parent) = g.node(v) else {
        return;
    };
    let (Some(top), Some(bottom)) = (parent.border_top.clone(), parent.border_bottom.clone())
    else {
        return;
    };
    let child_label = g.node(child);
    let child_top = child_label
        .and_then(|n| n.border_top.clone())
        .unwrap_or_else(|| child.to_string());
    let child_bottom = child_label
        .and_then(|n| n.border_bottom.clone())
        .unwrap_or_else(|| child.to_string());

    // Leaves have no internal edges pulling them in, so they get the stronger pull.
    let this_weight = if child_label.is_some_and(|n| n.border_top.is_some()) {
        weight / 2.0
    } else {
        weight
    };
    let minlen = if child_top != child_bottom {
        1
    } else {
        height - depths.get(v).copied().unwrap_or(1) + 1
    };

    g.set_edge_key(
        EdgeKey::new(top, child_top, None::<String>),
        nesting_edge(this_weight, minlen),
    );
    g.set_edge_key(
        EdgeKey::new(child_bottom, bottom, None::<String>),
        nesting_edge(this_weight, minlen),
    );
}

/// Removes the nesting root and every nesting edge.
pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }
    let nesting: Vec<EdgeKey> = g
        .edges()
        .filter(|e| g.edge_by_key(e).is_some_and(|l| l.nesting_edge))
        .cloned()
        .collect();
    for e in nesting {
        g.remove_edge_key(&e);
    }
}
