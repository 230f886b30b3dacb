//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! 1. Simplify the graph (merge parallel edges) and seed ranks with longest path.
//! 2. Build a feasible tight spanning tree.
//! 3. While a tree edge has a negative cut value, replace it with the non-tree edge of minimum
//!    slack that crosses the same cut, then recompute ranks from the new tree.
//!
//! The result minimizes the total weighted edge length `sum(weight * (head.rank - tail.rank))`.

use super::feasible_tree::feasible_tree;
use super::tree::{Tree, TreeEdgeLabel, TreeNodeLabel};
use super::util::{longest_path, slack};
use crate::error::Result;
use crate::graphlib::{EdgeKey, alg};
use crate::util::simplify;
use crate::LayoutGraph;
use tracing::debug;

pub fn network_simplex(g: &mut LayoutGraph) -> Result<()> {
    let mut sg = simplify(g);
    longest_path(&mut sg)?;
    let mut t = feasible_tree(&mut sg);
    init_low_lim_values(&mut t, None);
    init_cut_values(&mut t, &sg);

    let mut iterations = 0usize;
    while let Some(e) = leave_edge(&t) {
        let Some(f) = enter_edge(&t, &sg, &e) else {
            break;
        };
        exchange_edges(&mut t, &mut sg, &e, &f);
        iterations += 1;
    }
    debug!(iterations, "network simplex");

    for v in g.node_ids() {
        let rank = sg.node(&v).and_then(|n| n.rank);
        if let Some(label) = g.node_mut(&v) {
            label.rank = rank;
        }
    }
    Ok(())
}

/// Assigns postorder `lim`, subtree `low` and `parent` to every tree node, rooted at `root` (the
/// first tree node by default).
pub fn init_low_lim_values(t: &mut Tree, root: Option<&str>) {
    let Some(root) = root
        .map(str::to_string)
        .or_else(|| t.nodes().next().map(str::to_string))
    else {
        return;
    };

    let mut visited: rustc_hash::FxHashSet<String> = rustc_hash::FxHashSet::default();
    let mut next_lim = 1;
    // (node, parent, low, neighbours, next neighbour)
    let mut stack: Vec<(String, Option<String>, i32, Vec<String>, usize)> = Vec::new();
    visited.insert(root.clone());
    let neighbors = owned(t.neighbors(&root));
    stack.push((root, None, next_lim, neighbors, 0));

    while let Some((v, _, _, neighbors, idx)) = stack.last_mut() {
        if let Some(w) = neighbors.get(*idx).cloned() {
            *idx += 1;
            if visited.insert(w.clone()) {
                let parent = Some(v.clone());
                let neighbors = owned(t.neighbors(&w));
                stack.push((w, parent, next_lim, neighbors, 0));
            }
            continue;
        }
        let Some((v, parent, low, _, _)) = stack.pop() else {
            break;
        };
        if let Some(label) = t.node_mut(&v) {
            label.low = low;
            label.lim = next_lim;
            label.parent = parent;
        }
        next_lim += 1;
    }
}

fn owned(v: Vec<&str>) -> Vec<String> {
    v.into_iter().map(str::to_string).collect()
}

/// Computes the cut value of every tree edge, leaves first.
pub fn init_cut_values(t: &mut Tree, g: &LayoutGraph) {
    let roots: Vec<String> = t.node_ids();
    let roots: Vec<&str> = roots.iter().map(String::as_str).collect();
    let mut vs = alg::postorder(t, &roots);
    // The root has no parent edge.
    vs.pop();
    for v in vs {
        assign_cut_value(t, g, &v);
    }
}

fn assign_cut_value(t: &mut Tree, g: &LayoutGraph, child: &str) {
    let Some(parent) = t.node(child).and_then(|n| n.parent.clone()) else {
        return;
    };
    let cutvalue = calc_cut_value(t, g, child);
    if let Some(label) = t.edge_mut(child, &parent, None) {
        label.cutvalue = cutvalue;
    }
}

/// Cut value of the tree edge between `child` and its parent. Requires the cut values of every
/// other tree edge incident on `child` to be known already.
pub fn calc_cut_value(t: &Tree, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = t.node(child).and_then(|n| n.parent.as_deref()) else {
        return 0.0;
    };

    let (child_is_tail, graph_edge) = match g.edge(child, parent, None) {
        Some(e) => (true, Some(e)),
        None => (false, g.edge(parent, child, None)),
    };
    let mut cut_value = graph_edge.map_or(0.0, |e| e.weight);

    for e in g.node_edges(child) {
        let is_out_edge = e.v == child;
        let other = if is_out_edge { &e.w } else { &e.v };
        if other == parent {
            continue;
        }
        let points_to_head = is_out_edge == child_is_tail;
        let other_weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
        cut_value += if points_to_head {
            other_weight
        } else {
            -other_weight
        };

        if let Some(tree_edge) = t.edge(child, other, None) {
            let other_cut = tree_edge.cutvalue;
            cut_value += if points_to_head {
                -other_cut
            } else {
                other_cut
            };
        }
    }

    cut_value
}

/// First tree edge with a negative cut value.
pub fn leave_edge(t: &Tree) -> Option<EdgeKey> {
    t.edges()
        .find(|e| t.edge_by_key(e).is_some_and(|l| l.cutvalue < 0.0))
        .cloned()
}

/// The minimum-slack graph edge crossing the cut induced by removing tree edge `edge`, oriented
/// opposite to it.
pub fn enter_edge(t: &Tree, g: &LayoutGraph, edge: &EdgeKey) -> Option<EdgeKey> {
    let (mut v, mut w) = (edge.v.as_str(), edge.w.as_str());
    // Tree edges are undirected; orient as in the graph.
    if !g.has_edge(v, w, None) {
        std::mem::swap(&mut v, &mut w);
    }

    let v_label = t.node(v)?;
    let w_label = t.node(w)?;
    let (tail_label, flip) = if v_label.lim > w_label.lim {
        (w_label, true)
    } else {
        (v_label, false)
    };

    let mut best: Option<(EdgeKey, i32)> = None;
    for e in g.edges() {
        let (Some(ev), Some(ew)) = (t.node(&e.v), t.node(&e.w)) else {
            continue;
        };
        if flip != is_descendant(ev, tail_label) || flip == is_descendant(ew, tail_label) {
            continue;
        }
        let s = slack(g, e);
        if best.as_ref().is_none_or(|(_, b)| s < *b) {
            best = Some((e.clone(), s));
        }
    }
    best.map(|(e, _)| e)
}

/// Swaps tree edge `e` for graph edge `f` and recomputes the tree numbering, cut values and
/// ranks.
pub fn exchange_edges(t: &mut Tree, g: &mut LayoutGraph, e: &EdgeKey, f: &EdgeKey) {
    t.remove_edge(&e.v, &e.w, None);
    t.set_edge_with_label(f.v.clone(), f.w.clone(), TreeEdgeLabel::default());
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

fn update_ranks(t: &Tree, g: &mut LayoutGraph) {
    let Some(root) = t.nodes().next() else {
        return;
    };
    let vs = alg::preorder(t, &[root]);
    for v in vs.iter().skip(1) {
        let Some(parent) = t.node(v).and_then(|n| n.parent.as_deref()) else {
            continue;
        };
        let (minlen, flipped) = match g.edge(v, parent, None) {
            Some(e) => (e.minlen, false),
            None => (g.edge(parent, v, None).map_or(1, |e| e.minlen), true),
        };
        let parent_rank = g.node(parent).and_then(|n| n.rank).unwrap_or(0);
        if let Some(label) = g.node_mut(v) {
            label.rank = Some(if flipped {
                parent_rank + minlen
            } else {
                parent_rank - minlen
            });
        }
    }
}

fn is_descendant(v: &TreeNodeLabel, root: &TreeNodeLabel) -> bool {
    root.low <= v.lim && v.lim <= root.lim
}
