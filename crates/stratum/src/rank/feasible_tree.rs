//! Tight spanning tree construction.
//!
//! Starting from the first node, the tree grows through tight edges. When it cannot grow, the
//! non-tree edge with minimum slack that touches the tree is made tight by shifting every tree
//! node's rank, and growth resumes. The ranking stays feasible throughout.

use super::tree::{Tree, TreeEdgeLabel, TreeNodeLabel};
use super::util::slack;
use crate::graphlib::{EdgeKey, GraphOptions};
use crate::LayoutGraph;

pub fn feasible_tree(g: &mut LayoutGraph) -> Tree {
    let mut t: Tree = Tree::new(GraphOptions {
        directed: false,
        ..Default::default()
    });

    let Some(start) = g.nodes().next().map(str::to_string) else {
        return t;
    };
    t.set_node(start, TreeNodeLabel::default());

    let size = g.node_count();
    while tight_tree(&mut t, g) < size {
        // Only reachable when `g` is disconnected; the caller checks connectivity.
        let Some((edge, edge_slack)) = find_min_slack_edge(&t, g) else {
            break;
        };
        let delta = if t.has_node(&edge.v) {
            edge_slack
        } else {
            -edge_slack
        };
        shift_ranks(&t, g, delta);
    }

    t
}

/// Extends `t` through tight edges and returns the tree size.
fn tight_tree(t: &mut Tree, g: &LayoutGraph) -> usize {
    let mut stack: Vec<String> = t.node_ids();
    while let Some(v) = stack.pop() {
        for e in g.node_edges(&v) {
            let w = e.other(&v).to_string();
            if t.has_node(&w) || slack(g, &e) != 0 {
                continue;
            }
            t.set_node(w.clone(), TreeNodeLabel::default());
            t.set_edge_with_label(v.clone(), w.clone(), TreeEdgeLabel::default());
            stack.push(w);
        }
    }
    t.node_count()
}

/// The minimum-slack edge with exactly one endpoint in the tree.
fn find_min_slack_edge(t: &Tree, g: &LayoutGraph) -> Option<(EdgeKey, i32)> {
    let mut best: Option<(EdgeKey, i32)> = None;
    for e in g.edges() {
        if t.has_node(&e.v) == t.has_node(&e.w) {
            continue;
        }
        let s = slack(g, e);
        if best.as_ref().is_none_or(|(_, b)| s < *b) {
            best = Some((e.clone(), s));
        }
    }
    best
}

fn shift_ranks(t: &Tree, g: &mut LayoutGraph, delta: i32) {
    for v in t.nodes() {
        if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
            *rank += delta;
        }
    }
}
