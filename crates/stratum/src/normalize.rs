//! Splits edges spanning more than one rank into chains of unit-length edges.
//!
//! Each interior rank gets a `Dummy::Edge` node; the rank recorded as the edge's `label_rank`
//! gets a `Dummy::EdgeLabel` node sized like the label instead. [`undo`] collapses every chain
//! back into its original edge, turning dummy positions into routing points.

use crate::graphlib::EdgeKey;
use crate::util::add_dummy_node;
use crate::{Dummy, DummyChain, EdgeLabel, LayoutGraph, NodeLabel, Point, UniqueIds};
use tracing::debug;

pub fn run(g: &mut LayoutGraph, ids: &mut UniqueIds) {
    g.graph_mut().dummy_chains.clear();
    let mut dummies = 0usize;
    for e in g.edge_keys() {
        dummies += normalize_edge(g, ids, e);
    }
    debug!(chains = g.graph().dummy_chains.len(), dummies, "normalize");
}

fn normalize_edge(g: &mut LayoutGraph, ids: &mut UniqueIds, e: EdgeKey) -> usize {
    let v_rank = g.node(&e.v).and_then(|n| n.rank).unwrap_or(0);
    let w_rank = g.node(&e.w).and_then(|n| n.rank).unwrap_or(0);
    if w_rank <= v_rank + 1 {
        return 0;
    }
    let Some(mut label) = g.remove_edge_key(&e) else {
        return 0;
    };
    label.points.clear();

    let mut prev = e.v.clone();
    let mut head: Option<String> = None;
    for rank in (v_rank + 1)..w_rank {
        let (node, dummy) = if label.label_rank == Some(rank) {
            (
                NodeLabel {
                    rank: Some(rank),
                    ..NodeLabel::sized(label.width, label.height)
                },
                Dummy::EdgeLabel {
                    labelpos: label.labelpos,
                },
            )
        } else {
            (
                NodeLabel {
                    rank: Some(rank),
                    ..Default::default()
                },
                Dummy::Edge,
            )
        };
        let d = add_dummy_node(g, ids, dummy, node, "_d");
        g.set_edge_named(
            prev,
            d.clone(),
            e.name.clone(),
            Some(EdgeLabel::weighted(label.weight, 1)),
        );
        head.get_or_insert_with(|| d.clone());
        prev = d;
    }
    g.set_edge_named(
        prev,
        e.w.clone(),
        e.name.clone(),
        Some(EdgeLabel::weighted(label.weight, 1)),
    );

    let count = (w_rank - v_rank - 1) as usize;
    if let Some(head) = head {
        g.graph_mut().dummy_chains.push(DummyChain {
            head,
            edge: e,
            label,
        });
    }
    count
}

pub fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for chain in chains {
        let mut label = chain.label;
        let mut v = chain.head;
        loop {
            let Some(node) = g.node(&v) else {
                break;
            };
            if !node.dummy.as_ref().is_some_and(Dummy::is_chain) {
                break;
            }
            if let (Some(x), Some(y)) = (node.x, node.y) {
                label.points.push(Point { x, y });
                if matches!(node.dummy, Some(Dummy::EdgeLabel { .. })) {
                    label.x = Some(x);
                    label.y = Some(y);
                    label.width = node.width;
                    label.height = node.height;
                }
            }
            let next = g.successors(&v).first().map(|s| s.to_string());
            g.remove_node(&v);
            match next {
                Some(w) => v = w,
                None => break,
            }
        }
        g.set_edge_key(chain.edge, label);
    }
}
