//! Self loops are taken out before ranking and come back as loops drawn to the right of
//! their node.

use crate::util::{add_dummy_node, build_layer_matrix};
use crate::{Dummy, LayoutGraph, NodeLabel, Point, SelfEdge, UniqueIds};

/// Moves every self loop from the edge set onto its node's `self_edges`.
pub fn remove_self_edges(g: &mut LayoutGraph) {
    let loops: Vec<_> = g.edges().filter(|e| e.is_self_loop()).cloned().collect();
    for e in loops {
        let Some(label) = g.remove_edge_key(&e) else {
            continue;
        };
        if let Some(node) = g.node_mut(&e.v) {
            node.self_edges.push(SelfEdge { edge: e, label });
        }
    }
}

/// After ordering, places one `Dummy::SelfEdge` node per loop immediately right of its node,
/// shifting the rest of the layer.
pub fn insert_self_edges(g: &mut LayoutGraph, ids: &mut UniqueIds) {
    for layer in build_layer_matrix(g) {
        let mut shift = 0usize;
        for (i, v) in layer.iter().enumerate() {
            let Some(node) = g.node_mut(v) else {
                continue;
            };
            node.order = Some(i + shift);
            let rank = node.rank;
            let loops = std::mem::take(&mut node.self_edges);
            for SelfEdge { edge, label } in loops {
                shift += 1;
                let dummy = NodeLabel {
                    rank,
                    order: Some(i + shift),
                    ..NodeLabel::sized(label.width, label.height)
                };
                add_dummy_node(
                    g,
                    ids,
                    Dummy::SelfEdge {
                        edge,
                        label: Box::new(label),
                    },
                    dummy,
                    "_se",
                );
            }
        }
    }
}

/// Replaces each self-edge dummy with the restored loop, routed through five points that
/// bulge out to the dummy's x position.
pub fn position_self_edges(g: &mut LayoutGraph) {
    let dummies: Vec<String> = g
        .nodes()
        .filter(|v| {
            matches!(
                g.node(v).and_then(|n| n.dummy.as_ref()),
                Some(Dummy::SelfEdge { .. })
            )
        })
        .map(str::to_string)
        .collect();

    for v in dummies {
        let Some(node) = g.node(&v).cloned() else {
            continue;
        };
        let Some(Dummy::SelfEdge { edge, label }) = node.dummy else {
            continue;
        };
        let Some(owner) = g.node(&edge.v) else {
            continue;
        };
        let x = owner.x.unwrap_or(0.0) + owner.width / 2.0;
        let y = owner.y.unwrap_or(0.0);
        let dx = node.x.unwrap_or(0.0) - x;
        let dy = owner.height / 2.0;

        let mut label = *label;
        label.points = vec![
            Point { x: x + 2.0 * dx / 3.0, y: y - dy },
            Point { x: x + 5.0 * dx / 6.0, y: y - dy },
            Point { x: x + dx, y },
            Point { x: x + 5.0 * dx / 6.0, y: y + dy },
            Point { x: x + 2.0 * dx / 3.0, y: y + dy },
        ];
        label.x = node.x;
        label.y = node.y;

        g.remove_node(&v);
        g.set_edge_key(edge, label);
    }
}
