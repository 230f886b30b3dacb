//! Per-rank graphs for the ordering sweeps.

use super::types::{LayerGraph, LayerGraphLabel, LayerNode, Relationship, WeightLabel};
use crate::error::{Error, Result};
use crate::graphlib::GraphOptions;
use crate::{LayoutGraph, UniqueIds};

/// Builds the graph used to sort the nodes of `rank`.
///
/// The result holds every node at `rank` and every cluster whose `min_rank..=max_rank` covers
/// it, with hierarchy preserved; top level nodes hang off a fresh root named in the graph label.
/// Neighbours selected by `relationship` are added without hierarchy, and edges always point
/// from the neighbour to the movable node. Parallel edges merge by summing their weights.
pub fn build_layer_graph(
    g: &LayoutGraph,
    rank: i32,
    relationship: Relationship,
    ids: &mut UniqueIds,
) -> Result<LayerGraph> {
    let root = ids.node_id(g, "_root");
    let mut result: LayerGraph = LayerGraph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    result.set_graph(LayerGraphLabel { root: root.clone() });
    result.set_node(root.clone(), LayerNode::default());

    for v in g.nodes() {
        let Some(node) = g.node(v) else {
            continue;
        };
        let in_range = match (node.rank, node.min_rank, node.max_rank) {
            (Some(r), _, _) => r == rank,
            (None, Some(min), Some(max)) => min <= rank && rank <= max,
            _ if g.has_children(v) => false,
            _ => {
                return Err(Error::MissingRank {
                    node: v.to_string(),
                });
            }
        };
        if !in_range {
            continue;
        }

        if !result.has_node(v) {
            result.set_node(v, LayerNode::default());
        }
        result.set_parent(v, g.parent(v).unwrap_or(&root));

        let edges = match relationship {
            Relationship::InEdges => g.in_edges(v, None),
            Relationship::OutEdges => g.out_edges(v, None),
        };
        for e in edges {
            let u = e.other(v);
            let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
            let existing = result.edge(u, v, None).map_or(0.0, |l| l.weight);
            if !result.has_node(u) {
                result.set_node(u, LayerNode::default());
            }
            result.set_edge_with_label(
                u,
                v,
                WeightLabel {
                    weight: weight + existing,
                },
            );
        }

        if node.min_rank.is_some() {
            if let Some(label) = result.node_mut(v) {
                label.border_left = node.border_left.get(&rank).cloned();
                label.border_right = node.border_right.get(&rank).cloned();
            }
        }
    }

    // Orders are read through the layer graph during sorting.
    for v in result.node_ids() {
        let order = g.node(&v).and_then(|n| n.order);
        if let Some(label) = result.node_mut(&v) {
            label.order = order;
        }
    }

    Ok(result)
}

/// Copies the current orders from `g` into the layer graph's nodes.
pub fn refresh_orders(lg: &mut LayerGraph, g: &LayoutGraph) {
    lg.for_each_node_mut(|v, label| {
        label.order = g.node(v).and_then(|n| n.order);
    });
}
