//! Per-rank left and right border nodes for every cluster.
//!
//! For each rank in a cluster's `min_rank..=max_rank`, a `Dummy::Border` node is added on each
//! side and parented to the cluster; consecutive border nodes on one side are chained by
//! unit-weight edges so ordering keeps them aligned.

use crate::graphlib::EdgeKey;
use crate::util::add_dummy_node;
use crate::{BorderSide, Dummy, EdgeLabel, LayoutGraph, NodeLabel, UniqueIds};

pub fn add_border_segments(g: &mut LayoutGraph, ids: &mut UniqueIds) {
    for v in clusters_postorder(g) {
        let Some((min_rank, max_rank)) = g
            .node(&v)
            .and_then(|n| Some((n.min_rank?, n.max_rank?)))
        else {
            continue;
        };
        if let Some(node) = g.node_mut(&v) {
            node.border_left.clear();
            node.border_right.clear();
        }
        for rank in min_rank..=max_rank {
            add_border_node(g, ids, &v, rank, BorderSide::Left);
            add_border_node(g, ids, &v, rank, BorderSide::Right);
        }
    }
}

/// Every node of the hierarchy, children before parents.
fn clusters_postorder(g: &LayoutGraph) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut stack: Vec<(String, bool)> = g
        .children_root()
        .into_iter()
        .rev()
        .map(|v| (v.to_string(), false))
        .collect();
    while let Some((v, expanded)) = stack.pop() {
        if expanded {
            out.push(v);
            continue;
        }
        let children: Vec<String> = g.children(&v).into_iter().map(str::to_string).collect();
        stack.push((v, true));
        for c in children.into_iter().rev() {
            stack.push((c, false));
        }
    }
    out
}

fn add_border_node(
    g: &mut LayoutGraph,
    ids: &mut UniqueIds,
    cluster: &str,
    rank: i32,
    side: BorderSide,
) {
    let prefix = match side {
        BorderSide::Left => "_bl",
        BorderSide::Right => "_br",
    };
    let label = NodeLabel {
        rank: Some(rank),
        ..Default::default()
    };
    let curr = add_dummy_node(g, ids, Dummy::Border { side }, label, prefix);
    g.set_parent(curr.clone(), cluster);

    let Some(node) = g.node_mut(cluster) else {
        return;
    };
    let borders = match side {
        BorderSide::Left => &mut node.border_left,
        BorderSide::Right => &mut node.border_right,
    };
    let prev = borders.get(&(rank - 1)).cloned();
    borders.insert(rank, curr.clone());

    if let Some(prev) = prev {
        g.set_edge_key(
            EdgeKey::new(prev, curr, None::<String>),
            EdgeLabel::weighted(1.0, 1),
        );
    }
}
