//! Break cycles by reversing a feedback arc set (FAS).
//!
//! Reversed edges keep their original name in `forward_name` and are re-keyed under a fresh
//! `rev*` name, so [`undo`] restores the exact original multi-edge identity.

use crate::graphlib::EdgeKey;
use crate::{Acyclicer, LayoutGraph, UniqueIds};
use rustc_hash::FxHashSet;
use tracing::debug;

pub fn run(g: &mut LayoutGraph, ids: &mut UniqueIds) {
    let fas = match g.graph().acyclicer {
        Acyclicer::Greedy => crate::greedy_fas::greedy_fas(g, |label| label.weight),
        Acyclicer::Dfs => dfs_fas(g),
    };
    debug!(reversed = fas.len(), "feedback arc set");

    for e in fas {
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        label.forward_name = e.name.clone();
        label.reversed = true;

        let name = loop {
            let candidate = ids.next("rev");
            if !g.has_edge(&e.w, &e.v, Some(&candidate)) {
                break candidate;
            }
        };
        g.set_edge_named(e.w, e.v, Some(name), Some(label));
    }
}

/// Restores every reversed edge to its original direction and name.
pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if !g.edge_by_key(&e).is_some_and(|l| l.reversed) {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        let forward_name = label.forward_name.take();
        label.reversed = false;
        g.set_edge_named(e.w, e.v, forward_name, Some(label));
    }
}

/// Back edges of one depth-first forest, visiting roots in node insertion order.
///
/// An edge is reported when its head is on the current DFS path. Edges into finished nodes
/// (forward and cross edges) and self loops are never reported.
pub fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut on_path: FxHashSet<String> = FxHashSet::default();

    for root in g.nodes() {
        if !visited.insert(root.to_string()) {
            continue;
        }
        on_path.insert(root.to_string());
        let mut stack: Vec<(String, Vec<EdgeKey>, usize)> =
            vec![(root.to_string(), g.out_edges(root, None), 0)];

        while let Some((v, out, idx)) = stack.last_mut() {
            let Some(e) = out.get(*idx).cloned() else {
                on_path.remove(v.as_str());
                stack.pop();
                continue;
            };
            *idx += 1;
            if e.is_self_loop() {
                continue;
            }
            if on_path.contains(&e.w) {
                fas.push(e);
            } else if visited.insert(e.w.clone()) {
                on_path.insert(e.w.clone());
                let out = g.out_edges(&e.w, None);
                stack.push((e.w, out, 0));
            }
        }
    }
    fas
}
