//! Moves the dummy nodes of each long edge into the clusters the edge passes through.
//!
//! The chain climbs from the tail's cluster towards the lowest common ancestor of both
//! endpoints, then descends towards the head's cluster. Each dummy is parented to the deepest
//! cluster on that path whose rank span covers the dummy's rank.

use crate::LayoutGraph;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy)]
struct Span {
    low: usize,
    lim: usize,
}

pub fn parent_dummy_chains(g: &mut LayoutGraph) {
    let spans = postorder(g);
    let chains: Vec<(String, String, String)> = g
        .graph()
        .dummy_chains
        .iter()
        .map(|c| (c.head.clone(), c.edge.v.clone(), c.edge.w.clone()))
        .collect();

    for (head, tail, target) in chains {
        let (path, lca) = find_path(g, &spans, &tail, &target);
        let mut path_idx = 0usize;
        let mut ascending = true;
        let mut v = head;

        while v != target {
            let Some(rank) = g.node(&v).and_then(|n| n.rank) else {
                break;
            };

            if ascending {
                while path_idx < path.len()
                    && path[path_idx] != lca
                    && cluster_max_rank(g, &path[path_idx]).is_some_and(|max| max < rank)
                {
                    path_idx += 1;
                }
                if path.get(path_idx) == Some(&lca) {
                    ascending = false;
                }
            }
            if !ascending {
                while path_idx + 1 < path.len()
                    && cluster_min_rank(g, &path[path_idx + 1]).is_some_and(|min| min <= rank)
                {
                    path_idx += 1;
                }
            }

            match path.get(path_idx).cloned().flatten() {
                Some(parent) => {
                    g.set_parent(v.clone(), parent);
                }
                None => {
                    g.clear_parent(&v);
                }
            }

            let Some(next) = g.successors(&v).first().map(|s| s.to_string()) else {
                break;
            };
            v = next;
        }
    }
}

fn cluster_max_rank(g: &LayoutGraph, v: &Option<String>) -> Option<i32> {
    v.as_deref().and_then(|v| g.node(v)).and_then(|n| n.max_rank)
}

fn cluster_min_rank(g: &LayoutGraph, v: &Option<String>) -> Option<i32> {
    v.as_deref().and_then(|v| g.node(v)).and_then(|n| n.min_rank)
}

/// Ancestors of `v` up to and including the lowest common ancestor, followed by the ancestors
/// of `w` below it, top down. `None` stands for the root of the hierarchy.
fn find_path(
    g: &LayoutGraph,
    spans: &FxHashMap<String, Span>,
    v: &str,
    w: &str,
) -> (Vec<Option<String>>, Option<String>) {
    let (Some(sv), Some(sw)) = (spans.get(v), spans.get(w)) else {
        return (vec![None], None);
    };
    let low = sv.low.min(sw.low);
    let lim = sv.lim.max(sw.lim);

    let mut v_path: Vec<Option<String>> = Vec::new();
    let mut cur = v.to_string();
    let lca = loop {
        let parent = g.parent(&cur).map(str::to_string);
        v_path.push(parent.clone());
        match parent {
            Some(p) if spans.get(&p).is_some_and(|s| s.low > low || lim > s.lim) => cur = p,
            other => break other,
        }
    };

    let mut w_path: Vec<Option<String>> = Vec::new();
    let mut cur = w.to_string();
    loop {
        let parent = g.parent(&cur).map(str::to_string);
        if parent == lca {
            break;
        }
        match parent {
            Some(p) => {
                w_path.push(Some(p.clone()));
                cur = p;
            }
            None => break,
        }
    }
    w_path.reverse();
    v_path.extend(w_path);
    (v_path, lca)
}

/// Postorder numbering of the hierarchy: `low` is the smallest number in a node's subtree.
fn postorder(g: &LayoutGraph) -> FxHashMap<String, Span> {
    let mut spans: FxHashMap<String, Span> = FxHashMap::default();
    let mut lim = 0usize;
    let roots: Vec<String> = g.children_root().into_iter().map(str::to_string).collect();
    for root in roots {
        // (node, low, children, next child)
        let children = owned(g.children(&root));
        let mut stack: Vec<(String, usize, Vec<String>, usize)> = vec![(root, lim, children, 0)];
        while let Some((_, _, children, idx)) = stack.last_mut() {
            if let Some(c) = children.get(*idx).cloned() {
                *idx += 1;
                let grand = owned(g.children(&c));
                stack.push((c, lim, grand, 0));
                continue;
            }
            let Some((v, low, _, _)) = stack.pop() else {
                break;
            };
            spans.insert(v, Span { low, lim });
            lim += 1;
        }
    }
    spans
}

fn owned(v: Vec<&str>) -> Vec<String> {
    v.into_iter().map(str::to_string).collect()
}
