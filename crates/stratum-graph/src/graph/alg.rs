//! Traversal helpers over [`Graph`].
//!
//! Every traversal keeps its own explicit stack so deeply nested or very long graphs never grow
//! the call stack.

use super::Graph;
use crate::error::{Error, Result};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// Depth-first preorder from each root in turn, following successors (neighbors for undirected
/// graphs). Nodes reachable from an earlier root are not revisited.
pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut visited: HashSet<&str> = HashSet::default();
    let mut out: Vec<String> = Vec::new();
    for &root in roots {
        let mut stack: Vec<&str> = vec![root];
        while let Some(v) = stack.pop() {
            if !g.has_node(v) || !visited.insert(v) {
                continue;
            }
            out.push(v.to_string());
            // Reverse so the first successor is visited first.
            for w in g.successors(v).into_iter().rev() {
                if !visited.contains(w) {
                    stack.push(w);
                }
            }
        }
    }
    out
}

/// Depth-first postorder from each root in turn.
pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut visited: HashSet<&str> = HashSet::default();
    let mut out: Vec<String> = Vec::new();
    for &root in roots {
        if !g.has_node(root) || !visited.insert(root) {
            continue;
        }
        // (node, successors, next successor index)
        let mut stack: Vec<(&str, Vec<&str>, usize)> = vec![(root, g.successors(root), 0)];
        while let Some((v, succ, idx)) = stack.last_mut() {
            if let Some(&w) = succ.get(*idx) {
                *idx += 1;
                if visited.insert(w) {
                    stack.push((w, g.successors(w), 0));
                }
                continue;
            }
            out.push(v.to_string());
            stack.pop();
        }
    }
    out
}

/// Weakly connected components, each listed in discovery order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut seen: HashSet<&str> = HashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut comp: Vec<String> = Vec::new();
        let mut stack: Vec<&str> = vec![start];
        while let Some(v) = stack.pop() {
            comp.push(v.to_string());
            for n in g.neighbors(v) {
                if seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        out.push(comp);
    }

    out
}

/// Topological order (Kahn). Fails with [`Error::Cycle`] if the graph has a directed cycle.
pub fn topsort<N, E, G>(g: &Graph<N, E, G>) -> Result<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut indegree: HashMap<&str, usize> = HashMap::default();
    for v in g.nodes() {
        indegree.insert(v, g.in_edges(v, None).len());
    }

    let mut ready: Vec<&str> = g
        .nodes()
        .filter(|v| indegree.get(v).copied() == Some(0))
        .collect();
    ready.reverse();

    let mut out: Vec<String> = Vec::with_capacity(g.node_count());
    while let Some(v) = ready.pop() {
        out.push(v.to_string());
        for w in g.successors(v) {
            let parallel = g.out_edges(v, Some(w)).len();
            let Some(d) = indegree.get_mut(w) else {
                continue;
            };
            *d = d.saturating_sub(parallel);
            if *d == 0 {
                ready.push(w);
            }
        }
    }

    if out.len() < g.node_count() {
        let node = g
            .nodes()
            .find(|v| indegree.get(v).copied().unwrap_or(0) > 0)
            .unwrap_or_default()
            .to_string();
        return Err(Error::Cycle { node });
    }
    Ok(out)
}

pub fn is_acyclic<N, E, G>(g: &Graph<N, E, G>) -> bool
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    topsort(g).is_ok()
}

/// Strongly connected components that contain a cycle: components with more than one node plus
/// single nodes with a self loop. Nodes within a cycle are listed in insertion order.
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let order: HashMap<&str, usize> = g.nodes().enumerate().map(|(i, v)| (v, i)).collect();

    let mut next_index: usize = 0;
    let mut index: HashMap<&str, usize> = HashMap::default();
    let mut lowlink: HashMap<&str, usize> = HashMap::default();
    let mut on_stack: HashSet<&str> = HashSet::default();
    let mut scc_stack: Vec<&str> = Vec::new();
    let mut sccs: Vec<Vec<&str>> = Vec::new();

    for root in g.nodes() {
        if index.contains_key(root) {
            continue;
        }
        let mut call: Vec<(&str, Vec<&str>, usize)> = Vec::new();
        index.insert(root, next_index);
        lowlink.insert(root, next_index);
        next_index += 1;
        scc_stack.push(root);
        on_stack.insert(root);
        call.push((root, g.successors(root), 0));

        while let Some((v, succ, idx)) = call.last_mut() {
            let v = *v;
            if let Some(&w) = succ.get(*idx) {
                *idx += 1;
                if !index.contains_key(w) {
                    index.insert(w, next_index);
                    lowlink.insert(w, next_index);
                    next_index += 1;
                    scc_stack.push(w);
                    on_stack.insert(w);
                    call.push((w, g.successors(w), 0));
                } else if on_stack.contains(w) {
                    let low = lowlink[v].min(index[w]);
                    lowlink.insert(v, low);
                }
                continue;
            }

            call.pop();
            if let Some((parent, _, _)) = call.last() {
                let low = lowlink[*parent].min(lowlink[v]);
                lowlink.insert(*parent, low);
            }
            if lowlink[v] == index[v] {
                let mut scc: Vec<&str> = Vec::new();
                while let Some(w) = scc_stack.pop() {
                    on_stack.remove(w);
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                sccs.push(scc);
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = Vec::new();
    for mut scc in sccs {
        if scc.len() == 1 && !g.has_edge_between(scc[0], scc[0]) {
            continue;
        }
        scc.sort_by_key(|v| order.get(v).copied().unwrap_or(usize::MAX));
        cycles.push(scc.into_iter().map(str::to_string).collect());
    }
    cycles.sort_by(|a, b| a.first().cmp(&b.first()));
    cycles
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    /// True if any edge (of any name) runs from `v` to `w`.
    pub fn has_edge_between(&self, v: &str, w: &str) -> bool {
        !self.out_edges(v, Some(w)).is_empty()
    }
}
