//! Greedy feedback arc set (Eades, Lin and Smyth).
//!
//! Nodes sit in buckets keyed by `out - in` weighted degree. Sinks and sources are peeled off
//! first; otherwise the node with the largest `out - in` is removed and its remaining in-edges
//! join the FAS. Used by `acyclic` when `acyclicer` is `Greedy`.

use crate::data::list::{EntryId, ListArena, ListId};
use crate::graphlib::{EdgeKey, Graph};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
struct FasNode {
    in_w: i64,
    out_w: i64,
}

struct State {
    arena: ListArena<FasNode>,
    buckets: Vec<ListId>,
    zero_idx: i64,
    entries: Vec<EntryId>,
    // Aggregated simple-graph adjacency by node index, first occurrence order.
    out_adj: Vec<Vec<(usize, i64)>>,
    in_adj: Vec<Vec<(usize, i64)>>,
    removed: Vec<bool>,
}

impl State {
    fn assign_bucket(&mut self, ix: usize) {
        let entry = self.entries[ix];
        let Some(node) = self.arena.get(entry) else {
            return;
        };
        let last = self.buckets.len() - 1;
        let bucket = if node.out_w == 0 {
            0
        } else if node.in_w == 0 {
            last
        } else {
            (node.out_w - node.in_w + self.zero_idx).clamp(1, last as i64 - 1) as usize
        };
        self.arena.enqueue(self.buckets[bucket], entry);
    }

    fn remove_node(&mut self, ix: usize, collect: bool, out: &mut Vec<(usize, usize)>) {
        self.removed[ix] = true;
        for k in 0..self.in_adj[ix].len() {
            let (u, w) = self.in_adj[ix][k];
            if self.removed[u] {
                continue;
            }
            if collect {
                out.push((u, ix));
            }
            if let Some(n) = self.arena.get_mut(self.entries[u]) {
                n.out_w -= w;
            }
            self.assign_bucket(u);
        }
        for k in 0..self.out_adj[ix].len() {
            let (t, w) = self.out_adj[ix][k];
            if self.removed[t] {
                continue;
            }
            if let Some(n) = self.arena.get_mut(self.entries[t]) {
                n.in_w -= w;
            }
            self.assign_bucket(t);
        }
    }
}

/// Returns the edges of `g` to reverse. `weight` maps an edge label to its weight; weights are
/// rounded to integers and negative or non-finite weights count as zero.
pub fn greedy_fas<N, E, G>(g: &Graph<N, E, G>, weight: impl Fn(&E) -> f64) -> Vec<EdgeKey>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let ids: Vec<&str> = g.nodes().collect();
    let index: FxHashMap<&str, usize> = ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();
    let n = ids.len();

    let mut agg: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    let mut pairs: Vec<(usize, usize, i64)> = Vec::new();
    let mut in_w = vec![0i64; n];
    let mut out_w = vec![0i64; n];
    g.for_each_edge(|e, label| {
        if e.is_self_loop() {
            return;
        }
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            return;
        };
        let raw = weight(label);
        let wt = if raw.is_finite() && raw > 0.0 {
            raw.round() as i64
        } else {
            0
        };
        match agg.get(&(v, w)) {
            Some(&pos) => pairs[pos].2 += wt,
            None => {
                agg.insert((v, w), pairs.len());
                pairs.push((v, w, wt));
            }
        }
        out_w[v] += wt;
        in_w[w] += wt;
    });
    let max_in = in_w.iter().copied().max().unwrap_or(0);
    let max_out = out_w.iter().copied().max().unwrap_or(0);

    let mut out_adj: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
    let mut in_adj: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
    for &(v, w, wt) in &pairs {
        out_adj[v].push((w, wt));
        in_adj[w].push((v, wt));
    }

    let mut arena: ListArena<FasNode> = ListArena::new();
    let buckets: Vec<ListId> = (0..(max_out + max_in + 3)).map(|_| arena.new_list()).collect();
    let entries: Vec<EntryId> = (0..n)
        .map(|i| {
            arena.insert(FasNode {
                in_w: in_w[i],
                out_w: out_w[i],
            })
        })
        .collect();

    let mut state = State {
        arena,
        buckets,
        zero_idx: max_in + 1,
        entries,
        out_adj,
        in_adj,
        removed: vec![false; n],
    };
    for i in 0..n {
        state.assign_bucket(i);
    }

    let index_of: FxHashMap<EntryId, usize> = state
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| (*e, i))
        .collect();

    let sinks = state.buckets[0];
    let sources = state.buckets[state.buckets.len() - 1];
    let mut remaining = n;
    let mut picked: Vec<(usize, usize)> = Vec::new();
    while remaining > 0 {
        while let Some(entry) = state.arena.dequeue(sinks) {
            if let Some(&ix) = index_of.get(&entry) {
                state.remove_node(ix, false, &mut picked);
            }
            remaining -= 1;
        }
        while let Some(entry) = state.arena.dequeue(sources) {
            if let Some(&ix) = index_of.get(&entry) {
                state.remove_node(ix, false, &mut picked);
            }
            remaining -= 1;
        }
        if remaining == 0 {
            break;
        }
        for b in (1..state.buckets.len() - 1).rev() {
            if let Some(entry) = state.arena.dequeue(state.buckets[b]) {
                if let Some(&ix) = index_of.get(&entry) {
                    state.remove_node(ix, true, &mut picked);
                }
                remaining -= 1;
                break;
            }
        }
    }

    picked
        .into_iter()
        .flat_map(|(u, v)| g.out_edges(ids[u], Some(ids[v])))
        .collect()
}
