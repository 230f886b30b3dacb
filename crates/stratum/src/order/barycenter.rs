//! Barycenter sorting of one layer graph, cluster by cluster.

use super::types::{ConstraintGraph, LayerGraph};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    pub barycenter: Option<f64>,
    pub weight: f64,
}

/// A run of nodes that must stay contiguous, with its position `i` in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub vs: Vec<String>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: f64,
}

/// Weighted mean order of each node's in-neighbours. Nodes without in-edges (or with only
/// zero-weight ones) get no barycenter.
pub fn barycenter(lg: &LayerGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let mut sum = 0.0;
            let mut weight = 0.0;
            lg.for_each_in_edge(v, |e, label| {
                let order = lg.node(&e.v).and_then(|n| n.order).unwrap_or(0);
                sum += label.weight * order as f64;
                weight += label.weight;
            });
            if weight > 0.0 {
                BarycenterEntry {
                    v: v.clone(),
                    barycenter: Some(sum / weight),
                    weight,
                }
            } else {
                BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: 0.0,
                }
            }
        })
        .collect()
}

struct Mapped {
    vs: Vec<String>,
    i: usize,
    barycenter: Option<f64>,
    weight: f64,
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    merged: bool,
}

/// Merges entries whose barycenters contradict a constraint `a -> b` in `cg` (a must precede
/// b) into one contiguous entry, following Forster's "A Fast and Simple Heuristic for
/// Constrained Two-Level Crossing Reduction".
pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &ConstraintGraph) -> Vec<ResolvedEntry> {
    let mut mapped: Vec<Mapped> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| Mapped {
            vs: vec![e.v.clone()],
            i,
            barycenter: e.barycenter,
            weight: e.weight,
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            merged: false,
        })
        .collect();
    let index: FxHashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.v.as_str(), i))
        .collect();

    for e in cg.edges() {
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            continue;
        };
        mapped[w].indegree += 1;
        mapped[v].outs.push(w);
    }

    let mut sources: Vec<usize> = (0..mapped.len())
        .filter(|&i| mapped[i].indegree == 0)
        .collect();
    let mut processed: Vec<usize> = Vec::new();
    while let Some(v) = sources.pop() {
        processed.push(v);

        let ins: Vec<usize> = mapped[v].ins.iter().rev().copied().collect();
        for u in ins {
            if mapped[u].merged {
                continue;
            }
            let conflict = match (mapped[u].barycenter, mapped[v].barycenter) {
                (Some(bu), Some(bv)) => bu >= bv,
                _ => true,
            };
            if conflict {
                merge_entries(&mut mapped, v, u);
            }
        }

        let outs = mapped[v].outs.clone();
        for w in outs {
            mapped[w].ins.push(v);
            mapped[w].indegree -= 1;
            if mapped[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    processed
        .into_iter()
        .filter(|&i| !mapped[i].merged)
        .map(|i| {
            let m = &mapped[i];
            ResolvedEntry {
                vs: m.vs.clone(),
                i: m.i,
                barycenter: m.barycenter,
                weight: m.weight,
            }
        })
        .collect()
}

fn merge_entries(mapped: &mut [Mapped], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for ix in [target, source] {
        let m = &mapped[ix];
        if let Some(bc) = m.barycenter {
            if m.weight > 0.0 {
                sum += bc * m.weight;
                weight += m.weight;
            }
        }
    }

    let mut vs = std::mem::take(&mut mapped[source].vs);
    let source_i = mapped[source].i;
    mapped[source].merged = true;

    let t = &mut mapped[target];
    vs.append(&mut t.vs);
    t.vs = vs;
    t.barycenter = (weight > 0.0).then(|| sum / weight);
    t.weight = weight;
    t.i = t.i.min(source_i);
}

/// Orders entries by barycenter (ties by input position, reversed when `bias_right`) and
/// slots entries without a barycenter back in at their original positions.
pub fn sort(entries: Vec<ResolvedEntry>, bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<ResolvedEntry>, Vec<ResolvedEntry>) =
        entries.into_iter().partition(|e| e.barycenter.is_some());
    // Popped from the back, lowest position first.
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| compare_with_bias(a, b, bias_right));

    let mut vs: Vec<String> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut vs_index = consume_unsortable(&mut vs, &mut unsortable, 0);
    for entry in sortable {
        vs_index += entry.vs.len();
        sum += entry.barycenter.unwrap_or(0.0) * entry.weight;
        weight += entry.weight;
        vs.extend(entry.vs);
        vs_index = consume_unsortable(&mut vs, &mut unsortable, vs_index);
    }
    // Entries positioned past the end.
    while let Some(last) = unsortable.pop() {
        vs.extend(last.vs);
    }

    SortResult {
        vs,
        barycenter: (weight > 0.0).then(|| sum / weight),
        weight,
    }
}

fn consume_unsortable(
    vs: &mut Vec<String>,
    unsortable: &mut Vec<ResolvedEntry>,
    mut index: usize,
) -> usize {
    while unsortable.last().is_some_and(|last| last.i <= index) {
        if let Some(last) = unsortable.pop() {
            vs.extend(last.vs);
            index += 1;
        }
    }
    index
}

fn compare_with_bias(a: &ResolvedEntry, b: &ResolvedEntry, bias_right: bool) -> Ordering {
    let (ba, bb) = (a.barycenter.unwrap_or(0.0), b.barycenter.unwrap_or(0.0));
    match ba.partial_cmp(&bb) {
        Some(Ordering::Less) => Ordering::Less,
        Some(Ordering::Greater) => Ordering::Greater,
        _ if bias_right => b.i.cmp(&a.i),
        _ => a.i.cmp(&b.i),
    }
}

/// Sorts the children of `v` in `lg`, sorting nested clusters first so each cluster stays
/// contiguous and framed by its border nodes for this rank.
pub fn sort_subgraph(
    lg: &LayerGraph,
    v: &str,
    cg: &ConstraintGraph,
    bias_right: bool,
) -> SortResult {
    // Clusters below `v`, children before parents.
    let mut clusters: Vec<String> = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut stack: Vec<(String, bool)> = vec![(v.to_string(), false)];
    while let Some((u, expanded)) = stack.pop() {
        if expanded {
            clusters.push(u);
            continue;
        }
        if !seen.insert(u.clone()) {
            continue;
        }
        let children: Vec<String> = lg
            .children(&u)
            .into_iter()
            .filter(|c| lg.has_children(c))
            .map(str::to_string)
            .collect();
        stack.push((u, true));
        for c in children.into_iter().rev() {
            stack.push((c, false));
        }
    }

    let mut results: FxHashMap<String, SortResult> = FxHashMap::default();
    for u in clusters {
        let result = sort_one(lg, &u, cg, bias_right, &mut results);
        results.insert(u, result);
    }
    results.remove(v).unwrap_or_default()
}

fn sort_one(
    lg: &LayerGraph,
    v: &str,
    cg: &ConstraintGraph,
    bias_right: bool,
    done: &mut FxHashMap<String, SortResult>,
) -> SortResult {
    let node = lg.node(v);
    let bl = node.and_then(|n| n.border_left.clone());
    let br = node.and_then(|n| n.border_right.clone());

    let movable: Vec<String> = lg
        .children(v)
        .into_iter()
        .filter(|w| bl.is_none() || (Some(*w) != bl.as_deref() && Some(*w) != br.as_deref()))
        .map(str::to_string)
        .collect();

    let mut entries = barycenter(lg, &movable);
    let mut subgraphs: FxHashMap<String, SortResult> = FxHashMap::default();
    for entry in &mut entries {
        let Some(sub) = done.remove(&entry.v) else {
            continue;
        };
        if let Some(sub_bc) = sub.barycenter {
            match entry.barycenter {
                Some(bc) => {
                    let weight = entry.weight + sub.weight;
                    entry.barycenter = Some((bc * entry.weight + sub_bc * sub.weight) / weight);
                    entry.weight = weight;
                }
                None => {
                    entry.barycenter = Some(sub_bc);
                    entry.weight = sub.weight;
                }
            }
        }
        subgraphs.insert(entry.v.clone(), sub);
    }

    let mut resolved = resolve_conflicts(&entries, cg);
    for entry in &mut resolved {
        entry.vs = std::mem::take(&mut entry.vs)
            .into_iter()
            .flat_map(|w| match subgraphs.remove(&w) {
                Some(sub) => sub.vs,
                None => vec![w],
            })
            .collect();
    }

    let mut result = sort(resolved, bias_right);

    if let (Some(bl), Some(br)) = (bl, br) {
        let bl_pred = lg.predecessors(&bl).first().map(|p| p.to_string());
        let br_pred = lg.predecessors(&br).first().map(|p| p.to_string());
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl);
        vs.append(&mut result.vs);
        vs.push(br);
        result.vs = vs;

        if let (Some(bl_pred), Some(br_pred)) = (bl_pred, br_pred) {
            let order = |p: &str| lg.node(p).and_then(|n| n.order).unwrap_or(0) as f64;
            let bc = result.barycenter.unwrap_or(0.0);
            let weight = if result.barycenter.is_some() {
                result.weight
            } else {
                0.0
            };
            result.barycenter =
                Some((bc * weight + order(&bl_pred) + order(&br_pred)) / (weight + 2.0));
            result.weight = weight + 2.0;
        }
    }

    result
}
