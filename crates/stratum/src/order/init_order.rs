//! Initial ordering by depth-first seeding (Gansner et al.).

use crate::error::{Error, Result};
use crate::LayoutGraph;
use rustc_hash::FxHashSet;

/// Returns one layer per rank `0..=max_rank`. Simple (childless) nodes are visited in ascending
/// rank order; a depth-first walk along successors appends every node to its rank's layer the
/// first time it is reached.
pub fn init_order(g: &LayoutGraph) -> Result<Vec<Vec<String>>> {
    let mut simple: Vec<(&str, usize)> = Vec::new();
    for v in g.nodes() {
        if g.has_children(v) {
            continue;
        }
        let rank = g
            .node(v)
            .and_then(|n| n.rank)
            .ok_or_else(|| Error::MissingRank {
                node: v.to_string(),
            })?;
        if rank < 0 {
            return Err(Error::UnnormalizedRank {
                node: v.to_string(),
                rank,
            });
        }
        simple.push((v, rank as usize));
    }

    let Some(max_rank) = simple.iter().map(|(_, r)| *r).max() else {
        return Ok(Vec::new());
    };
    let rank_of: rustc_hash::FxHashMap<&str, usize> = simple.iter().copied().collect();
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); max_rank + 1];

    // Stable, so equal ranks keep insertion order.
    simple.sort_by_key(|(_, r)| *r);

    let mut visited: FxHashSet<&str> = FxHashSet::default();
    for (start, _) in simple {
        let mut stack: Vec<&str> = vec![start];
        while let Some(v) = stack.pop() {
            let Some(&rank) = rank_of.get(v) else {
                continue;
            };
            if !visited.insert(v) {
                continue;
            }
            layers[rank].push(v.to_string());
            for w in g.successors(v).into_iter().rev() {
                if !visited.contains(w) {
                    stack.push(w);
                }
            }
        }
    }

    Ok(layers)
}
