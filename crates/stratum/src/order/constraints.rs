use super::types::{ConstraintGraph, LayerGraph};
use rustc_hash::FxHashMap;

/// Records, for every cluster, which sibling cluster precedes it in `vs`. Walking up from each
/// node, the first ancestor whose previously seen sibling differs from it gets a constraint
/// edge `previous -> ancestor`.
pub fn add_subgraph_constraints(lg: &LayerGraph, cg: &mut ConstraintGraph, vs: &[String]) {
    // Last child seen under each parent; `None` keys the top level.
    let mut last_seen: FxHashMap<Option<&str>, &str> = FxHashMap::default();

    for v in vs {
        let mut cur = lg.parent(v);
        while let Some(child) = cur {
            let parent = lg.parent(child);
            if let Some(prev) = last_seen.insert(parent, child) {
                if prev != child {
                    cg.set_edge(prev, child);
                    break;
                }
            }
            cur = parent;
        }
    }
}
