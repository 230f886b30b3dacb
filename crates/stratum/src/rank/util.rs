use crate::error::{Error, Result};
use crate::graphlib::{self, EdgeKey, alg};
use crate::LayoutGraph;

/// Ranks nodes in one forward topological pass: sources get rank 0 and every other node the
/// maximum of `tail.rank + minlen` over its in-edges.
pub fn longest_path(g: &mut LayoutGraph) -> Result<()> {
    let order = alg::topsort(g).map_err(|e| match e {
        graphlib::Error::Cycle { node } => Error::Cyclic { node },
        other => Error::Graph(other),
    })?;

    for v in order {
        let mut rank: Option<i32> = None;
        g.for_each_in_edge(&v, |e, label| {
            let tail = g.node(&e.v).and_then(|n| n.rank).unwrap_or(0);
            let candidate = tail + label.minlen;
            rank = Some(rank.map_or(candidate, |r| r.max(candidate)));
        });
        if let Some(label) = g.node_mut(&v) {
            label.rank = Some(rank.unwrap_or(0));
        }
    }
    Ok(())
}

/// How far the edge is from tight: `head.rank - tail.rank - minlen`.
pub fn slack(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    let w_rank = g.node(&e.w).and_then(|n| n.rank).unwrap_or(0);
    let v_rank = g.node(&e.v).and_then(|n| n.rank).unwrap_or(0);
    let minlen = g.edge_by_key(e).map_or(1, |l| l.minlen);
    w_rank - v_rank - minlen
}
