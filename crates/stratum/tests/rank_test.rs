use stratum::graphlib::{Graph, GraphOptions};
use stratum::rank::{self, util::longest_path, util::slack};
use stratum::{EdgeLabel, Error, GraphLabel, LayoutGraph, Ranker};

const RANKERS: [Ranker; 3] = [Ranker::LongestPath, Ranker::TightTree, Ranker::NetworkSimplex];

fn graph_with(ranker: Ranker) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions::default());
    g.set_graph(GraphLabel {
        ranker,
        ..Default::default()
    });
    g
}

fn gansner_graph(ranker: Ranker) -> LayoutGraph {
    let mut g = graph_with(ranker);
    g.set_path(&["a", "b", "c", "d", "h"]);
    g.set_path(&["a", "e", "g", "h"]);
    g.set_path(&["a", "f", "g"]);
    g
}

fn rank_of(g: &LayoutGraph, v: &str) -> i32 {
    g.node(v).unwrap().rank.unwrap()
}

fn assert_respects_minlen(g: &LayoutGraph) {
    for e in g.edges() {
        let minlen = g.edge_by_key(e).unwrap().minlen;
        assert!(
            rank_of(g, &e.w) - rank_of(g, &e.v) >= minlen,
            "edge {} -> {} violates minlen {minlen}",
            e.v,
            e.w
        );
    }
}

fn total_length(g: &LayoutGraph) -> i32 {
    g.edges().map(|e| rank_of(g, &e.w) - rank_of(g, &e.v)).sum()
}

#[test]
fn rank_respects_the_minlen_attribute() {
    for ranker in RANKERS {
        let mut g = gansner_graph(ranker);
        g.edge_mut("a", "e", None).unwrap().minlen = 2;
        g.edge_mut("g", "h", None).unwrap().minlen = 3;
        rank::rank(&mut g).unwrap();
        assert_respects_minlen(&g);
    }
}

#[test]
fn rank_ranks_a_chain_consecutively() {
    for ranker in RANKERS {
        let mut g = graph_with(ranker);
        g.set_path(&["a", "b", "c", "d"]);
        rank::rank(&mut g).unwrap();
        let base = rank_of(&g, "a");
        let ranks: Vec<i32> = ["a", "b", "c", "d"]
            .iter()
            .map(|v| rank_of(&g, v) - base)
            .collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }
}

#[test]
fn rank_can_rank_a_single_node_graph() {
    for ranker in RANKERS {
        let mut g = graph_with(ranker);
        g.ensure_node("a");
        rank::rank(&mut g).unwrap();
        assert!(g.node("a").unwrap().rank.is_some());
    }
}

#[test]
fn rank_network_simplex_finds_the_optimal_ranking_of_the_gansner_graph() {
    let mut g = gansner_graph(Ranker::NetworkSimplex);
    rank::rank(&mut g).unwrap();
    assert_respects_minlen(&g);
    assert_eq!(total_length(&g), 10);

    let mut longest = gansner_graph(Ranker::LongestPath);
    rank::rank(&mut longest).unwrap();
    assert!(total_length(&g) <= total_length(&longest));
}

fn weighted_length(g: &LayoutGraph) -> f64 {
    g.edges()
        .map(|e| {
            let weight = g.edge_by_key(e).unwrap().weight;
            weight * f64::from(rank_of(g, &e.w) - rank_of(g, &e.v))
        })
        .sum()
}

/// Connected DAG on `n` nodes: a spine `0 -> 1 -> .. -> n-1` plus random forward edges.
fn random_dag(ranker: Ranker, seed: u64, n: usize) -> LayoutGraph {
    let mut state = seed;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    let mut g = graph_with(ranker);
    for i in 1..n {
        g.set_edge((i - 1).to_string(), i.to_string());
    }
    for _ in 0..n * 2 {
        let v = (next() % n as u64) as usize;
        let w = (next() % n as u64) as usize;
        if v < w {
            let weight = (next() % 4) as f64;
            let minlen = 1 + (next() % 3) as i32;
            let label = EdgeLabel::weighted(weight, minlen);
            g.set_edge_with_label(v.to_string(), w.to_string(), label);
        }
    }
    g
}

#[test]
fn rank_network_simplex_never_loses_to_longest_path_on_random_dags() {
    for seed in 1..=40u64 {
        let n = 4 + (seed as usize % 12);
        let seed = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15);

        let mut simplex = random_dag(Ranker::NetworkSimplex, seed, n);
        rank::rank(&mut simplex).unwrap();
        assert_respects_minlen(&simplex);

        let mut longest = random_dag(Ranker::LongestPath, seed, n);
        rank::rank(&mut longest).unwrap();
        assert_respects_minlen(&longest);

        assert!(
            weighted_length(&simplex) <= weighted_length(&longest),
            "seed {seed}: {} > {}",
            weighted_length(&simplex),
            weighted_length(&longest)
        );
    }
}

#[test]
fn rank_network_simplex_accounts_for_weights() {
    let mut g = graph_with(Ranker::NetworkSimplex);
    g.set_path(&["a", "b", "c"]);
    g.set_edge_with_label("a", "d", EdgeLabel::weighted(5.0, 1));
    g.set_edge("d", "c");
    rank::rank(&mut g).unwrap();
    // The heavy edge stays tight.
    assert_eq!(rank_of(&g, "d") - rank_of(&g, "a"), 1);
}

#[test]
fn rank_rejects_disconnected_graphs() {
    for ranker in RANKERS {
        let mut g = graph_with(ranker);
        g.set_edge("a", "b");
        g.set_edge("c", "d");
        assert!(matches!(
            rank::rank(&mut g),
            Err(Error::Disconnected { components: 2 })
        ));
    }
}

#[test]
fn rank_rejects_cyclic_graphs() {
    for ranker in RANKERS {
        let mut g = graph_with(ranker);
        g.set_path(&["a", "b", "c", "a"]);
        assert!(matches!(rank::rank(&mut g), Err(Error::Cyclic { .. })));
    }
}

#[test]
fn longest_path_puts_sources_on_rank_zero() {
    let mut g = graph_with(Ranker::LongestPath);
    g.set_edge("a", "c");
    g.set_edge("b", "d");
    g.set_edge_with_label("c", "d", EdgeLabel::weighted(1.0, 2));
    longest_path(&mut g).unwrap();
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 0);
    assert_eq!(rank_of(&g, "c"), 1);
    assert_eq!(rank_of(&g, "d"), 3);
}

#[test]
fn slack_is_the_length_beyond_minlen() {
    let mut g = graph_with(Ranker::LongestPath);
    g.set_edge_with_label("a", "b", EdgeLabel::weighted(1.0, 2));
    g.node_mut("a").unwrap().rank = Some(0);
    g.node_mut("b").unwrap().rank = Some(5);
    let e = g.edge_keys().remove(0);
    assert_eq!(slack(&g, &e), 3);
}
