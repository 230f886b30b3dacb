use stratum::graphlib::{EdgeKey, Graph, GraphOptions, alg};
use stratum::greedy_fas::greedy_fas;

type WeightGraph = Graph<(), f64, ()>;

fn new_graph() -> WeightGraph {
    let mut g: WeightGraph = Graph::new(GraphOptions::default());
    g.set_default_edge_label(|| 1.0);
    g
}

fn weight(w: &f64) -> f64 {
    *w
}

fn check_fas(g: &WeightGraph, fas: &[EdgeKey]) {
    let n = g.node_count();
    let m = g.edge_count();
    let mut h = g.clone();
    for e in fas {
        h.remove_edge_key(e);
    }
    assert!(alg::find_cycles(&h).is_empty());
    // Eades et al. bound for the greedy heuristic.
    assert!(fas.len() <= m / 2 - n / 6);
}

#[test]
fn greedy_fas_returns_the_empty_set_for_empty_graphs() {
    assert!(greedy_fas(&new_graph(), weight).is_empty());
}

#[test]
fn greedy_fas_returns_the_empty_set_for_single_nodes() {
    let mut g = new_graph();
    g.ensure_node("a");
    assert!(greedy_fas(&g, weight).is_empty());
}

#[test]
fn greedy_fas_returns_an_empty_set_if_the_input_graph_is_acyclic() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    g.set_path(&["a", "d", "c"]);
    g.set_path(&["e", "d"]);
    assert!(greedy_fas(&g, weight).is_empty());
}

#[test]
fn greedy_fas_returns_a_single_edge_with_a_simple_cycle() {
    let mut g = new_graph();
    g.set_edge("a", "b");
    g.set_edge("b", "a");
    let fas = greedy_fas(&g, weight);
    assert_eq!(fas.len(), 1);
    check_fas(&g, &fas);
}

#[test]
fn greedy_fas_returns_a_single_edge_in_a_4_node_cycle() {
    let mut g = new_graph();
    g.set_path(&["n1", "n2", "n3", "n4", "n1"]);
    let fas = greedy_fas(&g, weight);
    assert_eq!(fas.len(), 1);
    check_fas(&g, &fas);
}

#[test]
fn greedy_fas_returns_two_edges_for_two_4_node_cycles() {
    let mut g = new_graph();
    g.set_path(&["n1", "n2", "n3", "n4", "n1"]);
    g.set_path(&["n5", "n6", "n7", "n8", "n5"]);
    let fas = greedy_fas(&g, weight);
    assert_eq!(fas.len(), 2);
    check_fas(&g, &fas);
}

#[test]
fn greedy_fas_works_with_arbitrarily_weighted_edges() {
    let mut g1 = new_graph();
    g1.set_edge_with_label("n1", "n2", 2.0);
    g1.set_edge_with_label("n2", "n1", 1.0);
    let fas = greedy_fas(&g1, weight);
    assert_eq!(fas.len(), 1);
    assert_eq!((fas[0].v.as_str(), fas[0].w.as_str()), ("n2", "n1"));

    let mut g2 = new_graph();
    g2.set_edge_with_label("n1", "n2", 1.0);
    g2.set_edge_with_label("n2", "n1", 2.0);
    let fas = greedy_fas(&g2, weight);
    assert_eq!(fas.len(), 1);
    assert_eq!((fas[0].v.as_str(), fas[0].w.as_str()), ("n1", "n2"));
}

#[test]
fn greedy_fas_works_for_multigraphs() {
    let mut g: WeightGraph = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_edge_named("a", "b", Some("foo".to_string()), Some(5.0));
    g.set_edge_named("b", "a", Some("bar".to_string()), Some(2.0));
    g.set_edge_named("b", "a", Some("baz".to_string()), Some(2.0));

    let mut fas: Vec<(String, String, Option<String>)> = greedy_fas(&g, weight)
        .into_iter()
        .map(|e| (e.v, e.w, e.name))
        .collect();
    fas.sort();
    assert_eq!(
        fas,
        vec![
            ("b".to_string(), "a".to_string(), Some("bar".to_string())),
            ("b".to_string(), "a".to_string(), Some("baz".to_string())),
        ]
    );
}
