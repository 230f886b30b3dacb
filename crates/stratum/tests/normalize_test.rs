use stratum::graphlib::{Graph, GraphOptions};
use stratum::normalize;
use stratum::{Dummy, EdgeLabel, LabelPos, LayoutGraph, NodeLabel, Point, UniqueIds};

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions::layout())
}

fn ranked(rank: i32) -> NodeLabel {
    NodeLabel {
        rank: Some(rank),
        ..Default::default()
    }
}

fn edge_ends(g: &LayoutGraph) -> Vec<(String, String, Option<String>)> {
    g.edges()
        .map(|e| (e.v.clone(), e.w.clone(), e.name.clone()))
        .collect()
}

fn place(g: &mut LayoutGraph, v: &str, x: f64, y: f64) {
    if let Some(n) = g.node_mut(v) {
        n.x = Some(x);
        n.y = Some(y);
    }
}

#[test]
fn normalize_run_does_not_change_a_short_edge() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(1));
    g.set_edge("a", "b");

    normalize::run(&mut g, &mut UniqueIds::new());

    assert_eq!(edge_ends(&g), vec![("a".to_string(), "b".to_string(), None)]);
    assert!(g.graph().dummy_chains.is_empty());
}

#[test]
fn normalize_run_splits_a_two_layer_edge_into_two_segments() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_edge("a", "b");

    normalize::run(&mut g, &mut UniqueIds::new());

    let successors = g.successors("a");
    assert_eq!(successors.len(), 1);
    let d = successors[0].to_string();
    let dummy = g.node(&d).unwrap();
    assert_eq!(dummy.dummy, Some(Dummy::Edge));
    assert_eq!(dummy.rank, Some(1));
    assert_eq!(g.successors(&d), vec!["b"]);

    let chains = &g.graph().dummy_chains;
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].head, d);
    assert_eq!(chains[0].edge.v, "a");
    assert_eq!(chains[0].edge.w, "b");
}

#[test]
fn normalize_run_creates_one_dummy_per_interior_rank() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(4));
    g.set_edge("a", "b");

    normalize::run(&mut g, &mut UniqueIds::new());

    assert_eq!(g.node_count(), 5);
    assert_eq!(g.edge_count(), 4);
    let mut v = g.graph().dummy_chains[0].head.clone();
    for rank in 1..4 {
        assert_eq!(g.node(&v).unwrap().rank, Some(rank));
        v = g.successors(&v)[0].to_string();
    }
    assert_eq!(v, "b");
}

#[test]
fn normalize_run_assigns_width_and_height_0_to_dummy_nodes_by_default() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            width: 10.0,
            height: 10.0,
            ..Default::default()
        },
    );

    normalize::run(&mut g, &mut UniqueIds::new());

    let d = g.successors("a")[0].to_string();
    assert_eq!(g.node(&d).unwrap().width, 0.0);
    assert_eq!(g.node(&d).unwrap().height, 0.0);
}

#[test]
fn normalize_run_assigns_width_and_height_from_the_edge_for_the_node_on_label_rank() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(4));
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            width: 20.0,
            height: 10.0,
            label_rank: Some(2),
            labelpos: LabelPos::L,
            ..Default::default()
        },
    );

    normalize::run(&mut g, &mut UniqueIds::new());

    let d1 = g.successors("a")[0].to_string();
    let label_node = g.successors(&d1)[0].to_string();
    let node = g.node(&label_node).unwrap();
    assert_eq!(node.width, 20.0);
    assert_eq!(node.height, 10.0);
    assert_eq!(
        node.dummy,
        Some(Dummy::EdgeLabel {
            labelpos: LabelPos::L
        })
    );
}

#[test]
fn normalize_run_preserves_the_weight_for_the_edge() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_edge_with_label("a", "b", EdgeLabel::weighted(2.0, 1));

    normalize::run(&mut g, &mut UniqueIds::new());

    let d = g.successors("a")[0].to_string();
    assert_eq!(g.edge("a", &d, None).unwrap().weight, 2.0);
    assert_eq!(g.edge(&d, "b", None).unwrap().weight, 2.0);
}

#[test]
fn normalize_undo_reverses_the_run_operation() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_edge("a", "b");

    normalize::run(&mut g, &mut UniqueIds::new());
    let d = g.successors("a")[0].to_string();
    place(&mut g, &d, 5.0, 10.0);
    normalize::undo(&mut g);

    assert_eq!(edge_ends(&g), vec![("a".to_string(), "b".to_string(), None)]);
    assert_eq!(g.node_count(), 2);
    assert!(g.graph().dummy_chains.is_empty());
}

#[test]
fn normalize_undo_restores_previous_edge_labels() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            labeloffset: 7.0,
            ..EdgeLabel::weighted(3.0, 2)
        },
    );

    normalize::run(&mut g, &mut UniqueIds::new());
    normalize::undo(&mut g);

    let label = g.edge("a", "b", None).unwrap();
    assert_eq!(label.weight, 3.0);
    assert_eq!(label.minlen, 2);
    assert_eq!(label.labeloffset, 7.0);
}

#[test]
fn normalize_undo_collects_assigned_coordinates_into_points() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(3));
    g.set_edge("a", "b");

    normalize::run(&mut g, &mut UniqueIds::new());
    let d1 = g.successors("a")[0].to_string();
    let d2 = g.successors(&d1)[0].to_string();
    place(&mut g, &d1, 5.0, 10.0);
    place(&mut g, &d2, 20.0, 25.0);
    normalize::undo(&mut g);

    assert_eq!(
        g.edge("a", "b", None).unwrap().points,
        vec![Point { x: 5.0, y: 10.0 }, Point { x: 20.0, y: 25.0 }]
    );
}

#[test]
fn normalize_undo_sets_coords_and_dims_for_the_label_if_the_long_edge_has_one() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(4));
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            width: 10.0,
            height: 20.0,
            label_rank: Some(2),
            ..Default::default()
        },
    );

    normalize::run(&mut g, &mut UniqueIds::new());
    let d1 = g.successors("a")[0].to_string();
    let label_node = g.successors(&d1)[0].to_string();
    let d3 = g.successors(&label_node)[0].to_string();
    place(&mut g, &d1, 0.0, 0.0);
    place(&mut g, &label_node, 50.0, 60.0);
    place(&mut g, &d3, 0.0, 100.0);
    if let Some(n) = g.node_mut(&label_node) {
        n.width = 15.0;
        n.height = 25.0;
    }
    normalize::undo(&mut g);

    let label = g.edge("a", "b", None).unwrap();
    assert_eq!(label.x, Some(50.0));
    assert_eq!(label.y, Some(60.0));
    assert_eq!(label.width, 15.0);
    assert_eq!(label.height, 25.0);
    assert_eq!(label.points.len(), 3);
}

#[test]
fn normalize_undo_restores_multi_edges() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_edge_named("a", "b", Some("bar"), Some(EdgeLabel::default()));
    g.set_edge_named("a", "b", Some("foo"), Some(EdgeLabel::default()));

    normalize::run(&mut g, &mut UniqueIds::new());
    let mut chain_names: Vec<Option<String>> = g
        .out_edges("a", None)
        .into_iter()
        .map(|e| e.name)
        .collect();
    chain_names.sort();
    assert_eq!(
        chain_names,
        vec![Some("bar".to_string()), Some("foo".to_string())]
    );

    let heads: Vec<String> = g
        .graph()
        .dummy_chains
        .iter()
        .map(|c| c.head.clone())
        .collect();
    for (i, d) in heads.iter().enumerate() {
        place(&mut g, d, i as f64, 10.0);
    }
    normalize::undo(&mut g);

    assert!(g.has_edge("a", "b", Some("bar")));
    assert!(g.has_edge("a", "b", Some("foo")));
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.node_count(), 2);
}
