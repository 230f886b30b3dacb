use stratum::add_border_segments::add_border_segments;
use stratum::graphlib::{Graph, GraphOptions};
use stratum::{BorderSide, Dummy, LayoutGraph, NodeLabel, UniqueIds};

fn compound_graph() -> LayoutGraph {
    Graph::new(GraphOptions::layout())
}

fn cluster(min_rank: i32, max_rank: i32) -> NodeLabel {
    NodeLabel {
        min_rank: Some(min_rank),
        max_rank: Some(max_rank),
        ..Default::default()
    }
}

fn assert_border(g: &LayoutGraph, v: &str, side: BorderSide, rank: i32, parent: &str) {
    let node = g.node(v).unwrap();
    assert_eq!(node.dummy, Some(Dummy::Border { side }));
    assert_eq!(node.rank, Some(rank));
    assert_eq!(g.parent(v), Some(parent));
}

#[test]
fn add_border_segments_does_not_add_border_nodes_for_a_non_compound_graph() {
    let mut g: LayoutGraph = Graph::new(GraphOptions::default());
    g.set_node("a", NodeLabel {
        rank: Some(0),
        ..Default::default()
    });

    add_border_segments(&mut g, &mut UniqueIds::new());
    assert_eq!(g.node_count(), 1);
}

#[test]
fn add_border_segments_does_not_add_border_nodes_for_a_graph_with_no_clusters() {
    let mut g = compound_graph();
    g.set_node("a", NodeLabel {
        rank: Some(0),
        ..Default::default()
    });

    add_border_segments(&mut g, &mut UniqueIds::new());
    assert_eq!(g.node_count(), 1);
}

#[test]
fn add_border_segments_adds_a_border_for_a_single_rank_subgraph() {
    let mut g = compound_graph();
    g.set_node("sg", cluster(1, 1));
    g.set_parent("a", "sg");

    add_border_segments(&mut g, &mut UniqueIds::new());

    let sg = g.node("sg").unwrap().clone();
    assert_eq!(sg.border_left.len(), 1);
    assert_eq!(sg.border_right.len(), 1);
    assert_border(&g, &sg.border_left[&1], BorderSide::Left, 1, "sg");
    assert_border(&g, &sg.border_right[&1], BorderSide::Right, 1, "sg");
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn add_border_segments_adds_a_border_for_a_multi_rank_subgraph() {
    let mut g = compound_graph();
    g.set_node("sg", cluster(1, 2));
    g.set_parent("a", "sg");

    add_border_segments(&mut g, &mut UniqueIds::new());

    let sg = g.node("sg").unwrap().clone();
    let (bl1, bl2) = (&sg.border_left[&1], &sg.border_left[&2]);
    let (br1, br2) = (&sg.border_right[&1], &sg.border_right[&2]);
    assert_border(&g, bl1, BorderSide::Left, 1, "sg");
    assert_border(&g, bl2, BorderSide::Left, 2, "sg");
    assert_border(&g, br1, BorderSide::Right, 1, "sg");
    assert_border(&g, br2, BorderSide::Right, 2, "sg");
    assert!(g.has_edge(bl1, bl2, None));
    assert!(g.has_edge(br1, br2, None));
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn add_border_segments_adds_borders_for_nested_subgraphs() {
    let mut g = compound_graph();
    g.set_node("sg1", cluster(1, 1));
    g.set_node("sg2", cluster(1, 1));
    g.set_parent("sg2", "sg1");
    g.set_parent("a", "sg2");

    add_border_segments(&mut g, &mut UniqueIds::new());

    let sg1 = g.node("sg1").unwrap().clone();
    let sg2 = g.node("sg2").unwrap().clone();
    assert_border(&g, &sg1.border_left[&1], BorderSide::Left, 1, "sg1");
    assert_border(&g, &sg1.border_right[&1], BorderSide::Right, 1, "sg1");
    assert_border(&g, &sg2.border_left[&1], BorderSide::Left, 1, "sg2");
    assert_border(&g, &sg2.border_right[&1], BorderSide::Right, 1, "sg2");
    assert_eq!(g.node_count(), 3 + 4);
}
