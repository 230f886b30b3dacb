use stratum::graphlib::{Graph, GraphOptions};
use stratum::order::{BarycenterEntry, LayerGraph, LayerNode, WeightLabel, barycenter};

fn new_graph() -> LayerGraph {
    let mut g: LayerGraph = Graph::new(GraphOptions::default());
    g.set_default_edge_label(|| WeightLabel { weight: 1.0 });
    g
}

fn at(order: usize) -> LayerNode {
    LayerNode {
        order: Some(order),
        ..Default::default()
    }
}

#[test]
fn barycenter_assigns_no_barycenter_for_a_node_with_no_predecessors() {
    let mut g = new_graph();
    g.set_node("x", LayerNode::default());

    assert_eq!(
        barycenter(&g, &["x".to_string()]),
        vec![BarycenterEntry {
            v: "x".to_string(),
            barycenter: None,
            weight: 0.0,
        }]
    );
}

#[test]
fn barycenter_assigns_the_position_of_the_sole_predecessor() {
    let mut g = new_graph();
    g.set_node("a", at(2));
    g.set_edge("a", "x");

    assert_eq!(
        barycenter(&g, &["x".to_string()]),
        vec![BarycenterEntry {
            v: "x".to_string(),
            barycenter: Some(2.0),
            weight: 1.0,
        }]
    );
}

#[test]
fn barycenter_assigns_the_average_of_multiple_predecessors() {
    let mut g = new_graph();
    g.set_node("a", at(2));
    g.set_node("b", at(4));
    g.set_edge("a", "x");
    g.set_edge("b", "x");

    assert_eq!(
        barycenter(&g, &["x".to_string()]),
        vec![BarycenterEntry {
            v: "x".to_string(),
            barycenter: Some(3.0),
            weight: 2.0,
        }]
    );
}

#[test]
fn barycenter_takes_into_account_the_weight_of_edges() {
    let mut g = new_graph();
    g.set_node("a", at(2));
    g.set_node("b", at(4));
    g.set_edge_with_label("a", "x", WeightLabel { weight: 3.0 });
    g.set_edge("b", "x");

    assert_eq!(
        barycenter(&g, &["x".to_string()]),
        vec![BarycenterEntry {
            v: "x".to_string(),
            barycenter: Some(2.5),
            weight: 4.0,
        }]
    );
}

#[test]
fn barycenter_calculates_barycenters_for_all_nodes_in_the_movable_layer() {
    let mut g = new_graph();
    g.set_node("a", at(1));
    g.set_node("b", at(2));
    g.set_node("c", at(4));
    g.set_edge("a", "x");
    g.set_edge("b", "x");
    g.ensure_node("y");
    g.set_edge_with_label("a", "z", WeightLabel { weight: 2.0 });
    g.set_edge("c", "z");

    let results = barycenter(&g, &["x".to_string(), "y".to_string(), "z".to_string()]);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].barycenter, Some(1.5));
    assert_eq!(results[0].weight, 2.0);
    assert_eq!(results[1].barycenter, None);
    assert_eq!(results[2].barycenter, Some(2.0));
    assert_eq!(results[2].weight, 3.0);
}

#[test]
fn barycenter_ignores_zero_weight_predecessors() {
    let mut g = new_graph();
    g.set_node("a", at(5));
    g.set_edge_with_label("a", "x", WeightLabel { weight: 0.0 });

    let results = barycenter(&g, &["x".to_string()]);
    assert_eq!(results[0].barycenter, None);
    assert_eq!(results[0].weight, 0.0);
}
