use serde_json::{Value, json};
use stratum::config::{graph_from_json, graph_from_json_str, graph_to_json};
use stratum::{
    Acyclicer, Align, EdgeLabel, Error, GraphLabel, LabelPos, NodeLabel, RankDir, Ranker, layout,
};

fn attrs(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[test]
fn graph_attrs_use_defaults_when_missing() {
    let label = GraphLabel::from_attrs(&attrs(json!({}))).unwrap();
    assert_eq!(label.rankdir, RankDir::TB);
    assert_eq!(label.align, None);
    assert_eq!(
        (label.nodesep, label.edgesep, label.ranksep),
        (50.0, 20.0, 50.0)
    );
    assert_eq!((label.marginx, label.marginy), (0.0, 0.0));
    assert_eq!(label.acyclicer, Acyclicer::Dfs);
    assert_eq!(label.ranker, Ranker::NetworkSimplex);
}

#[test]
fn graph_attrs_are_case_insensitive() {
    let label = GraphLabel::from_attrs(&attrs(json!({
        "RankDir": "lr",
        "NodeSep": 30,
        "ALIGN": "dR",
        "Ranker": "Longest-Path",
        "acyclicer": "GREEDY",
    })))
    .unwrap();
    assert_eq!(label.rankdir, RankDir::LR);
    assert_eq!(label.nodesep, 30.0);
    assert_eq!(label.align, Some(Align::DR));
    assert_eq!(label.ranker, Ranker::LongestPath);
    assert_eq!(label.acyclicer, Acyclicer::Greedy);
}

#[test]
fn graph_attrs_accept_numeric_strings() {
    let label = GraphLabel::from_attrs(&attrs(json!({
        "ranksep": "75",
        "marginx": " 12.5 ",
    })))
    .unwrap();
    assert_eq!(label.ranksep, 75.0);
    assert_eq!(label.marginx, 12.5);
}

#[test]
fn graph_attrs_reject_non_numeric_values() {
    let err = GraphLabel::from_attrs(&attrs(json!({ "nodesep": "wide" }))).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref name, .. } if name == "nodesep"));

    let err = GraphLabel::from_attrs(&attrs(json!({ "edgesep": [1] }))).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref name, .. } if name == "edgesep"));
}

#[test]
fn graph_attrs_reject_unknown_directions() {
    let err = GraphLabel::from_attrs(&attrs(json!({ "rankdir": "up" }))).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidOption { ref name, ref value } if name == "rankdir" && value == "up"
    ));

    let err = GraphLabel::from_attrs(&attrs(json!({ "align": "middle" }))).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref name, .. } if name == "align"));
}

#[test]
fn graph_attrs_fall_back_on_unknown_strategies() {
    let label = GraphLabel::from_attrs(&attrs(json!({
        "ranker": "simulated-annealing",
        "acyclicer": "random",
    })))
    .unwrap();
    assert_eq!(label.ranker, Ranker::NetworkSimplex);
    assert_eq!(label.acyclicer, Acyclicer::Dfs);
}

#[test]
fn graph_attrs_ignore_unknown_keys() {
    let label = GraphLabel::from_attrs(&attrs(json!({ "fontsize": 12, "ranksep": 10 }))).unwrap();
    assert_eq!(label.ranksep, 10.0);
}

#[test]
fn node_attrs_read_size() {
    let label = NodeLabel::from_attrs(&attrs(json!({ "Width": 40, "height": "20" }))).unwrap();
    assert_eq!((label.width, label.height), (40.0, 20.0));

    let label = NodeLabel::from_attrs(&attrs(json!({}))).unwrap();
    assert_eq!((label.width, label.height), (0.0, 0.0));
    assert_eq!(label.x, None);
}

#[test]
fn edge_attrs_use_defaults_when_missing() {
    let label = EdgeLabel::from_attrs(&attrs(json!({}))).unwrap();
    assert_eq!(label.minlen, 1);
    assert_eq!(label.weight, 1.0);
    assert_eq!(label.labeloffset, 10.0);
    assert_eq!(label.labelpos, LabelPos::R);
    assert_eq!((label.width, label.height), (0.0, 0.0));
}

#[test]
fn edge_attrs_read_every_layout_attribute() {
    let label = EdgeLabel::from_attrs(&attrs(json!({
        "minlen": "2",
        "Weight": 3,
        "width": 40,
        "height": 10,
        "labelOffset": 4,
        "LabelPos": "l",
    })))
    .unwrap();
    assert_eq!(label.minlen, 2);
    assert_eq!(label.weight, 3.0);
    assert_eq!((label.width, label.height), (40.0, 10.0));
    assert_eq!(label.labeloffset, 4.0);
    assert_eq!(label.labelpos, LabelPos::L);
}

#[test]
fn edge_attrs_round_minlen() {
    let label = EdgeLabel::from_attrs(&attrs(json!({ "minlen": 2.6 }))).unwrap();
    assert_eq!(label.minlen, 3);
}

#[test]
fn edge_attrs_reject_out_of_range_minlen() {
    for minlen in [json!(0), json!("-1"), json!(0.4), json!(1_500_000_000)] {
        let err = EdgeLabel::from_attrs(&attrs(json!({ "MinLen": minlen }))).unwrap_err();
        assert!(
            matches!(err, Error::InvalidOption { ref name, .. } if name == "minlen"),
            "{minlen}"
        );
    }
    let label = EdgeLabel::from_attrs(&attrs(json!({ "minlen": EdgeLabel::MAX_MINLEN }))).unwrap();
    assert_eq!(label.minlen, EdgeLabel::MAX_MINLEN);
}

#[test]
fn edge_attrs_reject_negative_or_infinite_weights() {
    for weight in [json!("-3"), json!(-0.5), json!("inf")] {
        let err = EdgeLabel::from_attrs(&attrs(json!({ "weight": weight }))).unwrap_err();
        assert!(
            matches!(err, Error::InvalidOption { ref name, .. } if name == "weight"),
            "{weight}"
        );
    }
    let label = EdgeLabel::from_attrs(&attrs(json!({ "weight": 0 }))).unwrap();
    assert_eq!(label.weight, 0.0);
}

#[test]
fn size_attrs_reject_negative_values() {
    let err = NodeLabel::from_attrs(&attrs(json!({ "width": -5 }))).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref name, .. } if name == "width"));

    let err = EdgeLabel::from_attrs(&attrs(json!({ "height": "-1" }))).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref name, .. } if name == "height"));
}

#[test]
fn graph_from_json_rejects_invalid_edge_ranges() {
    let err = graph_from_json(&json!({
        "nodes": [{ "id": "a" }, { "id": "b" }],
        "edges": [{ "v": "a", "w": "b", "label": { "MinLen": "0", "weight": "-3" } }],
    }))
    .unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref name, .. } if name == "minlen"));
}

#[test]
fn edge_attrs_reject_unknown_label_positions() {
    let err = EdgeLabel::from_attrs(&attrs(json!({ "labelpos": "above" }))).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref name, .. } if name == "labelpos"));
}

#[test]
fn graph_from_json_reads_nodes_edges_and_parents() {
    let g = graph_from_json_str(
        r#"{
            "graph": { "rankdir": "BT", "nodesep": 30 },
            "nodes": [
                { "id": "a", "label": { "width": 40, "height": 20 } },
                { "id": "b", "parent": "cluster" },
                { "id": "cluster" }
            ],
            "edges": [
                { "v": "a", "w": "b", "name": "x", "label": { "minlen": "2" } },
                { "v": "a", "w": "b", "name": "y" }
            ]
        }"#,
    )
    .unwrap();

    assert!(g.is_compound());
    assert!(g.is_multigraph());
    assert_eq!(g.graph().rankdir, RankDir::BT);
    assert_eq!(g.graph().nodesep, 30.0);
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.node("a").unwrap().width, 40.0);
    assert_eq!(g.parent("b"), Some("cluster"));
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.edge("a", "b", Some("x")).unwrap().minlen, 2);
    assert_eq!(g.edge("a", "b", Some("y")).unwrap().minlen, 1);
}

#[test]
fn graph_from_json_creates_missing_parents() {
    let g = graph_from_json(&json!({
        "nodes": [{ "id": "a", "parent": "p" }],
    }))
    .unwrap();
    assert!(g.has_node("p"));
    assert_eq!(g.children("p"), vec!["a"]);
}

#[test]
fn graph_from_json_rejects_malformed_documents() {
    let err = graph_from_json_str("{ \"nodes\": [").unwrap_err();
    assert!(matches!(err, Error::Json(_)));

    let err = graph_from_json(&json!({ "nodes": [{ "label": {} }] })).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn graph_from_json_propagates_attribute_errors() {
    let err = graph_from_json(&json!({
        "nodes": [{ "id": "a", "label": { "width": "big" } }],
    }))
    .unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref name, .. } if name == "width"));
}

#[test]
fn graph_to_json_renders_layout_results() {
    let mut g = graph_from_json(&json!({
        "graph": { "rankdir": "TB" },
        "nodes": [
            { "id": "a", "label": { "width": 50, "height": 100 } },
            { "id": "b", "label": { "width": 50, "height": 100 } }
        ],
        "edges": [{ "v": "a", "w": "b" }],
    }))
    .unwrap();
    layout(&mut g).unwrap();

    let out = graph_to_json(&g);

    assert_eq!(out["graph"]["rankdir"], json!("tb"));
    assert_eq!(out["graph"]["width"], json!(50.0));
    assert_eq!(out["graph"]["height"], json!(250.0));
    assert_eq!(
        out["nodes"][0],
        json!({
            "id": "a",
            "parent": null,
            "label": { "x": 25.0, "y": 50.0, "width": 50.0, "height": 100.0 },
        })
    );
    assert_eq!(out["edges"][0]["v"], json!("a"));
    assert_eq!(out["edges"][0]["name"], Value::Null);
    assert_eq!(
        out["edges"][0]["label"]["points"],
        json!([
            { "x": 25.0, "y": 100.0 },
            { "x": 25.0, "y": 125.0 },
            { "x": 25.0, "y": 150.0 },
        ])
    );
    assert_eq!(out["edges"][0]["label"]["x"], Value::Null);
}
