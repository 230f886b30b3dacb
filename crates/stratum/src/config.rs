//! Loosely typed attribute loading.
//!
//! Attribute maps come from JSON documents where keys may use any case and numbers may be
//! quoted. Only the attributes layout understands are read; everything else is ignored.
//!
//! A graph document looks like:
//!
//! ```json
//! {
//!   "graph": { "rankdir": "LR", "nodesep": 30 },
//!   "nodes": [ { "id": "a", "label": { "width": 40, "height": 20 } },
//!              { "id": "b", "parent": "cluster" } ],
//!   "edges": [ { "v": "a", "w": "b", "name": "x", "label": { "minlen": "2" } } ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::graphlib::{EdgeKey, Graph, GraphOptions};
use crate::{EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel, RankDir};
use serde::Deserialize;
use serde_json::{Map, Value, json};

type Attrs = Map<String, Value>;

fn canonicalize(attrs: &Attrs) -> Attrs {
    attrs
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
        .collect()
}

fn number(attrs: &Attrs, key: &str) -> Result<Option<f64>> {
    match attrs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| Error::invalid_option(key, s)),
        Some(other) => Err(Error::invalid_option(key, other)),
    }
}

fn text<'a>(attrs: &'a Attrs, key: &str) -> Option<&'a str> {
    attrs.get(key).and_then(Value::as_str)
}

impl GraphLabel {
    /// Reads `nodesep`, `edgesep`, `ranksep`, `marginx`, `marginy`, `rankdir`, `align`,
    /// `acyclicer` and `ranker`. Unknown rankers and acyclicers fall back to the default.
    pub fn from_attrs(attrs: &Attrs) -> Result<Self> {
        let attrs = canonicalize(attrs);
        let mut label = GraphLabel::default();
        for (key, slot) in [
            ("nodesep", &mut label.nodesep),
            ("edgesep", &mut label.edgesep),
            ("ranksep", &mut label.ranksep),
            ("marginx", &mut label.marginx),
            ("marginy", &mut label.marginy),
        ] {
            if let Some(n) = number(&attrs, key)? {
                *slot = n;
            }
        }
        if let Some(s) = text(&attrs, "rankdir") {
            label.rankdir = s.parse::<RankDir>()?;
        }
        if let Some(s) = text(&attrs, "align") {
            label.align = Some(s.parse()?);
        }
        if let Some(s) = text(&attrs, "acyclicer") {
            label.acyclicer = s.parse().unwrap_or_default();
        }
        if let Some(s) = text(&attrs, "ranker") {
            label.ranker = s.parse().unwrap_or_default();
        }
        Ok(label)
    }
}

impl NodeLabel {
    /// Reads `width` and `height`.
    pub fn from_attrs(attrs: &Attrs) -> Result<Self> {
        let attrs = canonicalize(attrs);
        let label = NodeLabel::sized(
            number(&attrs, "width")?.unwrap_or(0.0),
            number(&attrs, "height")?.unwrap_or(0.0),
        );
        label.validate()?;
        Ok(label)
    }
}

impl EdgeLabel {
    /// Reads `minlen`, `weight`, `width`, `height`, `labeloffset` and `labelpos`. Values outside
    /// the ranges of [`EdgeLabel::validate`] are rejected.
    pub fn from_attrs(attrs: &Attrs) -> Result<Self> {
        let attrs = canonicalize(attrs);
        let mut label = EdgeLabel::default();
        if let Some(n) = number(&attrs, "minlen")? {
            let rounded = n.round();
            // Range check before the cast, which would saturate.
            if !(1.0..=f64::from(EdgeLabel::MAX_MINLEN)).contains(&rounded) {
                return Err(Error::invalid_option("minlen", n));
            }
            label.minlen = rounded as i32;
        }
        for (key, slot) in [
            ("weight", &mut label.weight),
            ("width", &mut label.width),
            ("height", &mut label.height),
            ("labeloffset", &mut label.labeloffset),
        ] {
            if let Some(n) = number(&attrs, key)? {
                *slot = n;
            }
        }
        if let Some(s) = text(&attrs, "labelpos") {
            label.labelpos = s.parse::<LabelPos>()?;
        }
        label.validate()?;
        Ok(label)
    }
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    graph: Attrs,
    #[serde(default)]
    nodes: Vec<NodeDocument>,
    #[serde(default)]
    edges: Vec<EdgeDocument>,
}

#[derive(Debug, Deserialize)]
struct NodeDocument {
    id: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    label: Attrs,
}

#[derive(Debug, Deserialize)]
struct EdgeDocument {
    v: String,
    w: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    label: Attrs,
}

/// Builds a compound multigraph from a graph document.
pub fn graph_from_json(value: &Value) -> Result<LayoutGraph> {
    let doc = GraphDocument::deserialize(value)?;
    let mut g: LayoutGraph = Graph::new(GraphOptions::layout());
    g.set_graph(GraphLabel::from_attrs(&doc.graph)?);

    for node in &doc.nodes {
        g.set_node(node.id.clone(), NodeLabel::from_attrs(&node.label)?);
    }
    for node in &doc.nodes {
        if let Some(parent) = &node.parent {
            g.ensure_node(parent.clone());
            g.try_set_parent(&node.id, parent)?;
        }
    }
    for edge in doc.edges {
        let label = EdgeLabel::from_attrs(&edge.label)?;
        g.set_edge_key(EdgeKey::new(edge.v, edge.w, edge.name), label);
    }
    Ok(g)
}

pub fn graph_from_json_str(s: &str) -> Result<LayoutGraph> {
    let value: Value = serde_json::from_str(s)?;
    graph_from_json(&value)
}

/// Renders the layout results of `g` in the document shape [`graph_from_json`] reads.
pub fn graph_to_json(g: &LayoutGraph) -> Value {
    let graph = g.graph();
    let nodes: Vec<Value> = g
        .nodes()
        .filter_map(|v| {
            let n = g.node(v)?;
            Some(json!({
                "id": v,
                "parent": g.parent(v),
                "label": {
                    "x": n.x,
                    "y": n.y,
                    "width": n.width,
                    "height": n.height,
                },
            }))
        })
        .collect();
    let edges: Vec<Value> = g
        .edges()
        .filter_map(|e| {
            let label = g.edge_by_key(e)?;
            Some(json!({
                "v": e.v,
                "w": e.w,
                "name": e.name,
                "label": {
                    "points": label.points,
                    "x": label.x,
                    "y": label.y,
                    "width": label.width,
                    "height": label.height,
                },
            }))
        })
        .collect();

    json!({
        "graph": {
            "rankdir": graph.rankdir,
            "width": graph.width,
            "height": graph.height,
        },
        "nodes": nodes,
        "edges": edges,
    })
}
