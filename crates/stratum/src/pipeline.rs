//! Layout driver.
//!
//! [`layout`] copies the caller's graph into a private working graph, runs every phase on it
//! through the typed [`Stage`] chain and writes the results back. The working graph never leaks:
//! dummy nodes, border nodes and renamed edges stay internal.

pub mod stage;

pub use stage::{Acyclic, Layered, Nested, Ordered, Positioned, Prepared, Ranked, Stage};

use crate::error::{Error, Result};
use crate::graphlib::{EdgeKey, Graph, GraphOptions};
use crate::order::{BarycenterSweep, CrossingMinimizer};
use crate::position::{MedianPlacement, Positioner};
use crate::util::{self, add_dummy_node, intersect_rect, time};
use crate::{Dummy, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel, Point, UniqueIds};
use tracing::debug;

/// Lays out `g` in place with the default crossing minimizer and positioner.
pub fn layout(g: &mut LayoutGraph) -> Result<()> {
    Layout::new().run(g)
}

/// Layout with pluggable ordering and coordinate assignment strategies.
pub struct Layout {
    minimizer: Box<dyn CrossingMinimizer>,
    positioner: Box<dyn Positioner>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            minimizer: Box::new(BarycenterSweep::default()),
            positioner: Box::new(MedianPlacement::default()),
        }
    }
}

impl std::fmt::Debug for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layout").finish_non_exhaustive()
    }
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minimizer(mut self, minimizer: impl CrossingMinimizer + 'static) -> Self {
        self.minimizer = Box::new(minimizer);
        self
    }

    pub fn with_positioner(mut self, positioner: impl Positioner + 'static) -> Self {
        self.positioner = Box::new(positioner);
        self
    }

    /// Runs every phase on a copy of `input` and writes node coordinates, container sizes, edge
    /// points, edge label positions and the graph bounding box back into `input`.
    ///
    /// On error `input` is left untouched.
    pub fn run(&self, input: &mut LayoutGraph) -> Result<()> {
        debug!(
            nodes = input.node_count(),
            edges = input.edge_count(),
            "layout"
        );
        let mut work = time("build_layout_graph", || build_layout_graph(input))?;
        time("run_layout", || self.run_phases(&mut work))?;
        time("update_input_graph", || update_input_graph(input, &work));
        Ok(())
    }

    fn run_phases(&self, g: &mut LayoutGraph) -> Result<()> {
        Stage::new(g)
            .break_cycles()
            .nest()
            .rank()?
            .layer()
            .order(self.minimizer.as_ref())?
            .position(self.positioner.as_ref())
            .finish();
        Ok(())
    }
}

/// Copies the layout-relevant attributes of `input` into a fresh compound multigraph.
///
/// Edges incident on a node with children are rejected, as are node and edge labels that fail
/// [`NodeLabel::validate`] or [`EdgeLabel::validate`].
pub fn build_layout_graph(input: &LayoutGraph) -> Result<LayoutGraph> {
    for v in input.nodes() {
        if let Some(label) = input.node(v) {
            label.validate()?;
        }
    }
    for e in input.edges() {
        if let Some(label) = input.edge_by_key(e) {
            label.validate()?;
        }
    }
    if let Some(e) = input
        .edges()
        .find(|e| input.has_children(&e.v) || input.has_children(&e.w))
    {
        return Err(Error::CompoundEdge {
            v: e.v.clone(),
            w: e.w.clone(),
        });
    }

    let mut g: LayoutGraph = Graph::new(GraphOptions::layout());
    let src = input.graph();
    g.set_graph(GraphLabel {
        rankdir: src.rankdir,
        align: src.align,
        nodesep: src.nodesep,
        edgesep: src.edgesep,
        ranksep: src.ranksep,
        marginx: src.marginx,
        marginy: src.marginy,
        acyclicer: src.acyclicer,
        ranker: src.ranker,
        ..GraphLabel::default()
    });

    input.for_each_node(|v, label| {
        g.set_node(v, NodeLabel::sized(label.width, label.height));
    });
    if input.is_compound() {
        for v in input.node_ids() {
            if let Some(parent) = input.parent(&v) {
                g.set_parent(v.clone(), parent);
            }
        }
    }
    input.for_each_edge(|e, label| {
        g.set_edge_key(
            e.clone(),
            EdgeLabel {
                minlen: label.minlen,
                weight: label.weight,
                width: label.width,
                height: label.height,
                labeloffset: label.labeloffset,
                labelpos: label.labelpos,
                ..EdgeLabel::default()
            },
        );
    });
    Ok(g)
}

/// Copies coordinates back onto `input`. Only containers take their computed size.
pub fn update_input_graph(input: &mut LayoutGraph, g: &LayoutGraph) {
    for v in input.node_ids() {
        let Some(computed) = g.node(&v) else {
            continue;
        };
        let is_container = input.has_children(&v);
        if let Some(label) = input.node_mut(&v) {
            label.x = computed.x;
            label.y = computed.y;
            if is_container {
                label.width = computed.width;
                label.height = computed.height;
            }
        }
    }

    for e in input.edge_keys() {
        let Some(computed) = g.edge_by_key(&e) else {
            continue;
        };
        if let Some(label) = input.edge_mut_by_key(&e) {
            label.points = computed.points.clone();
            if computed.x.is_some() {
                label.x = computed.x;
                label.y = computed.y;
            }
        }
    }

    let (width, height) = (g.graph().width, g.graph().height);
    let label = input.graph_mut();
    label.width = width;
    label.height = height;
}

/// Halves `ranksep` and doubles every `minlen` so that labels can occupy the rank between two
/// real ranks. Side labels also widen (or heighten, for horizontal layouts) by `labeloffset`.
pub fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    let horizontal = {
        let graph = g.graph_mut();
        graph.ranksep /= 2.0;
        graph.rankdir.is_horizontal()
    };
    g.for_each_edge_mut(|_, e| {
        e.minlen = e.minlen.saturating_mul(2);
        if e.labelpos != LabelPos::C {
            if horizontal {
                e.height += e.labeloffset;
            } else {
                e.width += e.labeloffset;
            }
        }
    });
}

/// Adds an [`Dummy::EdgeProxy`] at the midpoint rank of every labelled edge so that rank survives
/// empty-rank removal.
pub fn inject_edge_label_proxies(g: &mut LayoutGraph, ids: &mut UniqueIds) {
    let mut proxies: Vec<(EdgeKey, i32, bool)> = Vec::new();
    g.for_each_edge(|e, label| {
        if label.width <= 0.0 || label.height <= 0.0 {
            return;
        }
        let (Some(v_rank), Some(w_rank)) = (
            g.node(&e.v).and_then(|n| n.rank),
            g.node(&e.w).and_then(|n| n.rank),
        ) else {
            return;
        };
        let span = w_rank - v_rank;
        proxies.push((e.clone(), v_rank + span.div_euclid(2), span % 2 == 0));
    });

    for (edge, rank, on_rank) in proxies {
        let label = NodeLabel {
            rank: Some(rank),
            ..NodeLabel::default()
        };
        add_dummy_node(g, ids, Dummy::EdgeProxy { edge, on_rank }, label, "_ep");
    }
}

/// Removes the proxies, recording their rank on the edge as `label_rank`.
pub fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    let mut proxies: Vec<(String, EdgeKey, Option<i32>)> = Vec::new();
    g.for_each_node(|v, label| {
        if let Some(Dummy::EdgeProxy { edge, on_rank }) = &label.dummy {
            let rank = if *on_rank { label.rank } else { None };
            proxies.push((v.to_string(), edge.clone(), rank));
        }
    });
    for (v, edge, rank) in proxies {
        if let Some(label) = g.edge_mut_by_key(&edge) {
            label.label_rank = rank;
        }
        g.remove_node(&v);
    }
}

/// Sets `min_rank`/`max_rank` on every cluster from its border ranks and the graph `max_rank`.
pub fn assign_rank_min_max(g: &mut LayoutGraph) {
    let mut spans: Vec<(String, Option<i32>, Option<i32>)> = Vec::new();
    g.for_each_node(|v, label| {
        let (Some(top), Some(bottom)) = (&label.border_top, &label.border_bottom) else {
            return;
        };
        let min = g.node(top).and_then(|n| n.rank);
        let max = g.node(bottom).and_then(|n| n.rank);
        spans.push((v.to_string(), min, max));
    });
    for (v, min, max) in spans {
        if let Some(label) = g.node_mut(&v) {
            label.min_rank = min;
            label.max_rank = max;
        }
    }
    let max_rank = util::max_rank(g);
    g.graph_mut().max_rank = max_rank;
}

/// Derives container geometry from the positioned border nodes, then removes all border nodes.
pub fn remove_border_nodes(g: &mut LayoutGraph) {
    let mut boxes: Vec<(String, f64, f64, f64, f64)> = Vec::new();
    g.for_each_node(|v, label| {
        if !g.has_children(v) {
            return;
        }
        let y_of = |id: &Option<String>| id.as_deref().and_then(|id| g.node(id)).and_then(|n| n.y);
        let (Some(top), Some(bottom)) = (y_of(&label.border_top), y_of(&label.border_bottom))
        else {
            return;
        };
        let xs = |side: &std::collections::BTreeMap<i32, String>| {
            side.values()
                .filter_map(|id| g.node(id).and_then(|n| n.x))
                .collect::<Vec<f64>>()
        };
        let left = xs(&label.border_left).into_iter().reduce(f64::min);
        let right = xs(&label.border_right).into_iter().reduce(f64::max);
        let (Some(left), Some(right)) = (left, right) else {
            return;
        };
        boxes.push((v.to_string(), left, right, top, bottom));
    });

    for (v, left, right, top, bottom) in boxes {
        if let Some(label) = g.node_mut(&v) {
            let width = (right - left).abs();
            let height = (bottom - top).abs();
            label.width = width;
            label.height = height;
            label.x = Some(left.min(right) + width / 2.0);
            label.y = Some(top.min(bottom) + height / 2.0);
        }
    }

    let borders: Vec<String> = g
        .nodes()
        .filter(|v| {
            g.node(v)
                .and_then(|n| n.dummy.as_ref())
                .is_some_and(Dummy::is_border)
        })
        .map(str::to_string)
        .collect();
    debug!(removed = borders.len(), "border nodes");
    for v in borders {
        g.remove_node(&v);
    }
}

/// Moves side labels off the edge by `labeloffset` and drops the offset from their width.
pub fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    g.for_each_edge_mut(|_, e| {
        let Some(x) = e.x else {
            return;
        };
        match e.labelpos {
            LabelPos::L => {
                e.width -= e.labeloffset;
                e.x = Some(x - e.width / 2.0 - e.labeloffset);
            }
            LabelPos::R => {
                e.width -= e.labeloffset;
                e.x = Some(x + e.width / 2.0 + e.labeloffset);
            }
            LabelPos::C => {}
        }
    });
}

#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Extent {
    fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.min_x = self.min_x.min(x - width / 2.0);
        self.max_x = self.max_x.max(x + width / 2.0);
        self.min_y = self.min_y.min(y - height / 2.0);
        self.max_y = self.max_y.max(y + height / 2.0);
    }

    fn is_empty(&self) -> bool {
        !self.min_x.is_finite()
    }
}

/// Shifts the drawing so its bounding box (nodes and edge labels) starts at the margins, and
/// records the graph `width`/`height`.
pub fn translate_graph(g: &mut LayoutGraph) {
    let mut extent = Extent::empty();
    g.for_each_node(|_, n| {
        if let (Some(x), Some(y)) = (n.x, n.y) {
            extent.include(x, y, n.width, n.height);
        }
    });
    g.for_each_edge(|_, e| {
        if let (Some(x), Some(y)) = (e.x, e.y) {
            extent.include(x, y, e.width, e.height);
        }
    });
    if extent.is_empty() {
        extent = Extent {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
        };
    }

    let (marginx, marginy) = (g.graph().marginx, g.graph().marginy);
    let dx = extent.min_x - marginx;
    let dy = extent.min_y - marginy;

    g.for_each_node_mut(|_, n| {
        n.x = n.x.map(|x| x - dx);
        n.y = n.y.map(|y| y - dy);
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            p.x -= dx;
            p.y -= dy;
        }
        e.x = e.x.map(|x| x - dx);
        e.y = e.y.map(|y| y - dy);
    });

    let graph = g.graph_mut();
    graph.width = Some(extent.max_x - dx + marginx);
    graph.height = Some(extent.max_y - dy + marginy);
}

/// Clips every edge at the boundaries of its end nodes.
pub fn assign_node_intersects(g: &mut LayoutGraph) {
    let center = |n: &NodeLabel| Point {
        x: n.x.unwrap_or(0.0),
        y: n.y.unwrap_or(0.0),
    };
    for e in g.edge_keys() {
        let (Some(v), Some(w), Some(label)) = (g.node(&e.v), g.node(&e.w), g.edge_by_key(&e))
        else {
            continue;
        };
        let (p1, p2) = match (label.points.first(), label.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (center(w), center(v)),
        };
        let start = intersect_rect(v, p1);
        let end = intersect_rect(w, p2);
        if let Some(label) = g.edge_mut_by_key(&e) {
            label.points.insert(0, start);
            label.points.push(end);
        }
    }
}

/// Reversed edges were routed against their direction; flip their points back.
pub fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    g.for_each_edge_mut(|_, e| {
        if e.reversed {
            e.points.reverse();
        }
    });
}
