//! Typed pipeline stages.
//!
//! A [`Stage`] holds exclusive access to the working graph together with the run's id source.
//! Each transition consumes the stage and returns the next one, so phases can only run in
//! order: `Prepared -> Acyclic -> Nested -> Ranked -> Layered -> Ordered -> Positioned`.

use super::{
    assign_node_intersects, assign_rank_min_max, fixup_edge_label_coords,
    inject_edge_label_proxies, make_space_for_edge_labels, remove_border_nodes,
    remove_edge_label_proxies, reverse_points_for_reversed_edges, translate_graph,
};
use crate::error::Result;
use crate::order::CrossingMinimizer;
use crate::position::Positioner;
use crate::util::{self, time};
use crate::{
    LayoutGraph, UniqueIds, acyclic, add_border_segments, coordinate_system, nesting_graph,
    normalize, order, parent_dummy_chains, position, rank, self_edges,
};
use std::marker::PhantomData;

/// Self loops removed, label space reserved.
#[derive(Debug)]
pub struct Prepared;
/// Cycles broken.
#[derive(Debug)]
pub struct Acyclic;
/// Nesting graph in place.
#[derive(Debug)]
pub struct Nested;
/// Normalized ranks on every leaf, rank spans on clusters.
#[derive(Debug)]
pub struct Ranked;
/// Long edges split, border segments added.
#[derive(Debug)]
pub struct Layered;
/// Every ranked node has an order.
#[derive(Debug)]
pub struct Ordered;
/// Every ranked node has coordinates in the top-to-bottom frame.
#[derive(Debug)]
pub struct Positioned;

#[derive(Debug)]
pub struct Stage<'g, P> {
    g: &'g mut LayoutGraph,
    ids: UniqueIds,
    _phase: PhantomData<P>,
}

impl<'g, P> Stage<'g, P> {
    fn advance<Q>(self) -> Stage<'g, Q> {
        Stage {
            g: self.g,
            ids: self.ids,
            _phase: PhantomData,
        }
    }

    pub fn graph(&self) -> &LayoutGraph {
        self.g
    }
}

impl<'g> Stage<'g, Prepared> {
    pub fn new(g: &'g mut LayoutGraph) -> Self {
        time("make_space_for_edge_labels", || make_space_for_edge_labels(g));
        time("remove_self_edges", || self_edges::remove_self_edges(g));
        Stage {
            g,
            ids: UniqueIds::new(),
            _phase: PhantomData,
        }
    }

    pub fn break_cycles(mut self) -> Stage<'g, Acyclic> {
        time("acyclic", || acyclic::run(self.g, &mut self.ids));
        self.advance()
    }
}

impl<'g> Stage<'g, Acyclic> {
    pub fn nest(mut self) -> Stage<'g, Nested> {
        time("nesting_graph", || nesting_graph::run(self.g, &mut self.ids));
        self.advance()
    }
}

impl<'g> Stage<'g, Nested> {
    /// Ranks the leaves, then settles label proxies, empty ranks and cluster spans.
    pub fn rank(mut self) -> Result<Stage<'g, Ranked>> {
        let g = &mut *self.g;
        time("rank", || -> Result<()> {
            let mut flat = util::as_non_compound_graph(g);
            rank::rank(&mut flat)?;
            flat.for_each_node(|v, n| {
                if let Some(label) = g.node_mut(v) {
                    label.rank = n.rank;
                }
            });
            Ok(())
        })?;
        time("inject_edge_label_proxies", || {
            inject_edge_label_proxies(g, &mut self.ids)
        });
        time("remove_empty_ranks", || util::remove_empty_ranks(g));
        time("nesting_graph_cleanup", || nesting_graph::cleanup(g));
        time("normalize_ranks", || util::normalize_ranks(g));
        time("assign_rank_min_max", || assign_rank_min_max(g));
        time("remove_edge_label_proxies", || remove_edge_label_proxies(g));
        Ok(self.advance())
    }
}

impl<'g> Stage<'g, Ranked> {
    pub fn layer(mut self) -> Stage<'g, Layered> {
        time("normalize", || normalize::run(self.g, &mut self.ids));
        time("parent_dummy_chains", || {
            parent_dummy_chains::parent_dummy_chains(self.g)
        });
        time("add_border_segments", || {
            add_border_segments::add_border_segments(self.g, &mut self.ids)
        });
        self.advance()
    }
}

impl<'g> Stage<'g, Layered> {
    pub fn order(mut self, minimizer: &dyn CrossingMinimizer) -> Result<Stage<'g, Ordered>> {
        time("order", || order::order(self.g, minimizer, &mut self.ids))?;
        time("insert_self_edges", || {
            self_edges::insert_self_edges(self.g, &mut self.ids)
        });
        Ok(self.advance())
    }
}

impl<'g> Stage<'g, Ordered> {
    pub fn position(self, positioner: &dyn Positioner) -> Stage<'g, Positioned> {
        time("coordinate_system_adjust", || coordinate_system::adjust(self.g));
        time("position", || position::position(self.g, positioner));
        self.advance()
    }
}

impl<'g> Stage<'g, Positioned> {
    /// Removes every synthetic node, restores the requested direction and original edges.
    pub fn finish(self) -> &'g mut LayoutGraph {
        let g = self.g;
        time("position_self_edges", || self_edges::position_self_edges(g));
        time("remove_border_nodes", || remove_border_nodes(g));
        time("normalize_undo", || normalize::undo(g));
        time("fixup_edge_label_coords", || fixup_edge_label_coords(g));
        time("coordinate_system_undo", || coordinate_system::undo(g));
        time("translate_graph", || translate_graph(g));
        time("assign_node_intersects", || assign_node_intersects(g));
        time("reverse_points", || reverse_points_for_reversed_edges(g));
        time("acyclic_undo", || acyclic::undo(g));
        g
    }
}
