//! Rank direction support.
//!
//! Ranking and positioning always work top to bottom. [`adjust`] swaps node and label extents
//! for horizontal layouts; [`undo`] mirrors and transposes the finished coordinates into the
//! requested direction.

use crate::{Dummy, EdgeLabel, LayoutGraph, RankDir};

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_extent(label: &mut EdgeLabel) {
    std::mem::swap(&mut label.width, &mut label.height);
}

fn swap_width_height(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        std::mem::swap(&mut n.width, &mut n.height);
        // Labels parked off the edge set travel with the graph too.
        for se in &mut n.self_edges {
            swap_extent(&mut se.label);
        }
        if let Some(Dummy::SelfEdge { label, .. }) = n.dummy.as_mut() {
            swap_extent(label);
        }
    });
    g.for_each_edge_mut(|_, e| swap_extent(e));
    for chain in &mut g.graph_mut().dummy_chains {
        swap_extent(&mut chain.label);
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        if let Some(y) = n.y.as_mut() {
            *y = -*y;
        }
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            p.y = -p.y;
        }
        if let Some(y) = e.y.as_mut() {
            *y = -*y;
        }
    });
}

fn swap_xy(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        std::mem::swap(&mut n.x, &mut n.y);
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            std::mem::swap(&mut p.x, &mut p.y);
        }
        std::mem::swap(&mut e.x, &mut e.y);
    });
}
