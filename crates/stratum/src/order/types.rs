use crate::graphlib::Graph;

/// Which base-graph edges a layer graph copies for its movable nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    InEdges,
    OutEdges,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGraphLabel {
    pub root: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightLabel {
    pub weight: f64,
}

/// Node of a layer graph. Clusters carry their border nodes for the layer's rank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerNode {
    pub order: Option<usize>,
    pub border_left: Option<String>,
    pub border_right: Option<String>,
}

pub type LayerGraph = Graph<LayerNode, WeightLabel, LayerGraphLabel>;

/// Sibling ordering constraints accumulated during one sweep: an edge `a -> b` keeps cluster
/// `a` left of cluster `b`.
pub type ConstraintGraph = Graph<(), (), ()>;
