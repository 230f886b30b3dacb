use crate::graphlib::Graph;

/// Spanning tree over the ranked graph, undirected.
pub type Tree = Graph<TreeNodeLabel, TreeEdgeLabel, ()>;

/// Postorder numbering: a node's subtree holds exactly the nodes whose `lim` lies in
/// `low..=lim`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNodeLabel {
    pub low: i32,
    pub lim: i32,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeEdgeLabel {
    pub cutvalue: f64,
}
