//! Graph configuration options.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    pub multigraph: bool,
    pub compound: bool,
    pub directed: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            multigraph: false,
            compound: false,
            directed: true,
        }
    }
}

impl GraphOptions {
    /// Options used by the layout working graph: directed, multi-edge and compound.
    pub fn layout() -> Self {
        Self {
            multigraph: true,
            compound: true,
            directed: true,
        }
    }
}
