//! Label types carried by the layout graph and geometry primitives.

use crate::error::{Error, Result};
use crate::graphlib::{EdgeKey, Graph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The graph every layout phase operates on.
pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }
}

impl FromStr for RankDir {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tb" => Ok(RankDir::TB),
            "bt" => Ok(RankDir::BT),
            "lr" => Ok(RankDir::LR),
            "rl" => Ok(RankDir::RL),
            _ => Err(Error::invalid_option("rankdir", s)),
        }
    }
}

/// Horizontal alignment preference for coordinate assignment: `u`/`d` pick which neighbouring
/// layer a node is aligned with, `l`/`r` pick the lower or upper median on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

impl Align {
    pub fn is_up(self) -> bool {
        matches!(self, Align::UL | Align::UR)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Align::UL | Align::DL)
    }
}

impl FromStr for Align {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ul" => Ok(Align::UL),
            "ur" => Ok(Align::UR),
            "dl" => Ok(Align::DL),
            "dr" => Ok(Align::DR),
            _ => Err(Error::invalid_option("align", s)),
        }
    }
}

/// Feedback arc set heuristic used to break cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acyclicer {
    #[default]
    Dfs,
    Greedy,
}

impl FromStr for Acyclicer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" => Ok(Acyclicer::Dfs),
            "greedy" => Ok(Acyclicer::Greedy),
            _ => Err(Error::invalid_option("acyclicer", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

impl FromStr for Ranker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "network-simplex" => Ok(Ranker::NetworkSimplex),
            "tight-tree" => Ok(Ranker::TightTree),
            "longest-path" => Ok(Ranker::LongestPath),
            _ => Err(Error::invalid_option("ranker", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPos {
    L,
    C,
    #[default]
    R,
}

impl FromStr for LabelPos {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "l" => Ok(LabelPos::L),
            "c" => Ok(LabelPos::C),
            "r" => Ok(LabelPos::R),
            _ => Err(Error::invalid_option("labelpos", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Left,
    Right,
}

/// Kind of a synthetic node. Real nodes carry `dummy: None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Dummy {
    /// Marks the rank an edge label will occupy while empty ranks are removed. `on_rank` is
    /// false when the edge spans an odd number of ranks and the midpoint falls between ranks.
    EdgeProxy { edge: EdgeKey, on_rank: bool },
    /// Stand-in for a self loop during positioning.
    SelfEdge {
        edge: EdgeKey,
        label: Box<EdgeLabel>,
    },
    /// Per-rank left/right boundary of a cluster.
    Border { side: BorderSide },
    NestingRoot,
    NestingBorderTop,
    NestingBorderBottom,
    /// Interior node of a long edge chain.
    Edge,
    /// Interior node of a long edge chain that carries the edge label.
    EdgeLabel { labelpos: LabelPos },
}

impl Dummy {
    /// Border nodes are removed once container geometry has been read off them.
    pub fn is_border(&self) -> bool {
        matches!(
            self,
            Dummy::Border { .. } | Dummy::NestingBorderTop | Dummy::NestingBorderBottom
        )
    }

    pub fn is_chain(&self) -> bool {
        matches!(self, Dummy::Edge | Dummy::EdgeLabel { .. })
    }
}

/// The first dummy of a normalized long edge together with what is needed to restore it.
#[derive(Debug, Clone, PartialEq)]
pub struct DummyChain {
    pub head: String,
    pub edge: EdgeKey,
    pub label: EdgeLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub edge: EdgeKey,
    pub label: EdgeLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    pub align: Option<Align>,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,

    /// Bounding box, set by layout.
    pub width: Option<f64>,
    pub height: Option<f64>,

    pub nesting_root: Option<String>,
    pub node_rank_factor: Option<i32>,
    pub dummy_chains: Vec<DummyChain>,
    pub max_rank: Option<i32>,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            nodesep: 50.0,
            edgesep: 20.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
            acyclicer: Acyclicer::Dfs,
            ranker: Ranker::NetworkSimplex,
            width: None,
            height: None,
            nesting_root: None,
            node_rank_factor: None,
            dummy_chains: Vec::new(),
            max_rank: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub dummy: Option<Dummy>,

    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    pub border_left: BTreeMap<i32, String>,
    pub border_right: BTreeMap<i32, String>,

    pub self_edges: Vec<SelfEdge>,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }

    /// Rejects negative or non-finite sizes.
    pub fn validate(&self) -> Result<()> {
        check_extent("width", self.width)?;
        check_extent("height", self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub minlen: i32,
    pub weight: f64,
    pub width: f64,
    pub height: f64,
    pub labeloffset: f64,
    pub labelpos: LabelPos,

    pub label_rank: Option<i32>,
    pub nesting_edge: bool,
    pub reversed: bool,
    pub forward_name: Option<String>,

    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            width: 0.0,
            height: 0.0,
            labeloffset: 10.0,
            labelpos: LabelPos::R,
            label_rank: None,
            nesting_edge: false,
            reversed: false,
            forward_name: None,
            x: None,
            y: None,
            points: Vec::new(),
        }
    }
}

impl EdgeLabel {
    /// Largest accepted `minlen`. Layout multiplies minlen by 2 for label ranks and again by the
    /// nesting rank factor.
    pub const MAX_MINLEN: i32 = 1 << 16;

    pub fn weighted(weight: f64, minlen: i32) -> Self {
        Self {
            weight,
            minlen,
            ..Default::default()
        }
    }

    /// Rejects `minlen` outside `1..=MAX_MINLEN`, negative or non-finite `weight` and negative or
    /// non-finite label sizes.
    pub fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_MINLEN).contains(&self.minlen) {
            return Err(Error::invalid_option("minlen", self.minlen));
        }
        check_extent("weight", self.weight)?;
        check_extent("width", self.width)?;
        check_extent("height", self.height)
    }
}

fn check_extent(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_option(name, value))
    }
}
