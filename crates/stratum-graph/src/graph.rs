//! Graph container used by `stratum`.
//!
//! A `Graph<N, E, G>` stores node labels `N`, edge labels `E` and one graph label `G`. Nodes and
//! edges iterate in insertion order so every layout heuristic built on top of it is
//! deterministic.

mod edge_key;
mod options;

pub mod alg;

pub use edge_key::EdgeKey;
use edge_key::EdgeKeyView;
pub use options::GraphOptions;

use crate::error::{Error, Result};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;
type IndexMap<K, V> = indexmap::IndexMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    label: N,
    // Incident edges in insertion order. `out` holds edges whose canonical tail is this node,
    // `in_` those whose canonical head is this node.
    out: Vec<EdgeKey>,
    in_: Vec<EdgeKey>,
}

impl<N> NodeEntry<N> {
    fn new(label: N) -> Self {
        Self {
            label,
            out: Vec::new(),
            in_: Vec::new(),
        }
    }
}

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,

    graph_label: G,
    default_node_label: Box<dyn Fn() -> N + Send + Sync>,
    default_edge_label: Box<dyn Fn() -> E + Send + Sync>,

    nodes: IndexMap<String, NodeEntry<N>>,
    edges: IndexMap<EdgeKey, E>,

    parent: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: IndexMap::default(),
            edges: IndexMap::default(),
            parent: HashMap::default(),
            children: HashMap::default(),
        }
    }

    fn edge_key_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn canonicalize_key(&self, mut key: EdgeKey) -> EdgeKey {
        if !self.options.directed && key.v > key.w {
            (key.v, key.w) = (key.w, key.v);
        }
        if !self.options.multigraph {
            key.name = None;
        }
        key
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Box::new(f);
        self
    }

    // Nodes

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Inserts `id` with `label`, replacing the label if the node already exists.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        match self.nodes.get_mut(&id) {
            Some(entry) => entry.label = label,
            None => {
                self.nodes.insert(id, NodeEntry::new(label));
            }
        }
        self
    }

    /// Inserts `id` with the default node label unless it already exists.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.nodes.contains_key(&id) {
            let label = (self.default_node_label)();
            self.nodes.insert(id, NodeEntry::new(label));
        }
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id).map(|n| &n.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.nodes.get_mut(id).map(|n| &mut n.label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|k| k.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for (id, n) in &self.nodes {
            f(id, &n.label);
        }
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for (id, n) in &mut self.nodes {
            f(id, &mut n.label);
        }
    }

    /// Removes `id`, its incident edges and its hierarchy links. Children of a removed node
    /// become roots.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(entry) = self.nodes.get(id) else {
            return false;
        };
        let mut incident: Vec<EdgeKey> = entry.out.clone();
        incident.extend(entry.in_.iter().filter(|k| !k.is_self_loop()).cloned());
        for key in incident {
            self.remove_edge_key(&key);
        }

        self.clear_parent(id);
        if let Some(children) = self.children.remove(id) {
            for child in children {
                self.parent.remove(&child);
            }
        }

        self.nodes.shift_remove(id);
        true
    }

    // Edges

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.keys()
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().cloned().collect()
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for (k, e) in &self.edges {
            f(k, e);
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for (k, e) in &mut self.edges {
            f(k, e);
        }
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    /// Creates or updates the edge `(v, w, name)`. Missing endpoints are created with the
    /// default node label; a missing edge label falls back to the default edge label.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let key = self.canonicalize_key(EdgeKey {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        });

        if let Some(existing) = self.edges.get_mut(&key) {
            if let Some(label) = label {
                *existing = label;
            }
        } else {
            let label = label.unwrap_or_else(|| (self.default_edge_label)());
            self.insert_new_edge(key, label);
        }
        self
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> &mut Self {
        let key = self.canonicalize_key(key);
        match self.edges.get_mut(&key) {
            Some(existing) => *existing = label,
            None => self.insert_new_edge(key, label),
        }
        self
    }

    /// Inserts a new edge, failing if an edge with the same identity already exists.
    pub fn try_add_edge(&mut self, key: EdgeKey, label: E) -> Result<()> {
        let key = self.canonicalize_key(key);
        if self.edges.contains_key(&key) {
            return Err(Error::DuplicateEdge {
                v: key.v,
                w: key.w,
                name: key.name,
            });
        }
        self.insert_new_edge(key, label);
        Ok(())
    }

    fn insert_new_edge(&mut self, key: EdgeKey, label: E) {
        self.ensure_node(key.v.clone());
        self.ensure_node(key.w.clone());
        if let Some(n) = self.nodes.get_mut(&key.v) {
            n.out.push(key.clone());
        }
        if let Some(n) = self.nodes.get_mut(&key.w) {
            n.in_.push(key.clone());
        }
        self.edges.insert(key, label);
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edges.contains_key(&self.edge_key_view(v, w, name))
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edges.get(&self.edge_key_view(v, w, name))
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let view = self.edge_key_view(v, w, name);
        self.edges.get_mut(&view)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<E> {
        let view = self.edge_key_view(v, w, name);
        let (key, label) = self.edges.shift_remove_entry(&view)?;
        if let Some(n) = self.nodes.get_mut(&key.v) {
            n.out.retain(|k| k != &key);
        }
        if let Some(n) = self.nodes.get_mut(&key.w) {
            n.in_.retain(|k| k != &key);
        }
        Some(label)
    }

    // Adjacency

    pub fn successors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(n) = self.nodes.get(v) else {
            return Vec::new();
        };
        unique(n.out.iter().map(|k| k.w.as_str()))
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(n) = self.nodes.get(v) else {
            return Vec::new();
        };
        unique(n.in_.iter().map(|k| k.v.as_str()))
    }

    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let Some(n) = self.nodes.get(v) else {
            return Vec::new();
        };
        unique(
            n.out
                .iter()
                .map(|k| k.w.as_str())
                .chain(n.in_.iter().map(|k| k.v.as_str())),
        )
    }

    /// Edges leaving `v`, optionally restricted to those entering `w`. For undirected graphs
    /// this is every incident edge.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        if !self.options.directed {
            return self.incident_edges(v, w);
        }
        let Some(n) = self.nodes.get(v) else {
            return Vec::new();
        };
        n.out
            .iter()
            .filter(|k| w.is_none_or(|w| k.w == w))
            .cloned()
            .collect()
    }

    /// Edges entering `v`, optionally restricted to those leaving `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        if !self.options.directed {
            return self.incident_edges(v, u);
        }
        let Some(n) = self.nodes.get(v) else {
            return Vec::new();
        };
        n.in_
            .iter()
            .filter(|k| u.is_none_or(|u| k.v == u))
            .cloned()
            .collect()
    }

    pub fn node_edges(&self, v: &str) -> Vec<EdgeKey> {
        self.incident_edges(v, None)
    }

    fn incident_edges(&self, v: &str, other: Option<&str>) -> Vec<EdgeKey> {
        let Some(n) = self.nodes.get(v) else {
            return Vec::new();
        };
        let mut seen: HashSet<&EdgeKey> = HashSet::default();
        let mut out: Vec<EdgeKey> = Vec::new();
        for k in n.out.iter().chain(n.in_.iter()) {
            if other.is_some_and(|o| k.other(v) != o) {
                continue;
            }
            if seen.insert(k) {
                out.push(k.clone());
            }
        }
        out
    }

    pub fn for_each_out_edge<F>(&self, v: &str, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for key in self.out_edges(v, None) {
            if let Some(label) = self.edges.get(&key) {
                f(&key, label);
            }
        }
    }

    pub fn for_each_in_edge<F>(&self, v: &str, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for key in self.in_edges(v, None) {
            if let Some(label) = self.edges.get(&key) {
                f(&key, label);
            }
        }
    }

    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, n)| !self.options.directed || n.in_.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, n)| !self.options.directed || n.out.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    // Hierarchy

    /// Makes `parent` the parent of `child`, creating either node if needed. Ignored for
    /// non-compound graphs.
    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        if !self.options.compound {
            return self;
        }
        let child = child.into();
        let parent = parent.into();
        self.ensure_node(child.clone());
        self.ensure_node(parent.clone());
        if let Some(prev) = self.parent.insert(child.clone(), parent.clone()) {
            if let Some(ch) = self.children.get_mut(&prev) {
                ch.retain(|c| c != &child);
            }
        }
        let entry = self.children.entry(parent).or_default();
        if !entry.iter().any(|c| c == &child) {
            entry.push(child);
        }
        self
    }

    /// Like [`Graph::set_parent`] but rejects links that would turn the hierarchy into
    /// something other than a forest.
    pub fn try_set_parent(&mut self, child: &str, parent: &str) -> Result<()> {
        let mut cur = Some(parent);
        while let Some(p) = cur {
            if p == child {
                return Err(Error::HierarchyCycle {
                    child: child.to_string(),
                    parent: parent.to_string(),
                });
            }
            cur = self.parent(p);
        }
        self.set_parent(child, parent);
        Ok(())
    }

    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if let Some(prev) = self.parent.remove(child) {
            if let Some(ch) = self.children.get_mut(&prev) {
                ch.retain(|c| c != child);
            }
        }
        self
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        self.parent.get(child).map(|s| s.as_str())
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        self.children
            .get(parent)
            .map(|v| v.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, parent: &str) -> bool {
        self.children.get(parent).is_some_and(|c| !c.is_empty())
    }

    /// Top level nodes: every node without a parent.
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes
            .keys()
            .filter(|id| !self.parent.contains_key(id.as_str()))
            .map(|id| id.as_str())
            .collect()
    }
}

impl<N, E, G> Clone for Graph<N, E, G>
where
    N: Default + Clone + 'static,
    E: Default + Clone + 'static,
    G: Default + Clone,
{
    /// Clones structure and labels. The clone uses `Default` label factories.
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            graph_label: self.graph_label.clone(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            parent: self.parent.clone(),
            children: self.children.clone(),
        }
    }
}

impl<N, E, G> std::fmt::Debug for Graph<N, E, G>
where
    N: Default + std::fmt::Debug + 'static,
    E: Default + std::fmt::Debug + 'static,
    G: Default + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("graph", &self.graph_label)
            .field(
                "nodes",
                &self
                    .nodes
                    .iter()
                    .map(|(k, n)| (k, &n.label))
                    .collect::<Vec<_>>(),
            )
            .field("edges", &self.edges)
            .field("parent", &self.parent)
            .finish()
    }
}

fn unique<'a>(iter: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: HashSet<&'a str> = HashSet::default();
    iter.filter(|s| seen.insert(*s)).collect()
}
