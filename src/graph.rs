//! Minimal graph read model.
//!
//! The inference engine treats nodes as opaque identities. Edges and node
//! names are only consumed by relational classifiers and by the graph
//! export sink, so this model is deliberately small: dense node ids,
//! weighted undirected edges and one categorical attribute description.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Dense identifier of a node within one [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps a raw node index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw node index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A categorical attribute: a name plus its ordered value names.
///
/// The position of a value in `values` is its class index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalAttribute {
    name: String,
    values: Vec<String>,
}

impl CategoricalAttribute {
    /// Creates an attribute from its name and value names.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values (the class count `K`).
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }

    /// Value name for a class index.
    #[must_use]
    pub fn value_name(&self, class: usize) -> Option<&str> {
        self.values.get(class).map(String::as_str)
    }

    /// Class index for a value name.
    #[must_use]
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// All value names in class-index order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A weighted, undirected edge as seen from one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// The node at the other end of the edge.
    pub node: NodeId,
    /// Edge weight.
    pub weight: f64,
}

/// In-memory graph with named nodes and weighted undirected edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    names: Vec<Arc<str>>,
    adjacency: Vec<Vec<Neighbor>>,
    edge_count: usize,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, name: impl Into<Arc<str>>) -> NodeId {
        let id = NodeId::new(self.names.len());
        self.names.push(name.into());
        self.adjacency.push(Vec::new());
        id
    }

    /// Adds an undirected edge. Repeated edges accumulate weight.
    ///
    /// Returns `false` if either endpoint is not part of this graph.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> bool {
        if a.index() >= self.names.len() || b.index() >= self.names.len() {
            return false;
        }
        if !Self::accumulate(&mut self.adjacency[a.index()], b, weight) {
            self.edge_count += 1;
        }
        if a != b {
            Self::accumulate(&mut self.adjacency[b.index()], a, weight);
        }
        true
    }

    fn accumulate(list: &mut Vec<Neighbor>, node: NodeId, weight: f64) -> bool {
        if let Some(existing) = list.iter_mut().find(|n| n.node == node) {
            existing.weight += weight;
            true
        } else {
            list.push(Neighbor { node, weight });
            false
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of distinct undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Name of a node.
    #[must_use]
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.names.get(node.index()).map(AsRef::as_ref)
    }

    /// Looks up a node by name (linear scan).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.iter().position(|n| n.as_ref() == name).map(NodeId::new)
    }

    /// Neighbors of a node. Unknown nodes have none.
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> &[Neighbor] {
        self.adjacency.get(node.index()).map_or(&[], Vec::as_slice)
    }

    /// Iterates over all node ids in index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.names.len()).map(NodeId::new)
    }
}
