//! Discrete per-node label assignments.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::graph::{CategoricalAttribute, NodeId};

/// Per-node class index, or unknown.
///
/// Once materialized a classification is independent of the estimate it
/// came from; callers also use it to hold ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    attribute: Arc<CategoricalAttribute>,
    labels: BTreeMap<NodeId, Option<usize>>,
}

impl Classification {
    /// Creates an empty classification over `attribute`.
    #[must_use]
    pub fn new(attribute: Arc<CategoricalAttribute>) -> Self {
        Self {
            attribute,
            labels: BTreeMap::new(),
        }
    }

    /// The attribute whose values are assigned.
    #[must_use]
    pub fn attribute(&self) -> &Arc<CategoricalAttribute> {
        &self.attribute
    }

    /// Assigns a class (or unknown) to `node`.
    ///
    /// Out-of-range classes are recorded as unknown.
    pub fn set(&mut self, node: NodeId, class: Option<usize>) {
        let class = class.filter(|&c| c < self.attribute.cardinality());
        self.labels.insert(node, class);
    }

    /// Assigns by value name. Returns `false` if the name is not a value of
    /// the attribute, in which case the node is marked unknown.
    pub fn set_value(&mut self, node: NodeId, value: &str) -> bool {
        let class = self.attribute.index_of(value);
        self.labels.insert(node, class);
        class.is_some()
    }

    /// Class of `node`; `None` when unknown or never assigned.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<usize> {
        self.labels.get(&node).copied().flatten()
    }

    /// Returns true if `node` has a known class.
    #[must_use]
    pub fn is_known(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Number of nodes tracked (known or unknown).
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no node is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over `(node, class)` in node order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Option<usize>)> + '_ {
        self.labels.iter().map(|(n, c)| (*n, *c))
    }

    /// Nodes with a known class.
    pub fn known_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|(_, c)| c.is_some()).map(|(n, _)| n)
    }

    /// Nodes tracked with an unknown class.
    pub fn unknown_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|(_, c)| c.is_none()).map(|(n, _)| n)
    }

    /// Number of nodes assigned to each class.
    #[must_use]
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.attribute.cardinality()];
        for class in self.labels.values().flatten() {
            counts[*class] += 1;
        }
        counts
    }

    /// Fraction of `nodes` whose class here matches `truth`.
    ///
    /// Nodes with unknown truth are not evaluated. Returns `None` when no
    /// node could be evaluated.
    #[must_use]
    pub fn accuracy(
        &self,
        truth: &Classification,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Option<f64> {
        let mut evaluated = 0usize;
        let mut correct = 0usize;
        for node in nodes {
            let Some(expected) = truth.get(node) else {
                continue;
            };
            evaluated += 1;
            if self.get(node) == Some(expected) {
                correct += 1;
            }
        }
        (evaluated > 0).then(|| correct as f64 / evaluated as f64)
    }
}
