//! Per-node class probability tables.
//!
//! An [`Estimate`] maps nodes to score vectors over the values of one
//! categorical attribute. Every stored vector has exactly `K` entries where
//! `K` is the attribute's cardinality. Scores are non-negative but are only
//! normalized where an operation says so.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classification::Classification;
use crate::error::InferenceError;
use crate::graph::{CategoricalAttribute, NodeId};

/// Index of the largest score, ties broken toward the lowest index.
///
/// Returns `None` for an empty slice. NaN scores never win.
#[must_use]
pub fn argmax(scores: &[f64]) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }
    let mut best = 0;
    let mut top = f64::NEG_INFINITY;
    for (idx, &score) in scores.iter().enumerate() {
        if score > top {
            best = idx;
            top = score;
        }
    }
    Some(best)
}

/// Draws a class index with probability proportional to `scores`.
///
/// Returns `None` when the scores do not form a usable distribution
/// (empty, all zero, negative or non-finite total).
pub fn sample_index<R: Rng + ?Sized>(scores: &[f64], rng: &mut R) -> Option<usize> {
    let total: f64 = scores.iter().map(|s| s.max(0.0)).sum();
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }
    let mut threshold = rng.gen::<f64>() * total;
    let mut last_positive = None;
    for (idx, &score) in scores.iter().enumerate() {
        let score = score.max(0.0);
        if score <= 0.0 {
            continue;
        }
        last_positive = Some(idx);
        if threshold < score {
            return Some(idx);
        }
        threshold -= score;
    }
    // Rounding can leave a sliver past the final bucket.
    last_positive
}

/// Probability table keyed by node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    attribute: Arc<CategoricalAttribute>,
    rows: BTreeMap<NodeId, Vec<f64>>,
}

impl Estimate {
    /// Creates an empty estimate over `attribute`.
    #[must_use]
    pub fn new(attribute: Arc<CategoricalAttribute>) -> Self {
        Self {
            attribute,
            rows: BTreeMap::new(),
        }
    }

    /// Creates an estimate assigning the uniform distribution to every node.
    #[must_use]
    pub fn uniform(
        attribute: Arc<CategoricalAttribute>,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        let k = attribute.cardinality();
        let row = if k == 0 { Vec::new() } else { vec![1.0 / k as f64; k] };
        let rows = nodes.into_iter().map(|n| (n, row.clone())).collect();
        Self { attribute, rows }
    }

    /// Creates an estimate with a one-hot row for every labeled node.
    ///
    /// Nodes whose label is unknown get no row.
    #[must_use]
    pub fn from_classification(classification: &Classification) -> Self {
        let attribute = Arc::clone(classification.attribute());
        let k = attribute.cardinality();
        let rows = classification
            .iter()
            .filter_map(|(node, label)| {
                let class = label.filter(|&c| c < k)?;
                let mut row = vec![0.0; k];
                row[class] = 1.0;
                Some((node, row))
            })
            .collect();
        Self { attribute, rows }
    }

    /// The attribute whose values this estimate scores.
    #[must_use]
    pub fn attribute(&self) -> &Arc<CategoricalAttribute> {
        &self.attribute
    }

    /// Number of classes `K`.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.attribute.cardinality()
    }

    /// Number of nodes with a stored vector.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no node has a stored vector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if `node` has a stored vector.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.rows.contains_key(&node)
    }

    /// Score vector for `node`.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&[f64]> {
        self.rows.get(&node).map(Vec::as_slice)
    }

    /// Overwrites the vector for `node`.
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::ClassCountMismatch` if `scores.len() != K`.
    pub fn set(&mut self, node: NodeId, scores: &[f64]) -> Result<(), InferenceError> {
        let k = self.class_count();
        if scores.len() != k {
            return Err(InferenceError::ClassCountMismatch {
                expected: k,
                actual: scores.len(),
            });
        }
        match self.rows.get_mut(&node) {
            Some(row) => row.copy_from_slice(scores),
            None => {
                self.rows.insert(node, scores.to_vec());
            }
        }
        Ok(())
    }

    /// Removes the vector for `node`, returning it.
    pub fn remove(&mut self, node: NodeId) -> Option<Vec<f64>> {
        self.rows.remove(&node)
    }

    /// Scales the vector for `node` so it sums to one.
    ///
    /// Vectors with a zero or non-finite sum are left untouched; returns
    /// whether normalization happened.
    pub fn normalize(&mut self, node: NodeId) -> bool {
        let Some(row) = self.rows.get_mut(&node) else {
            return false;
        };
        let total: f64 = row.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            return false;
        }
        for v in row.iter_mut() {
            *v /= total;
        }
        true
    }

    /// Arg-max class of `node`, ties toward the lowest index.
    #[must_use]
    pub fn argmax(&self, node: NodeId) -> Option<usize> {
        self.get(node).and_then(argmax)
    }

    /// Draws a class for `node` proportional to its current vector.
    pub fn sample<R: Rng + ?Sized>(&self, node: NodeId, rng: &mut R) -> Option<usize> {
        self.get(node).and_then(|row| sample_index(row, rng))
    }

    /// Iterates over `(node, scores)` in node order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[f64])> + '_ {
        self.rows.iter().map(|(n, row)| (*n, row.as_slice()))
    }

    /// Nodes with a stored vector, in node order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.rows.keys().copied()
    }

    /// Deterministic arg-max view of this estimate.
    #[must_use]
    pub fn to_classification(&self) -> Classification {
        let mut out = Classification::new(Arc::clone(&self.attribute));
        for (node, row) in &self.rows {
            out.set(*node, argmax(row));
        }
        out
    }
}
