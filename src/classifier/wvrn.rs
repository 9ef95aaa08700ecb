use std::sync::Arc;

use crate::error::InferenceError;
use crate::estimate::Estimate;
use crate::graph::{Graph, NodeId};

use super::NetworkClassifier;

/// Weighted-vote relational neighbor classifier.
///
/// A node's prediction is the edge-weighted average of its neighbors'
/// context vectors. Neighbors without a context vector do not vote. When
/// `use_context_as_prior` is set and the node has its own context vector,
/// the vote is multiplied element-wise by it before normalizing.
#[derive(Debug, Clone)]
pub struct WeightedVoteRelationalNeighbor {
    graph: Arc<Graph>,
}

impl WeightedVoteRelationalNeighbor {
    /// Creates a classifier over `graph`.
    #[must_use]
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// The graph whose edges carry the votes.
    #[must_use]
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }
}

impl NetworkClassifier for WeightedVoteRelationalNeighbor {
    fn estimate(
        &mut self,
        node: NodeId,
        context: &Estimate,
        out: &mut [f64],
        use_context_as_prior: bool,
    ) -> Result<bool, InferenceError> {
        if out.len() != context.class_count() {
            return Err(InferenceError::ClassCountMismatch {
                expected: context.class_count(),
                actual: out.len(),
            });
        }
        out.fill(0.0);

        let mut total_weight = 0.0;
        for neighbor in self.graph.neighbors(node) {
            if neighbor.node == node || neighbor.weight <= 0.0 {
                continue;
            }
            let Some(row) = context.get(neighbor.node) else {
                continue;
            };
            for (acc, v) in out.iter_mut().zip(row) {
                *acc += neighbor.weight * v;
            }
            total_weight += neighbor.weight;
        }
        if total_weight <= 0.0 {
            return Ok(false);
        }

        if use_context_as_prior {
            if let Some(own) = context.get(node) {
                for (acc, p) in out.iter_mut().zip(own) {
                    *acc *= p;
                }
            }
        }

        let sum: f64 = out.iter().sum();
        if !(sum > 0.0) {
            // The node's own prior vetoed every class the neighbors voted for.
            return Ok(false);
        }
        for v in out.iter_mut() {
            *v /= sum;
        }
        Ok(true)
    }
}
