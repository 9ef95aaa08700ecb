//! Network classifier capability consumed by the inference engine.
//!
//! The engine never learns class probabilities itself. It asks a
//! [`NetworkClassifier`] for a fresh prediction for one node at a time,
//! handing it the current context estimate that holds neighbor beliefs.

mod wvrn;

pub use wvrn::WeightedVoteRelationalNeighbor;

use crate::error::InferenceError;
use crate::estimate::{argmax, Estimate};
use crate::graph::NodeId;

/// Per-node predictor driven by collective inference.
///
/// # Contract
/// - `estimate` fills `out` (length = class count) and returns `Ok(true)`.
/// - `Ok(false)` means no prediction could be produced for the node; the
///   engine keeps the node's previous label/estimate. This is not an error.
/// - `Err(_)` aborts the run.
pub trait NetworkClassifier {
    /// Called once per sweep before any node is visited.
    ///
    /// Lets the classifier precompute batch-level structures from the
    /// sweep's context estimate. The default does nothing.
    fn initialize_run(&mut self, _prior: &Estimate, _unknowns: &[NodeId]) {}

    /// Predicts a class distribution for `node` into `out`.
    ///
    /// # Errors
    ///
    /// Any error aborts the inference run that issued the call.
    fn estimate(
        &mut self,
        node: NodeId,
        context: &Estimate,
        out: &mut [f64],
        use_context_as_prior: bool,
    ) -> Result<bool, InferenceError>;

    /// Arg-max class for `node`, or `None` if the classifier declines.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`NetworkClassifier::estimate`].
    fn classify(
        &mut self,
        node: NodeId,
        context: &Estimate,
        use_context_as_prior: bool,
    ) -> Result<Option<usize>, InferenceError> {
        let mut out = vec![0.0; context.class_count()];
        if self.estimate(node, context, &mut out, use_context_as_prior)? {
            Ok(argmax(&out))
        } else {
            Ok(None)
        }
    }
}

impl<C: NetworkClassifier + ?Sized> NetworkClassifier for &mut C {
    fn initialize_run(&mut self, prior: &Estimate, unknowns: &[NodeId]) {
        (**self).initialize_run(prior, unknowns);
    }

    fn estimate(
        &mut self,
        node: NodeId,
        context: &Estimate,
        out: &mut [f64],
        use_context_as_prior: bool,
    ) -> Result<bool, InferenceError> {
        (**self).estimate(node, context, out, use_context_as_prior)
    }

    fn classify(
        &mut self,
        node: NodeId,
        context: &Estimate,
        use_context_as_prior: bool,
    ) -> Result<Option<usize>, InferenceError> {
        (**self).classify(node, context, use_context_as_prior)
    }
}

impl<C: NetworkClassifier + ?Sized> NetworkClassifier for Box<C> {
    fn initialize_run(&mut self, prior: &Estimate, unknowns: &[NodeId]) {
        (**self).initialize_run(prior, unknowns);
    }

    fn estimate(
        &mut self,
        node: NodeId,
        context: &Estimate,
        out: &mut [f64],
        use_context_as_prior: bool,
    ) -> Result<bool, InferenceError> {
        (**self).estimate(node, context, out, use_context_as_prior)
    }

    fn classify(
        &mut self,
        node: NodeId,
        context: &Estimate,
        use_context_as_prior: bool,
    ) -> Result<Option<usize>, InferenceError> {
        (**self).classify(node, context, use_context_as_prior)
    }
}
