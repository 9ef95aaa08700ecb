use tracing::trace;

use crate::classifier::NetworkClassifier;
use crate::error::{ConfigurationError, InferenceError};
use crate::estimate::{argmax, Estimate};

use super::options::InferenceOptions;
use super::state::RunState;
use super::iteration_budget;

/// Iterative classification (ICA).
///
/// Visits the unknown set in its fixed order. Each node is predicted
/// against a scratch estimate that already holds the one-hot labels chosen
/// earlier in the same sweep, so updates are visible immediately. A sweep
/// reports a change if any node's arg-max label differs from its label
/// after the previous sweep; the driver stops at the first quiet sweep.
///
/// When the classifier declines a node its estimates stay as they are and
/// its label for the sweep becomes unassigned, so it counts as a change
/// only if it had a label before.
#[derive(Debug, Clone)]
pub struct IterativeClassification {
    num_iterations: usize,
    scratch: Option<Estimate>,
    labels: Vec<Option<usize>>,
    out: Vec<f64>,
}

impl IterativeClassification {
    /// Default sweep budget.
    pub const DEFAULT_ITERATIONS: usize = 1000;

    /// Creates the strategy with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_iterations: Self::DEFAULT_ITERATIONS,
            scratch: None,
            labels: Vec::new(),
            out: Vec::new(),
        }
    }

    /// Sweep budget.
    #[must_use]
    pub const fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Labels assigned by the last sweep, in unknown-set order.
    #[must_use]
    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    pub(crate) fn configure(&mut self, options: &InferenceOptions) -> Result<(), ConfigurationError> {
        self.num_iterations = iteration_budget(options, Self::DEFAULT_ITERATIONS)?;
        Ok(())
    }

    pub(crate) fn reset(&mut self, run: &RunState) {
        self.scratch = Some(run.working.clone());
        self.labels = vec![None; run.unknowns.len()];
        self.out = vec![0.0; run.identity.size()];
    }

    pub(crate) fn iterate(
        &mut self,
        run: &mut RunState,
        classifier: &mut dyn NetworkClassifier,
    ) -> Result<bool, InferenceError> {
        let scratch = self.scratch.get_or_insert_with(|| run.working.clone());
        let mut changed = false;

        for (pos, &node) in run.unknowns.iter().enumerate() {
            let previous = self.labels[pos];
            if classifier.estimate(node, scratch, &mut self.out, false)? {
                run.working.set(node, &self.out)?;
                let label = argmax(&self.out);
                if let Some(class) = label {
                    scratch.set(node, run.identity.row(class))?;
                }
                self.labels[pos] = label;
                changed |= label != previous;
            } else {
                trace!(%node, "classifier declined; label unassigned");
                self.labels[pos] = None;
                changed |= previous.is_some();
            }
        }

        Ok(changed)
    }
}

impl Default for IterativeClassification {
    fn default() -> Self {
        Self::new()
    }
}
