use tracing::trace;

use crate::classifier::NetworkClassifier;
use crate::error::{ConfigurationError, InferenceError};
use crate::estimate::Estimate;

use super::options::InferenceOptions;
use super::state::RunState;
use super::iteration_budget;

/// Single-shot baseline.
///
/// The first sweep asks the classifier once per unknown node against the
/// initial prior and stores the results; every later sweep reports no
/// change without calling the classifier. Useful for seeding other
/// strategies with a non-trivial starting estimate.
#[derive(Debug, Clone)]
pub struct NullInference {
    num_iterations: usize,
    done: bool,
    out: Vec<f64>,
}

impl NullInference {
    /// Default sweep budget.
    pub const DEFAULT_ITERATIONS: usize = 1;

    /// Creates the strategy with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_iterations: Self::DEFAULT_ITERATIONS,
            done: false,
            out: Vec::new(),
        }
    }

    /// Sweep budget.
    #[must_use]
    pub const fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    pub(crate) fn configure(&mut self, options: &InferenceOptions) -> Result<(), ConfigurationError> {
        self.num_iterations = iteration_budget(options, Self::DEFAULT_ITERATIONS)?;
        Ok(())
    }

    pub(crate) fn reset(&mut self, run: &RunState) {
        self.done = false;
        self.out = vec![0.0; run.identity.size()];
    }

    pub(crate) fn iterate(
        &mut self,
        run: &mut RunState,
        prior: &Estimate,
        classifier: &mut dyn NetworkClassifier,
    ) -> Result<bool, InferenceError> {
        if self.done {
            return Ok(false);
        }
        self.done = true;
        for &node in &run.unknowns {
            if classifier.estimate(node, prior, &mut self.out, true)? {
                run.working.set(node, &self.out)?;
            } else {
                trace!(%node, "classifier declined; keeping prior");
            }
        }
        Ok(true)
    }
}

impl Default for NullInference {
    fn default() -> Self {
        Self::new()
    }
}
