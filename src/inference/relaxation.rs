use tracing::trace;

use crate::classifier::NetworkClassifier;
use crate::error::{ConfigurationError, InferenceError};
use crate::estimate::Estimate;

use super::buffer::DoubleBuffer;
use super::options::{InferenceOptions, BETA, DECAY};
use super::state::RunState;
use super::iteration_budget;

/// Relaxation labeling.
///
/// Synchronous sweeps over a current/next double buffer: every node is
/// predicted against `current`, the result (damped by β) is written to
/// `next`, and the buffers swap after the sweep. β is multiplied by the
/// decay factor after each sweep. There is no intrinsic convergence
/// signal, so every sweep reports a change.
#[derive(Debug, Clone)]
pub struct RelaxationLabeling {
    num_iterations: usize,
    initial_beta: f64,
    decay: f64,
    beta: f64,
    buffers: Option<DoubleBuffer<Estimate>>,
    out: Vec<f64>,
}

impl RelaxationLabeling {
    /// Default sweep budget.
    pub const DEFAULT_ITERATIONS: usize = 99;
    /// Default initial damping.
    pub const DEFAULT_BETA: f64 = 1.0;
    /// Default per-sweep damping multiplier.
    pub const DEFAULT_DECAY: f64 = 0.99;

    /// Creates the strategy with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_iterations: Self::DEFAULT_ITERATIONS,
            initial_beta: Self::DEFAULT_BETA,
            decay: Self::DEFAULT_DECAY,
            beta: Self::DEFAULT_BETA,
            buffers: None,
            out: Vec::new(),
        }
    }

    /// Sweep budget.
    #[must_use]
    pub const fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Damping applied by the next sweep.
    #[must_use]
    pub const fn beta(&self) -> f64 {
        self.beta
    }

    /// Configured initial damping.
    #[must_use]
    pub const fn initial_beta(&self) -> f64 {
        self.initial_beta
    }

    /// Per-sweep damping multiplier.
    #[must_use]
    pub const fn decay(&self) -> f64 {
        self.decay
    }

    /// Merges a fresh prediction into the previous vector in place:
    /// `fresh[i] = beta * fresh[i] + (1 - beta) * old[i]`.
    pub fn damp(beta: f64, fresh: &mut [f64], old: &[f64]) {
        for (f, o) in fresh.iter_mut().zip(old) {
            *f = beta * *f + (1.0 - beta) * o;
        }
    }

    pub(crate) fn configure(&mut self, options: &InferenceOptions) -> Result<(), ConfigurationError> {
        self.num_iterations = iteration_budget(options, Self::DEFAULT_ITERATIONS)?;
        self.initial_beta = options.get_float(BETA, Self::DEFAULT_BETA)?.clamp(0.0, 1.0);
        let decay = options.get_float(DECAY, Self::DEFAULT_DECAY)?;
        self.decay = if (0.0..=1.0).contains(&decay) {
            decay
        } else {
            self.initial_beta
        };
        self.beta = self.initial_beta;
        Ok(())
    }

    pub(crate) fn reset(&mut self, run: &RunState) {
        self.beta = self.initial_beta;
        self.buffers = Some(DoubleBuffer::new(run.working.clone(), run.working.clone()));
        self.out = vec![0.0; run.identity.size()];
    }

    pub(crate) fn iterate(
        &mut self,
        run: &mut RunState,
        classifier: &mut dyn NetworkClassifier,
    ) -> Result<bool, InferenceError> {
        let buffers = self
            .buffers
            .get_or_insert_with(|| DoubleBuffer::new(run.working.clone(), run.working.clone()));
        let (current, next) = buffers.split();

        for &node in &run.unknowns {
            if classifier.estimate(node, current, &mut self.out, true)? {
                if self.beta < 1.0 {
                    if let Some(old) = current.get(node) {
                        Self::damp(self.beta, &mut self.out, old);
                    }
                }
                next.set(node, &self.out)?;
            } else {
                trace!(%node, "classifier declined; carrying current estimate");
                if let Some(old) = current.get(node) {
                    next.set(node, old)?;
                }
            }
        }

        buffers.swap();
        for &node in &run.unknowns {
            if let Some(row) = buffers.current().get(node) {
                run.working.set(node, row)?;
            }
        }
        self.beta *= self.decay;
        Ok(true)
    }
}

impl Default for RelaxationLabeling {
    fn default() -> Self {
        Self::new()
    }
}
