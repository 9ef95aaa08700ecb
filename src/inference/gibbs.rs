use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::classifier::NetworkClassifier;
use crate::error::{ConfigurationError, InferenceError};
use crate::estimate::{sample_index, Estimate};

use super::options::{InferenceOptions, BURN_IN, NUM_CHAINS, NUM_ITERATIONS};
use super::state::RunState;

/// Gibbs sampling over the unknown set.
///
/// Each of `num_chains` chains owns a random permutation of the unknown
/// set, reshuffled at every reset. All chains advance one running scratch
/// estimate seeded from the prior. A sweep walks the permutation positions
/// in order and, at each position, advances every chain by one node: the
/// classifier predicts against the scratch estimate, a class is drawn
/// proportional to the prediction, and the node's scratch row becomes that
/// class's one-hot vector, visible to the next chain. After `burn_in`
/// sweeps every draw is tallied, and the working estimate is the
/// row-normalized tally.
///
/// A declined or unusable prediction leaves the node alone: no draw, no
/// scratch update, no tally. A node that is never predicted keeps its prior.
///
/// The total sweep budget is `burn_in + num_samples`. Every sweep reports a
/// change.
#[derive(Debug, Clone)]
pub struct GibbsSampling {
    burn_in: usize,
    num_samples: usize,
    num_chains: usize,
    chains: Vec<Vec<usize>>,
    scratch: Option<Estimate>,
    counts: Vec<Vec<f64>>,
    sweep: usize,
    out: Vec<f64>,
}

impl GibbsSampling {
    /// Default number of discarded sweeps.
    pub const DEFAULT_BURN_IN: usize = 200;
    /// Default number of tallied sweeps.
    pub const DEFAULT_SAMPLES: usize = 2000;
    /// Default number of chains.
    pub const DEFAULT_CHAINS: usize = 10;

    /// Creates the strategy with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            burn_in: Self::DEFAULT_BURN_IN,
            num_samples: Self::DEFAULT_SAMPLES,
            num_chains: Self::DEFAULT_CHAINS,
            chains: Vec::new(),
            scratch: None,
            counts: Vec::new(),
            sweep: 0,
            out: Vec::new(),
        }
    }

    /// Discarded sweeps.
    #[must_use]
    pub const fn burn_in(&self) -> usize {
        self.burn_in
    }

    /// Tallied sweeps.
    #[must_use]
    pub const fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Number of chains.
    #[must_use]
    pub const fn num_chains(&self) -> usize {
        self.num_chains
    }

    /// Total sweep budget: burn-in plus sampling sweeps.
    #[must_use]
    pub const fn num_iterations(&self) -> usize {
        self.burn_in + self.num_samples
    }

    /// Chain permutations of the current run (indices into the unknown set).
    #[must_use]
    pub fn chains(&self) -> &[Vec<usize>] {
        &self.chains
    }

    /// Raw per-class draw tallies, in unknown-set order.
    #[must_use]
    pub fn counts(&self) -> &[Vec<f64>] {
        &self.counts
    }

    /// Returns true while sweeps are still discarded.
    #[must_use]
    pub const fn in_burn_in(&self) -> bool {
        self.sweep < self.burn_in
    }

    pub(crate) fn configure(&mut self, options: &InferenceOptions) -> Result<(), ConfigurationError> {
        self.burn_in = positive_or(options.get_int(BURN_IN, 0)?, Self::DEFAULT_BURN_IN);
        self.num_samples = positive_or(options.get_int(NUM_ITERATIONS, 0)?, Self::DEFAULT_SAMPLES);
        self.num_chains = positive_or(options.get_int(NUM_CHAINS, 0)?, Self::DEFAULT_CHAINS);
        Ok(())
    }

    pub(crate) fn reset(&mut self, run: &RunState, rng: &mut ChaCha20Rng) {
        let n = run.unknowns.len();
        self.chains = (0..self.num_chains)
            .map(|_| {
                let mut order: Vec<usize> = (0..n).collect();
                order.shuffle(rng);
                order
            })
            .collect();
        self.scratch = Some(run.working.clone());
        self.counts = vec![vec![0.0; run.identity.size()]; n];
        self.sweep = 0;
        self.out = vec![0.0; run.identity.size()];
    }

    pub(crate) fn iterate(
        &mut self,
        run: &mut RunState,
        classifier: &mut dyn NetworkClassifier,
        rng: &mut ChaCha20Rng,
    ) -> Result<bool, InferenceError> {
        let tally = !self.in_burn_in();
        let scratch = self.scratch.get_or_insert_with(|| run.working.clone());

        for position in 0..run.unknowns.len() {
            for order in &self.chains {
                let idx = order[position];
                let node = run.unknowns[idx];
                if !classifier.estimate(node, scratch, &mut self.out, false)? {
                    trace!(%node, "classifier declined; node skipped");
                    continue;
                }
                let Some(class) = sample_index(&self.out, rng) else {
                    trace!(%node, "prediction has no mass; node skipped");
                    continue;
                };
                scratch.set(node, run.identity.row(class))?;
                if tally {
                    self.counts[idx][class] += 1.0;
                }
            }
        }

        self.sweep += 1;
        if tally {
            self.publish(run)?;
        }
        Ok(true)
    }

    /// Writes the row-normalized tallies into the working estimate.
    fn publish(&self, run: &mut RunState) -> Result<(), InferenceError> {
        for (&node, counts) in run.unknowns.iter().zip(&self.counts) {
            let total: f64 = counts.iter().sum();
            if total <= 0.0 {
                continue;
            }
            let marginal: Vec<f64> = counts.iter().map(|c| c / total).collect();
            run.working.set(node, &marginal)?;
        }
        Ok(())
    }
}

impl Default for GibbsSampling {
    fn default() -> Self {
        Self::new()
    }
}

fn positive_or(value: i64, default: usize) -> usize {
    usize::try_from(value).ok().filter(|&v| v > 0).unwrap_or(default)
}
