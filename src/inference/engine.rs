use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classification::Classification;
use crate::classifier::NetworkClassifier;
use crate::error::{InferenceError, NetKitError, NetKitResult};
use crate::estimate::Estimate;
use crate::graph::NodeId;
use crate::monitor::{InferenceEvent, InferenceListener, ListenerSet};
use crate::snapshot::{Snapshot, SnapshotSink};

use super::method::InferenceMethod;
use super::options::InferenceOptions;
use super::state::{EngineState, RunId, RunState};

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identifier.
    pub run_id: RunId,
    /// Strategy name.
    pub method: String,
    /// Sweeps actually executed.
    pub sweeps: usize,
    /// Configured sweep budget.
    pub budget: usize,
    /// True if the strategy reported quiescence before the budget ran out.
    pub stopped_early: bool,
    /// Accuracy over the unknown set after each sweep, when truth was given.
    pub accuracy: Vec<f64>,
}

/// Drives collective inference runs.
///
/// Lifecycle: `Unconfigured -> Configured` (via [`configure`]) `-> Running`
/// (via [`reset`]) `-> Terminal` (budget spent, quiescence, or an error).
/// A terminal engine can be reset again for a new run.
///
/// The caller's prior and truth are never mutated; `reset` copies the prior
/// into fresh working buffers.
///
/// [`configure`]: InferenceEngine::configure
/// [`reset`]: InferenceEngine::reset
pub struct InferenceEngine {
    method: InferenceMethod,
    state: EngineState,
    prior: Option<Estimate>,
    truth: Option<Classification>,
    active: Option<RunState>,
    summary: Option<RunSummary>,
    listeners: ListenerSet,
    sinks: Vec<Box<dyn SnapshotSink>>,
    rng: ChaCha20Rng,
}

impl InferenceEngine {
    /// Creates an unconfigured engine for `method`.
    ///
    /// The random generator is seeded from OS entropy; use
    /// [`InferenceEngine::with_seed`] for replayable runs.
    #[must_use]
    pub fn new(method: impl Into<InferenceMethod>) -> Self {
        Self {
            method: method.into(),
            state: EngineState::Unconfigured,
            prior: None,
            truth: None,
            active: None,
            summary: None,
            listeners: ListenerSet::new(),
            sinks: Vec::new(),
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Creates an engine and applies `options`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed numeric options.
    pub fn configured(method: impl Into<InferenceMethod>, options: &InferenceOptions) -> NetKitResult<Self> {
        let mut engine = Self::new(method);
        engine.configure(options)?;
        Ok(engine)
    }

    /// Fixes the random generator seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        self
    }

    /// Reseeds the random generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }

    /// Applies options to the strategy.
    ///
    /// Out-of-range values are clamped or defaulted; malformed numbers are
    /// rejected and leave the engine state unchanged.
    ///
    /// # Errors
    ///
    /// `IllegalState` while a run is in progress; configuration errors for
    /// malformed options.
    pub fn configure(&mut self, options: &InferenceOptions) -> NetKitResult<()> {
        if self.state == EngineState::Running {
            return Err(illegal(self.state, "configure"));
        }
        let mut method = self.method.clone();
        method.configure(options)?;
        self.method = method;
        if self.state == EngineState::Unconfigured {
            self.state = EngineState::Configured;
        }
        debug!(method = self.method.name(), budget = self.method.num_iterations(), "configured");
        Ok(())
    }

    /// Sets the initial prior. The engine keeps its own copy.
    pub fn set_prior(&mut self, prior: Estimate) {
        self.prior = Some(prior);
    }

    /// Sets ground truth for per-sweep accuracy diagnostics.
    pub fn set_truth(&mut self, truth: Classification) {
        self.truth = Some(truth);
    }

    /// Drops any ground truth.
    pub fn clear_truth(&mut self) {
        self.truth = None;
    }

    /// Registers a listener. Listeners are notified in registration order.
    pub fn add_listener(&mut self, listener: impl InferenceListener + 'static) {
        self.listeners.add(Box::new(listener));
    }

    /// Registers a snapshot sink invoked after every sweep.
    pub fn add_sink(&mut self, sink: impl SnapshotSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// The strategy.
    #[must_use]
    pub const fn method(&self) -> &InferenceMethod {
        &self.method
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// The initial prior, if set.
    #[must_use]
    pub const fn prior(&self) -> Option<&Estimate> {
        self.prior.as_ref()
    }

    /// Working state of the current or last run.
    #[must_use]
    pub const fn run_state(&self) -> Option<&RunState> {
        self.active.as_ref()
    }

    /// Working estimate of the current or last run.
    #[must_use]
    pub fn estimate(&self) -> Option<&Estimate> {
        self.active.as_ref().map(RunState::working)
    }

    /// Summary of the last completed run.
    #[must_use]
    pub const fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Starts a run over `unknowns`.
    ///
    /// Materializes the unknown set, builds the identity matrix for the
    /// prior's class count, copies the prior's vector for every unknown node
    /// into the working estimate, and resets the strategy.
    ///
    /// # Errors
    ///
    /// `IllegalState` if the engine was never configured, `MissingPrior` if
    /// no prior was set, or a listener error.
    pub fn reset(&mut self, unknowns: impl IntoIterator<Item = NodeId>) -> NetKitResult<()> {
        if self.state == EngineState::Unconfigured {
            return Err(illegal(self.state, "reset"));
        }
        let prior = self.prior.as_ref().ok_or(InferenceError::MissingPrior)?;
        if let Some(truth) = &self.truth {
            let expected = prior.class_count();
            let actual = truth.attribute().cardinality();
            if expected != actual {
                return Err(InferenceError::ClassCountMismatch { expected, actual }.into());
            }
        }

        let run = RunState::new(prior, unknowns.into_iter().collect())?;
        self.method.reset(&run, &mut self.rng);

        info!(
            run_id = %run.run_id,
            method = self.method.name(),
            unknowns = run.unknowns.len(),
            classes = run.identity.size(),
            budget = self.method.num_iterations(),
            "inference run reset"
        );

        let event = InferenceEvent::RunStarted {
            run_id: run.run_id,
            method: self.method.name().to_string(),
            unknown_count: run.unknowns.len(),
            class_count: run.identity.size(),
            started_at: run.started_at,
        };
        self.summary = Some(RunSummary {
            run_id: run.run_id,
            method: self.method.name().to_string(),
            sweeps: 0,
            budget: self.method.num_iterations(),
            stopped_early: false,
            accuracy: Vec::new(),
        });
        self.active = Some(run);
        self.state = EngineState::Running;
        self.listeners.notify(&event)?;
        Ok(())
    }

    /// Like [`InferenceEngine::reset`], reseeding the generator first.
    ///
    /// # Errors
    ///
    /// See [`InferenceEngine::reset`].
    pub fn reset_with_seed(&mut self, unknowns: impl IntoIterator<Item = NodeId>, seed: u64) -> NetKitResult<()> {
        self.set_seed(seed);
        self.reset(unknowns)
    }

    /// Performs one sweep and its reporting.
    ///
    /// Gives the classifier its per-sweep `initialize_run` hook, runs the
    /// strategy's step, then records accuracy, writes snapshots and notifies
    /// listeners. Returns `false` once the strategy has quiesced.
    ///
    /// A classifier error aborts the run: the engine becomes terminal and
    /// the error is returned.
    ///
    /// # Errors
    ///
    /// `IllegalState` unless running; classifier or listener errors.
    pub fn iterate(&mut self, classifier: &mut dyn NetworkClassifier) -> NetKitResult<bool> {
        if self.state != EngineState::Running {
            return Err(illegal(self.state, "iterate"));
        }
        let state = self.state;
        let (Some(run), Some(prior)) = (self.active.as_mut(), self.prior.as_ref()) else {
            return Err(illegal(state, "iterate"));
        };

        classifier.initialize_run(&run.working, &run.unknowns);
        let changed = match self.method.iterate(run, prior, classifier, &mut self.rng) {
            Ok(changed) => changed,
            Err(err) => {
                warn!(run_id = %run.run_id, error = %err, "inference run aborted");
                self.state = EngineState::Terminal;
                return Err(err.into());
            }
        };
        let iteration = run.sweeps;
        run.sweeps += 1;

        let accuracy = self.truth.as_ref().and_then(|truth| {
            run.working
                .to_classification()
                .accuracy(truth, run.unknowns.iter().copied())
        });
        debug!(
            run_id = %run.run_id,
            method = self.method.name(),
            iteration,
            changed,
            accuracy = accuracy.unwrap_or(f64::NAN),
            "sweep complete"
        );

        let snapshot = Snapshot {
            run_id: run.run_id,
            iteration,
            method: self.method.name(),
            unknowns: &run.unknowns,
            estimate: &run.working,
            truth: self.truth.as_ref(),
        };
        for sink in &mut self.sinks {
            if let Err(err) = sink.write_snapshot(&snapshot) {
                warn!(sink = sink.name(), iteration, error = %err, "snapshot failed; continuing");
            }
        }

        if let Some(summary) = self.summary.as_mut() {
            summary.sweeps = run.sweeps;
            if let Some(acc) = accuracy {
                summary.accuracy.push(acc);
            }
        }

        let event = InferenceEvent::SweepCompleted {
            run_id: run.run_id,
            iteration,
            changed,
            accuracy,
        };
        self.listeners.notify(&event)?;
        Ok(changed)
    }

    /// Resets over `unknowns` and sweeps until the budget is spent or the
    /// strategy quiesces. Returns the final working estimate.
    ///
    /// # Errors
    ///
    /// Precondition, classifier and listener errors abort the run.
    pub fn run(
        &mut self,
        classifier: &mut dyn NetworkClassifier,
        unknowns: impl IntoIterator<Item = NodeId>,
    ) -> NetKitResult<&Estimate> {
        self.reset(unknowns)?;
        let budget = self.method.num_iterations();
        let mut stopped_early = false;
        for _ in 0..budget {
            if !self.iterate(classifier)? {
                stopped_early = true;
                break;
            }
        }
        self.finish(stopped_early)?;
        let state = self.state;
        self.estimate().ok_or_else(|| illegal(state, "run"))
    }

    fn finish(&mut self, stopped_early: bool) -> NetKitResult<()> {
        self.state = EngineState::Terminal;
        let Some(run) = self.active.as_ref() else {
            return Err(illegal(EngineState::Terminal, "finish"));
        };
        if let Some(summary) = self.summary.as_mut() {
            summary.stopped_early = stopped_early;
        }
        info!(
            run_id = %run.run_id,
            method = self.method.name(),
            sweeps = run.sweeps,
            stopped_early,
            "inference run finished"
        );
        let event = InferenceEvent::EstimateMaterialized {
            run_id: run.run_id,
            sweeps: run.sweeps,
            stopped_early,
            estimate: Arc::new(run.working.clone()),
        };
        self.listeners.notify(&event)?;
        Ok(())
    }

    /// Runs and returns the arg-max class of every unknown node.
    ///
    /// Unknown nodes that never received an estimate are marked unknown.
    ///
    /// # Errors
    ///
    /// See [`InferenceEngine::run`].
    pub fn run_classification(
        &mut self,
        classifier: &mut dyn NetworkClassifier,
        unknowns: impl IntoIterator<Item = NodeId>,
    ) -> NetKitResult<Classification> {
        self.run(classifier, unknowns)?;
        let state = self.state;
        let run = self.active.as_ref().ok_or_else(|| illegal(state, "classify"))?;
        let mut classification = Classification::new(Arc::clone(run.working.attribute()));
        for &node in &run.unknowns {
            classification.set(node, run.working.argmax(node));
        }
        let event = InferenceEvent::ClassificationMaterialized {
            run_id: run.run_id,
            classification: Arc::new(classification.clone()),
        };
        self.listeners.notify(&event)?;
        Ok(classification)
    }

    /// Runs and copies each unknown node's final vector into `out`.
    ///
    /// Rows of `out` for other nodes are left untouched.
    ///
    /// # Errors
    ///
    /// `ClassCountMismatch` if `out` has a different class count, plus the
    /// errors of [`InferenceEngine::run`].
    pub fn run_into(
        &mut self,
        classifier: &mut dyn NetworkClassifier,
        unknowns: impl IntoIterator<Item = NodeId>,
        out: &mut Estimate,
    ) -> NetKitResult<()> {
        self.run(classifier, unknowns)?;
        let state = self.state;
        let run = self.active.as_ref().ok_or_else(|| illegal(state, "run_into"))?;
        if run.working.class_count() != out.class_count() {
            return Err(InferenceError::ClassCountMismatch {
                expected: run.working.class_count(),
                actual: out.class_count(),
            }
            .into());
        }
        for &node in &run.unknowns {
            if let Some(row) = run.working.get(node) {
                out.set(node, row)?;
            }
        }
        Ok(())
    }

    /// Leave-one-out accuracy of `classifier` on the labeled nodes of
    /// `known`.
    ///
    /// Each labeled node's own row is hidden from `context` while it is
    /// classified. Nodes the classifier declines are not evaluated. Returns
    /// `None` if no labeled node could be evaluated.
    ///
    /// # Errors
    ///
    /// Classifier errors.
    pub fn training_accuracy(
        classifier: &mut dyn NetworkClassifier,
        known: &Classification,
        context: &Estimate,
    ) -> NetKitResult<Option<f64>> {
        let mut context = context.clone();
        let mut evaluated = 0usize;
        let mut correct = 0usize;
        for node in known.known_nodes().collect::<Vec<_>>() {
            let hidden = context.remove(node);
            let predicted = classifier.classify(node, &context, false);
            if let Some(row) = hidden {
                context.set(node, &row)?;
            }
            let Some(predicted) = predicted? else {
                continue;
            };
            evaluated += 1;
            if Some(predicted) == known.get(node) {
                correct += 1;
            }
        }
        Ok((evaluated > 0).then(|| correct as f64 / evaluated as f64))
    }
}

fn illegal(state: EngineState, operation: &'static str) -> NetKitError {
    InferenceError::IllegalState {
        operation,
        state: state.to_string(),
    }
    .into()
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("method", &self.method.name())
            .field("state", &self.state)
            .field("has_prior", &self.prior.is_some())
            .field("has_truth", &self.truth.is_some())
            .field("listeners", &self.listeners)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}
