//! Run-scoped working state shared by every strategy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InferenceError;
use crate::estimate::Estimate;
use crate::graph::NodeId;

/// Unique identifier of one `reset()`-to-terminal run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new random run id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of an inference engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Created, options not yet applied.
    Unconfigured,
    /// Options applied; ready for `reset`.
    Configured,
    /// Between `reset` and the end of the run.
    Running,
    /// The run finished, stopped early, or was aborted by an error.
    Terminal,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Configured => write!(f, "configured"),
            Self::Running => write!(f, "running"),
            Self::Terminal => write!(f, "terminal"),
        }
    }
}

/// `K x K` one-hot rows used to push a chosen class into an estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl IdentityMatrix {
    /// Builds the identity matrix of the given size.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let mut cells = vec![0.0; size * size];
        for i in 0..size {
            cells[i * size + i] = 1.0;
        }
        Self { size, cells }
    }

    /// Matrix dimension.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// One-hot row for `class`.
    ///
    /// # Panics
    ///
    /// Panics if `class >= size`.
    #[must_use]
    pub fn row(&self, class: usize) -> &[f64] {
        assert!(class < self.size, "class {class} out of range for {}", self.size);
        &self.cells[class * self.size..(class + 1) * self.size]
    }
}

/// Working buffers of one run.
///
/// Created by `reset()` from the initial prior; strategies mutate
/// `working` in place and the driver exposes it as the run's result.
#[derive(Debug, Clone)]
pub struct RunState {
    pub(crate) run_id: RunId,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) unknowns: Vec<NodeId>,
    pub(crate) identity: IdentityMatrix,
    pub(crate) working: Estimate,
    pub(crate) sweeps: usize,
}

impl RunState {
    /// Materializes the working state: the working estimate starts as a
    /// copy of the whole prior, so every unknown node carries its prior
    /// vector and labeled nodes remain visible as classifier context.
    pub(crate) fn new(prior: &Estimate, unknowns: Vec<NodeId>) -> Result<Self, InferenceError> {
        let working = prior.clone();
        if working.class_count() == 0 {
            return Err(InferenceError::ClassCountMismatch {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Self {
            run_id: RunId::new(),
            started_at: Utc::now(),
            unknowns,
            identity: IdentityMatrix::new(prior.class_count()),
            working,
            sweeps: 0,
        })
    }

    /// Identifier of this run.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// When `reset()` created this run.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The unknown set, in visiting order.
    #[must_use]
    pub fn unknowns(&self) -> &[NodeId] {
        &self.unknowns
    }

    /// The working estimate.
    #[must_use]
    pub const fn working(&self) -> &Estimate {
        &self.working
    }

    /// Sweeps executed so far.
    #[must_use]
    pub const fn sweeps(&self) -> usize {
        self.sweeps
    }
}
