//! Event types emitted by the inference engine.
//!
//! Events are serializable so they can be logged or streamed as-is.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classification::Classification;
use crate::estimate::Estimate;
use crate::inference::RunId;

/// Something the engine produced.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InferenceEvent {
    /// `reset()` materialized the working state.
    RunStarted {
        run_id: RunId,
        method: String,
        unknown_count: usize,
        class_count: usize,
        started_at: DateTime<Utc>,
    },

    /// One sweep finished.
    SweepCompleted {
        run_id: RunId,
        /// Zero-based sweep index.
        iteration: usize,
        changed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accuracy: Option<f64>,
    },

    /// A run finished and its working estimate is final.
    EstimateMaterialized {
        run_id: RunId,
        sweeps: usize,
        stopped_early: bool,
        estimate: Arc<Estimate>,
    },

    /// An arg-max classification was derived from the final estimate.
    ClassificationMaterialized {
        run_id: RunId,
        classification: Arc<Classification>,
    },
}

impl InferenceEvent {
    /// The run this event belongs to.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::SweepCompleted { run_id, .. }
            | Self::EstimateMaterialized { run_id, .. }
            | Self::ClassificationMaterialized { run_id, .. } => *run_id,
        }
    }

    /// Returns a short stable identifier suitable for logging/debugging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::SweepCompleted { .. } => "sweep_completed",
            Self::EstimateMaterialized { .. } => "estimate_materialized",
            Self::ClassificationMaterialized { .. } => "classification_materialized",
        }
    }
}
