//! Collective inference engine.
//!
//! The [`InferenceEngine`] drives a run: it copies the caller's prior into
//! working buffers on `reset`, then repeats sweeps of the selected
//! [`InferenceMethod`] until the sweep budget is spent or the strategy
//! reports quiescence. Strategies form a closed set:
//!
//! - [`NullInference`]: one pass against the initial prior
//! - [`IterativeClassification`]: asynchronous greedy re-labeling
//! - [`RelaxationLabeling`]: synchronous damped updates
//! - [`GibbsSampling`]: Markov-chain sampling with burn-in
//!
//! Execution is single-threaded. Classifier calls are strictly ordered, and
//! all randomness flows from one seedable generator owned by the engine, so
//! a seeded run replays exactly.

mod buffer;
mod engine;
mod gibbs;
mod iterative;
mod method;
mod null;
pub mod options;
mod relaxation;
mod state;

pub use buffer::DoubleBuffer;
pub use engine::{InferenceEngine, RunSummary};
pub use gibbs::GibbsSampling;
pub use iterative::IterativeClassification;
pub use method::{InferenceConfig, InferenceMethod};
pub use null::NullInference;
pub use options::InferenceOptions;
pub use relaxation::RelaxationLabeling;
pub use state::{EngineState, IdentityMatrix, RunId, RunState};

use crate::error::ConfigurationError;

/// Reads the `numit` sweep budget; negative values clamp to zero.
fn iteration_budget(options: &InferenceOptions, default: usize) -> Result<usize, ConfigurationError> {
    let default = i64::try_from(default).unwrap_or(i64::MAX);
    let value = options.get_int(options::NUM_ITERATIONS, default)?;
    Ok(usize::try_from(value.max(0)).unwrap_or(usize::MAX))
}
