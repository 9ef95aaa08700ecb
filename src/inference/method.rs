use std::fmt;

use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::classifier::NetworkClassifier;
use crate::error::{ConfigurationError, InferenceError};
use crate::estimate::Estimate;

use super::gibbs::GibbsSampling;
use super::iterative::IterativeClassification;
use super::null::NullInference;
use super::options::InferenceOptions;
use super::relaxation::RelaxationLabeling;
use super::state::RunState;

/// Closed set of collective inference strategies.
///
/// Each variant owns its options and run-scoped buffers; the driver
/// dispatches `configure`, `reset` and `iterate` through this enum.
#[derive(Debug, Clone)]
pub enum InferenceMethod {
    /// Single-pass baseline.
    Null(NullInference),
    /// Iterative classification (ICA).
    Iterative(IterativeClassification),
    /// Relaxation labeling.
    Relaxation(RelaxationLabeling),
    /// Gibbs sampling.
    Gibbs(GibbsSampling),
}

impl InferenceMethod {
    /// Looks up a strategy by name with default options.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownMethod` for unrecognized names.
    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "null" | "none" => Ok(Self::Null(NullInference::new())),
            "ica" | "iterative" | "iterative_classification" => {
                Ok(Self::Iterative(IterativeClassification::new()))
            }
            "relax" | "relaxation" | "relaxation_labeling" => {
                Ok(Self::Relaxation(RelaxationLabeling::new()))
            }
            "gibbs" | "gibbs_sampling" => Ok(Self::Gibbs(GibbsSampling::new())),
            _ => Err(ConfigurationError::UnknownMethod {
                name: name.to_string(),
            }),
        }
    }

    /// Returns a short stable identifier suitable for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null(_) => "null",
            Self::Iterative(_) => "ica",
            Self::Relaxation(_) => "relaxation",
            Self::Gibbs(_) => "gibbs",
        }
    }

    /// Maximum number of sweeps a run performs.
    #[must_use]
    pub const fn num_iterations(&self) -> usize {
        match self {
            Self::Null(m) => m.num_iterations(),
            Self::Iterative(m) => m.num_iterations(),
            Self::Relaxation(m) => m.num_iterations(),
            Self::Gibbs(m) => m.num_iterations(),
        }
    }

    pub(crate) fn configure(&mut self, options: &InferenceOptions) -> Result<(), ConfigurationError> {
        match self {
            Self::Null(m) => m.configure(options),
            Self::Iterative(m) => m.configure(options),
            Self::Relaxation(m) => m.configure(options),
            Self::Gibbs(m) => m.configure(options),
        }
    }

    pub(crate) fn reset(&mut self, run: &RunState, rng: &mut ChaCha20Rng) {
        match self {
            Self::Null(m) => m.reset(run),
            Self::Iterative(m) => m.reset(run),
            Self::Relaxation(m) => m.reset(run),
            Self::Gibbs(m) => m.reset(run, rng),
        }
    }

    /// One sweep. Returns `false` when the strategy has quiesced.
    pub(crate) fn iterate(
        &mut self,
        run: &mut RunState,
        prior: &Estimate,
        classifier: &mut dyn NetworkClassifier,
        rng: &mut ChaCha20Rng,
    ) -> Result<bool, InferenceError> {
        match self {
            Self::Null(m) => m.iterate(run, prior, classifier),
            Self::Iterative(m) => m.iterate(run, classifier),
            Self::Relaxation(m) => m.iterate(run, classifier),
            Self::Gibbs(m) => m.iterate(run, classifier, rng),
        }
    }
}

impl fmt::Display for InferenceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<NullInference> for InferenceMethod {
    fn from(m: NullInference) -> Self {
        Self::Null(m)
    }
}

impl From<IterativeClassification> for InferenceMethod {
    fn from(m: IterativeClassification) -> Self {
        Self::Iterative(m)
    }
}

impl From<RelaxationLabeling> for InferenceMethod {
    fn from(m: RelaxationLabeling) -> Self {
        Self::Relaxation(m)
    }
}

impl From<GibbsSampling> for InferenceMethod {
    fn from(m: GibbsSampling) -> Self {
        Self::Gibbs(m)
    }
}

/// Serializable strategy selection: a method name plus its options.
///
/// ```
/// use netkit::InferenceConfig;
///
/// let cfg: InferenceConfig =
///     serde_json::from_str(r#"{"method": "gibbs", "options": {"burnin": 10}}"#).unwrap();
/// let method = cfg.build().unwrap();
/// assert_eq!(method.name(), "gibbs");
/// assert_eq!(method.num_iterations(), 10 + 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Strategy name, as accepted by [`InferenceMethod::from_name`].
    pub method: String,
    /// Strategy options.
    #[serde(default)]
    pub options: InferenceOptions,
}

impl InferenceConfig {
    /// Creates a config for `method` with no options.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            options: InferenceOptions::new(),
        }
    }

    /// Instantiates and configures the selected strategy.
    ///
    /// # Errors
    ///
    /// Unknown method names and malformed numeric options are rejected.
    pub fn build(&self) -> Result<InferenceMethod, ConfigurationError> {
        let mut method = InferenceMethod::from_name(&self.method)?;
        method.configure(&self.options)?;
        Ok(method)
    }
}
