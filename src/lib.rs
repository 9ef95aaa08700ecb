//! # netkit - Collective Inference for Networked Data
//!
//! netkit classifies the unlabeled nodes of a partially-labeled graph by
//! combining a pluggable per-node predictor with collective inference:
//! label beliefs are propagated across linked nodes and refined sweep by
//! sweep until a stopping criterion is reached.
//!
//! ## Core Concepts
//!
//! - **Estimate**: per-node score vector over the values of a categorical attribute
//! - **Classification**: per-node single class index, or unknown
//! - **NetworkClassifier**: the predictor the engine calls once per node per sweep
//! - **InferenceEngine**: drives runs of one of four strategies
//!   (null, iterative classification, relaxation labeling, Gibbs sampling)
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use netkit::{
//!     CategoricalAttribute, Classification, Estimate, Graph, InferenceEngine, InferenceMethod,
//!     InferenceOptions, WeightedVoteRelationalNeighbor,
//! };
//!
//! let mut graph = Graph::new();
//! let a = graph.add_node("a");
//! let b = graph.add_node("b");
//! let c = graph.add_node("c");
//! graph.add_edge(a, b, 1.0);
//! graph.add_edge(b, c, 1.0);
//! let graph = Arc::new(graph);
//!
//! let attr = Arc::new(CategoricalAttribute::new("label", ["x", "y"]));
//! let mut known = Classification::new(Arc::clone(&attr));
//! known.set(a, Some(1));
//! let mut prior = Estimate::from_classification(&known);
//! prior.set(b, &[0.5, 0.5])?;
//! prior.set(c, &[0.5, 0.5])?;
//!
//! let options = InferenceOptions::parse("numit=10")?;
//! let mut engine = InferenceEngine::configured(InferenceMethod::from_name("ica")?, &options)?;
//! engine.set_prior(prior);
//! let mut wvrn = WeightedVoteRelationalNeighbor::new(graph);
//! let labels = engine.run_classification(&mut wvrn, [b, c])?;
//! assert_eq!(labels.get(c), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

// Data model
pub mod classification;
pub mod error;
pub mod estimate;
pub mod graph;

// Prediction and inference
pub mod classifier;
pub mod inference;

// Reporting
pub mod monitor;
pub mod snapshot;

// Re-export primary types at crate root for convenience
pub use classification::Classification;
pub use classifier::{NetworkClassifier, WeightedVoteRelationalNeighbor};
pub use error::{
    ConfigurationError, InferenceError, ListenerError, NetKitError, NetKitResult, SnapshotError,
};
pub use estimate::Estimate;
pub use graph::{CategoricalAttribute, Graph, Neighbor, NodeId};
pub use inference::{
    DoubleBuffer, EngineState, GibbsSampling, IdentityMatrix, InferenceConfig, InferenceEngine,
    InferenceMethod, InferenceOptions, IterativeClassification, NullInference, RelaxationLabeling,
    RunId, RunState, RunSummary,
};
pub use monitor::{ChannelListener, EventStream, InferenceEvent, InferenceListener, ListenerSet};
pub use snapshot::{GraphExportSink, PredictionWriter, Snapshot, SnapshotSink};
