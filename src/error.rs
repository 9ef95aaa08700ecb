//! Error types for netkit.
//!
//! All errors are strongly typed using thiserror, grouped by the phase in
//! which they occur: configuration, inference, snapshot output and listener
//! delivery. A declined prediction is not an error and never appears here.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors raised while parsing or validating inference options.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Option '{key}' has malformed numeric value '{value}'")]
    InvalidNumber {
        key: String,
        value: String,
    },

    #[error("Unknown inference method '{name}'")]
    UnknownMethod {
        name: String,
    },

    #[error("Malformed option entry '{entry}' (expected key=value)")]
    MalformedEntry {
        entry: String,
    },
}

/// Errors raised by the inference engine while driving a run.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Illegal state: cannot {operation} while engine is {state}")]
    IllegalState {
        operation: &'static str,
        state: String,
    },

    #[error("No initial prior has been set")]
    MissingPrior,

    #[error("Class count mismatch: expected {expected}, got {actual}")]
    ClassCountMismatch {
        expected: usize,
        actual: usize,
    },

    #[error("Classifier failed on node {node}: {message}")]
    Classifier {
        node: NodeId,
        message: String,
    },
}

/// Errors raised by snapshot sinks. The driver logs and swallows these.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error returned by a listener that refused an event.
#[derive(Debug, Error)]
#[error("Listener '{listener}' failed: {message}")]
pub struct ListenerError {
    /// Name of the listener that failed.
    pub listener: String,
    /// Failure description.
    pub message: String,
}

impl ListenerError {
    /// Creates a listener error.
    #[must_use]
    pub fn new(listener: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            listener: listener.into(),
            message: message.into(),
        }
    }
}

/// Top-level error type for netkit.
#[derive(Debug, Error)]
pub enum NetKitError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Listener error: {0}")]
    Listener(#[from] ListenerError),
}

impl NetKitError {
    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if an operation was called in the wrong engine state.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Inference(InferenceError::IllegalState { .. } | InferenceError::MissingPrior)
        )
    }

    /// Returns true if this error aborts a run.
    ///
    /// Snapshot failures are the only non-fatal kind; the driver absorbs them.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Snapshot(_))
    }
}

/// Result type alias for netkit operations.
pub type NetKitResult<T> = Result<T, NetKitError>;
