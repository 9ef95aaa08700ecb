//! Run monitoring: events and listeners.
//!
//! The engine emits an [`InferenceEvent`] whenever it starts a run, finishes
//! a sweep, or materializes an estimate or classification. Listeners are
//! invoked synchronously in registration order. A listener error aborts the
//! engine operation that emitted the event.
//!
//! [`ChannelListener`] adapts the synchronous callback into a bounded
//! channel so another thread can consume events through an [`EventStream`].

/// Event type definitions.
pub mod events;
/// Listener trait and registration list.
pub mod listener;
/// Channel-backed listener and its receiving stream.
pub mod stream;

pub use events::InferenceEvent;
pub use listener::{InferenceListener, ListenerSet};
pub use stream::{ChannelListener, EventStream};
