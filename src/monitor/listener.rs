use crate::error::ListenerError;

use super::events::InferenceEvent;

/// Synchronous event callback.
///
/// Returning an error aborts the engine operation that emitted the event.
pub trait InferenceListener {
    /// Name used in error reports.
    fn name(&self) -> &str {
        "listener"
    }

    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Any error is propagated to the engine's caller.
    fn on_event(&mut self, event: &InferenceEvent) -> Result<(), ListenerError>;
}

impl<F> InferenceListener for F
where
    F: FnMut(&InferenceEvent) -> Result<(), ListenerError>,
{
    fn on_event(&mut self, event: &InferenceEvent) -> Result<(), ListenerError> {
        self(event)
    }
}

/// Registered listeners, notified in registration order.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Box<dyn InferenceListener>>,
}

impl ListenerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener.
    pub fn add(&mut self, listener: Box<dyn InferenceListener>) {
        self.listeners.push(listener);
    }

    /// Removes every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to every listener, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first listener error; later listeners are not invoked.
    pub fn notify(&mut self, event: &InferenceEvent) -> Result<(), ListenerError> {
        for listener in &mut self.listeners {
            listener.on_event(event)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.listeners.iter().map(|l| l.name()))
            .finish()
    }
}
