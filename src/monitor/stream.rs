use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};

use crate::error::ListenerError;

use super::events::InferenceEvent;
use super::listener::InferenceListener;

/// Listener that forwards events into a bounded channel.
///
/// Forwarding never blocks the engine: when the channel is full or the
/// stream was dropped, the event is discarded and counted.
#[derive(Debug)]
pub struct ChannelListener {
    tx: Sender<InferenceEvent>,
    dropped: Arc<AtomicU64>,
}

impl ChannelListener {
    /// Creates a listener and the stream that receives its events.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, EventStream) {
        let (tx, rx) = bounded(capacity.max(1));
        let dropped = Arc::new(AtomicU64::new(0));
        let listener = Self {
            tx,
            dropped: Arc::clone(&dropped),
        };
        (listener, EventStream { rx, dropped })
    }
}

impl InferenceListener for ChannelListener {
    fn name(&self) -> &str {
        "channel"
    }

    fn on_event(&mut self, event: &InferenceEvent) -> Result<(), ListenerError> {
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
        Ok(())
    }
}

/// Receiving end of a [`ChannelListener`].
#[derive(Debug)]
pub struct EventStream {
    rx: Receiver<InferenceEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventStream {
    /// Receive the next event (blocking). `None` once the listener is gone
    /// and the channel is drained.
    #[must_use]
    pub fn recv(&self) -> Option<InferenceEvent> {
        self.rx.recv().ok()
    }

    /// Receive the next event with a timeout.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<InferenceEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Receive an already-queued event without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<InferenceEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drains every queued event.
    #[must_use]
    pub fn drain(&self) -> Vec<InferenceEvent> {
        self.rx.try_iter().collect()
    }

    /// Events discarded because the channel was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
