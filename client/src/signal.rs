//! Unauthorized signal
//!
//! The transport never tears down the session itself. When any call comes
//! back with 401 it emits an [`Unauthorized`] event on this channel; the
//! component that owns the session subscribes and reacts.

use tokio::sync::broadcast;

/// Marker event: a request was rejected with 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthorized;

/// Broadcast channel carrying [`Unauthorized`] events
#[derive(Debug, Clone)]
pub struct UnauthorizedSignal {
    sender: broadcast::Sender<Unauthorized>,
}

impl UnauthorizedSignal {
    /// Create a signal with room for a few undelivered events
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Announce a 401; a signal nobody listens to is dropped
    pub fn emit(&self) {
        let receivers = self.sender.send(Unauthorized).unwrap_or(0);
        tracing::debug!(receivers, "Unauthorized response signalled");
    }

    /// Listen for future 401s
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Unauthorized> {
        self.sender.subscribe()
    }
}

impl Default for UnauthorizedSignal {
    fn default() -> Self {
        Self::new()
    }
}
