//! Environment change notifications.
//!
//! Push changes carry the new value for one settable field. Pull changes
//! only signal that a refreshed field is stale; the value is re-read from
//! the provider on refresh.

use tokio::sync::broadcast;

/// A single observed change in the host environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvironmentChange {
    WiFiConnectivity(bool),
    Reachability(bool),
    AppleWatchConnectivity(bool),
    VoiceOver(bool),
    StatusBarHeight(f64),
    Locale,
    NetworkCarrier,
    Orientation,
}

impl EnvironmentChange {
    /// Whether the change carries a value to store rather than requesting a refresh
    #[must_use]
    pub fn is_push(&self) -> bool {
        !matches!(self, Self::Locale | Self::NetworkCarrier | Self::Orientation)
    }
}

/// Fan-out channel for environment changes
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<EnvironmentChange>,
}

impl ChangeFeed {
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Create a feed buffering up to `capacity` undelivered changes (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a change, returning how many subscribers will see it.
    ///
    /// Publishing with no subscribers is not an error, so callers that only
    /// announce changes can ignore the count.
    pub fn publish(&self, change: EnvironmentChange) -> usize {
        if let Ok(delivered) = self.sender.send(change) {
            delivered
        } else {
            tracing::trace!(?change, "No subscribers for environment change");
            0
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EnvironmentChange> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
