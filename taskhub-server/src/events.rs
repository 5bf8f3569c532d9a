//! Owner-scoped push-event fan-out.
//!
//! The [`EventBus`] is constructed once and handed to the router state;
//! components that need live updates subscribe explicitly and drop the
//! receiver to unsubscribe. Channels are keyed by owner identity, so one
//! owner's events can never reach another owner's subscribers.

use std::collections::HashMap;

use tokio::sync::{RwLock, broadcast};

use taskhub_model::event::TaskEvent;
use taskhub_model::task::OwnerId;

/// Default capacity of each owner's broadcast channel. A subscriber that
/// falls further behind than this loses the oldest events and should
/// refetch.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Fan-out hub for task change events, keyed by owner identity.
pub struct EventBus {
    channels: RwLock<HashMap<OwnerId, broadcast::Sender<TaskEvent>>>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a bus with the default per-owner channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus with a custom per-owner channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Subscribes to one owner's change feed.
    ///
    /// Dropping the returned receiver ends the subscription; no further
    /// teardown is required.
    pub async fn subscribe(&self, owner: &OwnerId) -> broadcast::Receiver<TaskEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(owner.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publishes an event to the owner's subscribers, returning how many
    /// received it. An owner with no live subscribers simply drops the
    /// event; clients catch up with a full fetch when they reconnect.
    pub async fn publish(&self, owner: &OwnerId, event: TaskEvent) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(owner)
            .map_or(0, |sender| sender.send(event).unwrap_or(0))
    }
}
