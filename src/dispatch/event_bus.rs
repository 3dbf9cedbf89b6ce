//! Minimal named-channel publish/subscribe for infrastructure signals.
//!
//! No wildcards, no priorities, no once-only semantics: channels are plain
//! names, publishing is synchronous and silent for unknown channels.

use std::collections::HashMap;
use std::sync::Arc;

/// Payload carried by a published event.
#[derive(Debug)]
pub enum BusEvent {
    /// A connection-level failure reported by the database driver.
    SqlError {
        /// Driver error rendered as text
        message: String,
    },
}

/// A registered event callback.
pub type Subscriber = Arc<dyn Fn(&BusEvent) + Send + Sync>;

/// Channel name to ordered subscriber list.
#[derive(Default)]
pub struct EventBus {
    channels: HashMap<String, Vec<Subscriber>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subscriber to a channel, creating the channel on first use.
    pub fn subscribe(&mut self, channel: &str, subscriber: Subscriber) {
        self.channels
            .entry(channel.to_string())
            .or_default()
            .push(subscriber);
    }

    /// Removes the channel entry entirely, so a later publish is a no-op
    /// rather than an iteration over an empty list.
    pub fn clear(&mut self, channel: &str) {
        self.channels.remove(channel);
    }

    /// Current subscribers of a channel, in registration order.
    #[must_use]
    pub fn subscribers(&self, channel: &str) -> Vec<Subscriber> {
        self.channels.get(channel).cloned().unwrap_or_default()
    }

    #[cfg(test)]
    fn has_channel(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }
}
