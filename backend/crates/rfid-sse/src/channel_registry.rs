use crate::{Subscriber, SubscriberId};

use std::collections::HashMap;

use log::{debug, info, warn};

/// Subscribers per channel, in subscription order.
///
/// Plain data; `Publisher` owns it behind a lock so each mutation is atomic.
#[derive(Debug)]
pub struct ChannelRegistry {
    channels: HashMap<String, Vec<Subscriber>>,
    max_clients: usize,
}

impl ChannelRegistry {
    pub fn new(max_clients: usize) -> Self {
        Self {
            channels: HashMap::new(),
            max_clients,
        }
    }

    /// Append `subscriber` unless the channel is already at `max_clients`.
    ///
    /// Returns false (and registers nothing) when the channel is full.
    pub fn admit(&mut self, channel: &str, subscriber: Subscriber) -> bool {
        let subscribers = self.channels.entry(channel.to_string()).or_default();

        if subscribers.len() >= self.max_clients {
            warn!(
                "Channel '{channel}' is full: {}/{} subscribers",
                subscribers.len(),
                self.max_clients
            );
            return false;
        }

        subscribers.push(subscriber);
        info!(
            "Admitted subscriber to channel '{channel}' ({}/{})",
            subscribers.len(),
            self.max_clients
        );
        true
    }

    /// Remove the subscriber with `id` from `channel`, if present.
    pub fn remove(&mut self, channel: &str, id: SubscriberId) -> Option<Subscriber> {
        let subscribers = self.channels.get_mut(channel)?;
        let index = subscribers.iter().position(|s| s.id() == id)?;
        let removed = subscribers.remove(index);

        info!(
            "Removed subscriber {id} from channel '{channel}' ({} remaining)",
            subscribers.len()
        );

        if subscribers.is_empty() {
            self.channels.remove(channel);
            debug!("Dropped empty channel '{channel}'");
        }

        Some(removed)
    }

    /// Snapshot of the channel's subscribers at this instant.
    pub fn subscribers(&self, channel: &str) -> Vec<Subscriber> {
        self.channels.get(channel).cloned().unwrap_or_default()
    }

    pub fn contains(&self, channel: &str, id: SubscriberId) -> bool {
        self.channels
            .get(channel)
            .is_some_and(|subscribers| subscribers.iter().any(|s| s.id() == id))
    }

    pub fn count(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, Vec::len)
    }

    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }
}
