use crate::SubscriberId;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Signals from the non-blocking queue operations (and puts into a closed queue).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue is empty")]
    Empty,

    #[error("queue is full")]
    Full,

    #[error("queue is closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum BroadcastError {
    #[error("Subscriber {subscriber_id} not found in channel '{channel}' {location}")]
    SubscriberNotFound {
        subscriber_id: SubscriberId,
        channel: String,
        location: ErrorLocation,
    },

    #[error("Transport write failed: {source} {location}")]
    Transport {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl BroadcastError {
    /// Client connection is gone; expected during normal operation.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    #[track_caller]
    pub fn transport(source: std::io::Error) -> Self {
        Self::Transport {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[cfg(test)]
    #[track_caller]
    pub(crate) fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, BroadcastError>;
pub type QueueResult<T> = std::result::Result<T, QueueError>;
