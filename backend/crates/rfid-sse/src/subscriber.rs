use crate::{BoundedQueue, SubscriberId};

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// One live consumer: an id plus the queue its stream drains
#[derive(Debug, Clone)]
pub struct Subscriber {
    id: SubscriberId,
    queue: Arc<BoundedQueue<String>>,
    subscribed_at: DateTime<Utc>,
}

impl Subscriber {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            id: SubscriberId::new(),
            queue: Arc::new(BoundedQueue::new(queue_capacity)),
            subscribed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn queue(&self) -> &Arc<BoundedQueue<String>> {
        &self.queue
    }

    pub fn subscribed_at(&self) -> DateTime<Utc> {
        self.subscribed_at
    }
}
