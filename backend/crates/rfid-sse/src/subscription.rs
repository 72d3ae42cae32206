use crate::{SubscriberId, SubscriptionStream};

/// An admitted subscriber: its id and the stream of lines published to it
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub channel: String,
    pub stream: SubscriptionStream,
}

impl Subscription {
    pub fn into_parts(self) -> (SubscriberId, SubscriptionStream) {
        (self.id, self.stream)
    }
}
