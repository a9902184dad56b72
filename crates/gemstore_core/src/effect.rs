use crate::Message;

/// Side effects requested by [`crate::update`], to be executed in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist the revision timestamp as the new last-seen value.
    CommitTimestamp { timestamp: String },
    /// Hand the message to the notification channel.
    Dispatch { message: Message },
}
