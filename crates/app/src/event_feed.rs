//! Event feed — one shared real-time channel demultiplexed by topic.
//!
//! Each record type registers exactly one handler under its topic name.
//! Messages for a topic reach the handler in dispatch order; nothing is
//! promised across topics.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use barrelhub_domain::envelope::{FeedMessage, RawEnvelope};
use barrelhub_domain::error::FeedError;

use crate::sync::lock;

type EnvelopeHandler = Arc<dyn Fn(RawEnvelope) + Send + Sync>;

/// Topic-keyed router for incoming [`FeedMessage`]s.
#[derive(Default)]
pub struct EventFeed {
    handlers: Mutex<HashMap<String, EnvelopeHandler>>,
}

impl EventFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the handler for `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::DuplicateTopic`] when `topic` already has a handler.
    pub fn register(
        &self,
        topic: impl Into<String>,
        handler: impl Fn(RawEnvelope) + Send + Sync + 'static,
    ) -> Result<(), FeedError> {
        let topic = topic.into();
        let mut handlers = lock(&self.handlers);
        if handlers.contains_key(&topic) {
            return Err(FeedError::DuplicateTopic(topic));
        }
        tracing::debug!(topic = %topic, "feed handler registered");
        handlers.insert(topic, Arc::new(handler));
        Ok(())
    }

    /// Route `message` to its topic handler.
    ///
    /// Returns `false` when no handler is registered for the topic; the
    /// message is dropped.
    pub fn dispatch(&self, message: FeedMessage) -> bool {
        let handler = lock(&self.handlers).get(&message.topic).cloned();
        match handler {
            Some(handler) => {
                tracing::trace!(
                    topic = %message.topic,
                    verb = %message.envelope.verb,
                    id = %message.envelope.id,
                    "dispatching envelope"
                );
                handler(message.envelope);
                true
            }
            None => {
                tracing::debug!(topic = %message.topic, "no handler for topic, dropping envelope");
                false
            }
        }
    }

    /// Registered topic names, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = lock(&self.handlers).keys().cloned().collect();
        topics.sort();
        topics
    }
}
