//! Topic subscriptions: at most one handler per topic, last writer wins.

use std::collections::HashMap;
use std::sync::Arc;

use go2link_core::Message;

/// Callback invoked for every inbound message on a subscribed topic.
///
/// Runs on the inbound path, so it must not block; hand heavy work to a task.
pub trait TopicHandler: Send + Sync {
    fn handle(&self, msg: &Message);
}

impl<F> TopicHandler for F
where
    F: Fn(&Message) + Send + Sync,
{
    fn handle(&self, msg: &Message) {
        self(msg)
    }
}

#[derive(Default)]
pub struct Subscriptions {
    handlers: HashMap<String, Arc<dyn TopicHandler>>,
}

impl Subscriptions {
    /// Register `handler` for `topic`, returning the handler it replaced.
    pub fn insert(&mut self, topic: impl Into<String>, handler: Arc<dyn TopicHandler>) -> Option<Arc<dyn TopicHandler>> {
        self.handlers.insert(topic.into(), handler)
    }

    pub fn remove(&mut self, topic: &str) -> Option<Arc<dyn TopicHandler>> {
        self.handlers.remove(topic)
    }

    pub fn get(&self, topic: &str) -> Option<Arc<dyn TopicHandler>> {
        self.handlers.get(topic).cloned()
    }

    pub fn topics(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("topics", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
