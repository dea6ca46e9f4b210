//! Correlation keys matching responses (and chunks) to requests.
//!
//! An explicit identifier wins when present. Without one the key falls back to
//! `(kind, topic)`, which is ambiguous: concurrent un-identified requests on the
//! same kind/topic all resolve with the first matching response.

use std::fmt;

use serde_json::Value;

use crate::protocol::message::{nested, Message};
use crate::protocol::MessageKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CorrelationKey {
    /// `uuid`, `header.identity.id`, or `req_uuid`, normalized to a string.
    Id(String),
    /// Fallback for messages without an identifier.
    Route { kind: MessageKind, topic: String },
}

impl CorrelationKey {
    /// Key for an outbound message, looked up in the data it carries.
    pub fn for_outbound(kind: MessageKind, topic: &str, data: Option<&Value>) -> Self {
        let id = data.and_then(|d| {
            identifier(d, &["uuid"])
                .or_else(|| identifier(d, &["header", "identity", "id"]))
                .or_else(|| identifier(d, &["req_uuid"]))
        });
        Self::from_parts(kind, topic, id)
    }

    /// Key for an inbound message. Responses to `rtc_inner_req` echo the id
    /// under `info` rather than `data`.
    pub fn for_inbound(msg: &Message) -> Self {
        let from_data = msg.data.as_ref().and_then(|d| {
            identifier(d, &["uuid"]).or_else(|| identifier(d, &["header", "identity", "id"]))
        });
        let id = from_data.or_else(|| {
            msg.info.as_ref().and_then(|i| {
                identifier(i, &["uuid"]).or_else(|| identifier(i, &["req_uuid"]))
            })
        });
        Self::from_parts(msg.kind, &msg.topic, id)
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, CorrelationKey::Id(_))
    }

    fn from_parts(kind: MessageKind, topic: &str, id: Option<String>) -> Self {
        match id {
            Some(id) => CorrelationKey::Id(id),
            None => CorrelationKey::Route {
                kind,
                topic: topic.to_owned(),
            },
        }
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationKey::Id(id) => f.write_str(id),
            CorrelationKey::Route { kind, topic } => write!(f, "{kind} $ {topic}"),
        }
    }
}

/// Non-empty string or non-zero number at `path`; anything else is absent.
fn identifier(root: &Value, path: &[&str]) -> Option<String> {
    match nested(root, path)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
