//! Text envelope (JSON).
//!
//! `data` and `info` stay as `serde_json::Value`: their shape depends on the
//! topic and is interpreted lazily by whoever consumes the message.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::kind::MessageKind;
use crate::voxel::PointCloud;

/// Decoded binary payload attached to a message.
///
/// Compressed voxel payloads are always replaced by their point cloud before a
/// message leaves the codec, so consumers never see the compressed bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Voxel grid decoded into world-space points.
    Points(Arc<PointCloud>),
    /// Opaque payload of a binary frame without voxel metadata.
    Raw(Bytes),
}

/// Envelope carried by every frame on the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message type (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Routing key; empty for broadcast/control messages.
    #[serde(default)]
    pub topic: String,
    /// Optional payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Side-band object used by `rtc_inner_req` and `err` messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
    /// Binary payload of a binary frame, after decoding.
    #[serde(skip)]
    pub attachment: Option<Attachment>,
}

impl Message {
    pub fn new(kind: MessageKind, topic: impl Into<String>) -> Self {
        Self {
            kind,
            topic: topic.into(),
            data: None,
            info: None,
            attachment: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_info(mut self, info: Value) -> Self {
        self.info = Some(info);
        self
    }

    /// Nested lookup under `data`, e.g. `data_at(&["header", "identity", "id"])`.
    pub fn data_at(&self, path: &[&str]) -> Option<&Value> {
        nested(self.data.as_ref()?, path)
    }

    /// Nested lookup under `info`.
    pub fn info_at(&self, path: &[&str]) -> Option<&Value> {
        nested(self.info.as_ref()?, path)
    }

    /// `data` as a string, when it is one.
    pub fn data_str(&self) -> Option<&str> {
        self.data.as_ref().and_then(Value::as_str)
    }

    /// `info` as a string, when it is one.
    pub fn info_str(&self) -> Option<&str> {
        self.info.as_ref().and_then(Value::as_str)
    }

    /// Decoded point cloud, if this message came from a voxel frame.
    pub fn points(&self) -> Option<&PointCloud> {
        match &self.attachment {
            Some(Attachment::Points(p)) => Some(p),
            _ => None,
        }
    }
}

/// Walk object keys; `None` as soon as a level is missing or not an object.
pub fn nested<'a>(mut cur: &'a Value, path: &[&str]) -> Option<&'a Value> {
    for field in path {
        cur = cur.as_object()?.get(*field)?;
    }
    Some(cur)
}
