//! Decode-once codec for inbound frames.
//!
//! - Text frames => `Message`
//! - Binary frames => `Message` whose `attachment` holds either the decoded
//!   voxel point cloud (header `data` carries voxel metadata) or the raw
//!   payload bytes
//!
//! Decoded clouds are also written to `data.data` as `[[x, y, z], ...]`, the
//! place consumers of the robot's JSON expect them.

use std::sync::Arc;

use serde_json::Value;

use go2link_core::error::Result;
use go2link_core::protocol::binary::BinaryLayout;
use go2link_core::protocol::{self, Attachment, Frame, Message};
use go2link_core::voxel::{VoxelDecoder, VoxelFrameMeta};

#[derive(Debug)]
pub struct Inbound {
    pub message: Message,
    pub bytes_len: usize,
    pub layout: Option<BinaryLayout>,
}

/// Decode one inbound frame. Voxel frames announcing more than
/// `max_voxel_bytes` of decompressed grid are rejected before decoding.
pub fn decode(frame: Frame, decoder: &dyn VoxelDecoder, max_voxel_bytes: usize) -> Result<Inbound> {
    let bytes_len = frame.len();
    let decoded = protocol::decode(frame)?;
    let mut message = decoded.message;

    if let Some(payload) = decoded.payload {
        let meta = message.data.as_ref().and_then(VoxelFrameMeta::from_data);
        message.attachment = Some(match meta {
            Some(meta) => {
                meta.ensure_within(max_voxel_bytes)?;
                let points = decoder.decode(&payload, &meta)?;
                tracing::trace!(
                    topic = %message.topic,
                    decoder = decoder.name(),
                    points = points.len(),
                    "voxel frame decoded"
                );
                if let Some(Value::Object(data)) = message.data.as_mut() {
                    data.insert("data".into(), serde_json::to_value(&points)?);
                }
                Attachment::Points(Arc::new(points))
            }
            None => Attachment::Raw(payload),
        });
    }

    Ok(Inbound {
        message,
        bytes_len,
        layout: decoded.layout,
    })
}
