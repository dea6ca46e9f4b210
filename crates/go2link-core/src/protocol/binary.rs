//! Binary frame parsing (panic-free).
//!
//! Two layouts share the channel, told apart by the first four bytes read as
//! two little-endian u16 values:
//!
//! ```text
//! LiDAR  (2, 0): [u16 2][u16 0][u32 json_len][u32 reserved][json][payload]
//! Normal (else): [u16 json_len][u16 reserved][json][payload]
//! ```
//!
//! For normal frames the discriminator bytes are the header itself: the JSON
//! length is re-read from offset 0.
//!
//! Parsing rules:
//! - Never index (`buf[0]`); always use `Buf` and `remaining()` checks.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Go2Error, Result};
use crate::protocol::message::Message;

/// Discriminator announcing a LiDAR frame.
pub const LIDAR_DISCRIMINATOR: (u16, u16) = (2, 0);

/// Binary frame layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryLayout {
    Normal,
    Lidar,
}

/// Parsed binary frame.
#[derive(Debug, Clone)]
pub struct BinaryFrame {
    pub layout: BinaryLayout,
    /// JSON header; its `data` object carries the payload metadata.
    pub header: Message,
    /// Raw payload (zero-copy).
    pub payload: Bytes,
}

/// Decode a binary frame from bytes.
pub fn decode_binary_frame(mut buf: Bytes) -> Result<BinaryFrame> {
    if buf.remaining() < 4 {
        return Err(Go2Error::Codec("binary frame too short for header".into()));
    }

    let mut peek = buf.clone();
    let h1 = peek.get_u16_le();
    let h2 = peek.get_u16_le();

    let (layout, json_len) = if (h1, h2) == LIDAR_DISCRIMINATOR {
        buf.advance(4);
        if buf.remaining() < 8 {
            return Err(Go2Error::Codec("lidar frame too short for header".into()));
        }
        let len = buf.get_u32_le() as usize;
        buf.advance(4);
        (BinaryLayout::Lidar, len)
    } else {
        let len = buf.get_u16_le() as usize;
        buf.advance(2);
        (BinaryLayout::Normal, len)
    };

    if buf.remaining() < json_len {
        return Err(Go2Error::Codec(format!(
            "binary frame declares {json_len} header bytes, {} available",
            buf.remaining()
        )));
    }

    let json = buf.split_to(json_len);
    let header: Message = serde_json::from_slice(&json)?;
    if !header.data.as_ref().is_some_and(|d| d.is_object()) {
        return Err(Go2Error::Codec("binary frame header missing data object".into()));
    }

    // Remaining bytes are payload.
    let payload = buf.copy_to_bytes(buf.remaining());

    Ok(BinaryFrame {
        layout,
        header,
        payload,
    })
}

/// Encode a binary frame. Used by peers/simulators and tests.
pub fn encode_binary_frame(layout: BinaryLayout, header: &Message, payload: &[u8]) -> Result<Bytes> {
    let json = serde_json::to_vec(header)?;
    let mut out = BytesMut::with_capacity(json.len() + payload.len() + 12);
    match layout {
        BinaryLayout::Lidar => {
            let len = u32::try_from(json.len())
                .map_err(|_| Go2Error::Codec("header too large for lidar frame".into()))?;
            out.put_u16_le(LIDAR_DISCRIMINATOR.0);
            out.put_u16_le(LIDAR_DISCRIMINATOR.1);
            out.put_u32_le(len);
            out.put_u32_le(0);
        }
        BinaryLayout::Normal => {
            let len = u16::try_from(json.len())
                .map_err(|_| Go2Error::Codec("header too large for normal frame".into()))?;
            // A normal header whose length happens to read as (2, 0) would be
            // mistaken for a LiDAR frame.
            if len == LIDAR_DISCRIMINATOR.0 {
                return Err(Go2Error::Codec("normal frame header length collides with lidar marker".into()));
            }
            out.put_u16_le(len);
            out.put_u16_le(0);
        }
    }
    out.put_slice(&json);
    out.put_slice(payload);
    Ok(out.freeze())
}
