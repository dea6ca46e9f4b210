//! Frame codec: one entry point for both wire shapes.

use bytes::Bytes;

use crate::error::{Go2Error, Result};
use crate::protocol::binary::{decode_binary_frame, BinaryLayout};
use crate::protocol::message::Message;

/// One data channel frame, as delivered by (or handed to) the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
}

impl Frame {
    pub fn len(&self) -> usize {
        match self {
            Frame::Text(s) => s.len(),
            Frame::Binary(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decoded frame: envelope plus the raw binary payload, if any.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub message: Message,
    pub payload: Option<Bytes>,
    pub layout: Option<BinaryLayout>,
}

/// Decode a frame into its envelope.
pub fn decode(frame: Frame) -> Result<Decoded> {
    match frame {
        Frame::Text(s) => {
            if s.is_empty() {
                return Err(Go2Error::Codec("empty text frame".into()));
            }
            let message: Message = serde_json::from_str(&s)?;
            Ok(Decoded {
                message,
                payload: None,
                layout: None,
            })
        }
        Frame::Binary(b) => {
            let frame = decode_binary_frame(b)?;
            Ok(Decoded {
                message: frame.header,
                payload: Some(frame.payload),
                layout: Some(frame.layout),
            })
        }
    }
}

/// Encode an outbound envelope as a text frame.
pub fn encode(message: &Message) -> Result<Frame> {
    Ok(Frame::Text(serde_json::to_string(message)?))
}
