//! Protocol modules (text envelopes + binary frames).
//!
//! This module hosts the wire formats multiplexed over the data channel:
//! - Text frames: JSON envelopes `{type, topic, data?, info?}`.
//! - Binary frames: a length-prefixed JSON header followed by a raw payload,
//!   in either the normal or the LiDAR layout.
//! - Request envelopes carried inside `req`/`res` data.
//!
//! All parsers are panic-free: malformed input is reported as `Go2Error`
//! instead of panicking or indexing raw buffers.

pub mod binary;
pub mod frame;
pub mod kind;
pub mod message;
pub mod request;

pub use frame::{decode, encode, Decoded, Frame};
pub use kind::MessageKind;
pub use message::{Attachment, Message};
