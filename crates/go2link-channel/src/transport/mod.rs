//! Transport layer (WebRTC data channel seam).
//!
//! The peer connection itself is external. Whatever library owns it implements
//! [`DataChannelTransport`] for the outbound direction and feeds inbound frames
//! to [`Channel::handle_frame`](crate::Channel::handle_frame) (or hands a
//! stream of them to [`Channel::run`](crate::Channel::run)).

pub mod codec;
pub mod memory;

use async_trait::async_trait;

use go2link_core::error::Result;
use go2link_core::protocol::Frame;

pub use memory::{MemoryPeer, MemoryTransport};

/// Outbound half of the data channel. Called from the writer task only, one
/// frame at a time and in enqueue order.
#[async_trait]
pub trait DataChannelTransport: Send + Sync + 'static {
    async fn send(&self, frame: Frame) -> Result<()>;
}
