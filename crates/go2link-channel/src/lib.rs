//! go2link channel runtime.
//!
//! Wires the core protocol primitives to a live data channel: the outbound
//! writer task, the pending request and subscription tables, the validation
//! handshake, the heartbeat and network-status background tasks, and file
//! transfer. The WebRTC peer connection itself stays outside; it plugs in
//! through [`transport::DataChannelTransport`] and [`Channel::handle_frame`].

pub mod channel;
pub mod config;
pub mod correlator;
pub mod files;
pub mod router;
pub mod transport;

mod tasks;

pub use channel::{Channel, ConnectionState};
pub use config::ChannelConfig;
pub use correlator::Completion;
pub use files::{CancelFlag, UploadOutcome};
pub use router::TopicHandler;
pub use transport::{DataChannelTransport, MemoryPeer, MemoryTransport};
