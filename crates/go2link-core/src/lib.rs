//! go2link core: transport-agnostic protocol primitives for the Go2 data channel.
//!
//! This crate defines the wire-level contracts (envelopes, binary frames,
//! request/response correlation keys, chunking) plus the pure decoders and
//! state machines layered on top of them. It carries no async runtime so the
//! same primitives can back any WebRTC data channel implementation.
//!
//! # Guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `Go2Error`/`Result` so a misbehaving robot
//! cannot crash the client with a malformed frame.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod chunk;
pub mod error;
pub mod fault;
pub mod handshake;
pub mod heartbeat;
pub mod key;
pub mod netstatus;
pub mod protocol;
pub mod voxel;

/// Shared result type.
pub use error::{ErrorKind, Go2Error, ProtocolError, Result};
pub use key::CorrelationKey;
pub use protocol::{Message, MessageKind};
