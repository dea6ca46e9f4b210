//! Shared harness: a channel over `MemoryTransport` and a scripted robot.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use go2link_channel::{Channel, ChannelConfig, ConnectionState, MemoryPeer, MemoryTransport};
use go2link_core::handshake::validation_response;
use go2link_core::protocol::{encode, Frame, Message, MessageKind};

pub const NONCE: &str = "q1w2e3r4";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Defaults with background timers pushed far out so they stay quiet.
pub fn quiet_config() -> ChannelConfig {
    let mut cfg = ChannelConfig::default();
    cfg.channel.heartbeat_interval_ms = 60000;
    cfg.channel.network_poll_ms = 60000;
    cfg
}

pub fn text(msg: &Message) -> Frame {
    encode(msg).unwrap()
}

pub fn frame(kind: MessageKind, topic: &str, data: Value) -> Frame {
    text(&Message::new(kind, topic).with_data(data))
}

pub async fn next_message(peer: &mut MemoryPeer) -> Message {
    tokio::time::timeout(Duration::from_secs(30), peer.recv_message())
        .await
        .expect("peer timed out")
        .expect("transport closed")
        .expect("client sent an undecodable frame")
}

/// Open the channel and run the handshake to completion.
pub async fn validated(cfg: ChannelConfig) -> (Channel, MemoryPeer) {
    init_tracing();
    let (transport, mut peer) = MemoryTransport::pair();
    let chan = Channel::new(cfg, Arc::new(transport)).unwrap();

    chan.on_open();
    assert_eq!(chan.state(), ConnectionState::Open);

    chan.handle_frame(frame(MessageKind::Validation, "", json!(NONCE))).unwrap();
    let answer = next_message(&mut peer).await;
    assert_eq!(answer.kind, MessageKind::Validation);
    assert_eq!(answer.data_str(), Some(validation_response(NONCE).as_str()));

    chan.handle_frame(frame(MessageKind::Validation, "", json!("Validation Ok."))).unwrap();
    assert_eq!(chan.state(), ConnectionState::Validated);

    (chan, peer)
}
