#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::{timeout, Instant};

use go2link_channel::ChannelConfig;
use go2link_core::MessageKind;

use common::{frame, next_message, validated};

fn heartbeat_config() -> ChannelConfig {
    let mut cfg = ChannelConfig::default();
    cfg.channel.network_poll_ms = 60000;
    cfg
}

#[tokio::test(start_paused = true)]
async fn heartbeat_runs_on_interval_after_validation() {
    let (chan, mut peer) = validated(heartbeat_config()).await;
    let start = Instant::now();
    assert!(chan.heartbeat_state().last_sent().is_none());

    let hb = next_message(&mut peer).await;
    assert_eq!(hb.kind, MessageKind::Heartbeat);
    assert_eq!(hb.topic, "");
    let time_str = hb.data_at(&["timeInStr"]).and_then(Value::as_str).unwrap();
    assert_eq!(time_str.len(), "2024-01-01 00:00:00".len());
    assert!(hb.data_at(&["timeInNum"]).and_then(Value::as_i64).unwrap() > 0);
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert!(chan.heartbeat_state().last_sent().is_some());

    let second = next_message(&mut peer).await;
    assert_eq!(second.kind, MessageKind::Heartbeat);
    assert!(start.elapsed() >= Duration::from_millis(4000));
}

#[tokio::test(start_paused = true)]
async fn responses_are_counted_once() {
    let (chan, _peer) = validated(heartbeat_config()).await;
    assert!(!chan.take_new_heartbeat_response());

    chan.handle_frame(frame(MessageKind::Heartbeat, "", json!({ "timeInStr": "x", "timeInNum": 1 })))
        .unwrap();
    chan.handle_frame(frame(MessageKind::Heartbeat, "", json!({}))).unwrap();

    let state = chan.heartbeat_state();
    assert_eq!(state.response_count(), 2);
    assert!(state.last_response().is_some());
    assert!(chan.take_new_heartbeat_response());
    assert!(!chan.take_new_heartbeat_response());
}

#[tokio::test(start_paused = true)]
async fn close_stops_heartbeat() {
    let (chan, mut peer) = validated(heartbeat_config()).await;
    assert_eq!(next_message(&mut peer).await.kind, MessageKind::Heartbeat);

    chan.on_close();
    assert!(timeout(Duration::from_secs(10), peer.recv()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_channel_stops_everything() {
    let (chan, mut peer) = validated(heartbeat_config()).await;
    drop(chan);

    // Writer exits once the last handle is gone, closing the transport.
    let next = timeout(Duration::from_secs(10), peer.recv()).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test(start_paused = true)]
async fn revalidation_restarts_the_schedule() {
    let (chan, mut peer) = validated(heartbeat_config()).await;

    chan.handle_frame(frame(MessageKind::Validation, "", json!("again"))).unwrap();
    assert_eq!(next_message(&mut peer).await.kind, MessageKind::Validation);
    // Not validated: no heartbeat for a while.
    assert!(timeout(Duration::from_secs(5), peer.recv()).await.is_err());

    chan.handle_frame(frame(MessageKind::Validation, "", json!("Validation Ok."))).unwrap();
    let restarted = Instant::now();
    assert_eq!(next_message(&mut peer).await.kind, MessageKind::Heartbeat);
    assert!(restarted.elapsed() >= Duration::from_millis(2000));
}
