#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::{timeout, Instant};

use go2link_channel::{Channel, ChannelConfig, MemoryPeer};
use go2link_core::netstatus::{ConnectionMethod, NetworkMode};
use go2link_core::{Message, MessageKind};

use common::{next_message, text, validated};

fn polling_config(method: ConnectionMethod) -> ChannelConfig {
    let mut cfg = ChannelConfig::default();
    cfg.channel.heartbeat_interval_ms = 60000;
    cfg.channel.connection_method = method;
    cfg
}

async fn next_poll(peer: &mut MemoryPeer) -> String {
    let req = next_message(peer).await;
    assert_eq!(req.kind, MessageKind::RtcInnerReq);
    assert_eq!(req.data_at(&["req_type"]).and_then(Value::as_str), Some("public_network_status"));
    req.data_at(&["uuid"]).and_then(Value::as_str).unwrap().to_owned()
}

fn answer(chan: &Channel, uuid: &str, status: &str) {
    let reply = Message::new(MessageKind::RtcInnerReq, "")
        .with_info(json!({ "req_type": "public_network_status", "uuid": uuid, "status": status }));
    chan.handle_frame(text(&reply)).unwrap();
}

fn recorded(chan: &Channel) -> Arc<Mutex<Vec<NetworkMode>>> {
    let modes: Arc<Mutex<Vec<NetworkMode>>> = Arc::default();
    let sink = Arc::clone(&modes);
    chan.on_network_status(move |m| sink.lock().unwrap().push(m));
    modes
}

#[tokio::test(start_paused = true)]
async fn disconnected_retries_fast_then_wifi_settles() {
    let (chan, mut peer) = validated(polling_config(ConnectionMethod::LocalSta)).await;
    let modes = recorded(&chan);
    let start = Instant::now();

    let first = next_poll(&mut peer).await;
    assert!(start.elapsed() >= Duration::from_millis(1000));
    answer(&chan, &first, "NetworkStatus.DISCONNECTED");

    let answered = Instant::now();
    let second = next_poll(&mut peer).await;
    assert_ne!(first, second);
    let gap = answered.elapsed();
    assert!(gap >= Duration::from_millis(500) && gap < Duration::from_millis(1000), "{gap:?}");

    answer(&chan, &second, "NetworkStatus.ON_WIFI_CONNECTED");

    // Settled: no further polls.
    assert!(timeout(Duration::from_secs(10), peer.recv()).await.is_err());
    assert_eq!(*modes.lock().unwrap(), vec![NetworkMode::StaL]);
    assert_eq!(chan.network_mode(), Some(NetworkMode::StaL));
}

#[tokio::test(start_paused = true)]
async fn remote_wifi_and_cellular_modes() {
    let (chan, mut peer) = validated(polling_config(ConnectionMethod::Remote)).await;
    let modes = recorded(&chan);

    let uuid = next_poll(&mut peer).await;
    answer(&chan, &uuid, "NetworkStatus.ON_WIFI_CONNECTED");
    assert!(timeout(Duration::from_secs(3), peer.recv()).await.is_err());
    assert_eq!(chan.network_mode(), Some(NetworkMode::StaT));

    chan.rearm_network_status().unwrap();
    let uuid = next_poll(&mut peer).await;
    answer(&chan, &uuid, "NetworkStatus.ON_4G_CONNECTED");
    assert!(timeout(Duration::from_secs(3), peer.recv()).await.is_err());

    assert_eq!(*modes.lock().unwrap(), vec![NetworkMode::StaT, NetworkMode::FourG]);
}

#[tokio::test(start_paused = true)]
async fn unknown_status_keeps_normal_interval() {
    let (chan, mut peer) = validated(polling_config(ConnectionMethod::LocalAp)).await;

    let uuid = next_poll(&mut peer).await;
    answer(&chan, &uuid, "NetworkStatus.SOMETHING_NEW");
    let answered = Instant::now();
    next_poll(&mut peer).await;
    assert!(answered.elapsed() >= Duration::from_millis(1000));
    assert_eq!(chan.network_mode(), None);
}

#[tokio::test(start_paused = true)]
async fn unanswered_poll_times_out_and_repolls() {
    let (chan, mut peer) = validated(polling_config(ConnectionMethod::LocalSta)).await;

    let first = next_poll(&mut peer).await;
    let sent = Instant::now();
    assert_eq!(chan.pending_requests(), 1);

    let second = next_poll(&mut peer).await;
    assert_ne!(first, second);
    assert!(sent.elapsed() >= Duration::from_millis(6000));
    // The timed-out key was dropped; only the fresh poll waits.
    assert_eq!(chan.pending_requests(), 1);

    // A late answer to the first poll matches nothing.
    answer(&chan, &first, "NetworkStatus.ON_WIFI_CONNECTED");
    assert_eq!(chan.network_mode(), None);
}

#[tokio::test(start_paused = true)]
async fn rearm_requires_validation() {
    let (chan, _peer) = validated(polling_config(ConnectionMethod::LocalSta)).await;
    chan.on_close();
    let err = chan.rearm_network_status().unwrap_err();
    assert_eq!(err.kind().as_str(), "TRANSPORT_NOT_OPEN");
}
