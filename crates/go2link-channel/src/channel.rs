//! Channel facade.
//!
//! Responsibilities:
//! - Own the outbound queue and the writer task feeding the transport
//! - Decode-once, then gate inbound traffic on the validation handshake
//! - Reassemble chunked responses, resolve pending requests, invoke topic
//!   subscriptions, then run the per-kind protocol handlers
//! - Start the heartbeat and network-status tasks once validated and cancel
//!   them as a unit on close, re-validation, or drop
//!
//! Inbound frames must be fed sequentially ([`Channel::handle_frame`] or
//! [`Channel::run`]); chunk and correlation state depend on arrival order.
//! Outbound calls may come from any number of tasks.
//!
//! The pending, chunk, and subscription tables live behind one lock that is
//! never held while user callbacks run or across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::{Duration, Instant};

use futures_util::{Stream, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use go2link_core::chunk::{bytes_value, value_bytes, ChunkInfo, ChunkReassembler};
use go2link_core::error::{Go2Error, Result};
use go2link_core::fault::{decode_faults, RobotFault};
use go2link_core::handshake::{HandshakeAction, HandshakeState};
use go2link_core::heartbeat::{HeartbeatPayload, HeartbeatState};
use go2link_core::netstatus::NetworkMode;
use go2link_core::protocol::request::RequestOptions;
use go2link_core::protocol::{self, Frame, Message, MessageKind};
use go2link_core::voxel::{NativeVoxelDecoder, VoxelDecoder};
use go2link_core::CorrelationKey;

use crate::config::ChannelConfig;
use crate::correlator::{Completion, PendingTable};
use crate::files::FILE_DOWNLOAD_REQ_TYPE;
use crate::router::{Subscriptions, TopicHandler};
use crate::tasks;
use crate::transport::{codec, DataChannelTransport};

pub const RTT_PROBE_REQ_TYPE: &str = "rtt_probe_send_from_mechine";
pub const TRAFFIC_SAVING_REQ_TYPE: &str = "disable_traffic_saving";

/// Lifecycle of the data channel as seen by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, transport not open yet.
    Connecting,
    /// Transport open, handshake pending. Only handshake traffic flows.
    Open,
    /// Handshake done; application traffic allowed.
    Validated,
    Closed,
}

type ValidateHook = Arc<dyn Fn() + Send + Sync>;
type NetworkHook = Arc<dyn Fn(NetworkMode) + Send + Sync>;
type FaultHook = Arc<dyn Fn(&RobotFault) + Send + Sync>;

#[derive(Default)]
struct Hooks {
    validate: Vec<ValidateHook>,
    network: Vec<NetworkHook>,
    fault: Vec<FaultHook>,
}

struct Tables {
    pending: PendingTable,
    chunks: ChunkReassembler<CorrelationKey>,
    file_chunks: ChunkReassembler<CorrelationKey>,
    subscriptions: Subscriptions,
    handshake: HandshakeState,
    heartbeat: HeartbeatState,
    network_mode: Option<NetworkMode>,
    hooks: Hooks,
}

#[derive(Default)]
struct Tasks {
    heartbeat: Option<JoinHandle<()>>,
    network: Option<JoinHandle<()>>,
}

impl Tasks {
    fn abort_network(&mut self) {
        if let Some(h) = self.network.take() {
            h.abort();
        }
    }

    fn abort_all(&mut self) {
        if let Some(h) = self.heartbeat.take() {
            h.abort();
        }
        self.abort_network();
    }
}

pub(crate) struct Inner {
    cfg: ChannelConfig,
    out_tx: mpsc::Sender<Frame>,
    state_tx: watch::Sender<ConnectionState>,
    tables: Mutex<Tables>,
    decoder: RwLock<Arc<dyn VoxelDecoder>>,
    tasks: Mutex<Tasks>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.tasks
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn queue_error<T>(e: TrySendError<T>) -> Go2Error {
    match e {
        TrySendError::Full(_) => Go2Error::OutboundFull,
        TrySendError::Closed(_) => Go2Error::TransportNotOpen,
    }
}

/// Handle to one data channel. Cheap to clone; background tasks stop once the
/// last handle is dropped.
#[derive(Clone)]
pub struct Channel {
    inner: Arc<Inner>,
}

impl Channel {
    /// Build a channel over `transport` and spawn its writer task. Must be
    /// called inside a tokio runtime.
    pub fn new(cfg: ChannelConfig, transport: Arc<dyn DataChannelTransport>) -> Result<Self> {
        cfg.validate()?;

        let (out_tx, out_rx) = mpsc::channel(cfg.channel.outbound_queue);
        let (state_tx, _) = watch::channel(ConnectionState::Connecting);
        let limits = cfg.chunk_limits();

        let tables = Tables {
            pending: PendingTable::default(),
            chunks: ChunkReassembler::new(limits),
            file_chunks: ChunkReassembler::new(limits),
            subscriptions: Subscriptions::default(),
            handshake: HandshakeState::new(cfg.channel.validation_encoding),
            heartbeat: HeartbeatState::default(),
            network_mode: None,
            hooks: Hooks::default(),
        };

        tokio::spawn(write_loop(transport, out_rx));

        Ok(Self {
            inner: Arc::new(Inner {
                cfg,
                out_tx,
                state_tx,
                tables: Mutex::new(tables),
                decoder: RwLock::new(Arc::new(NativeVoxelDecoder)),
                tasks: Mutex::new(Tasks::default()),
            }),
        })
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.inner.cfg
    }

    // --------------------
    // Connection state
    // --------------------

    pub fn state(&self) -> ConnectionState {
        *self.inner.state_tx.borrow()
    }

    pub fn is_validated(&self) -> bool {
        self.state() == ConnectionState::Validated
    }

    /// Receiver observing every state transition.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// Wait until the handshake completes. Fails with `TransportNotOpen` on
    /// timeout.
    pub async fn wait_validated(&self, timeout: Duration) -> Result<()> {
        let mut rx = self.inner.state_tx.subscribe();
        // The borrow guard returned by `wait_for` must not outlive `rx`.
        let validated = async { rx.wait_for(|s| *s == ConnectionState::Validated).await.map(|_| ()) };
        let res = tokio::time::timeout(timeout, validated).await;
        match res {
            Ok(Ok(())) => Ok(()),
            _ => Err(Go2Error::TransportNotOpen),
        }
    }

    fn set_state(&self, next: ConnectionState) {
        let prev = self.inner.state_tx.send_replace(next);
        if prev != next {
            tracing::debug!(from = ?prev, to = ?next, "connection state");
        }
    }

    fn require_open(&self) -> Result<()> {
        match self.state() {
            ConnectionState::Open | ConnectionState::Validated => Ok(()),
            ConnectionState::Connecting | ConnectionState::Closed => Err(Go2Error::TransportNotOpen),
        }
    }

    pub(crate) fn require_validated(&self) -> Result<()> {
        if self.is_validated() {
            Ok(())
        } else {
            Err(Go2Error::TransportNotOpen)
        }
    }

    // --------------------
    // Transport events
    // --------------------

    /// The underlying data channel opened. Handshake starts from scratch.
    pub fn on_open(&self) {
        {
            let mut t = lock(&self.inner.tables);
            t.handshake.reset();
            t.heartbeat = HeartbeatState::default();
            t.network_mode = None;
        }
        self.set_state(ConnectionState::Open);
        tracing::info!("data channel open, awaiting validation");
    }

    /// The underlying data channel closed: stop background tasks, fail every
    /// pending request with `TransportNotOpen`, drop partial assemblies.
    pub fn on_close(&self) {
        self.stop_background();
        let failed = {
            let mut t = lock(&self.inner.tables);
            t.chunks.clear();
            t.file_chunks.clear();
            t.handshake.reset();
            t.pending.fail_all(|| Go2Error::TransportNotOpen)
        };
        self.set_state(ConnectionState::Closed);
        tracing::info!(failed_requests = failed, "data channel closed");
    }

    /// Feed inbound frames until the stream ends, then close. Frame-level
    /// errors are logged and the frame dropped.
    pub async fn run<S>(&self, inbound: S)
    where
        S: Stream<Item = Frame>,
    {
        futures_util::pin_mut!(inbound);
        while let Some(frame) = inbound.next().await {
            if let Err(e) = self.handle_frame(frame) {
                tracing::warn!(code = e.kind().as_str(), error = %e, "inbound frame dropped");
            }
        }
        self.on_close();
    }

    /// Process one inbound frame.
    ///
    /// An `Err` is scoped to this frame (malformed frame, chunk violation,
    /// payload decode failure); the channel stays usable.
    pub fn handle_frame(&self, frame: Frame) -> Result<()> {
        match self.state() {
            ConnectionState::Closed => {
                tracing::debug!(len = frame.len(), "frame after close ignored");
                return Ok(());
            }
            // A frame proves the transport is open even if nobody said so.
            ConnectionState::Connecting => self.on_open(),
            ConnectionState::Open | ConnectionState::Validated => {}
        }

        let decoder = self.decoder();
        let inbound = codec::decode(frame, decoder.as_ref(), self.inner.cfg.channel.max_voxel_bytes)?;
        let mut msg = inbound.message;
        tracing::debug!(kind = %msg.kind, topic = %msg.topic, len = inbound.bytes_len, "frame received");

        if !self.is_validated() && !matches!(msg.kind, MessageKind::Validation | MessageKind::Err) {
            tracing::debug!(kind = %msg.kind, topic = %msg.topic, "dropped before validation");
            return Ok(());
        }

        if !self.reassemble(&mut msg)? {
            return Ok(());
        }

        let key = CorrelationKey::for_inbound(&msg);
        let (resolved, handler) = {
            let mut t = lock(&self.inner.tables);
            (t.pending.resolve(&key, &msg), t.subscriptions.get(&msg.topic))
        };
        if resolved > 0 {
            tracing::debug!(%key, waiters = resolved, "request resolved");
        }
        if let Some(handler) = handler {
            handler.handle(&msg);
        }

        self.handle_kind(&msg)
    }

    /// Run chunked messages through the matching reassembler. `Ok(false)`
    /// while parts are outstanding; on the final part the concatenated body
    /// replaces the chunk body in `msg`.
    fn reassemble(&self, msg: &mut Message) -> Result<bool> {
        let file = msg.kind == MessageKind::RtcInnerReq
            && msg.info_at(&["req_type"]).and_then(Value::as_str) == Some(FILE_DOWNLOAD_REQ_TYPE);
        let info = if file {
            ChunkInfo::from_file_info(msg)
        } else {
            ChunkInfo::from_content_info(msg)
        };
        let Some(info) = info else {
            return Ok(true);
        };

        let key = CorrelationKey::for_inbound(msg);
        let body = if file {
            value_bytes(msg.info_at(&["file", "data"]))
        } else {
            value_bytes(msg.data_at(&["data"]))
        };

        let done = {
            let mut t = lock(&self.inner.tables);
            let table = if file { &mut t.file_chunks } else { &mut t.chunks };
            table.feed(key.clone(), info.chunk_index, info.total_chunk_num, body)?
        };

        let Some(bytes) = done else {
            tracing::debug!(%key, index = ?info.chunk_index, total = info.total_chunk_num, "chunk buffered");
            return Ok(false);
        };
        tracing::debug!(%key, len = bytes.len(), "chunked payload reassembled");

        let target = if file {
            msg.info.as_mut().and_then(|i| i.get_mut("file"))
        } else {
            msg.data.as_mut()
        };
        if let Some(Value::Object(obj)) = target {
            obj.insert("data".into(), bytes_value(&bytes));
        }
        Ok(true)
    }

    fn handle_kind(&self, msg: &Message) -> Result<()> {
        match msg.kind {
            MessageKind::Validation => {
                let action = lock(&self.inner.tables).handshake.on_validation(msg);
                self.apply_handshake(action);
            }
            MessageKind::Err => {
                let action = lock(&self.inner.tables).handshake.on_error(msg);
                match action {
                    Ok(HandshakeAction::Ignore) => {
                        tracing::debug!(info = ?msg.info, data = ?msg.data, "robot reported an error");
                    }
                    Ok(action) => self.apply_handshake(action),
                    Err(e) => tracing::warn!(error = %e, "validation requested before any challenge"),
                }
            }
            MessageKind::Heartbeat => {
                lock(&self.inner.tables).heartbeat.record_response(Instant::now());
                tracing::trace!("heartbeat response");
            }
            MessageKind::RtcInnerReq => self.handle_inner_req(msg),
            MessageKind::Errors | MessageKind::AddError | MessageKind::RemoveError => {
                self.handle_faults(msg)?;
            }
            MessageKind::Subscribe
            | MessageKind::Unsubscribe
            | MessageKind::Msg
            | MessageKind::Request
            | MessageKind::Response
            | MessageKind::Video
            | MessageKind::Audio
            | MessageKind::RtcReport => {}
        }
        Ok(())
    }

    fn apply_handshake(&self, action: HandshakeAction) {
        match action {
            HandshakeAction::Validated => {
                self.set_state(ConnectionState::Validated);
                tracing::info!("data channel validated");
                self.start_background();
                let hooks = lock(&self.inner.tables).hooks.validate.clone();
                for hook in hooks {
                    hook();
                }
            }
            HandshakeAction::Respond(answer) => {
                if self.is_validated() {
                    self.stop_background();
                    self.set_state(ConnectionState::Open);
                    tracing::info!("robot restarted validation");
                }
                let reply = Message::new(MessageKind::Validation, "").with_data(Value::String(answer));
                match self.send_control(&reply) {
                    Ok(()) => tracing::debug!("validation answer sent"),
                    Err(e) => tracing::warn!(error = %e, "validation answer not sent"),
                }
            }
            HandshakeAction::Ignore => {}
        }
    }

    fn handle_inner_req(&self, msg: &Message) {
        let Some(info) = &msg.info else {
            return;
        };
        if info.get("req_type").and_then(Value::as_str) != Some(RTT_PROBE_REQ_TYPE) {
            return;
        }
        let echo = Message::new(MessageKind::RtcInnerReq, "").with_data(info.clone());
        if let Err(e) = self.send_control(&echo) {
            tracing::warn!(error = %e, "rtt probe echo not sent");
        }
    }

    fn handle_faults(&self, msg: &Message) -> Result<()> {
        let faults = decode_faults(msg)?;
        let hooks = lock(&self.inner.tables).hooks.fault.clone();
        for fault in &faults {
            if msg.kind == MessageKind::RemoveError {
                tracing::info!(source = %fault.source_text, code = %fault.code_text, "robot fault cleared");
            } else {
                tracing::warn!(
                    time = %fault.time_str(),
                    source = %fault.source_text,
                    code = %fault.code_text,
                    "robot fault"
                );
            }
            for hook in &hooks {
                hook(fault);
            }
        }
        Ok(())
    }

    // --------------------
    // Outbound
    // --------------------

    fn enqueue(&self, msg: &Message) -> Result<()> {
        let frame = protocol::encode(msg)?;
        self.inner.out_tx.try_send(frame).map_err(queue_error)?;
        tracing::debug!(kind = %msg.kind, topic = %msg.topic, "message queued");
        Ok(())
    }

    /// Protocol traffic that must flow before validation.
    fn send_control(&self, msg: &Message) -> Result<()> {
        self.require_open()?;
        self.enqueue(msg)
    }

    /// Queue `msg`, waiting for queue space instead of failing when full.
    pub(crate) async fn send_waiting(&self, msg: &Message) -> Result<()> {
        self.require_validated()?;
        let frame = protocol::encode(msg)?;
        self.inner
            .out_tx
            .send(frame)
            .await
            .map_err(|_| Go2Error::TransportNotOpen)?;
        tracing::debug!(kind = %msg.kind, topic = %msg.topic, "message queued");
        Ok(())
    }

    /// Send a message and return a completion for the response matched on the
    /// key derived from `data` (`uuid`, `header.identity.id`, `req_uuid`, or
    /// the `(kind, topic)` fallback).
    ///
    /// The waiter is registered before the frame is queued, so a response
    /// cannot outrun it. Without an explicit id, concurrent publishes on the
    /// same kind and topic all resolve with the first matching response.
    pub fn publish(&self, topic: &str, data: Option<Value>, kind: MessageKind) -> Completion {
        if let Err(e) = self.require_validated() {
            return Completion::failed(e);
        }

        let key = CorrelationKey::for_outbound(kind, topic, data.as_ref());
        let msg = Message {
            data,
            ..Message::new(kind, topic)
        };
        let frame = match protocol::encode(&msg) {
            Ok(f) => f,
            Err(e) => return Completion::failed(e),
        };
        let permit = match self.inner.out_tx.try_reserve() {
            Ok(p) => p,
            Err(e) => return Completion::failed(queue_error(e)),
        };

        let completion = lock(&self.inner.tables).pending.register(key.clone());
        permit.send(frame);
        tracing::debug!(kind = %kind, topic, %key, "request queued");
        completion
    }

    /// Fire-and-forget send.
    pub fn publish_no_reply(&self, topic: &str, data: Option<Value>, kind: MessageKind) -> Result<()> {
        self.require_validated()?;
        let msg = Message {
            data,
            ..Message::new(kind, topic)
        };
        self.enqueue(&msg)
    }

    /// Send a `req` built from `options`. Fails immediately, without sending,
    /// when `options` has no api id.
    pub fn send_request(&self, topic: &str, options: RequestOptions) -> Completion {
        let envelope = match options.into_envelope() {
            Ok(env) => env,
            Err(e) => return Completion::failed(e),
        };
        match serde_json::to_value(&envelope) {
            Ok(data) => self.publish(topic, Some(data), MessageKind::Request),
            Err(e) => Completion::failed(e.into()),
        }
    }

    pub async fn request(&self, topic: &str, options: RequestOptions) -> Result<Message> {
        self.send_request(topic, options).await
    }

    /// Drop the pending entry for `key`. Its waiters observe `RequestCanceled`.
    pub fn cancel(&self, key: &CorrelationKey) -> bool {
        let removed = lock(&self.inner.tables).pending.cancel(key);
        if removed {
            tracing::debug!(%key, "pending request canceled");
        }
        removed
    }

    /// Number of keys with waiters.
    pub fn pending_requests(&self) -> usize {
        lock(&self.inner.tables).pending.len()
    }

    /// Subscribe to `topic`, replacing any handler already registered for it.
    pub fn subscribe<H>(&self, topic: &str, handler: H) -> Result<()>
    where
        H: TopicHandler + 'static,
    {
        self.require_validated()?;
        let replaced = lock(&self.inner.tables)
            .subscriptions
            .insert(topic, Arc::new(handler));
        if replaced.is_some() {
            tracing::debug!(topic, "subscription handler replaced");
        }
        self.enqueue(&Message::new(MessageKind::Subscribe, topic))
    }

    pub fn unsubscribe(&self, topic: &str) -> Result<()> {
        self.require_validated()?;
        lock(&self.inner.tables).subscriptions.remove(topic);
        self.enqueue(&Message::new(MessageKind::Unsubscribe, topic))
    }

    pub fn switch_video(&self, on: bool) -> Result<()> {
        self.publish_no_reply("", Some(json!(if on { "on" } else { "off" })), MessageKind::Video)?;
        tracing::debug!(on, "video channel switched");
        Ok(())
    }

    pub fn switch_audio(&self, on: bool) -> Result<()> {
        self.publish_no_reply("", Some(json!(if on { "on" } else { "off" })), MessageKind::Audio)?;
        tracing::debug!(on, "audio channel switched");
        Ok(())
    }

    /// Ask the robot to turn traffic saving off (`true`) or back on. Returns
    /// whether the robot acknowledged with `execution: "ok"`.
    pub async fn disable_traffic_saving(&self, on: bool) -> Result<bool> {
        let data = json!({
            "req_type": TRAFFIC_SAVING_REQ_TYPE,
            "instruction": if on { "on" } else { "off" },
        });
        let res = self.publish("", Some(data), MessageKind::RtcInnerReq).await?;
        let ok = res.info_at(&["execution"]).and_then(Value::as_str) == Some("ok");
        if ok {
            tracing::debug!(on, "traffic saving switched");
        } else {
            tracing::warn!(info = ?res.info, "traffic saving switch refused");
        }
        Ok(ok)
    }

    // --------------------
    // Decoder
    // --------------------

    pub fn set_decoder(&self, decoder: Arc<dyn VoxelDecoder>) {
        tracing::debug!(decoder = decoder.name(), "voxel decoder set");
        *self.inner.decoder.write().unwrap_or_else(PoisonError::into_inner) = decoder;
    }

    pub fn decoder_name(&self) -> &'static str {
        self.decoder().name()
    }

    fn decoder(&self) -> Arc<dyn VoxelDecoder> {
        Arc::clone(&self.inner.decoder.read().unwrap_or_else(PoisonError::into_inner))
    }

    // --------------------
    // Callbacks
    // --------------------

    /// Called each time the handshake completes.
    pub fn on_validate(&self, hook: impl Fn() + Send + Sync + 'static) {
        lock(&self.inner.tables).hooks.validate.push(Arc::new(hook));
    }

    /// Called with the normalized uplink mode once polling settles.
    pub fn on_network_status(&self, hook: impl Fn(NetworkMode) + Send + Sync + 'static) {
        lock(&self.inner.tables).hooks.network.push(Arc::new(hook));
    }

    /// Called for every entry of a robot fault report.
    pub fn on_fault(&self, hook: impl Fn(&RobotFault) + Send + Sync + 'static) {
        lock(&self.inner.tables).hooks.fault.push(Arc::new(hook));
    }

    // --------------------
    // Background protocols
    // --------------------

    fn start_background(&self) {
        let cfg = &self.inner.cfg.channel;
        let mut running = lock(&self.inner.tasks);
        running.abort_all();
        running.heartbeat = Some(tokio::spawn(tasks::heartbeat::run(
            self.downgrade(),
            cfg.heartbeat_interval(),
        )));
        running.network = Some(tokio::spawn(tasks::network_status::run(
            self.downgrade(),
            cfg.clone(),
        )));
    }

    fn stop_background(&self) {
        lock(&self.inner.tasks).abort_all();
    }

    /// Restart network-status polling after it settled.
    pub fn rearm_network_status(&self) -> Result<()> {
        self.require_validated()?;
        let mut running = lock(&self.inner.tasks);
        running.abort_network();
        running.network = Some(tokio::spawn(tasks::network_status::run(
            self.downgrade(),
            self.inner.cfg.channel.clone(),
        )));
        Ok(())
    }

    pub(crate) fn send_heartbeat(&self) -> Result<()> {
        self.require_open()?;
        let data = serde_json::to_value(HeartbeatPayload::now())?;
        self.enqueue(&Message::new(MessageKind::Heartbeat, "").with_data(data))?;
        lock(&self.inner.tables).heartbeat.record_sent(Instant::now());
        Ok(())
    }

    pub(crate) fn set_network_mode(&self, mode: NetworkMode) {
        let hooks = {
            let mut t = lock(&self.inner.tables);
            t.network_mode = Some(mode);
            t.hooks.network.clone()
        };
        tracing::info!(%mode, "robot network mode");
        for hook in hooks {
            hook(mode);
        }
    }

    pub fn network_mode(&self) -> Option<NetworkMode> {
        lock(&self.inner.tables).network_mode
    }

    /// Snapshot of heartbeat bookkeeping.
    pub fn heartbeat_state(&self) -> HeartbeatState {
        lock(&self.inner.tables).heartbeat.clone()
    }

    /// True once per heartbeat response received since the previous call.
    pub fn take_new_heartbeat_response(&self) -> bool {
        lock(&self.inner.tables).heartbeat.take_new_response()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("state", &self.state())
            .field("decoder", &self.decoder_name())
            .finish()
    }
}

async fn write_loop(transport: Arc<dyn DataChannelTransport>, mut out_rx: mpsc::Receiver<Frame>) {
    while let Some(frame) = out_rx.recv().await {
        let len = frame.len();
        if let Err(e) = transport.send(frame).await {
            tracing::warn!(len, error = %e, "data channel send failed");
        }
    }
    tracing::debug!("outbound writer stopped");
}
