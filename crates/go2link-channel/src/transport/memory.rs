//! In-process transport. Outbound frames land on an unbounded queue read by a
//! [`MemoryPeer`], which lets tests and simulators script the robot side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use go2link_core::error::{Go2Error, Result};
use go2link_core::protocol::{self, Frame, Message};

use super::DataChannelTransport;

#[derive(Debug)]
pub struct MemoryTransport {
    tx: mpsc::UnboundedSender<Frame>,
    closed: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct MemoryPeer {
    rx: mpsc::UnboundedReceiver<Frame>,
    closed: Arc<AtomicBool>,
}

impl MemoryTransport {
    pub fn pair() -> (Self, MemoryPeer) {
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        (
            Self {
                tx,
                closed: Arc::clone(&closed),
            },
            MemoryPeer { rx, closed },
        )
    }
}

#[async_trait]
impl DataChannelTransport for MemoryTransport {
    async fn send(&self, frame: Frame) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Go2Error::TransportNotOpen);
        }
        self.tx.send(frame).map_err(|_| Go2Error::TransportNotOpen)
    }
}

impl MemoryPeer {
    /// Next frame the client sent.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.rx.recv().await
    }

    /// Next frame the client sent, decoded.
    pub async fn recv_message(&mut self) -> Option<Result<Message>> {
        let frame = self.rx.recv().await?;
        Some(protocol::decode(frame).map(|d| d.message))
    }

    pub fn try_recv(&mut self) -> Option<Frame> {
        self.rx.try_recv().ok()
    }

    /// Make every further send fail with `TransportNotOpen`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
