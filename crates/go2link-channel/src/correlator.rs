//! Pending request table.
//!
//! Every outbound `publish` registers a waiter under its correlation key before
//! the frame is queued. The first inbound message carrying the same key
//! completes every waiter registered under it and removes the entry. Waiters
//! never time out here: callers race the [`Completion`] against their own
//! timer and call [`Channel::cancel`](crate::Channel::cancel) on timeout.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::FutureExt;
use tokio::sync::oneshot;

use go2link_core::error::{Go2Error, Result};
use go2link_core::{CorrelationKey, Message};

type Waiter = oneshot::Sender<Result<Message>>;

/// Response future returned by every request-style operation.
///
/// Resolves with the matching inbound message, with the error that prevented
/// sending, or with `RequestCanceled` once its pending entry is dropped.
#[derive(Debug)]
pub struct Completion {
    key: Option<CorrelationKey>,
    rx: oneshot::Receiver<Result<Message>>,
}

impl Completion {
    pub(crate) fn pending(key: CorrelationKey) -> (Self, Waiter) {
        let (tx, rx) = oneshot::channel();
        (Self { key: Some(key), rx }, tx)
    }

    /// Already-failed completion; nothing was registered or sent.
    pub(crate) fn failed(err: Go2Error) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(err));
        Self { key: None, rx }
    }

    /// Key the response is matched on; `None` when the request never went out.
    pub fn key(&self) -> Option<&CorrelationKey> {
        self.key.as_ref()
    }
}

impl Future for Completion {
    type Output = Result<Message>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.rx.poll_unpin(cx) {
            Poll::Ready(Ok(res)) => Poll::Ready(res),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Go2Error::RequestCanceled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[derive(Debug, Default)]
pub struct PendingTable {
    waiters: HashMap<CorrelationKey, Vec<Waiter>>,
}

impl PendingTable {
    pub fn register(&mut self, key: CorrelationKey) -> Completion {
        let (completion, tx) = Completion::pending(key.clone());
        self.waiters.entry(key).or_default().push(tx);
        completion
    }

    /// Complete every waiter under `key` with `msg`. Returns how many were
    /// still listening.
    pub fn resolve(&mut self, key: &CorrelationKey, msg: &Message) -> usize {
        let Some(waiters) = self.waiters.remove(key) else {
            return 0;
        };
        waiters
            .into_iter()
            .filter_map(|tx| tx.send(Ok(msg.clone())).ok())
            .count()
    }

    /// Drop every waiter under `key`; they observe `RequestCanceled`.
    pub fn cancel(&mut self, key: &CorrelationKey) -> bool {
        self.waiters.remove(key).is_some()
    }

    /// Fail every waiter, e.g. when the transport closes.
    pub fn fail_all(&mut self, err: impl Fn() -> Go2Error) -> usize {
        let mut n = 0;
        for (_, waiters) in self.waiters.drain() {
            for tx in waiters {
                if tx.send(Err(err())).is_ok() {
                    n += 1;
                }
            }
        }
        n
    }

    pub fn contains(&self, key: &CorrelationKey) -> bool {
        self.waiters.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}
