//! Heartbeat payload and liveness bookkeeping.
//!
//! The channel sends a `heartbeat` message every couple of seconds while open.
//! Response tracking is passive: nothing here decides that the link is dead,
//! callers inspect [`HeartbeatState::response_age`] and apply their own policy.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartbeatPayload {
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "timeInStr")]
    pub time_str: String,
    /// Unix seconds.
    #[serde(rename = "timeInNum")]
    pub time_num: i64,
}

impl HeartbeatPayload {
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    pub fn at(t: DateTime<Local>) -> Self {
        Self {
            time_str: t.format("%Y-%m-%d %H:%M:%S").to_string(),
            time_num: t.timestamp(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct HeartbeatState {
    last_sent: Option<Instant>,
    last_response: Option<Instant>,
    response_count: u64,
    new_response: bool,
}

impl HeartbeatState {
    pub fn record_sent(&mut self, now: Instant) {
        self.last_sent = Some(now);
    }

    pub fn record_response(&mut self, now: Instant) {
        self.last_response = Some(now);
        self.response_count += 1;
        self.new_response = true;
    }

    pub fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }

    pub fn last_response(&self) -> Option<Instant> {
        self.last_response
    }

    pub fn response_count(&self) -> u64 {
        self.response_count
    }

    /// Time since the last response, `None` before the first one.
    pub fn response_age(&self, now: Instant) -> Option<Duration> {
        self.last_response.map(|t| now.saturating_duration_since(t))
    }

    /// True once per response received since the previous call.
    pub fn take_new_response(&mut self) -> bool {
        std::mem::take(&mut self.new_response)
    }
}
