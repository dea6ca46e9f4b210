//! Network status normalization.
//!
//! The robot reports its uplink as `NetworkStatus.*` strings in response to a
//! `public_network_status` inner request. Polling continues until the uplink
//! is stable (4G or WiFi); the stable status is then normalized for the
//! application, taking into account how the client itself is connected.

use serde::Deserialize;
use serde_json::{json, Value};

pub const STATUS_REQ_TYPE: &str = "public_network_status";

/// How this client reaches the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMethod {
    /// Robot's own access point.
    LocalAp,
    /// Same LAN as the robot.
    #[default]
    LocalSta,
    /// Through the vendor relay.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkStatus {
    Undefined,
    Disconnected,
    FourG,
    Wifi,
    Other(String),
}

impl NetworkStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Undefined" => NetworkStatus::Undefined,
            "NetworkStatus.DISCONNECTED" => NetworkStatus::Disconnected,
            "NetworkStatus.ON_4G_CONNECTED" => NetworkStatus::FourG,
            "NetworkStatus.ON_WIFI_CONNECTED" => NetworkStatus::Wifi,
            other => NetworkStatus::Other(other.to_owned()),
        }
    }

    /// Status from a response's `info.status`; missing reads as `Undefined`.
    pub fn from_info(info: Option<&Value>) -> Self {
        info.and_then(|i| i.get("status"))
            .and_then(Value::as_str)
            .map(Self::parse)
            .unwrap_or(NetworkStatus::Undefined)
    }
}

/// Normalized, stable uplink mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    FourG,
    /// WiFi, client connected remotely.
    StaT,
    /// WiFi, client on the local network.
    StaL,
}

impl NetworkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkMode::FourG => "4G",
            NetworkMode::StaT => "STA-T",
            NetworkMode::StaL => "STA-L",
        }
    }
}

impl std::fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next step for the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Stable; stop polling and notify.
    Stable(NetworkMode),
    /// Disconnected/unknown; poll again at the fast retry interval.
    Retry,
    /// Poll again at the normal interval.
    Continue,
}

pub fn evaluate(status: &NetworkStatus, method: ConnectionMethod) -> PollDecision {
    match status {
        NetworkStatus::FourG => PollDecision::Stable(NetworkMode::FourG),
        NetworkStatus::Wifi => PollDecision::Stable(match method {
            ConnectionMethod::Remote => NetworkMode::StaT,
            ConnectionMethod::LocalAp | ConnectionMethod::LocalSta => NetworkMode::StaL,
        }),
        NetworkStatus::Undefined | NetworkStatus::Disconnected => PollDecision::Retry,
        NetworkStatus::Other(_) => PollDecision::Continue,
    }
}

/// `rtc_inner_req` data for one status poll.
pub fn status_request(uuid: &str) -> Value {
    json!({ "req_type": STATUS_REQ_TYPE, "uuid": uuid })
}
