//! Closed set of envelope `type` strings.

use serde::{Deserialize, Serialize};

/// Envelope type (field name is `type` in JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "validation")]
    Validation,
    #[serde(rename = "subscribe")]
    Subscribe,
    #[serde(rename = "unsubscribe")]
    Unsubscribe,
    #[serde(rename = "msg")]
    Msg,
    #[serde(rename = "req")]
    Request,
    #[serde(rename = "res")]
    Response,
    #[serde(rename = "vid")]
    Video,
    #[serde(rename = "aud")]
    Audio,
    #[serde(rename = "err")]
    Err,
    #[serde(rename = "heartbeat")]
    Heartbeat,
    #[serde(rename = "rtc_inner_req")]
    RtcInnerReq,
    #[serde(rename = "rtc_report")]
    RtcReport,
    #[serde(rename = "add_error")]
    AddError,
    #[serde(rename = "rm_error")]
    RemoveError,
    #[serde(rename = "errors")]
    Errors,
}

impl MessageKind {
    /// Wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Validation => "validation",
            MessageKind::Subscribe => "subscribe",
            MessageKind::Unsubscribe => "unsubscribe",
            MessageKind::Msg => "msg",
            MessageKind::Request => "req",
            MessageKind::Response => "res",
            MessageKind::Video => "vid",
            MessageKind::Audio => "aud",
            MessageKind::Err => "err",
            MessageKind::Heartbeat => "heartbeat",
            MessageKind::RtcInnerReq => "rtc_inner_req",
            MessageKind::RtcReport => "rtc_report",
            MessageKind::AddError => "add_error",
            MessageKind::RemoveError => "rm_error",
            MessageKind::Errors => "errors",
        }
    }

    /// Fault report kinds (`errors`, `add_error`, `rm_error`).
    pub fn is_fault_report(self) -> bool {
        matches!(
            self,
            MessageKind::Errors | MessageKind::AddError | MessageKind::RemoveError
        )
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
