//! Text envelope tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use go2link_core::protocol::{decode, encode, Frame, Message, MessageKind};

mod vector_loader;
use vector_loader::load_raw;

#[test]
fn parse_envelope_min() {
    let s = load_raw("envelope_min.json");
    let msg: Message = serde_json::from_str(&s).unwrap();
    assert_eq!(msg.kind, MessageKind::Validation);
    assert_eq!(msg.topic, "");
    assert_eq!(msg.data_str(), Some("q1w2e3r4"));
    assert!(msg.info.is_none());
}

#[test]
fn parse_envelope_full() {
    let s = load_raw("envelope_full.json");
    let decoded = decode(Frame::Text(s)).unwrap();
    let msg = decoded.message;
    assert_eq!(msg.kind, MessageKind::Response);
    assert_eq!(msg.topic, "rt/api/sport/request");
    assert_eq!(msg.data_at(&["header", "identity", "api_id"]).unwrap(), 1004);
    assert!(decoded.payload.is_none());
}

#[test]
fn parse_envelope_with_info() {
    let s = load_raw("envelope_inner_req.json");
    let msg: Message = serde_json::from_str(&s).unwrap();
    assert_eq!(msg.kind, MessageKind::RtcInnerReq);
    assert_eq!(
        msg.info_at(&["status"]).and_then(|v| v.as_str()),
        Some("NetworkStatus.ON_WIFI_CONNECTED")
    );
}

#[test]
fn every_kind_uses_its_wire_name() {
    let kinds = [
        (MessageKind::Validation, "validation"),
        (MessageKind::Subscribe, "subscribe"),
        (MessageKind::Unsubscribe, "unsubscribe"),
        (MessageKind::Msg, "msg"),
        (MessageKind::Request, "req"),
        (MessageKind::Response, "res"),
        (MessageKind::Video, "vid"),
        (MessageKind::Audio, "aud"),
        (MessageKind::Err, "err"),
        (MessageKind::Heartbeat, "heartbeat"),
        (MessageKind::RtcInnerReq, "rtc_inner_req"),
        (MessageKind::RtcReport, "rtc_report"),
        (MessageKind::AddError, "add_error"),
        (MessageKind::RemoveError, "rm_error"),
        (MessageKind::Errors, "errors"),
    ];
    for (kind, wire) in kinds {
        assert_eq!(serde_json::to_value(kind).unwrap(), wire);
        assert_eq!(kind.as_str(), wire);
    }
}

#[test]
fn encode_omits_absent_fields() {
    let Frame::Text(s) = encode(&Message::new(MessageKind::Subscribe, "rt/lf/lowstate")).unwrap() else {
        panic!("text frame expected");
    };
    let v: serde_json::Value = serde_json::from_str(&s).unwrap();
    assert_eq!(v, serde_json::json!({ "type": "subscribe", "topic": "rt/lf/lowstate" }));
}

#[test]
fn malformed_text_is_a_codec_error() {
    for bad in ["", "not json", r#"{"topic":"x"}"#, r#"{"type":"nope","topic":"x"}"#] {
        let err = decode(Frame::Text(bad.to_owned())).unwrap_err();
        assert_eq!(err.kind().as_str(), "CODEC", "input={bad:?}");
    }
}
