#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use go2link_core::handshake::{
    validation_response, validation_response_with, HandshakeAction, HandshakeState, HandshakeStatus,
    ResponseEncoding, VALIDATION_OK,
};
use go2link_core::{Message, MessageKind};

fn validation(data: serde_json::Value) -> Message {
    Message::new(MessageKind::Validation, "").with_data(data)
}

fn err_info(info: &str) -> Message {
    Message::new(MessageKind::Err, "").with_info(json!(info))
}

#[test]
fn answer_vectors() {
    assert_eq!(validation_response("abc"), "4abXPNYxcgdRuaRNpcKTtg==");
    assert_eq!(validation_response("q1w2e3r4"), "ZhpdT9XTukfQZCuaFDrrDQ==");
    assert_eq!(
        validation_response_with("abc", ResponseEncoding::HexText),
        "ZTFhNmQ3M2NkNjMxNzIwNzUxYjlhNDRkYTVjMjkzYjY="
    );
}

#[test]
fn nonce_then_ok_validates_once() {
    let mut hs = HandshakeState::default();
    assert_eq!(hs.status(), HandshakeStatus::Unvalidated);

    let action = hs.on_validation(&validation(json!("abc")));
    assert_eq!(action, HandshakeAction::Respond("4abXPNYxcgdRuaRNpcKTtg==".into()));
    assert_eq!(hs.server_nonce(), Some("abc"));
    assert!(!hs.is_validated());

    assert_eq!(hs.on_validation(&validation(json!(VALIDATION_OK))), HandshakeAction::Validated);
    assert!(hs.is_validated());

    // Repeated confirmations do not restart the background protocols.
    assert_eq!(hs.on_validation(&validation(json!(VALIDATION_OK))), HandshakeAction::Ignore);
}

#[test]
fn new_nonce_after_validation_resets() {
    let mut hs = HandshakeState::default();
    hs.on_validation(&validation(json!("abc")));
    hs.on_validation(&validation(json!(VALIDATION_OK)));

    let action = hs.on_validation(&validation(json!("q1w2e3r4")));
    assert_eq!(action, HandshakeAction::Respond("ZhpdT9XTukfQZCuaFDrrDQ==".into()));
    assert_eq!(hs.status(), HandshakeStatus::Unvalidated);
}

#[test]
fn empty_validation_is_ignored() {
    let mut hs = HandshakeState::default();
    assert_eq!(hs.on_validation(&Message::new(MessageKind::Validation, "")), HandshakeAction::Ignore);
    assert_eq!(hs.on_validation(&validation(json!(null))), HandshakeAction::Ignore);
    assert_eq!(hs.server_nonce(), None);
}

#[test]
fn validation_needed_resends_last_answer() {
    let mut hs = HandshakeState::new(ResponseEncoding::Digest);
    hs.on_validation(&validation(json!("abc")));

    let action = hs.on_error(&err_info("Validation Needed.")).unwrap();
    assert_eq!(action, HandshakeAction::Respond("4abXPNYxcgdRuaRNpcKTtg==".into()));

    // Also recognised when carried in data.
    let in_data = Message::new(MessageKind::Err, "").with_data(json!("Validation Needed."));
    assert!(matches!(hs.on_error(&in_data).unwrap(), HandshakeAction::Respond(_)));
}

#[test]
fn validation_needed_without_nonce_is_rejected() {
    let mut hs = HandshakeState::default();
    let err = hs.on_error(&err_info("Validation Needed.")).unwrap_err();
    assert_eq!(err.kind().as_str(), "HANDSHAKE_REJECTED");
}

#[test]
fn unrelated_errors_are_ignored() {
    let mut hs = HandshakeState::default();
    assert_eq!(hs.on_error(&err_info("Something else")).unwrap(), HandshakeAction::Ignore);
    assert_eq!(hs.on_error(&Message::new(MessageKind::Err, "")).unwrap(), HandshakeAction::Ignore);
}

#[test]
fn reset_forgets_nonce() {
    let mut hs = HandshakeState::default();
    hs.on_validation(&validation(json!("abc")));
    hs.on_validation(&validation(json!(VALIDATION_OK)));
    hs.reset();
    assert!(!hs.is_validated());
    assert_eq!(hs.server_nonce(), None);
}
