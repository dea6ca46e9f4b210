//! Validation handshake.
//!
//! The robot opens with a `validation` message carrying a nonce. The client
//! answers `base64(md5("UnitreeGo2_" + nonce))` as a new `validation` message
//! and the robot confirms with the literal `"Validation Ok."`. Until then no
//! application traffic is valid. There is no terminal failure state: the robot
//! may re-issue a nonce or ask for the answer again (`"Validation Needed."`).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use md5::{Digest, Md5};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Go2Error, Result};
use crate::protocol::message::Message;

pub const VALIDATION_OK: &str = "Validation Ok.";
pub const VALIDATION_NEEDED: &str = "Validation Needed";
pub const KEY_PREFIX: &str = "UnitreeGo2_";

/// How the MD5 digest is turned into the base64 answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseEncoding {
    /// base64 of the 16 digest bytes (the hex digest decoded back to bytes).
    /// This is what deployed firmware accepts.
    #[default]
    Digest,
    /// base64 of the 32-character lowercase hex digest string.
    HexText,
}

/// Answer for `nonce` with the default encoding.
pub fn validation_response(nonce: &str) -> String {
    validation_response_with(nonce, ResponseEncoding::Digest)
}

pub fn validation_response_with(nonce: &str, encoding: ResponseEncoding) -> String {
    let digest = Md5::digest(format!("{KEY_PREFIX}{nonce}").as_bytes());
    match encoding {
        ResponseEncoding::Digest => STANDARD.encode(digest),
        ResponseEncoding::HexText => STANDARD.encode(hex::encode(digest)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStatus {
    Unvalidated,
    Validated,
}

/// What the channel must do after feeding a message to the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeAction {
    /// Channel just became validated: start the background protocols.
    Validated,
    /// Send this answer as a `validation` message.
    Respond(String),
    /// Nothing to do.
    Ignore,
}

#[derive(Debug, Default)]
pub struct HandshakeState {
    server_nonce: Option<String>,
    validated: bool,
    encoding: ResponseEncoding,
}

impl HandshakeState {
    pub fn new(encoding: ResponseEncoding) -> Self {
        Self {
            server_nonce: None,
            validated: false,
            encoding,
        }
    }

    pub fn status(&self) -> HandshakeStatus {
        if self.validated {
            HandshakeStatus::Validated
        } else {
            HandshakeStatus::Unvalidated
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn server_nonce(&self) -> Option<&str> {
        self.server_nonce.as_deref()
    }

    /// Feed a `validation` message.
    pub fn on_validation(&mut self, msg: &Message) -> HandshakeAction {
        let nonce = match &msg.data {
            Some(Value::String(s)) if s == VALIDATION_OK => {
                if self.validated {
                    return HandshakeAction::Ignore;
                }
                self.validated = true;
                return HandshakeAction::Validated;
            }
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => return HandshakeAction::Ignore,
            Some(other) => other.to_string(),
        };

        // A fresh nonce after validation means the robot reset its session.
        self.validated = false;
        let answer = validation_response_with(&nonce, self.encoding);
        self.server_nonce = Some(nonce);
        HandshakeAction::Respond(answer)
    }

    /// Feed an `err` message. A "Validation Needed" error re-sends the answer
    /// to the last nonce; without one the robot has to issue a new nonce.
    pub fn on_error(&mut self, msg: &Message) -> Result<HandshakeAction> {
        let needed = [msg.info_str(), msg.data_str()]
            .into_iter()
            .flatten()
            .any(|s| s.starts_with(VALIDATION_NEEDED));
        if !needed {
            return Ok(HandshakeAction::Ignore);
        }

        self.validated = false;
        match &self.server_nonce {
            Some(nonce) => Ok(HandshakeAction::Respond(validation_response_with(
                nonce,
                self.encoding,
            ))),
            None => Err(Go2Error::HandshakeRejected),
        }
    }

    /// Forget everything (new connection).
    pub fn reset(&mut self) {
        self.server_nonce = None;
        self.validated = false;
    }
}
