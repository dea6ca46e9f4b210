//! Request envelope carried inside `req`/`res` data.
//!
//! ```json
//! {"header": {"identity": {"id": 1, "api_id": 1004}, "policy": {"priority": 1}},
//!  "parameter": "<json-string-or-raw-string>"}
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Go2Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub api_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub identity: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Policy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub header: RequestHeader,
    #[serde(default)]
    pub parameter: String,
}

/// Request parameter: strings are sent verbatim, JSON values stringified.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Parameter {
    #[default]
    Empty,
    Text(String),
    Json(Value),
}

impl Parameter {
    fn into_wire(self) -> Result<String> {
        match self {
            Parameter::Empty => Ok(String::new()),
            Parameter::Text(s) => Ok(s),
            Parameter::Json(Value::String(s)) => Ok(s),
            Parameter::Json(v) => Ok(serde_json::to_string(&v)?),
        }
    }
}

impl From<&str> for Parameter {
    fn from(s: &str) -> Self {
        Parameter::Text(s.to_owned())
    }
}

impl From<String> for Parameter {
    fn from(s: String) -> Self {
        Parameter::Text(s)
    }
}

impl From<Value> for Parameter {
    fn from(v: Value) -> Self {
        Parameter::Json(v)
    }
}

/// Caller-side request description.
///
/// `api_id` is mandatory; it is an `Option` only so a missing id is reported
/// as [`Go2Error::MissingApiId`] instead of being defaulted.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub api_id: Option<i32>,
    pub id: Option<i64>,
    pub parameter: Parameter,
    pub priority: bool,
}

impl RequestOptions {
    pub fn api(api_id: i32) -> Self {
        Self {
            api_id: Some(api_id),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn parameter(mut self, parameter: impl Into<Parameter>) -> Self {
        self.parameter = parameter.into();
        self
    }

    pub fn priority(mut self) -> Self {
        self.priority = true;
        self
    }

    /// Build the envelope, generating an id when none was supplied.
    pub fn into_envelope(self) -> Result<RequestEnvelope> {
        let api_id = self.api_id.ok_or(Go2Error::MissingApiId)?;
        Ok(RequestEnvelope {
            header: RequestHeader {
                identity: Identity {
                    id: self.id.unwrap_or_else(generate_request_id),
                    api_id,
                },
                policy: self.priority.then_some(Policy { priority: 1 }),
            },
            parameter: self.parameter.into_wire()?,
        })
    }
}

/// `(now_ms mod 2^31) + random(0..=1000)`.
pub fn generate_request_id() -> i64 {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let base = (now_ms % (1u128 << 31)) as i64;
    base + rand::thread_rng().gen_range(0..=1000)
}
