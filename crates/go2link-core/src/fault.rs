//! Robot fault reports (`errors`, `add_error`, `rm_error`).
//!
//! `data` is a list of `[timestamp, source, code]` triples. Codes are looked
//! up by their upper-case hex rendering, e.g. source 300 code 16 -> `300_10`.

use chrono::{Local, TimeZone};
use serde_json::Value;

use crate::error::{Go2Error, Result};
use crate::protocol::message::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotFault {
    /// Unix seconds.
    pub timestamp: i64,
    pub source: u32,
    pub code: u32,
    pub source_text: String,
    pub code_text: String,
}

impl RobotFault {
    pub fn new(timestamp: i64, source: u32, code: u32) -> Self {
        let code_hex = format!("{code:X}");
        let source_text = source_text(source)
            .map(str::to_owned)
            .unwrap_or_else(|| source.to_string());
        let code_text = code_text(source, &code_hex)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{source}-{code_hex}"));
        Self {
            timestamp,
            source,
            code,
            source_text,
            code_text,
        }
    }

    /// Local time rendering, `YYYY-MM-DD HH:MM:SS`.
    pub fn time_str(&self) -> String {
        Local
            .timestamp_opt(self.timestamp, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

/// Decode every triple of a fault report message.
pub fn decode_faults(msg: &Message) -> Result<Vec<RobotFault>> {
    let Some(Value::Array(entries)) = &msg.data else {
        return Err(Go2Error::Decode("fault report data must be a list".into()));
    };

    entries
        .iter()
        .map(|entry| {
            let triple = entry
                .as_array()
                .filter(|t| t.len() == 3)
                .ok_or_else(|| Go2Error::Decode(format!("bad fault entry: {entry}")))?;
            let timestamp = triple[0]
                .as_f64()
                .ok_or_else(|| Go2Error::Decode("fault timestamp".into()))? as i64;
            let int = |v: &Value, what: &str| {
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| Go2Error::Decode(format!("fault {what}: {v}")))
            };
            Ok(RobotFault::new(
                timestamp,
                int(&triple[1], "source")?,
                int(&triple[2], "code")?,
            ))
        })
        .collect()
}

pub fn source_text(source: u32) -> Option<&'static str> {
    Some(match source {
        100 | 200 => "Communication firmware malfunction",
        300 => "Motor malfunction",
        400 => "Radar malfunction",
        500 => "UWB malfunction",
        600 => "Motion Control",
        _ => return None,
    })
}

pub fn code_text(source: u32, code_hex: &str) -> Option<&'static str> {
    Some(match (source, code_hex) {
        (100, "1") => "DDS message timeout",
        (100, "2") => "Distribution switch abnormal",
        (100, "10") => "Battery communication error",
        (100, "20") => "Abnormal mote control communication",
        (100, "40") => "MCU communication error",
        (100, "80") => "Motor communication error",
        (200, "1") => "Rear left fan jammed",
        (200, "2") => "Rear right fan jammed",
        (200, "4") => "Front fan jammed",
        (300, "1") => "Overcurrent",
        (300, "2") => "Overvoltage",
        (300, "4") => "Driver overheating",
        (300, "8") => "Generatrix undervoltage",
        (300, "10") => "Winding overheating",
        (300, "20") => "Encoder abnormal",
        (300, "100") => "Motor communication interruption",
        (400, "1") => "Motor rotate speed abnormal",
        (400, "2") => "PointCloud data abnormal",
        (400, "4") => "Serial port data abnormal",
        (400, "10") => "Abnormal dirt index",
        (500, "1") => "UWB serial port open abnormal",
        (500, "2") => "Robot dog information retrieval abnormal",
        (600, "4") => "Overheating software protection",
        (600, "8") => "Low battery software protection",
        _ => return None,
    })
}
