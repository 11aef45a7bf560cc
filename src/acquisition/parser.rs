//! JSON line parser for the sensor sketch output.
//!
//! The sketch prints one object per line:
//! `{"LDR_Analog": 512, "LDR_Digital": 1, "pH": 6.85}`
//! `LDR_Digital` is optional. Snake-case keys are accepted too.

use serde::Deserialize;

use crate::error::PipelineError;
use crate::types::Reading;

/// Wire schema for one line of sketch output.
#[derive(Debug, Deserialize)]
struct WireReading {
    #[serde(rename = "LDR_Analog", alias = "ldr_analog")]
    ldr_analog: f64,
    #[serde(rename = "LDR_Digital", alias = "ldr_digital", default)]
    ldr_digital: Option<u8>,
    #[serde(rename = "pH", alias = "ph")]
    ph: f64,
}

/// Required fields by reading name, with the wire keys that satisfy each.
const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    ("ldr_analog", &["LDR_Analog", "ldr_analog"]),
    ("ph", &["pH", "ph"]),
];

fn malformed(raw: &str, reason: impl Into<String>) -> PipelineError {
    PipelineError::MalformedReading {
        raw: raw.to_string(),
        reason: reason.into(),
    }
}

/// Parse one line of device output into a [`Reading`].
///
/// - blank line: [`PipelineError::NoDataReceived`]
/// - not a JSON object, wrong value types, LDR digital outside {0, 1}:
///   [`PipelineError::MalformedReading`] carrying the raw text
/// - `LDR_Analog` or `pH` absent: [`PipelineError::MissingRequiredField`]
/// - a field given under both its wire key and its snake-case alias (e.g.
///   `pH` and `ph`): [`PipelineError::MalformedReading`], since the intended
///   value is ambiguous
pub fn parse_reading_line(line: &str) -> Result<Reading, PipelineError> {
    let line = line.trim_end();
    if line.trim_start().is_empty() {
        return Err(PipelineError::NoDataReceived);
    }

    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| malformed(line, e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(malformed(line, "expected a JSON object"));
    };

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .filter(|(_, keys)| !keys.iter().any(|k| object.contains_key(*k)))
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingRequiredField { fields: missing });
    }

    let wire: WireReading =
        serde_json::from_value(value).map_err(|e| malformed(line, e.to_string()))?;

    if let Some(d) = wire.ldr_digital {
        if d > 1 {
            return Err(malformed(line, format!("LDR_Digital must be 0 or 1, got {d}")));
        }
    }

    Ok(Reading::new(wire.ldr_analog, wire.ldr_digital, wire.ph))
}
