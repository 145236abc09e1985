//! Structured input acceptance: pre-segmented JSON documents.
//!
//! Besides raw text, the loader accepts a previously exported match
//! document (or anything shaped like one). The contract is minimal: the
//! value must be a JSON object whose `setup` and `turns` are arrays.
//! Everything else is coerced leniently so round-tripped documents and
//! hand-edited ones both load.
//!
//! Turn actions may be plain strings or objects carrying a `raw` string;
//! an object without one degrades to its compact JSON text so the entry
//! is never silently dropped.

use log::warn;
use serde_json::Value;
use thiserror::Error;

use super::segment::{extract_players, RawTurn, SegmentedLog};
use crate::core::Roster;

/// Source label used when a structured document carries no `file` field.
const DEFAULT_FILE: &str = "structured-log";

/// Why a structured document was rejected.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The text was not valid JSON at all.
    #[error("input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The top-level value was not an object.
    #[error("structured input must be a JSON object")]
    NotAnObject,
    /// A required field was missing or not an array.
    #[error("structured input field `{0}` must be an array")]
    NotAnArray(&'static str),
}

impl SegmentedLog {
    /// Accept a structured document as a segmented log.
    ///
    /// `setup` and `turns` must be arrays; everything else is optional.
    /// When the document carries no usable `players` array, the roster is
    /// recomputed from the setup lines and turn headers.
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        let obj = value.as_object().ok_or(ShapeError::NotAnObject)?;
        let setup_values = obj
            .get("setup")
            .and_then(Value::as_array)
            .ok_or(ShapeError::NotAnArray("setup"))?;
        let turn_values = obj
            .get("turns")
            .and_then(Value::as_array)
            .ok_or(ShapeError::NotAnArray("turns"))?;

        let setup: Vec<String> = setup_values.iter().map(raw_text).collect();
        let turns: Vec<RawTurn> = turn_values.iter().map(raw_turn).collect();

        let mut roster = Roster::default();
        if let Some(list) = obj.get("players").and_then(Value::as_array) {
            for entry in list {
                if let Some(name) = entry.as_str() {
                    roster.add(name);
                }
            }
        }
        let players = if roster.is_empty() {
            extract_players(&setup, &turns)
        } else {
            roster.into_names()
        };

        let file = obj
            .get("file")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_FILE)
            .to_string();

        Ok(Self {
            file,
            players,
            setup,
            turns,
        })
    }

    /// Accept a structured document from JSON text.
    pub fn from_structured_str(json: &str) -> Result<Self, ShapeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Load text of unknown provenance.
    ///
    /// JSON that satisfies the structured contract is accepted as-is;
    /// anything else is treated as a raw transcript. This mirrors how a
    /// pasted log and a re-opened export go through the same door.
    #[must_use]
    pub fn load(text: &str, file: impl Into<String>) -> Self {
        let file = file.into();
        if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
            match Self::from_value(&value) {
                Ok(log) => return log,
                Err(err) => {
                    warn!("structured input rejected ({err}); reading {file:?} as raw transcript");
                }
            }
        }
        Self::parse(text, file)
    }
}

/// The raw text of a setup or action entry.
///
/// Strings pass through trimmed; objects contribute their `raw` field;
/// anything else falls back to its compact JSON rendering.
fn raw_text(value: &Value) -> String {
    if let Some(s) = value.as_str() {
        return s.trim().to_string();
    }
    if let Some(raw) = value.as_object().and_then(|o| o.get("raw")).and_then(Value::as_str) {
        return raw.trim().to_string();
    }
    value.to_string()
}

/// Coerce one `turns` entry. Missing or malformed fields degrade to
/// defaults instead of failing the whole document.
fn raw_turn(value: &Value) -> RawTurn {
    let obj = value.as_object();
    let number = obj
        .and_then(|o| o.get("number"))
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);
    let player = obj
        .and_then(|o| o.get("player"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    let actions = obj
        .and_then(|o| o.get("actions"))
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(raw_text).collect())
        .unwrap_or_default();
    RawTurn {
        number,
        player,
        actions,
    }
}
