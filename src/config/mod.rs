//! Configuration module for catalog data and session settings
//!
//! This module handles deserialization of event collections from JSON and
//! defines the closed label sets (difficulty, season stage) the engine accepts.

mod difficulty;
mod event;
mod settings;
mod stage;

pub use difficulty::*;
pub use event::*;
pub use settings::*;
pub use stage::*;

use crate::error::{EventError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Top-level key of the standard collection
pub const STANDARD_KEY: &str = "events";
/// Top-level key of the unrealistic collection
pub const UNREALISTIC_KEY: &str = "unrealistic_events";

/// Parse an events file into its raw collections.
///
/// Accepts either an object keyed by pool name or a bare array, which is
/// treated as a standard collection (the shape custom-event exports use).
pub fn parse_events_file(json: &str) -> Result<EventsFile> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(entries) => Ok(EventsFile {
            events: Some(entries),
            unrealistic_events: None,
        }),
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Err(EventError::config(format!(
            "events file must be an object with `{}`/`{}` or an array",
            STANDARD_KEY, UNREALISTIC_KEY
        ))),
    }
}

/// Read and parse an events file from disk
pub fn load_events_file(path: impl AsRef<Path>) -> Result<EventsFile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let file = parse_events_file(&text)?;
    log::debug!(
        "read {} standard / {} unrealistic entries from {}",
        file.events.as_ref().map_or(0, Vec::len),
        file.unrealistic_events.as_ref().map_or(0, Vec::len),
        path.display()
    );
    Ok(file)
}
