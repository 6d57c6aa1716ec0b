//! Error types for the franchise event engine

use std::fmt;
use thiserror::Error;

/// Which raw collection a catalog entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Standard,
    Unrealistic,
    Custom,
}

impl PoolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PoolKind::Standard => "standard",
            PoolKind::Unrealistic => "unrealistic",
            PoolKind::Custom => "custom",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry that violates the event schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub pool: PoolKind,
    /// `None` when the entry's id is itself missing or malformed
    pub event_id: Option<i32>,
    /// Position of the entry inside its raw collection
    pub index: usize,
    pub field: String,
    pub reason: String,
}

impl SchemaError {
    pub fn new(
        pool: PoolKind,
        event_id: Option<i32>,
        index: usize,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            event_id,
            index,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.event_id {
            Some(id) => write!(f, "{} event {}", self.pool, id)?,
            None => write!(f, "{} entry #{}", self.pool, self.index)?,
        }
        write!(f, ", field `{}`: {}", self.field, self.reason)
    }
}

impl std::error::Error for SchemaError {}

/// Main error type for the franchise event engine
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unresolved placeholder `{{{role}}}` in event {event_id}: no roster entry")]
    Placeholder { event_id: i32, role: String },

    #[error("Invalid option path {path:?} for event {event_id}: {reason}")]
    OptionPath {
        event_id: i32,
        path: Vec<usize>,
        reason: String,
    },

    #[error("Event not found: {0}")]
    EventNotFound(i32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EventError {
    /// Shorthand used by the label parsers
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        EventError::Config(msg.into())
    }
}

/// Result type alias for the franchise event engine
pub type Result<T> = std::result::Result<T, EventError>;
