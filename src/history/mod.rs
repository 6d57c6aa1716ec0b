//! History recorder
//!
//! Accepted outcomes are appended to a per-franchise season log. Records are
//! immutable once written and stores only check that a record is well formed;
//! no selection logic lives here.

mod jsonl;
mod memory;

pub use jsonl::JsonlHistory;
pub use memory::MemoryHistory;

use crate::error::Result;
use crate::resolve::{OptionTrail, ResolvedEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted event, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub season: i32,
    pub week: u32,
    pub event_id: i32,
    pub title: String,
    pub description: String,
    pub impact: String,
    #[serde(default)]
    pub option_path: OptionTrail,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub selected_target: Option<String>,
    #[serde(default)]
    pub is_temporary: bool,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    /// Record a resolved event, stamped with the current time
    pub fn new(resolved: &ResolvedEvent, season: i32, week: u32) -> Self {
        Self::at(resolved, season, week, Utc::now())
    }

    pub fn at(resolved: &ResolvedEvent, season: i32, week: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            season,
            week,
            event_id: resolved.event_id,
            title: resolved.title.clone(),
            description: resolved.description.clone(),
            impact: resolved.impact.clone(),
            option_path: resolved.option_path.clone(),
            category: resolved.category.clone(),
            selected_target: resolved.selected_target.clone(),
            is_temporary: resolved.is_temporary,
            timestamp,
        }
    }
}

/// Append-only season log
pub trait HistoryStore {
    fn append(&mut self, record: HistoryRecord) -> Result<()>;

    /// Records of one season in the order they were appended
    fn load(&self, season: i32) -> Result<Vec<HistoryRecord>>;

    fn load_week(&self, season: i32, week: u32) -> Result<Vec<HistoryRecord>> {
        let mut records = self.load(season)?;
        records.retain(|record| record.week == week);
        Ok(records)
    }
}
