//! In-memory history store

use super::{HistoryRecord, HistoryStore};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    records: Vec<HistoryRecord>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record across seasons
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop everything, e.g. when a new franchise is started
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&mut self, record: HistoryRecord) -> Result<()> {
        self.records.push(record);
        Ok(())
    }

    fn load(&self, season: i32) -> Result<Vec<HistoryRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.season == season)
            .cloned()
            .collect())
    }
}
