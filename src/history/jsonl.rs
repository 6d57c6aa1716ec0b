//! JSON-lines history file: one record per line, only ever appended to

use super::{HistoryRecord, HistoryStore};
use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonlHistory {
    path: PathBuf,
}

impl JsonlHistory {
    /// The file is created on the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in the file, oldest first
    pub fn load_all(&self) -> Result<Vec<HistoryRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl HistoryStore for JsonlHistory {
    fn append(&mut self, record: HistoryRecord) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        log::info!(
            "recorded event {} for season {} week {} in {}",
            record.event_id,
            record.season,
            record.week,
            self.path.display()
        );
        Ok(())
    }

    fn load(&self, season: i32) -> Result<Vec<HistoryRecord>> {
        let mut records = self.load_all()?;
        records.retain(|record| record.season == season);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventError;
    use crate::history::tests::resolved;
    use std::fs;

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let history = JsonlHistory::new(dir.path().join("none.jsonl"));
        assert!(history.load(2025).unwrap().is_empty());
    }

    #[test]
    fn test_append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let mut history = JsonlHistory::new(&path);
        history.append(HistoryRecord::new(&resolved(1), 2025, 1)).unwrap();
        history.append(HistoryRecord::new(&resolved(2), 2025, 2)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));

        let reopened = JsonlHistory::new(&path);
        let ids: Vec<_> = reopened.load(2025).unwrap().iter().map(|r| r.event_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        fs::write(&path, "{not json}\n").unwrap();
        let history = JsonlHistory::new(&path);
        assert!(matches!(history.load(2025), Err(EventError::Json(_))));
    }
}
