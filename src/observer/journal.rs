// Evaluation journal
// Append-only JSONL log of evaluation records for monitoring long trainings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use super::history::EvaluationRecord;

/// Errors that can occur during journal operations
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single line of the journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// When this entry was created, serialized as RFC 3339
    pub timestamp: DateTime<Utc>,

    /// Observer session that produced the entry; several trainings may
    /// append to one file
    pub session: Uuid,

    /// The evaluation that was recorded
    pub record: EvaluationRecord,

    /// Whether this evaluation replaced the best snapshot
    pub improved: bool,

    /// Steps since the best snapshot, after this evaluation
    pub stalled: u64,
}

impl JournalEntry {
    /// Create a new entry stamped with the current time
    pub fn new(session: Uuid, record: EvaluationRecord, improved: bool, stalled: u64) -> Self {
        JournalEntry {
            timestamp: Utc::now(),
            session,
            record,
            improved,
            stalled,
        }
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// Appends journal entries to a file, one JSON object per line
#[derive(Debug, Clone)]
pub struct Journal {
    file_path: PathBuf,
    session: Uuid,
}

impl Journal {
    /// Create a journal for `file_path` with a fresh session id
    pub fn new(file_path: PathBuf) -> Self {
        Journal {
            file_path,
            session: Uuid::new_v4(),
        }
    }

    /// Append an entry. Creates the file if it doesn't exist
    pub fn write(&self, entry: &JournalEntry) -> Result<(), JournalError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        let json_line = entry.to_json_line()?;
        file.write_all(json_line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Build and append an entry for this journal's session
    pub fn append(
        &self,
        record: &EvaluationRecord,
        improved: bool,
        stalled: u64,
    ) -> Result<(), JournalError> {
        self.write(&JournalEntry::new(
            self.session,
            record.clone(),
            improved,
            stalled,
        ))
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Read journal entries from a JSONL file
pub fn read_journal(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    let contents = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: JournalEntry = serde_json::from_str(line)?;
        entries.push(entry);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PerSplit;
    use tempfile::TempDir;

    fn record(step: u64) -> EvaluationRecord {
        EvaluationRecord::new(step, PerSplit::new(0.3, 0.4, 0.5))
    }

    #[test]
    fn test_json_line_format() {
        let entry = JournalEntry::new(Uuid::new_v4(), record(3), true, 0);
        let json_line = entry.to_json_line().unwrap();

        assert!(json_line.ends_with('\n'));
        let parsed: JournalEntry = serde_json::from_str(json_line.trim()).unwrap();
        assert_eq!(parsed.record.step, 3);
        assert!(parsed.improved);
        assert_eq!(parsed.timestamp, entry.timestamp);

        let value: serde_json::Value = serde_json::from_str(json_line.trim()).unwrap();
        let text = value["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(text).is_ok());
    }

    #[test]
    fn test_journal_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journal.jsonl");
        let journal = Journal::new(path.clone());

        journal.append(&record(1), true, 0).unwrap();
        journal.append(&record(2), false, 1).unwrap();

        let entries = read_journal(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].record.step, 1);
        assert_eq!(entries[1].stalled, 1);
        assert!(entries.iter().all(|e| e.session == journal.session()));
    }

    #[test]
    fn test_sessions_share_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journal.jsonl");

        Journal::new(path.clone()).append(&record(1), true, 0).unwrap();
        Journal::new(path.clone()).append(&record(1), true, 0).unwrap();

        let entries = read_journal(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_ne!(entries[0].session, entries[1].session);
    }

    #[test]
    fn test_unwritable_journal_fails() {
        let temp_dir = TempDir::new().unwrap();
        let journal = Journal::new(temp_dir.path().join("missing").join("journal.jsonl"));

        let result = journal.append(&record(1), true, 0);
        assert!(matches!(result, Err(JournalError::Io(_))));
    }
}
