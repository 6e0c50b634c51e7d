//! Flagged-transaction journal
//!
//! Append-only text file keyed by a fixed path. The file is truncated when the
//! journal is created; each flagged transaction then opens it in append mode,
//! writes exactly one line and closes it again.
//!
//! The journal has no lock of its own: appends happen inside the account's
//! critical section, which orders them by transaction number.

use crate::types::{JournalRecord, SimulationError};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default journal location, relative to the working directory
pub const DEFAULT_JOURNAL_PATH: &str = "transactions.csv";

/// Append-only sink for flagged transactions
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Create the journal, truncating any existing file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::JournalFileOpen`] if the file cannot be
    /// created or truncated.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref().to_path_buf();
        File::create(&path)
            .map_err(|e| SimulationError::journal_file_open(&path.display().to_string(), &e))?;
        Ok(Self { path })
    }

    /// Path of the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::JournalWrite`] if the file cannot be opened
    /// or written. Callers treat this as non-fatal.
    pub fn append(&self, record: &JournalRecord) -> Result<(), SimulationError> {
        let mut line = record.to_line();
        line.push('\n');

        let display = || self.path.display().to_string();
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| SimulationError::journal_write(&display(), &e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| SimulationError::journal_write(&display(), &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentName, TransactionKind};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn record(kind: TransactionKind, id: &str, amount: u64, n: u64) -> JournalRecord {
        JournalRecord {
            kind,
            agent: AgentName::worker(id),
            amount,
            timestamp: NaiveDate::from_ymd_opt(2024, 2, 11)
                .unwrap()
                .and_hms_opt(23, 59, 1)
                .unwrap(),
            transaction_number: n,
        }
    }

    #[test]
    fn test_create_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        fs::write(&path, "old record\n").unwrap();

        let journal = Journal::create(&path).unwrap();

        assert_eq!(journal.path(), path.as_path());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_appends_one_line_per_record_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        let journal = Journal::create(&path).unwrap();

        journal
            .append(&record(TransactionKind::Deposit, "DT1", 420, 1))
            .unwrap();
        journal
            .append(&record(TransactionKind::Withdrawal, "WT4", 90, 2))
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "\tDepositor Agent DT1 issued deposit of $420 at 11/02/2024 23:59:01 EST Transaction Number : 1"
        );
        assert_eq!(
            lines[1],
            "Withdrawal Agent WT4 issued withdraw of $90 at 11/02/2024 23:59:01 EST Transaction Number : 2"
        );
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_append_after_file_removed_reports_write_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("transactions.csv");
        fs::create_dir(dir.path().join("sub")).unwrap();
        let journal = Journal::create(&path).unwrap();
        fs::remove_dir_all(dir.path().join("sub")).unwrap();

        let result = journal.append(&record(TransactionKind::Deposit, "DT1", 500, 1));

        assert!(matches!(result, Err(SimulationError::JournalWrite { .. })));
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let result = Journal::create(dir.path().join("nope").join("transactions.csv"));
        assert!(matches!(result, Err(SimulationError::JournalFileOpen { .. })));
    }
}
