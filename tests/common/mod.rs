//! Helpers shared by the integration tests

#![allow(dead_code)]

use bank_simulator::{Account, DualSink};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Console stand-in that keeps everything written to it
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.bytes.lock().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Account wired to files in a temporary directory and a captured console
pub struct Bench {
    pub dir: TempDir,
    pub account: Arc<Account>,
    pub console: SharedBuffer,
}

impl Bench {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let console = SharedBuffer::new();
        let sink = Arc::new(
            DualSink::with_console(dir.path().join("output.txt"), Box::new(console.clone()))
                .expect("Failed to create dual sink"),
        );
        let account = Arc::new(
            Account::new(sink, dir.path().join("transactions.csv"))
                .expect("Failed to create account"),
        );
        Self {
            dir,
            account,
            console,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("output.txt")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.dir.path().join("transactions.csv")
    }

    pub fn output(&self) -> String {
        read(&self.output_path())
    }

    pub fn journal_lines(&self) -> Vec<String> {
        read(&self.journal_path())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Transaction number at the end of a journal line
pub fn journal_transaction_number(line: &str) -> u64 {
    line.rsplit(" : ")
        .next()
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or_else(|| panic!("No transaction number in journal line: {}", line))
}
