//! Dual-sink output stream
//!
//! `DualSink` tees every byte range it is given to a file and to a console
//! stream, flushing both before returning. The file is truncated when the sink
//! is created.
//!
//! # Atomicity
//!
//! Each call takes the sink's internal lock, writes to the file, then to the
//! console. A single call is therefore never interleaved with another one, so
//! callers that hand over whole lines (or whole multi-line banners) keep them
//! intact in both targets. State-changing account operations are additionally
//! serialized by the account's own lock.

use crate::types::SimulationError;
use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

struct SinkTargets {
    file: File,
    console: Box<dyn Write + Send>,
}

/// Write sink that fans out to a file and the console
pub struct DualSink {
    path: PathBuf,
    targets: Mutex<SinkTargets>,
}

impl DualSink {
    /// Create a sink writing to `path` and to the process's stdout
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::OutputFileOpen`] if the file cannot be
    /// created or truncated.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        Self::with_console(path, Box::new(io::stdout()))
    }

    /// Create a sink writing to `path` and to an arbitrary console writer
    pub fn with_console(
        path: impl AsRef<Path>,
        console: Box<dyn Write + Send>,
    ) -> Result<Self, SimulationError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .map_err(|e| SimulationError::output_file_open(&path.display().to_string(), &e))?;

        Ok(Self {
            path,
            targets: Mutex::new(SinkTargets { file, console }),
        })
    }

    /// Write `buf` to the file, then the console, flushing both
    pub fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut targets = self.targets.lock();
        targets.file.write_all(buf)?;
        targets.file.flush()?;
        targets.console.write_all(buf)?;
        targets.console.flush()
    }

    /// Write one line followed by a newline
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.write_bytes(buf.as_bytes())
    }

    /// Write several lines as one atomic unit
    pub fn write_lines<I, S>(&self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = String::new();
        for line in lines {
            buf.push_str(line.as_ref());
            buf.push('\n');
        }
        self.write_bytes(buf.as_bytes())
    }
}

impl Write for &DualSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut targets = self.targets.lock();
        targets.file.flush()?;
        targets.console.flush()
    }
}

impl fmt::Debug for DualSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualSink").field("path", &self.path).finish()
    }
}
