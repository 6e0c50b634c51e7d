//! Helpers shared by unit tests

use crate::core::Account;
use crate::io::DualSink;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

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

/// Account writing to `dir/output.txt` + a captured console, journaling to
/// `dir/transactions.csv`
pub fn capture_account(dir: &Path) -> (Arc<Account>, SharedBuffer) {
    let console = SharedBuffer::new();
    let sink = Arc::new(
        DualSink::with_console(dir.join("output.txt"), Box::new(console.clone())).unwrap(),
    );
    let account = Arc::new(Account::new(sink, dir.join("transactions.csv")).unwrap());
    (account, console)
}
