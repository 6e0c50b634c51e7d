//! I/O module
//!
//! Handles everything the simulator writes for the operator.
//!
//! # Components
//!
//! - `dual_sink` - Tee of event lines to the console and `output.txt`
//! - `journal` - Append-only flagged-transaction log (`transactions.csv`)
//! - `event_format` - Line layout of the event stream and its replay parser

pub mod dual_sink;
pub mod event_format;
pub mod journal;

pub use dual_sink::DualSink;
pub use event_format::{parse_event_line, replay, LedgerEvent, ReplaySummary};
pub use journal::{Journal, DEFAULT_JOURNAL_PATH};
