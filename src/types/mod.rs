//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `agent`: Agent identity
//! - `transaction`: Transaction kinds, outcomes, flagging policy and journal records
//! - `error`: Error types for the simulator

pub mod agent;
pub mod error;
pub mod transaction;

pub use agent::AgentName;
pub use error::SimulationError;
pub use transaction::{
    Amount, FlagPolicy, JournalRecord, Receipt, Snapshot, TransactionKind, TransactionNumber,
    WithdrawOutcome, JOURNAL_TIMESTAMP_FORMAT,
};
