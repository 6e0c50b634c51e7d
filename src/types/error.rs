//! Error types for the bank account simulator
//!
//! This module defines every error that can surface from the shared account,
//! the output sinks, the harness, and the event-stream replay.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: output or journal file cannot be created at startup (fatal)
//! - **Write Errors**: a journal append or sink write failed mid-run (logged, swallowed)
//! - **Operation Errors**: zero amounts, balance overflow
//! - **Replay Errors**: an event stream that is not a consistent linearization
//!
//! Insufficient funds is deliberately absent: it is a domain outcome reported
//! through [`WithdrawOutcome`](crate::types::WithdrawOutcome), not an error.

use thiserror::Error;

/// Main error type for the simulator
///
/// Each variant carries enough context to be printed directly to the operator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The dual-sink output file could not be created or truncated
    ///
    /// Fatal: the harness stops before any worker is spawned.
    #[error("Cannot create output file '{path}': {message}")]
    OutputFileOpen {
        /// Path of the output file
        path: String,
        /// Underlying I/O error
        message: String,
    },

    /// The flagged-transaction journal could not be created or truncated
    ///
    /// Fatal: the harness stops before any worker is spawned.
    #[error("Cannot create journal file '{path}': {message}")]
    JournalFileOpen {
        /// Path of the journal file
        path: String,
        /// Underlying I/O error
        message: String,
    },

    /// Appending a flagged transaction to the journal failed
    ///
    /// Non-fatal: the balance mutation has already been committed.
    #[error("Failed to append to journal '{path}': {message}")]
    JournalWrite {
        /// Path of the journal file
        path: String,
        /// Underlying I/O error
        message: String,
    },

    /// Writing an event line through the dual sink failed
    #[error("Failed to write event stream: {message}")]
    SinkWrite {
        /// Underlying I/O error
        message: String,
    },

    /// Amount outside the accepted range (amounts start at 1)
    #[error("Invalid amount {amount} for {operation}: amounts must be at least 1")]
    InvalidAmount {
        /// Operation that was attempted
        operation: String,
        /// The rejected amount
        amount: u64,
    },

    /// A deposit would overflow the balance
    #[error("Deposit of {amount} would overflow balance {balance}")]
    BalanceOverflow {
        /// Balance at the time of the attempt
        balance: u64,
        /// Requested deposit
        amount: u64,
    },

    /// Rejected simulation configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong
        message: String,
    },

    /// The async runtime could not be built or a worker could not be joined
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },

    /// Transaction numbers in a replayed stream are not gap-free
    #[error("Transaction number gap in event stream: expected {expected}, found {found}")]
    StreamGap {
        /// The next number that should have appeared
        expected: u64,
        /// The number that actually appeared
        found: u64,
    },

    /// A replayed event reports a balance that does not match the replay
    #[error("Balance mismatch at transaction {transaction}: replay computed ${expected}, stream shows ${found}")]
    ReplayMismatch {
        /// Transaction number of the offending line
        transaction: u64,
        /// Balance obtained by replaying the stream
        expected: u64,
        /// Balance printed on the line
        found: u64,
    },

    /// A replayed stream ends on a different transaction count than the account
    #[error("Transaction count mismatch: stream holds {replayed}, account recorded {account}")]
    TransactionCountMismatch {
        /// Committed transactions found by the replay
        replayed: u64,
        /// Transaction count of the final account snapshot
        account: u64,
    },

    /// A replayed stream ends on a different balance than the account
    #[error("Final balance mismatch: stream replays to ${replayed}, account holds ${account}")]
    FinalBalanceMismatch {
        /// Balance obtained by replaying the stream
        replayed: u64,
        /// Balance of the final account snapshot
        account: u64,
    },

    /// An event line looked like a deposit or withdrawal but could not be parsed
    #[error("Malformed event line: {line}")]
    MalformedEvent {
        /// The offending line
        line: String,
    },

    /// Generic I/O error
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },
}

impl From<std::io::Error> for SimulationError {
    fn from(error: std::io::Error) -> Self {
        SimulationError::IoError {
            message: error.to_string(),
        }
    }
}

impl SimulationError {
    /// Create an OutputFileOpen error
    pub fn output_file_open(path: &str, error: &std::io::Error) -> Self {
        SimulationError::OutputFileOpen {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    /// Create a JournalFileOpen error
    pub fn journal_file_open(path: &str, error: &std::io::Error) -> Self {
        SimulationError::JournalFileOpen {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    /// Create a JournalWrite error
    pub fn journal_write(path: &str, error: &std::io::Error) -> Self {
        SimulationError::JournalWrite {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    /// Create a SinkWrite error
    pub fn sink_write(error: &std::io::Error) -> Self {
        SimulationError::SinkWrite {
            message: error.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(operation: &str, amount: u64) -> Self {
        SimulationError::InvalidAmount {
            operation: operation.to_string(),
            amount,
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: &str) -> Self {
        SimulationError::InvalidConfig {
            message: message.to_string(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl std::fmt::Display) -> Self {
        SimulationError::Runtime {
            message: message.to_string(),
        }
    }
}
