//! Bank Account Simulator Library
//! # Overview
//!
//! This library simulates long-running agents that concurrently deposit into,
//! withdraw from, and audit one shared bank account.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (agent names, outcomes, journal records, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - The shared account:
//!   - [`core::account`] - Lock, condition variable, transaction counter and operations
//! - [`io`] - Operator-facing output:
//!   - [`io::dual_sink`] - Console + `output.txt` tee
//!   - [`io::journal`] - Flagged-transaction journal (`transactions.csv`)
//!   - [`io::event_format`] - Event line layout and stream replay
//! - [`agents`] - Depositor, withdrawal and auditor loops
//! - [`simulation`] - Harness: spawn, bound, cancel, join
//!
//! # Guarantees
//!
//! - The balance never goes negative: withdrawals are refused, not overdrawn
//! - Each committed operation gets the next transaction number, with no gaps
//! - Event lines and journal records are written inside the account's critical
//!   section, so both files are linearizations of the state changes
//! - Auditors read balance and transaction count under one lock acquisition
//!
//! # Flagged Transactions
//!
//! Deposits above $350 and committed withdrawals above $75 are announced on
//! the event stream and appended to the journal.

// Module declarations
pub mod agents;
pub mod cli;
pub mod core;
pub mod io;
pub mod simulation;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use agents::{Agent, AgentRole, AgentSummary};
pub use core::Account;
pub use io::{replay, DualSink, Journal, ReplaySummary};
pub use simulation::{Simulation, SimulationConfig, SimulationReport};
pub use types::{
    AgentName, Amount, FlagPolicy, JournalRecord, Receipt, SimulationError, Snapshot,
    TransactionKind, TransactionNumber, WithdrawOutcome,
};
