//! Worker agents
//!
//! The three agent families differ only in how they draw amounts, how long
//! they pause, and which account operation they invoke. They share one
//! [`Agent::run`] loop parameterized by [`AgentRole`].
//!
//! # Loop shapes
//!
//! ```text
//! Depositor / Withdrawal:  act -> pause -> act -> pause -> ...
//! Auditor:                 pause -> act -> pause -> act -> ...
//! ```
//!
//! Every pause races against a shared `CancellationToken`, so a cancel request
//! interrupts a sleep immediately. A cancelled agent never starts another
//! iteration, and because account operations never await, an agent can only
//! observe cancellation while it holds no lock.

use crate::core::Account;
use crate::io::event_format;
use crate::types::{AgentName, Amount, TransactionNumber, WithdrawOutcome};
use rand::rngs::StdRng;
use rand::Rng;
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Names given to auditors in spawn order
pub const AUDITOR_NAMES: [&str; 2] = ["INTERNAL BANK", "TREASURY DEPT"];

/// Amounts a depositor draws from (uniform)
pub const DEPOSIT_AMOUNTS: RangeInclusive<Amount> = 1..=500;

/// Amounts a withdrawal agent draws from (uniform)
pub const WITHDRAWAL_AMOUNTS: RangeInclusive<Amount> = 1..=100;

/// Role of a worker agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    /// Deposits 1..=500 then pauses up to 15 s
    Depositor,

    /// Withdraws 1..=100 then pauses up to 3 s
    Withdrawal,

    /// Pauses 17.5-18.5 s then audits the account
    Auditor,
}

impl AgentRole {
    /// Pause between operations in milliseconds (uniform, half-open)
    pub fn pause_range_ms(&self) -> Range<u64> {
        match self {
            AgentRole::Depositor => 0..15_000,
            AgentRole::Withdrawal => 0..3_000,
            AgentRole::Auditor => 17_500..18_500,
        }
    }

    /// Whether the loop pauses before acting
    pub fn pauses_first(&self) -> bool {
        matches!(self, AgentRole::Auditor)
    }

    /// Whether the agent prints a notice when cancelled mid-pause
    pub fn announces_interrupt(&self) -> bool {
        !matches!(self, AgentRole::Depositor)
    }

    /// Name of the `index`-th agent of this role (1-based)
    pub fn agent_name(&self, index: usize) -> AgentName {
        match self {
            AgentRole::Depositor => AgentName::worker(format!("DT{}", index)),
            AgentRole::Withdrawal => AgentName::worker(format!("WT{}", index)),
            AgentRole::Auditor => match AUDITOR_NAMES.get(index.wrapping_sub(1)) {
                Some(name) => AgentName::named(*name),
                None => AgentName::named(format!("AUDITOR {}", index)),
            },
        }
    }
}

/// How an agent's loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    /// Agent name
    pub name: AgentName,
    /// Agent role
    pub role: AgentRole,
    /// Completed loop iterations (deposits, withdrawal attempts, or audits)
    pub operations: u64,
    /// Whether cancellation arrived during a pause
    pub interrupted: bool,
}

/// A worker agent bound to the shared account
#[derive(Debug)]
pub struct Agent {
    name: AgentName,
    role: AgentRole,
    account: Arc<Account>,
    rng: StdRng,
    last_seen: TransactionNumber,
}

impl Agent {
    /// Create an agent; `rng` drives both amounts and pauses
    pub fn new(name: AgentName, role: AgentRole, account: Arc<Account>, rng: StdRng) -> Self {
        Self {
            name,
            role,
            account,
            rng,
            last_seen: 0,
        }
    }

    /// Run until `cancel` fires
    pub async fn run(mut self, cancel: CancellationToken) -> AgentSummary {
        let mut operations = 0;
        let mut interrupted = false;

        while !cancel.is_cancelled() {
            if self.role.pauses_first() && !self.pause(&cancel).await {
                interrupted = true;
                break;
            }

            self.act();
            operations += 1;

            if !self.role.pauses_first() && !self.pause(&cancel).await {
                interrupted = true;
                break;
            }
        }

        if interrupted && self.role.announces_interrupt() {
            self.announce_interrupt();
        }
        tracing::debug!(agent = %self.name, operations, interrupted, "agent stopped");

        AgentSummary {
            name: self.name,
            role: self.role,
            operations,
            interrupted,
        }
    }

    // Returns false when cancelled before the pause elapsed.
    async fn pause(&mut self, cancel: &CancellationToken) -> bool {
        let millis = self.rng.gen_range(self.role.pause_range_ms());
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(Duration::from_millis(millis)) => true,
        }
    }

    fn act(&mut self) {
        match self.role {
            AgentRole::Depositor => {
                let amount = self.rng.gen_range(DEPOSIT_AMOUNTS);
                if let Err(e) = self.account.deposit(amount, &self.name) {
                    tracing::warn!(agent = %self.name, error = %e, "deposit rejected");
                }
            }
            AgentRole::Withdrawal => {
                let amount = self.rng.gen_range(WITHDRAWAL_AMOUNTS);
                match self.account.withdraw(amount, &self.name) {
                    Ok(WithdrawOutcome::InsufficientFunds { balance }) => {
                        tracing::debug!(agent = %self.name, amount, balance, "withdrawal blocked");
                    }
                    Ok(WithdrawOutcome::Completed { .. }) => {}
                    Err(e) => tracing::warn!(agent = %self.name, error = %e, "withdrawal rejected"),
                }
            }
            AgentRole::Auditor => self.audit(),
        }
    }

    fn audit(&mut self) {
        let snapshot = self.account.snapshot();
        let since_last = snapshot.transaction_count - self.last_seen;
        self.last_seen = snapshot.transaction_count;

        let banner = event_format::audit_banner(&self.name, snapshot, since_last);
        if let Err(e) = self.account.sink().write_lines(&banner) {
            tracing::warn!(agent = %self.name, error = %e, "audit banner lost");
        }
    }

    fn announce_interrupt(&self) {
        let label = match self.role {
            AgentRole::Auditor => format!("{} AUDITOR", self.name),
            _ => self.name.to_string(),
        };
        if let Err(e) = self
            .account
            .sink()
            .write_line(&event_format::interrupted_line(&label))
        {
            tracing::warn!(agent = %self.name, error = %e, "interrupt notice lost");
        }
    }
}
