//! Transaction-related types for the bank account simulator
//!
//! This module defines the kinds of state-changing operation, the values the
//! account returns from them, the flagging policy, and the journal record
//! written for flagged transactions.

use super::agent::AgentName;
use chrono::NaiveDateTime;

/// Integer currency amount in the smallest unit
pub type Amount = u64;

/// Transaction number assigned inside the account's critical section
pub type TransactionNumber = u64;

/// Timestamp layout of journal records
pub const JOURNAL_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Kind of state-changing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Credit funds to the account
    Deposit,

    /// Debit funds from the account
    Withdrawal,
}

impl TransactionKind {
    /// Role of the agent that issues this kind of transaction
    pub fn role(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Depositor",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }

    /// Lowercase verb used in journal records
    pub fn verb(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdraw",
        }
    }
}

/// Consistent `(balance, transactionCount)` pair read under one lock acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Balance at the serialization point
    pub balance: Amount,

    /// Number of committed transactions at the serialization point
    pub transaction_count: TransactionNumber,
}

/// Result of a committed deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    /// Transaction number assigned to the deposit
    pub transaction: TransactionNumber,

    /// Balance after the deposit
    pub balance: Amount,

    /// Whether the deposit exceeded the flagging threshold
    pub flagged: bool,
}

/// Outcome of a withdrawal attempt
///
/// `Completed` is terminal with mutation; `InsufficientFunds` is terminal
/// without effect on balance or transaction count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    /// Funds were debited
    Completed {
        /// Transaction number assigned to the withdrawal
        transaction: TransactionNumber,
        /// Balance after the withdrawal
        balance: Amount,
        /// Whether the withdrawal exceeded the flagging threshold
        flagged: bool,
    },

    /// The balance did not cover the request; nothing changed
    InsufficientFunds {
        /// Balance observed when the withdrawal was refused
        balance: Amount,
    },
}

impl WithdrawOutcome {
    /// `true` iff funds were debited
    pub fn is_completed(&self) -> bool {
        matches!(self, WithdrawOutcome::Completed { .. })
    }

    /// Transaction number of a completed withdrawal
    pub fn transaction(&self) -> Option<TransactionNumber> {
        match self {
            WithdrawOutcome::Completed { transaction, .. } => Some(*transaction),
            WithdrawOutcome::InsufficientFunds { .. } => None,
        }
    }
}

/// Thresholds above which a transaction is flagged (strictly greater)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagPolicy {
    /// Deposits strictly above this amount are flagged
    pub deposit_threshold: Amount,

    /// Withdrawals strictly above this amount are flagged
    pub withdrawal_threshold: Amount,
}

impl Default for FlagPolicy {
    fn default() -> Self {
        Self {
            deposit_threshold: 350,
            withdrawal_threshold: 75,
        }
    }
}

impl FlagPolicy {
    /// Threshold that applies to the given kind
    pub fn threshold(&self, kind: TransactionKind) -> Amount {
        match kind {
            TransactionKind::Deposit => self.deposit_threshold,
            TransactionKind::Withdrawal => self.withdrawal_threshold,
        }
    }

    /// Whether `amount` must be journaled
    pub fn is_flagged(&self, kind: TransactionKind, amount: Amount) -> bool {
        amount > self.threshold(kind)
    }
}

/// One flagged transaction, created inside the account's critical section
///
/// Records are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRecord {
    /// Deposit or withdrawal
    pub kind: TransactionKind,

    /// Agent that issued the transaction
    pub agent: AgentName,

    /// Transaction amount
    pub amount: Amount,

    /// Local wall-clock time of the transaction
    pub timestamp: NaiveDateTime,

    /// Transaction number assigned in the same critical section
    pub transaction_number: TransactionNumber,
}

impl JournalRecord {
    /// Render the record as one journal line (without the trailing newline)
    ///
    /// Deposit records are prefixed with a single tab. The `EST` suffix is
    /// literal and does not reflect the host's zone.
    pub fn to_line(&self) -> String {
        let indent = match self.kind {
            TransactionKind::Deposit => "\t",
            TransactionKind::Withdrawal => "",
        };
        format!(
            "{}{} Agent {} issued {} of ${} at {} EST Transaction Number : {}",
            indent,
            self.kind.role(),
            self.agent.id(),
            self.kind.verb(),
            self.amount,
            self.timestamp.format(JOURNAL_TIMESTAMP_FORMAT),
            self.transaction_number
        )
    }
}
