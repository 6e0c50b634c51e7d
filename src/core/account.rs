//! Shared account
//!
//! This module provides the `Account` struct, the single piece of state shared
//! by every agent in the simulation.
//!
//! # Design
//!
//! One `parking_lot::Mutex` guards the balance and the transaction counter
//! together. Every state-changing operation runs as one critical section that:
//! 1. Validates and applies the mutation
//! 2. Assigns the next transaction number
//! 3. Emits the event line through the [`DualSink`]
//! 4. Appends a [`JournalRecord`] when the amount is flagged
//! 5. Broadcasts on the `funds_changed` condition
//!
//! Because the event line and the journal append happen while the lock is
//! held, the textual stream and the journal are linearizations of the state
//! changes: the number printed on each line is the number assigned by that
//! very operation, with no gaps and no duplicates.
//!
//! # Thread Safety
//!
//! `Account` is `Send + Sync` and is shared through `Arc`. Critical sections
//! never `.await`, so the blocking mutex is safe to use from async tasks.

use crate::io::event_format;
use crate::io::{DualSink, Journal};
use crate::types::{
    AgentName, Amount, FlagPolicy, JournalRecord, Receipt, SimulationError, Snapshot,
    TransactionKind, TransactionNumber, WithdrawOutcome,
};
use chrono::Local;
use parking_lot::{Condvar, Mutex};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Ledger {
    balance: Amount,
    transaction_count: TransactionNumber,
}

/// Thread-safe shared account
///
/// # Invariants
///
/// - `balance` never goes below zero (it is unsigned and withdrawals are
///   refused rather than overdrawn)
/// - `transaction_count` increases by exactly one per committed deposit or
///   withdrawal and never otherwise
/// - every journal record's transaction number is the one assigned in the
///   same critical section
#[derive(Debug)]
pub struct Account {
    ledger: Mutex<Ledger>,
    funds_changed: Condvar,
    sink: Arc<DualSink>,
    journal: Journal,
    policy: FlagPolicy,
}

impl Account {
    /// Create an empty account, truncating the journal at `journal_path`
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::JournalFileOpen`] if the journal cannot be
    /// created.
    pub fn new(sink: Arc<DualSink>, journal_path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let journal = Journal::create(journal_path)?;
        Ok(Self::with_journal(sink, journal, FlagPolicy::default()))
    }

    /// Create an empty account around an existing journal and policy
    pub fn with_journal(sink: Arc<DualSink>, journal: Journal, policy: FlagPolicy) -> Self {
        Self {
            ledger: Mutex::new(Ledger::default()),
            funds_changed: Condvar::new(),
            sink,
            journal,
            policy,
        }
    }

    /// The sink event lines are written to
    pub fn sink(&self) -> &Arc<DualSink> {
        &self.sink
    }

    /// Credit `amount` to the account
    ///
    /// Atomically adds the amount, assigns the next transaction number, emits
    /// the deposit line, journals the deposit if it is flagged and wakes every
    /// waiter on `funds_changed`.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidAmount`] if `amount` is zero
    /// - [`SimulationError::BalanceOverflow`] if the balance would overflow;
    ///   the account is left untouched
    pub fn deposit(&self, amount: Amount, agent: &AgentName) -> Result<Receipt, SimulationError> {
        if amount == 0 {
            return Err(SimulationError::invalid_amount("deposit", amount));
        }

        let mut ledger = self.ledger.lock();
        let balance = ledger
            .balance
            .checked_add(amount)
            .ok_or(SimulationError::BalanceOverflow {
                balance: ledger.balance,
                amount,
            })?;

        ledger.balance = balance;
        ledger.transaction_count += 1;
        let transaction = ledger.transaction_count;

        let flagged = self.policy.is_flagged(TransactionKind::Deposit, amount);
        let mut lines = vec![event_format::deposit_line(agent, amount, balance, transaction)];
        if flagged {
            lines.extend(event_format::flagged_banner(
                TransactionKind::Deposit,
                agent,
                self.policy.deposit_threshold,
            ));
        }
        self.emit(&lines);
        if flagged {
            self.record_flagged(TransactionKind::Deposit, agent, amount, transaction);
        }

        self.funds_changed.notify_all();
        Ok(Receipt {
            transaction,
            balance,
            flagged,
        })
    }

    /// Debit `amount` if the balance covers it; never waits
    ///
    /// On success emits the withdrawal line, journals the withdrawal if it is
    /// flagged, and wakes every waiter on `funds_changed`. Otherwise emits the
    /// blocked line and returns [`WithdrawOutcome::InsufficientFunds`] without
    /// touching the balance or the counter.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidAmount`] if `amount` is zero.
    pub fn withdraw(
        &self,
        amount: Amount,
        agent: &AgentName,
    ) -> Result<WithdrawOutcome, SimulationError> {
        if amount == 0 {
            return Err(SimulationError::invalid_amount("withdraw", amount));
        }

        let mut ledger = self.ledger.lock();
        Ok(self.settle_withdrawal(&mut ledger, amount, agent))
    }

    /// Debit `amount`, waiting up to `timeout` for the balance to cover it
    ///
    /// Waits on `funds_changed` while the balance is short. Once it is
    /// sufficient (or the timeout elapses) this behaves exactly like
    /// [`withdraw`](Self::withdraw), so a timed-out attempt is reported as
    /// blocked.
    ///
    /// This is a blocking call; do not use it from an async task.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidAmount`] if `amount` is zero.
    pub fn withdraw_when_funded(
        &self,
        amount: Amount,
        agent: &AgentName,
        timeout: Duration,
    ) -> Result<WithdrawOutcome, SimulationError> {
        if amount == 0 {
            return Err(SimulationError::invalid_amount("withdraw", amount));
        }

        // A timeout too large to represent as an instant means wait forever.
        let deadline = Instant::now().checked_add(timeout);
        let mut ledger = self.ledger.lock();
        while ledger.balance < amount {
            match deadline {
                Some(deadline) => {
                    if self
                        .funds_changed
                        .wait_until(&mut ledger, deadline)
                        .timed_out()
                    {
                        break;
                    }
                }
                None => self.funds_changed.wait(&mut ledger),
            }
        }
        Ok(self.settle_withdrawal(&mut ledger, amount, agent))
    }

    /// Read balance and transaction count under a single lock acquisition
    pub fn snapshot(&self) -> Snapshot {
        let ledger = self.ledger.lock();
        Snapshot {
            balance: ledger.balance,
            transaction_count: ledger.transaction_count,
        }
    }

    fn settle_withdrawal(
        &self,
        ledger: &mut Ledger,
        amount: Amount,
        agent: &AgentName,
    ) -> WithdrawOutcome {
        if ledger.balance < amount {
            self.emit(&[event_format::blocked_line(agent, amount)]);
            return WithdrawOutcome::InsufficientFunds {
                balance: ledger.balance,
            };
        }

        ledger.balance -= amount;
        ledger.transaction_count += 1;
        let balance = ledger.balance;
        let transaction = ledger.transaction_count;

        let flagged = self.policy.is_flagged(TransactionKind::Withdrawal, amount);
        let mut lines = vec![event_format::withdrawal_line(agent, amount, balance, transaction)];
        if flagged {
            lines.extend(event_format::flagged_banner(
                TransactionKind::Withdrawal,
                agent,
                self.policy.withdrawal_threshold,
            ));
        }
        self.emit(&lines);
        if flagged {
            self.record_flagged(TransactionKind::Withdrawal, agent, amount, transaction);
        }

        self.funds_changed.notify_all();
        WithdrawOutcome::Completed {
            transaction,
            balance,
            flagged,
        }
    }

    // Called with the ledger lock held.
    fn emit(&self, lines: &[String]) {
        if let Err(e) = self.sink.write_lines(lines) {
            tracing::warn!(
                error = %SimulationError::sink_write(&e),
                "event line lost; account state is unaffected"
            );
        }
    }

    // Called with the ledger lock held.
    fn record_flagged(
        &self,
        kind: TransactionKind,
        agent: &AgentName,
        amount: Amount,
        transaction: TransactionNumber,
    ) {
        let record = JournalRecord {
            kind,
            agent: agent.clone(),
            amount,
            timestamp: Local::now().naive_local(),
            transaction_number: transaction,
        };
        if let Err(e) = self.journal.append(&record) {
            tracing::error!(error = %e, transaction, "flagged transaction not journaled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::replay;
    use crate::test_support::SharedBuffer;
    use std::fs;
    use std::thread;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        dir: TempDir,
        account: Arc<Account>,
        console: SharedBuffer,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let console = SharedBuffer::new();
            let sink = Arc::new(
                DualSink::with_console(dir.path().join("output.txt"), Box::new(console.clone()))
                    .unwrap(),
            );
            let account =
                Arc::new(Account::new(sink, dir.path().join("transactions.csv")).unwrap());
            Self {
                dir,
                account,
                console,
            }
        }

        fn journal_lines(&self) -> Vec<String> {
            fs::read_to_string(self.dir.path().join("transactions.csv"))
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn dt(n: u32) -> AgentName {
        AgentName::worker(format!("DT{}", n))
    }

    fn wt(n: u32) -> AgentName {
        AgentName::worker(format!("WT{}", n))
    }

    #[test]
    fn test_new_account_is_empty() {
        let fixture = Fixture::new();
        assert_eq!(fixture.account.snapshot(), Snapshot::default());
        assert!(fixture.journal_lines().is_empty());
    }

    #[test]
    fn test_single_depositor_sequence() {
        let fixture = Fixture::new();

        for amount in [100, 400, 50] {
            fixture.account.deposit(amount, &dt(1)).unwrap();
        }

        assert_eq!(
            fixture.account.snapshot(),
            Snapshot {
                balance: 550,
                transaction_count: 3
            }
        );
        let journal = fixture.journal_lines();
        assert_eq!(journal.len(), 1);
        assert!(journal[0].starts_with("\tDepositor Agent DT1 issued deposit of $400 at "));
        assert!(journal[0].ends_with("EST Transaction Number : 2"));
        assert!(!fixture.console.contents().contains("withdraws"));
    }

    #[test]
    fn test_withdraw_before_deposit() {
        let fixture = Fixture::new();

        let first = fixture.account.withdraw(10, &wt(1)).unwrap();
        let receipt = fixture.account.deposit(20, &dt(1)).unwrap();
        let second = fixture.account.withdraw(10, &wt(1)).unwrap();

        assert_eq!(first, WithdrawOutcome::InsufficientFunds { balance: 0 });
        assert_eq!(receipt.transaction, 1);
        assert_eq!(
            second,
            WithdrawOutcome::Completed {
                transaction: 2,
                balance: 10,
                flagged: false
            }
        );
        assert_eq!(
            fixture.account.snapshot(),
            Snapshot {
                balance: 10,
                transaction_count: 2
            }
        );

        let output = fixture.console.contents();
        let blocked = output.find("WITHDRAWAL BLOCKED").unwrap();
        let deposit = output.find("(+) Balance is $20").unwrap();
        let success = output.find("(-) Balance is $10").unwrap();
        assert!(blocked < deposit && deposit < success);
        assert!(fixture.journal_lines().is_empty());
    }

    #[test]
    fn test_flag_thresholds_are_strict() {
        let fixture = Fixture::new();

        assert!(!fixture.account.deposit(350, &dt(1)).unwrap().flagged);
        assert!(fixture.account.deposit(351, &dt(2)).unwrap().flagged);
        let at = fixture.account.withdraw(75, &wt(1)).unwrap();
        let above = fixture.account.withdraw(76, &wt(2)).unwrap();

        assert!(matches!(at, WithdrawOutcome::Completed { flagged: false, .. }));
        assert!(matches!(above, WithdrawOutcome::Completed { flagged: true, .. }));

        let journal = fixture.journal_lines();
        assert_eq!(journal.len(), 2);
        assert!(journal[0].contains("Depositor Agent DT2 issued deposit of $351"));
        assert!(journal[0].ends_with("Transaction Number : 2"));
        assert!(journal[1].starts_with("Withdrawal Agent WT2 issued withdraw of $76"));
        assert!(journal[1].ends_with("Transaction Number : 4"));
        assert_eq!(
            fixture
                .console
                .contents()
                .matches("*** Flagged Transaction")
                .count(),
            2
        );
    }

    #[test]
    fn test_blocked_flagged_amount_is_not_journaled() {
        let fixture = Fixture::new();

        let outcome = fixture.account.withdraw(99, &wt(3)).unwrap();

        assert!(!outcome.is_completed());
        assert!(fixture.journal_lines().is_empty());
        assert!(!fixture.console.contents().contains("Flagged"));
    }

    #[test]
    fn test_zero_amounts_are_rejected_without_effect() {
        let fixture = Fixture::new();

        assert!(matches!(
            fixture.account.deposit(0, &dt(1)),
            Err(SimulationError::InvalidAmount { .. })
        ));
        assert!(matches!(
            fixture.account.withdraw(0, &wt(1)),
            Err(SimulationError::InvalidAmount { .. })
        ));
        assert_eq!(fixture.account.snapshot(), Snapshot::default());
        assert_eq!(fixture.console.contents(), "");
    }

    #[test]
    fn test_overflowing_deposit_leaves_state_untouched() {
        let fixture = Fixture::new();
        fixture.account.deposit(u64::MAX, &dt(1)).unwrap();

        let result = fixture.account.deposit(1, &dt(1));

        assert_eq!(
            result,
            Err(SimulationError::BalanceOverflow {
                balance: u64::MAX,
                amount: 1
            })
        );
        assert_eq!(fixture.account.snapshot().transaction_count, 1);
    }

    #[test]
    fn test_blocking_withdraw_resumes_after_deposit() {
        let fixture = Fixture::new();
        let account = Arc::clone(&fixture.account);

        let waiter = thread::spawn(move || {
            account.withdraw_when_funded(60, &wt(1), Duration::from_secs(10))
        });
        thread::sleep(Duration::from_millis(50));
        fixture.account.deposit(100, &dt(1)).unwrap();

        let outcome = waiter.join().unwrap().unwrap();
        assert_eq!(
            outcome,
            WithdrawOutcome::Completed {
                transaction: 2,
                balance: 40,
                flagged: false
            }
        );
        assert!(!fixture.console.contents().contains("BLOCKED"));
    }

    #[test]
    fn test_blocking_withdraw_times_out_as_blocked() {
        let fixture = Fixture::new();
        fixture.account.deposit(5, &dt(1)).unwrap();

        let outcome = fixture
            .account
            .withdraw_when_funded(60, &wt(1), Duration::from_millis(20))
            .unwrap();

        assert_eq!(outcome, WithdrawOutcome::InsufficientFunds { balance: 5 });
        assert!(fixture.console.contents().contains("WITHDRAWAL BLOCKED"));
    }

    #[test]
    fn test_blocking_withdraw_with_unbounded_timeout() {
        let fixture = Fixture::new();
        let account = Arc::clone(&fixture.account);

        let waiter =
            thread::spawn(move || account.withdraw_when_funded(30, &wt(2), Duration::MAX));
        thread::sleep(Duration::from_millis(50));
        fixture.account.deposit(10, &dt(1)).unwrap();
        thread::sleep(Duration::from_millis(20));
        fixture.account.deposit(25, &dt(1)).unwrap();

        let outcome = waiter.join().unwrap().unwrap();
        assert_eq!(
            outcome,
            WithdrawOutcome::Completed {
                transaction: 3,
                balance: 5,
                flagged: false
            }
        );
    }

    #[test]
    fn test_concurrent_operations_form_a_replayable_stream() {
        let fixture = Fixture::new();

        let mut handles = vec![];
        for worker in 0..4u32 {
            let account = Arc::clone(&fixture.account);
            handles.push(thread::spawn(move || {
                for i in 0..50u64 {
                    account.deposit(1 + (i * 37 + worker as u64) % 500, &dt(worker)).unwrap();
                }
            }));
            let account = Arc::clone(&fixture.account);
            handles.push(thread::spawn(move || {
                for i in 0..50u64 {
                    let _ = account.withdraw(1 + (i * 13) % 100, &wt(worker)).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = fixture.account.snapshot();
        let file_stream = fs::read_to_string(fixture.dir.path().join("output.txt")).unwrap();
        assert_eq!(file_stream, fixture.console.contents());

        let summary = replay(&file_stream).unwrap();
        assert_eq!(summary.balance, snapshot.balance);
        assert_eq!(summary.transactions, snapshot.transaction_count);
        assert_eq!(summary.blocked + summary.transactions, 400);
        assert_eq!(summary.flagged as usize, fixture.journal_lines().len());
    }
}
