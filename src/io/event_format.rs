//! Event stream format for the console and `output.txt`
//!
//! This module centralizes the layout of every line the simulator shows the
//! operator, and the parser used to replay a captured stream:
//! - Header and footer
//! - Deposit, withdrawal and blocked-withdrawal lines
//! - Flagged-transaction and audit banners
//! - Interrupted notices
//!
//! All layout functions are pure (no I/O). Columns are padded to a fixed
//! width and always separated by at least two spaces, so the parser can rely
//! on the textual markers rather than on exact offsets.

use crate::types::{Amount, AgentName, Snapshot, SimulationError, TransactionKind, TransactionNumber};

const DEPOSIT_WIDTH: usize = 36;
const WITHDRAWAL_WIDTH: usize = 36;
const BALANCE_WIDTH: usize = 32;
const TRANSACTION_WIDTH: usize = 18;
const COLUMN_GAP: &str = "  ";

const BLOCKED_MARKER: &str = "(xxxxxx) WITHDRAWAL BLOCKED - INSUFFICIENT FUNDS!!!";
const DEPOSIT_MARKER: &str = " deposits $";
const WITHDRAWAL_MARKER: &str = " withdraws $";
const BALANCE_MARKER: &str = "Balance is $";
const FLAGGED_PREFIX: &str = "*** Flagged Transaction - ";

fn rule_width() -> usize {
    DEPOSIT_WIDTH + WITHDRAWAL_WIDTH + BALANCE_WIDTH + TRANSACTION_WIDTH + 3 * COLUMN_GAP.len()
}

fn row(deposit: &str, withdrawal: &str, balance: &str, transaction: &str) -> String {
    let line = format!(
        "{:<dw$}{gap}{:<ww$}{gap}{:<bw$}{gap}{:>tw$}",
        deposit,
        withdrawal,
        balance,
        transaction,
        dw = DEPOSIT_WIDTH,
        ww = WITHDRAWAL_WIDTH,
        bw = BALANCE_WIDTH,
        tw = TRANSACTION_WIDTH,
        gap = COLUMN_GAP,
    );
    line.trim_end().to_string()
}

/// Header printed once at startup: banner plus a two-row column legend
pub fn header_lines() -> Vec<String> {
    vec![
        "*** SIMULATION BEGINS ***".to_string(),
        String::new(),
        row(
            "Deposit Agents",
            "Withdrawal Agents",
            "Balance",
            "Transaction Number",
        ),
        row(
            "--------------",
            "-----------------",
            "-------------------------",
            "------------------",
        ),
    ]
}

/// Line for a committed deposit
pub fn deposit_line(
    agent: &AgentName,
    amount: Amount,
    balance: Amount,
    transaction: TransactionNumber,
) -> String {
    row(
        &format!("{}{}{}", agent, DEPOSIT_MARKER, amount),
        "",
        &format!("(+) {}{}", BALANCE_MARKER, balance),
        &transaction.to_string(),
    )
}

/// Line for a committed withdrawal
pub fn withdrawal_line(
    agent: &AgentName,
    amount: Amount,
    balance: Amount,
    transaction: TransactionNumber,
) -> String {
    row(
        "",
        &format!("{}{}{}", agent, WITHDRAWAL_MARKER, amount),
        &format!("(-) {}{}", BALANCE_MARKER, balance),
        &transaction.to_string(),
    )
}

/// Line for a refused withdrawal; carries no transaction number
pub fn blocked_line(agent: &AgentName, amount: Amount) -> String {
    row(
        "",
        &format!("{}{}{}", agent, WITHDRAWAL_MARKER, amount),
        BLOCKED_MARKER,
        "",
    )
}

/// Banner printed after a flagged transaction's event line
pub fn flagged_banner(kind: TransactionKind, agent: &AgentName, threshold: Amount) -> Vec<String> {
    let made = match kind {
        TransactionKind::Deposit => "Made A Deposit",
        TransactionKind::Withdrawal => "Made A Withdrawal",
    };
    vec![
        String::new(),
        format!(
            "{}{} Agent {} {} In Excess Of ${} USD - See Flagged Transaction Log.",
            FLAGGED_PREFIX,
            kind.role(),
            agent.id(),
            made,
            threshold
        ),
        String::new(),
    ]
}

/// Audit banner framed by separator rows
pub fn audit_banner(auditor: &AgentName, snapshot: Snapshot, since_last: TransactionNumber) -> Vec<String> {
    let rule = "*".repeat(rule_width());
    vec![
        rule.clone(),
        format!(
            " - {} AUDITOR FINDS CURRENT ACCOUNT BALANCE TO BE: ${}. Number of transactions since last audit: {}",
            auditor, snapshot.balance, since_last
        ),
        rule,
    ]
}

/// Notice printed by an agent that was cancelled while sleeping
pub fn interrupted_line(agent: &str) -> String {
    format!("{} interrupted - shutting down.", agent)
}

/// Footer printed after every worker has been joined
pub fn footer_lines(snapshot: Snapshot) -> Vec<String> {
    vec![
        String::new(),
        "*** SIMULATION ENDS ***".to_string(),
        format!(
            "Final balance is ${} after {} transactions.",
            snapshot.balance, snapshot.transaction_count
        ),
    ]
}

/// A state-changing event recovered from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Committed deposit
    Deposit {
        agent: String,
        amount: Amount,
        balance: Amount,
        transaction: TransactionNumber,
    },
    /// Committed withdrawal
    Withdrawal {
        agent: String,
        amount: Amount,
        balance: Amount,
        transaction: TransactionNumber,
    },
    /// Refused withdrawal
    Blocked { agent: String, amount: Amount },
}

fn leading_number(text: &str) -> Option<u64> {
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn split_agent<'a>(line: &'a str, marker: &str) -> Option<(&'a str, Amount)> {
    let position = line.find(marker)?;
    let agent = line[..position].trim();
    let amount = leading_number(&line[position + marker.len()..])?;
    Some((agent, amount))
}

fn committed_parts(line: &str, marker: &str) -> Option<(String, Amount, Amount, TransactionNumber)> {
    let (agent, amount) = split_agent(line, marker)?;
    let balance_at = line.find(BALANCE_MARKER)?;
    let balance = leading_number(&line[balance_at + BALANCE_MARKER.len()..])?;
    let transaction = line.split_whitespace().last()?.parse().ok()?;
    Some((agent.to_string(), amount, balance, transaction))
}

/// Parse one line of the stream
///
/// Returns `Ok(None)` for lines that are not state-changing events (header,
/// banners, audits, notices).
///
/// # Errors
///
/// Returns [`SimulationError::MalformedEvent`] if a line carries an event
/// marker but its fields cannot be read.
pub fn parse_event_line(line: &str) -> Result<Option<LedgerEvent>, SimulationError> {
    let malformed = || SimulationError::MalformedEvent {
        line: line.to_string(),
    };

    if line.contains(BLOCKED_MARKER) {
        let (agent, amount) = split_agent(line, WITHDRAWAL_MARKER).ok_or_else(malformed)?;
        return Ok(Some(LedgerEvent::Blocked {
            agent: agent.to_string(),
            amount,
        }));
    }

    if line.contains(DEPOSIT_MARKER) {
        let (agent, amount, balance, transaction) =
            committed_parts(line, DEPOSIT_MARKER).ok_or_else(malformed)?;
        return Ok(Some(LedgerEvent::Deposit {
            agent,
            amount,
            balance,
            transaction,
        }));
    }

    if line.contains(WITHDRAWAL_MARKER) {
        let (agent, amount, balance, transaction) =
            committed_parts(line, WITHDRAWAL_MARKER).ok_or_else(malformed)?;
        return Ok(Some(LedgerEvent::Withdrawal {
            agent,
            amount,
            balance,
            transaction,
        }));
    }

    Ok(None)
}

/// Totals obtained by replaying a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Balance after the last committed operation
    pub balance: Amount,
    /// Number of committed operations
    pub transactions: TransactionNumber,
    /// Number of refused withdrawals
    pub blocked: u64,
    /// Number of flagged-transaction banners
    pub flagged: u64,
}

/// Replay a captured event stream
///
/// Transaction numbers must run 1, 2, 3, ... without gaps, and re-applying
/// every committed operation in stream order must reproduce the balance
/// printed on each line.
///
/// # Errors
///
/// - [`SimulationError::StreamGap`] when a transaction number is skipped or repeated
/// - [`SimulationError::ReplayMismatch`] when a printed balance disagrees with the replay
/// - [`SimulationError::MalformedEvent`] when an event line cannot be parsed
pub fn replay(stream: &str) -> Result<ReplaySummary, SimulationError> {
    let mut summary = ReplaySummary::default();

    for line in stream.lines() {
        if line.starts_with(FLAGGED_PREFIX) {
            summary.flagged += 1;
            continue;
        }

        let (amount, printed, transaction, kind) = match parse_event_line(line)? {
            None => continue,
            Some(LedgerEvent::Blocked { .. }) => {
                summary.blocked += 1;
                continue;
            }
            Some(LedgerEvent::Deposit {
                amount,
                balance,
                transaction,
                ..
            }) => (amount, balance, transaction, TransactionKind::Deposit),
            Some(LedgerEvent::Withdrawal {
                amount,
                balance,
                transaction,
                ..
            }) => (amount, balance, transaction, TransactionKind::Withdrawal),
        };

        let expected = summary.transactions + 1;
        if transaction != expected {
            return Err(SimulationError::StreamGap {
                expected,
                found: transaction,
            });
        }

        let next = match kind {
            TransactionKind::Deposit => summary.balance.checked_add(amount),
            TransactionKind::Withdrawal => summary.balance.checked_sub(amount),
        };
        match next {
            Some(balance) if balance == printed => summary.balance = balance,
            Some(balance) => {
                return Err(SimulationError::ReplayMismatch {
                    transaction,
                    expected: balance,
                    found: printed,
                })
            }
            None => {
                return Err(SimulationError::ReplayMismatch {
                    transaction,
                    expected: summary.balance,
                    found: printed,
                })
            }
        }
        summary.transactions = transaction;
    }

    Ok(summary)
}
