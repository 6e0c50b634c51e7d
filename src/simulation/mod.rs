//! Simulation harness
//!
//! Constructs the account, spawns the agents, bounds the run and requests
//! shutdown.
//!
//! # Architecture
//!
//! ```text
//! Simulation
//!     ├── SimulationConfig (paths, duration, agent counts, seed, threads)
//!     ├── DualSink          (console + output.txt)
//!     ├── Account           (lock, condition, counter, journal)
//!     └── Agent x N         (tokio tasks sharing one CancellationToken)
//! ```
//!
//! # Startup and shutdown
//!
//! 1. The dual sink truncates `output.txt`; failure is fatal
//! 2. The account truncates `transactions.csv`; failure is fatal
//! 3. The header is printed (both files are empty at this point)
//! 4. Agents are spawned: withdrawal agents, auditors, depositors
//! 5. After `duration` the token is cancelled, interrupting every pause
//! 6. Agents are joined within `grace_period`; stragglers are aborted
//! 7. The footer with the final snapshot is printed

pub mod config;

pub use config::{SimulationConfig, DEFAULT_GRACE_PERIOD, DEFAULT_OUTPUT_PATH};

use crate::agents::{Agent, AgentSummary};
use crate::core::Account;
use crate::io::event_format::{footer_lines, header_lines};
use crate::io::{replay, DualSink, ReplaySummary};
use crate::types::{SimulationError, Snapshot};
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    /// Account state after every agent stopped
    pub final_snapshot: Snapshot,
    /// Summaries of the agents that were joined
    pub agents: Vec<AgentSummary>,
    /// Agents that had to be aborted or whose task failed
    pub workers_aborted: usize,
}

impl SimulationReport {
    /// Number of agents that stopped cleanly
    pub fn workers_joined(&self) -> usize {
        self.agents.len()
    }

    /// Replay a recorded event stream and check it ends at `final_snapshot`
    ///
    /// # Errors
    ///
    /// - any error from [`replay`] if the stream is malformed or inconsistent
    /// - [`SimulationError::TransactionCountMismatch`] if the stream holds a
    ///   different number of committed transactions than the account
    /// - [`SimulationError::FinalBalanceMismatch`] if the replayed balance differs
    pub fn verify_stream(&self, stream: &str) -> Result<ReplaySummary, SimulationError> {
        let summary = replay(stream)?;

        if summary.transactions != self.final_snapshot.transaction_count {
            return Err(SimulationError::TransactionCountMismatch {
                replayed: summary.transactions,
                account: self.final_snapshot.transaction_count,
            });
        }
        if summary.balance != self.final_snapshot.balance {
            return Err(SimulationError::FinalBalanceMismatch {
                replayed: summary.balance,
                account: self.final_snapshot.balance,
            });
        }
        Ok(summary)
    }
}

/// Bounded-duration simulation of agents sharing one account
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    /// Create a simulation with the given configuration
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run on a dedicated multi-threaded runtime, printing to stdout and
    /// `output_path`
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidConfig`] if the configuration is rejected
    /// - [`SimulationError::Runtime`] if the runtime cannot be built
    /// - [`SimulationError::OutputFileOpen`] / [`SimulationError::JournalFileOpen`]
    ///   if either file cannot be created; no agent is spawned in that case
    pub fn run(&self) -> Result<SimulationReport, SimulationError> {
        self.config.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .enable_time()
            .build()
            .map_err(|e| SimulationError::runtime(format!("failed to create tokio runtime: {}", e)))?;

        let sink = Arc::new(DualSink::create(&self.config.output_path)?);
        runtime.block_on(self.execute(sink))
    }

    /// Run inside the current runtime, writing events through `sink`
    pub async fn execute(&self, sink: Arc<DualSink>) -> Result<SimulationReport, SimulationError> {
        let account = Arc::new(Account::new(Arc::clone(&sink), &self.config.journal_path)?);
        sink.write_lines(header_lines())
            .map_err(|e| SimulationError::sink_write(&e))?;

        let cancel = CancellationToken::new();
        let mut handles = Vec::with_capacity(self.config.agent_count());
        for (spawn_index, (role, index)) in self.config.spawn_plan().into_iter().enumerate() {
            let rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(spawn_index as u64)),
                None => StdRng::from_entropy(),
            };
            let agent = Agent::new(role.agent_name(index), role, Arc::clone(&account), rng);
            handles.push(tokio::spawn(agent.run(cancel.clone())));
        }
        tracing::info!(
            agents = handles.len(),
            duration_ms = self.config.duration.as_millis() as u64,
            "simulation started"
        );

        tokio::time::sleep(self.config.duration).await;
        tracing::info!("cancellation requested");
        cancel.cancel();

        let abort_handles: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();
        let expected = handles.len();
        let (agents, workers_aborted) =
            match tokio::time::timeout(self.config.grace_period, join_all(handles)).await {
                Ok(results) => {
                    let mut agents = Vec::with_capacity(results.len());
                    let mut failed = 0;
                    for result in results {
                        match result {
                            Ok(summary) => agents.push(summary),
                            Err(e) => {
                                tracing::warn!(error = %e, "agent task failed");
                                failed += 1;
                            }
                        }
                    }
                    (agents, failed)
                }
                Err(_) => {
                    for handle in abort_handles {
                        handle.abort();
                    }
                    tracing::warn!(
                        grace_ms = self.config.grace_period.as_millis() as u64,
                        "agents did not stop within the grace period and were aborted"
                    );
                    (Vec::new(), expected)
                }
            };

        let final_snapshot = account.snapshot();
        sink.write_lines(footer_lines(final_snapshot))
            .map_err(|e| SimulationError::sink_write(&e))?;
        tracing::info!(
            joined = agents.len(),
            aborted = workers_aborted,
            balance = final_snapshot.balance,
            transactions = final_snapshot.transaction_count,
            "simulation finished"
        );

        Ok(SimulationReport {
            final_snapshot,
            agents,
            workers_aborted,
        })
    }
}
