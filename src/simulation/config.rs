//! Simulation configuration
//!
//! `SimulationConfig` collects everything the harness needs: file locations,
//! the wall-clock bound, how many agents of each role to spawn, the RNG seed
//! and the size of the runtime's thread pool. `Default` reproduces the fixed
//! setup of the simulator (10 withdrawal agents, 2 auditors, 5 depositors,
//! 60 seconds).

use crate::agents::AgentRole;
use crate::io::DEFAULT_JOURNAL_PATH;
use crate::types::SimulationError;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the dual-sink output file
pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";

/// Default wall-clock bound on a run
pub const DEFAULT_DURATION: Duration = Duration::from_secs(60);

/// How long the harness waits for cancelled agents before aborting them
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Configuration for one simulation run
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// File half of the dual sink (truncated at startup)
    pub output_path: PathBuf,
    /// Flagged-transaction journal (truncated at startup)
    pub journal_path: PathBuf,
    /// How long agents run before cancellation is requested
    pub duration: Duration,
    /// Bound on joining agents after cancellation
    pub grace_period: Duration,
    /// Number of depositor agents
    pub depositors: usize,
    /// Number of withdrawal agents
    pub withdrawers: usize,
    /// Number of auditors
    pub auditors: usize,
    /// Base seed; agent `i` in spawn order uses `seed + i`
    pub seed: Option<u64>,
    /// Runtime worker threads
    pub worker_threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            journal_path: PathBuf::from(DEFAULT_JOURNAL_PATH),
            duration: DEFAULT_DURATION,
            grace_period: DEFAULT_GRACE_PERIOD,
            depositors: 5,
            withdrawers: 10,
            auditors: 2,
            seed: None,
            worker_threads: num_cpus::get(),
        }
    }
}

impl SimulationConfig {
    /// Set the runtime thread count, falling back to the default for zero
    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = if worker_threads == 0 {
            let fallback = num_cpus::get();
            tracing::warn!(
                requested = worker_threads,
                fallback,
                "invalid worker thread count, using default"
            );
            fallback
        } else {
            worker_threads
        };
        self
    }

    /// Reject configurations the harness cannot run
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] for a zero duration or a
    /// zero thread count.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.duration.is_zero() {
            return Err(SimulationError::invalid_config(
                "duration must be greater than zero",
            ));
        }
        if self.worker_threads == 0 {
            return Err(SimulationError::invalid_config(
                "worker_threads must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Total number of agents
    pub fn agent_count(&self) -> usize {
        self.depositors + self.withdrawers + self.auditors
    }

    /// Agents to spawn, in order: withdrawal agents, auditors, depositors
    ///
    /// Each entry is the role and the agent's 1-based index within it.
    pub fn spawn_plan(&self) -> Vec<(AgentRole, usize)> {
        let mut plan = Vec::with_capacity(self.agent_count());
        for (role, count) in [
            (AgentRole::Withdrawal, self.withdrawers),
            (AgentRole::Auditor, self.auditors),
            (AgentRole::Depositor, self.depositors),
        ] {
            plan.extend((1..=count).map(|index| (role, index)));
        }
        plan
    }
}
