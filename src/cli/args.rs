use crate::io::DEFAULT_JOURNAL_PATH;
use crate::simulation::{SimulationConfig, DEFAULT_OUTPUT_PATH};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Simulate depositors, withdrawal agents and auditors sharing one bank account
#[derive(Parser, Debug)]
#[command(name = "bank-simulator")]
#[command(about = "Simulate concurrent agents sharing one bank account", long_about = None)]
pub struct CliArgs {
    /// How long the agents run before shutdown is requested
    #[arg(
        long = "duration-secs",
        value_name = "SECONDS",
        default_value_t = 60,
        help = "Wall-clock bound on the simulation in seconds"
    )]
    pub duration_secs: u64,

    /// Dual-sink output file
    #[arg(
        long = "output",
        value_name = "PATH",
        default_value = DEFAULT_OUTPUT_PATH,
        help = "File that receives every line printed to the console"
    )]
    pub output: PathBuf,

    /// Flagged-transaction journal
    #[arg(
        long = "journal",
        value_name = "PATH",
        default_value = DEFAULT_JOURNAL_PATH,
        help = "File that receives one line per flagged transaction"
    )]
    pub journal: PathBuf,

    /// Number of depositor agents
    #[arg(long = "depositors", value_name = "COUNT", default_value_t = 5)]
    pub depositors: usize,

    /// Number of withdrawal agents
    #[arg(long = "withdrawers", value_name = "COUNT", default_value_t = 10)]
    pub withdrawers: usize,

    /// Number of auditors
    #[arg(long = "auditors", value_name = "COUNT", default_value_t = 2)]
    pub auditors: usize,

    /// Seed for reproducible amounts and pauses
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Runtime worker threads
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Replay the output file after shutdown and check it against the account
    #[arg(long = "verify")]
    pub verify: bool,
}

impl CliArgs {
    /// Build a SimulationConfig from the CLI arguments
    ///
    /// Unset options keep the defaults of [`SimulationConfig`]; a zero thread
    /// count falls back to the default with a warning.
    pub fn to_simulation_config(&self) -> SimulationConfig {
        let config = SimulationConfig {
            output_path: self.output.clone(),
            journal_path: self.journal.clone(),
            duration: Duration::from_secs(self.duration_secs),
            depositors: self.depositors,
            withdrawers: self.withdrawers,
            auditors: self.auditors,
            seed: self.seed,
            ..SimulationConfig::default()
        };

        match self.worker_threads {
            Some(threads) => config.with_worker_threads(threads),
            None => config,
        }
    }
}
