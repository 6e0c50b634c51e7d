//! Bank Account Simulator CLI
//!
//! Runs depositors, withdrawal agents and auditors against one shared account
//! for a bounded time, printing every event to the console and `output.txt`
//! and journaling flagged transactions to `transactions.csv`.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --duration-secs 10 --seed 42 --verify
//! RUST_LOG=bank_simulator=debug cargo run
//! ```
//!
//! # Exit Codes
//!
//! - 0: Normal shutdown
//! - 1: Error (output or journal file cannot be created, invalid options,
//!   or `--verify` found an inconsistent stream)

use bank_simulator::cli;
use bank_simulator::simulation::{Simulation, SimulationReport};
use bank_simulator::SimulationError;
use std::fs;
use std::path::Path;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bank_simulator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();
    let simulation = Simulation::new(args.to_simulation_config());

    let result = simulation.run().and_then(|report| {
        if args.verify {
            verify(&simulation.config().output_path, &report)?;
        }
        Ok(())
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn verify(output_path: &Path, report: &SimulationReport) -> Result<(), SimulationError> {
    let stream = fs::read_to_string(output_path)?;
    let summary = report.verify_stream(&stream)?;

    tracing::info!(
        balance = summary.balance,
        transactions = summary.transactions,
        blocked = summary.blocked,
        flagged = summary.flagged,
        "output stream verified"
    );
    Ok(())
}
