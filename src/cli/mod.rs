// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::CliArgs;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Every option has a default, so running without arguments reproduces the
/// fixed simulation. On invalid arguments or `--help`, clap prints the error
/// or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
