//! # Steward Application Entry Point
//!
//! Command-line front end for the schema registry and quality checks.
//!
//! ## Application Flow
//!
//! ```text
//! main()
//!   │
//!   ├─> Initialize logging (tracing, stderr)
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   │
//!   └─> Dispatch the subcommand and map its outcome to an exit code
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: success; for `check` and `naming`, everything passed
//! - `1`: quality or naming findings, or an operational failure (reported
//!   on stderr)
//! - `2`: usage errors, from clap

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Command output belongs on stdout

mod cli;

use std::process::ExitCode;

use clap::Parser as _;
use steward::logging;

fn main() -> ExitCode {
    logging::init();

    let cli = cli::Cli::parse();
    match cli::run_command(cli.command) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(1)
        }
    }
}
