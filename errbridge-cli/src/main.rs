//! ## errbridge-cli
//! **Operator tooling for the error-reporting bridge**
//!
//! Checks settings, prints the head markup a page would receive, and runs the
//! bridge against an in-memory client to see what a host would report.

use clap::Parser;
use errbridge_telemetry::logging::EventLogger;

mod commands;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    EventLogger::init();
    let cli = Cli::parse();
    commands::run_command(cli)
}
