//! # matchannels CLI
//!
//! Inspect and export the channels of MATLAB MAT-files.
//!
//! ## Usage
//!
//! ```bash
//! # List every variable record with its class and shape
//! matchannels list session.mat
//!
//! # Load the channels matching a pattern and print statistics
//! matchannels info session.mat -p '(?<!team_)pmanifold|anathrott|rpm'
//!
//! # Export the selected channels as CSV columns
//! matchannels export session.mat channels.csv -p rpm
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
