use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod export;
mod info;
mod list;

/// matchannels - inspect and export channels of MATLAB MAT-files
#[derive(Parser)]
#[command(name = "matchannels")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the variable records of a MAT-file without loading their data
    List {
        /// Input MAT-file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Load channels and print their names, length and statistics
    Info {
        /// Input MAT-file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Case-insensitive pattern selecting channel names
        #[arg(short = 'p', long)]
        pattern: Option<String>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the selected channels to a CSV file, one column per channel
    Export {
        /// Input MAT-file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Case-insensitive pattern selecting channel names
        #[arg(short = 'p', long)]
        pattern: Option<String>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { file } => list::run(file),
        Commands::Info {
            file,
            pattern,
            config,
            json,
        } => info::run(file, config::resolve(pattern, config.as_deref())?, json),
        Commands::Export {
            input,
            output,
            pattern,
            config,
        } => export::run(input, output, config::resolve(pattern, config.as_deref())?),
    }
}
