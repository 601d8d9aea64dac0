use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Pairs players into timed two-player board sessions over TCP")]
pub struct Cli {
    /// Log filter (e.g. info, debug, duel=trace). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Configuration file to use instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Accept players and run sessions until interrupted
    ///
    /// Examples:
    ///   duel serve
    ///   duel serve --bind 0.0.0.0:9000 --clock-ticks 300
    Serve {
        /// Address to listen on (overrides the configuration file)
        #[arg(short, long)]
        bind: Option<String>,
        /// Starting clock value per side, in ticks
        #[arg(long)]
        clock_ticks: Option<u32>,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the default configuration file path
    Path,
    /// Print the effective configuration as TOML
    Show,
}
