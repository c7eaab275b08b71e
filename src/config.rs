//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "mini-timer-widget")]
#[command(about = "Drive a countdown timer widget from action payloads on stdin")]
#[command(version)]
pub struct Config {
    /// Widget instance id reported with every update
    #[arg(long, default_value = "mini-timer-1")]
    pub widget_id: String,

    /// Snapshot to restore, e.g. '{"RemainingSeconds":120,"State":"paused"}'
    #[arg(short, long, default_value = "")]
    pub initial_state: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
