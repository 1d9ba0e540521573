//! CLI module for the interview prep service
//!
//! Provides subcommands for running the service:
//! - `serve`: HTTP API server (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// Interview prep - flashcard question service
#[derive(Parser)]
#[command(name = "interview-prep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API server (default mode)
    #[default]
    Serve,
}

impl Cli {
    /// Subcommand to run; `serve` when none is given
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}
