//! Command-line interface for guestlist.
//!
//! This module provides the CLI structure for the `guests` binary and the
//! text rendering its commands print.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, EditCommand, FilterArg, GuestArg, ListCommand,
    OutputFormat, RemoveCommand, StatusCommand, SummaryCommand,
};

/// guests - Keep track of who is coming
///
/// Add guests, confirm attendance, track RSVPs, and see at a glance how
/// your event is shaping up.
#[derive(Debug, Parser)]
#[command(name = "guests")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a guest
    Add(AddCommand),

    /// List guests, optionally searched and filtered
    #[command(alias = "ls")]
    List(ListCommand),

    /// Toggle a guest's confirmed status
    Confirm(GuestArg),

    /// Toggle a guest's RSVP
    Rsvp(GuestArg),

    /// Change a guest's details
    Edit(EditCommand),

    /// Remove a guest
    #[command(alias = "rm")]
    Remove(RemoveCommand),

    /// Remove every guest
    Clear(ClearCommand),

    /// Show totals, percentages and recently added guests
    Summary(SummaryCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
