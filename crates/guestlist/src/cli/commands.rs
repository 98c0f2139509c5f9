//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::FilterMode;
use crate::guest::{Guest, GuestDraft};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Guest name
    pub name: String,

    /// Guest email
    pub email: String,

    /// Phone number
    #[arg(short, long)]
    pub phone: Option<String>,

    /// Dietary preferences, accessibility needs, or other notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl AddCommand {
    /// The draft described by these arguments.
    #[must_use]
    pub fn draft(&self) -> GuestDraft {
        GuestDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show guests whose name or email contains this text
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Which guests to show (defaults to the configured filter)
    #[arg(short, long, value_enum)]
    pub filter: Option<FilterArg>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// A guest reference by id or unique id prefix.
#[derive(Debug, Args)]
pub struct GuestArg {
    /// Guest id (a unique prefix is enough)
    pub id: String,
}

/// Edit command arguments. Omitted fields keep their current value.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Guest id (a unique prefix is enough)
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New email
    #[arg(long)]
    pub email: Option<String>,

    /// New phone number (empty string clears it)
    #[arg(long)]
    pub phone: Option<String>,

    /// New notes (empty string clears them)
    #[arg(long)]
    pub notes: Option<String>,
}

impl EditCommand {
    /// True when no field was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.notes.is_none()
    }

    /// The guest's current values with the given fields replaced.
    #[must_use]
    pub fn patch(&self, current: &Guest) -> GuestDraft {
        let mut draft = GuestDraft::from_guest(current);
        if let Some(name) = &self.name {
            draft.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            draft.email.clone_from(email);
        }
        if let Some(phone) = &self.phone {
            draft.phone = Some(phone.clone());
        }
        if let Some(notes) = &self.notes {
            draft.notes = Some(notes.clone());
        }
        draft
    }
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Guest id (a unique prefix is enough)
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Filter mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Every guest
    All,
    /// Confirmed guests only
    Confirmed,
    /// Unconfirmed guests only
    Unconfirmed,
    /// Guests who sent an RSVP
    RsvpYes,
    /// Guests who have not sent an RSVP
    RsvpNo,
}

impl From<FilterArg> for FilterMode {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Confirmed => Self::Confirmed,
            FilterArg::Unconfirmed => Self::Unconfirmed,
            FilterArg::RsvpYes => Self::RsvpYes,
            FilterArg::RsvpNo => Self::RsvpNo,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per guest
    Plain,
    /// Aligned columns
    #[default]
    Table,
    /// JSON output
    Json,
}
