//! Error types for guestlist.
//!
//! This module defines all error types used throughout the guestlist crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// The main error type for guestlist operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Guest Errors ===
    /// A guest draft or patch failed field validation.
    #[error("invalid guest: {0}")]
    Validation(ValidationErrors),

    /// No guest id starts with the given prefix.
    #[error("no guest matches id '{prefix}'")]
    UnknownGuest {
        /// The id or id prefix that was looked up.
        prefix: String,
    },

    /// More than one guest id starts with the given prefix.
    #[error("id '{prefix}' is ambiguous ({matches} guests match)")]
    AmbiguousGuest {
        /// The id prefix that was looked up.
        prefix: String,
        /// How many guests matched.
        matches: usize,
    },

    /// A destructive operation was confirmed without a matching request.
    #[error("no pending confirmation for {action}")]
    NoPendingConfirmation {
        /// What the caller tried to confirm.
        action: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for guestlist operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Create an unknown guest error.
    #[must_use]
    pub fn unknown_guest(prefix: impl Into<String>) -> Self {
        Self::UnknownGuest {
            prefix: prefix.into(),
        }
    }

    /// Create a missing confirmation error.
    #[must_use]
    pub fn no_pending_confirmation(action: impl Into<String>) -> Self {
        Self::NoPendingConfirmation {
            action: action.into(),
        }
    }

    /// Get the field errors if this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
