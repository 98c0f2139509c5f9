//! `guestlist` - Guest-list management for event planning
//!
//! This library keeps an ordered list of guests, validates additions and
//! edits, tracks confirmation and RSVP status, and derives filtered views and
//! summary statistics. The list is saved as one JSON value in a key-value
//! store after every change.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod guest;
pub mod logging;
pub mod storage;
pub mod store;
pub mod summary;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::{visible, FilterMode};
pub use guest::{Guest, GuestDraft, GuestId};
pub use logging::init_logging;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageStats};
pub use store::{GuestStore, PendingAction};
pub use summary::Summary;
pub use validation::{validate, FieldError, ValidationErrors};
