//! Core guest types for guestlist.
//!
//! This module defines the persisted guest record, its identifier, and the
//! draft type used to create or edit a guest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters shown when displaying a shortened id.
pub const SHORT_ID_LEN: usize = 8;

/// Opaque unique identifier of a guest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(String);

impl GuestId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading characters of the id, enough to tell guests apart on screen.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0
            .char_indices()
            .nth(SHORT_ID_LEN)
            .map_or(self.0.as_str(), |(idx, _)| &self.0[..idx])
    }
}

impl std::fmt::Display for GuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GuestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GuestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A guest on the list.
///
/// Only durable fields live here. Edit mode is view state and is tracked by
/// [`GuestStore`](crate::store::GuestStore) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    /// Unique identifier, assigned once at creation.
    pub id: GuestId,

    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Optional phone number (free form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Optional notes such as dietary needs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Whether attendance has been confirmed.
    #[serde(default)]
    pub confirmed: bool,

    /// Whether the guest has sent an RSVP.
    #[serde(default)]
    pub rsvp: bool,

    /// When the guest was added.
    pub date_added: DateTime<Utc>,
}

impl Guest {
    /// Build a new, unconfirmed guest from a validated draft.
    pub(crate) fn from_draft(id: GuestId, draft: GuestDraft, date_added: DateTime<Utc>) -> Self {
        let GuestDraft {
            name,
            email,
            phone,
            notes,
        } = draft;
        Self {
            id,
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: normalize_optional(phone),
            notes: normalize_optional(notes),
            confirmed: false,
            rsvp: false,
            date_added,
        }
    }

    /// Merge the editable fields of a validated draft into this guest.
    ///
    /// Name and email are stored trimmed.
    pub(crate) fn apply(&mut self, draft: GuestDraft) {
        self.name = draft.name.trim().to_string();
        self.email = draft.email.trim().to_string();
        self.phone = normalize_optional(draft.phone);
        self.notes = normalize_optional(draft.notes);
    }

    /// Drop blank optional fields from a record read back from storage.
    pub(crate) fn normalized(mut self) -> Self {
        self.phone = normalize_optional(self.phone);
        self.notes = normalize_optional(self.notes);
        self
    }

    /// Case-insensitive match of an already lowercased term against name or email.
    #[must_use]
    pub fn matches_lowercase(&self, term: &str) -> bool {
        term.is_empty()
            || self.name.to_lowercase().contains(term)
            || self.email.to_lowercase().contains(term)
    }
}

/// The user-editable fields of a guest, as entered in a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDraft {
    /// Display name (required).
    pub name: String,
    /// Contact email (required).
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl GuestDraft {
    /// Create a draft with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            notes: None,
        }
    }

    /// Set the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// A draft prefilled with a guest's current values, for editing.
    #[must_use]
    pub fn from_guest(guest: &Guest) -> Self {
        Self {
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone: guest.phone.clone(),
            notes: guest.notes.clone(),
        }
    }
}

/// Blank optional fields are stored as absent.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
