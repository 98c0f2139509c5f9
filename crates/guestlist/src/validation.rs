//! Field validation for guest drafts.
//!
//! Validation is pure: it reports per-field problems and leaves the decision
//! to block a mutation to the caller.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::guest::GuestDraft;

/// Loose `local@domain` shape. Not RFC 5322; `a@b` is accepted.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+").expect("email pattern is a valid regex"));

/// A problem with a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    /// The name is blank.
    NameRequired,
    /// The email is blank.
    EmailRequired,
    /// The email does not look like `local@domain`.
    EmailInvalid,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "Name is required"),
            Self::EmailRequired => write!(f, "Email is required"),
            Self::EmailInvalid => write!(f, "Email is invalid"),
        }
    }
}

/// Per-field validation results. Empty means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    /// Problem with the name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldError>,
    /// Problem with the email, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<FieldError>,
}

impl ValidationErrors {
    /// True when no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Iterate over `(field, error)` pairs that are set.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FieldError)> {
        [("name", self.name), ("email", self.email)]
            .into_iter()
            .filter_map(|(field, err)| err.map(|e| (field, e)))
    }

    /// Convert into a `Result`, failing when any field has an error.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field is invalid.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, err) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {err}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validate a guest draft.
#[must_use]
pub fn validate(draft: &GuestDraft) -> ValidationErrors {
    let name = draft
        .name
        .trim()
        .is_empty()
        .then_some(FieldError::NameRequired);

    let email = draft.email.trim();
    let email = if email.is_empty() {
        Some(FieldError::EmailRequired)
    } else if !EMAIL_SHAPE.is_match(email) {
        Some(FieldError::EmailInvalid)
    } else {
        None
    };

    ValidationErrors { name, email }
}
