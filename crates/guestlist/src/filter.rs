//! Search and filter over the guest list.
//!
//! [`visible`] is a pure, stable filter: output keeps the input order.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::guest::Guest;

/// Which guests a list view shows, applied after the search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum FilterMode {
    /// Every guest.
    #[default]
    All,
    /// Guests whose attendance is confirmed.
    Confirmed,
    /// Guests whose attendance is not confirmed.
    Unconfirmed,
    /// Guests who have sent an RSVP.
    RsvpYes,
    /// Guests who have not sent an RSVP.
    RsvpNo,
}

impl FilterMode {
    /// All modes, in selector order.
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Confirmed,
        Self::Unconfirmed,
        Self::RsvpYes,
        Self::RsvpNo,
    ];

    /// Parse a mode name. Unknown names fall back to [`FilterMode::All`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "all" => Self::All,
            "confirmed" => Self::Confirmed,
            "unconfirmed" => Self::Unconfirmed,
            "rsvp-yes" => Self::RsvpYes,
            "rsvp-no" => Self::RsvpNo,
            other => {
                debug!(mode = other, "Unknown filter mode, showing all guests");
                Self::All
            }
        }
    }

    /// The wire name of this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Confirmed => "confirmed",
            Self::Unconfirmed => "unconfirmed",
            Self::RsvpYes => "rsvp-yes",
            Self::RsvpNo => "rsvp-no",
        }
    }

    /// Whether a guest passes this mode's predicate.
    #[must_use]
    pub fn admits(self, guest: &Guest) -> bool {
        match self {
            Self::All => true,
            Self::Confirmed => guest.confirmed,
            Self::Unconfirmed => !guest.confirmed,
            Self::RsvpYes => guest.rsvp,
            Self::RsvpNo => !guest.rsvp,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FilterMode {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for FilterMode {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

/// Guests matching `search` (case-insensitive, name or email) and `mode`.
///
/// An empty search term matches everyone.
#[must_use]
pub fn visible<'a>(guests: &'a [Guest], search: &str, mode: FilterMode) -> Vec<&'a Guest> {
    let term = search.to_lowercase();
    let shown: Vec<&Guest> = guests
        .iter()
        .filter(|guest| guest.matches_lowercase(&term) && mode.admits(guest))
        .collect();
    trace!(
        search,
        %mode,
        total = guests.len(),
        shown = shown.len(),
        "Filtered guest list"
    );
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::{GuestDraft, GuestId};
    use chrono::Utc;

    fn guest(name: &str, email: &str, confirmed: bool, rsvp: bool) -> Guest {
        let mut guest = Guest::from_draft(GuestId::generate(), GuestDraft::new(name, email), Utc::now());
        guest.confirmed = confirmed;
        guest.rsvp = rsvp;
        guest
    }

    fn sample() -> Vec<Guest> {
        vec![
            guest("Bob", "robert@x.com", true, false),
            guest("Alice", "bobby@x.com", false, true),
            guest("Carol", "carol@y.org", true, true),
            guest("Dave", "dave@y.org", false, false),
        ]
    }

    fn names(guests: &[&Guest]) -> Vec<String> {
        guests.iter().map(|g| g.name.clone()).collect()
    }

    #[test]
    fn test_empty_search_all_returns_everything_in_order() {
        let guests = sample();
        let shown = visible(&guests, "", FilterMode::All);
        assert_eq!(names(&shown), ["Bob", "Alice", "Carol", "Dave"]);
    }

    #[test]
    fn test_search_matches_name_or_email_case_insensitively() {
        let guests = sample();
        let shown = visible(&guests, "BOB", FilterMode::All);
        assert_eq!(names(&shown), ["Bob", "Alice"]);
    }

    #[test]
    fn test_search_and_mode_are_combined() {
        let guests = sample();
        let shown = visible(&guests, "bob", FilterMode::Confirmed);
        assert_eq!(names(&shown), ["Bob"]);

        let shown = visible(&guests, "y.org", FilterMode::RsvpNo);
        assert_eq!(names(&shown), ["Dave"]);
    }

    #[test]
    fn test_each_mode() {
        let guests = sample();
        assert_eq!(names(&visible(&guests, "", FilterMode::Confirmed)), ["Bob", "Carol"]);
        assert_eq!(names(&visible(&guests, "", FilterMode::Unconfirmed)), ["Alice", "Dave"]);
        assert_eq!(names(&visible(&guests, "", FilterMode::RsvpYes)), ["Alice", "Carol"]);
        assert_eq!(names(&visible(&guests, "", FilterMode::RsvpNo)), ["Bob", "Dave"]);
    }

    #[test]
    fn test_no_matches() {
        let guests = sample();
        assert!(visible(&guests, "zelda", FilterMode::All).is_empty());
    }

    #[test]
    fn test_visible_is_idempotent() {
        let guests = sample();
        for mode in FilterMode::ALL {
            let once: Vec<Guest> = visible(&guests, "o", mode).into_iter().cloned().collect();
            let twice: Vec<Guest> = visible(&once, "o", mode).into_iter().cloned().collect();
            assert_eq!(once, twice, "{mode}");
        }
    }

    #[test]
    fn test_parse_known_modes() {
        for mode in FilterMode::ALL {
            assert_eq!(FilterMode::parse(mode.as_str()), mode);
        }
    }

    #[test]
    fn test_unknown_mode_falls_back_to_all() {
        assert_eq!(FilterMode::parse("vip"), FilterMode::All);
        assert_eq!(FilterMode::from(""), FilterMode::All);
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&FilterMode::RsvpYes).unwrap();
        assert_eq!(json, r#""rsvp-yes""#);
        let mode: FilterMode = serde_json::from_str(r#""unconfirmed""#).unwrap();
        assert_eq!(mode, FilterMode::Unconfirmed);
        let mode: FilterMode = serde_json::from_str(r#""bogus""#).unwrap();
        assert_eq!(mode, FilterMode::All);
    }
}
