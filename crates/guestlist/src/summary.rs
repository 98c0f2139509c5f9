//! Aggregate statistics for the dashboard view.

use serde::Serialize;

use crate::guest::Guest;

/// How many recently added guests the summary lists.
pub const RECENT_LIMIT: usize = 5;

/// Counts and percentages over the whole guest list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of guests.
    pub total: usize,
    /// Guests with confirmed attendance.
    pub confirmed: usize,
    /// Guests without confirmed attendance.
    pub unconfirmed: usize,
    /// Guests who sent an RSVP.
    pub rsvp_yes: usize,
    /// Guests who have not sent an RSVP.
    pub rsvp_no: usize,
    /// Rounded share of confirmed guests, 0 when the list is empty.
    pub confirmed_percent: u8,
    /// Remainder of `confirmed_percent`, 0 when the list is empty.
    pub unconfirmed_percent: u8,
    /// Rounded share of guests who sent an RSVP, 0 when the list is empty.
    pub rsvp_percent: u8,
    /// Remainder of `rsvp_percent`, 0 when the list is empty.
    pub rsvp_no_percent: u8,
    /// Most recently added guests, newest first.
    pub recent: Vec<Guest>,
}

impl Summary {
    /// Compute the summary for a guest list.
    #[must_use]
    pub fn from_guests(guests: &[Guest]) -> Self {
        let total = guests.len();
        let confirmed = guests.iter().filter(|g| g.confirmed).count();
        let rsvp_yes = guests.iter().filter(|g| g.rsvp).count();

        let confirmed_percent = percent(confirmed, total);
        let rsvp_percent = percent(rsvp_yes, total);

        Self {
            total,
            confirmed,
            unconfirmed: total - confirmed,
            rsvp_yes,
            rsvp_no: total - rsvp_yes,
            confirmed_percent,
            unconfirmed_percent: complement(confirmed_percent, total),
            rsvp_percent,
            rsvp_no_percent: complement(rsvp_percent, total),
            recent: recent(guests, RECENT_LIMIT),
        }
    }
}

/// Up to `limit` guests, newest `date_added` first. Ties keep list order.
#[must_use]
pub fn recent(guests: &[Guest], limit: usize) -> Vec<Guest> {
    let mut sorted: Vec<&Guest> = guests.iter().collect();
    sorted.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    sorted.into_iter().take(limit).cloned().collect()
}

/// `part / total * 100`, rounded half up. Zero for an empty list.
fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (part * 200 + total) / (total * 2);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

fn complement(percent: u8, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        100 - percent
    }
}
