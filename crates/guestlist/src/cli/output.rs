//! Text rendering for CLI output.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::guest::Guest;
use crate::summary::Summary;
use crate::validation::ValidationErrors;

/// Format a timestamp with a strftime pattern.
///
/// Falls back to RFC 3339 if the pattern cannot format a date.
#[must_use]
pub fn format_date(date: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return date.to_rfc3339();
    }
    out
}

/// "N guests matching your filters".
#[must_use]
pub fn match_count(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} guest{plural} matching your filters")
}

/// One guest on one line.
#[must_use]
pub fn guest_line(guest: &Guest, date_pattern: &str) -> String {
    let mut line = format!(
        "{}  {} <{}>  {}  {}  added {}",
        guest.id.short(),
        guest.name,
        guest.email,
        if guest.confirmed { "confirmed" } else { "pending" },
        if guest.rsvp { "rsvp:yes" } else { "rsvp:no" },
        format_date(&guest.date_added, date_pattern),
    );
    if let Some(phone) = &guest.phone {
        let _ = write!(line, "  phone {phone}");
    }
    if let Some(notes) = &guest.notes {
        let _ = write!(line, "  notes: {notes}");
    }
    line
}

/// A detailed multi-line view of a single guest.
#[must_use]
pub fn guest_card(guest: &Guest, date_pattern: &str) -> String {
    let mut card = String::new();
    let _ = writeln!(card, "{} ({})", guest.name, guest.id);
    let _ = writeln!(card, "  Email:     {}", guest.email);
    if let Some(phone) = &guest.phone {
        let _ = writeln!(card, "  Phone:     {phone}");
    }
    if let Some(notes) = &guest.notes {
        let _ = writeln!(card, "  Notes:     {notes}");
    }
    let _ = writeln!(
        card,
        "  Status:    {}",
        if guest.confirmed { "Confirmed" } else { "Pending" }
    );
    let _ = writeln!(card, "  RSVP:      {}", if guest.rsvp { "Yes" } else { "No" });
    let _ = write!(
        card,
        "  Added:     {}",
        format_date(&guest.date_added, date_pattern)
    );
    card
}

/// Guests as aligned columns with a header row.
#[must_use]
pub fn guest_table(guests: &[&Guest], date_pattern: &str) -> String {
    const HEADERS: [&str; 6] = ["ID", "NAME", "EMAIL", "STATUS", "RSVP", "ADDED"];

    let rows: Vec<[String; 6]> = guests
        .iter()
        .map(|g| {
            [
                g.id.short().to_string(),
                g.name.clone(),
                g.email.clone(),
                if g.confirmed { "confirmed" } else { "pending" }.to_string(),
                if g.rsvp { "yes" } else { "no" }.to_string(),
                format_date(&g.date_added, date_pattern),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    push_row(&mut table, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_row(&mut table, row, &widths);
    }
    table
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// The dashboard: counts, percentages and recent additions.
#[must_use]
pub fn summary_text(summary: &Summary, date_pattern: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Event Summary");
    let _ = writeln!(out, "=============");
    let _ = writeln!(out, "Total guests:   {}", summary.total);
    let _ = writeln!(
        out,
        "Confirmed:      {} / {} ({}%)",
        summary.confirmed, summary.total, summary.confirmed_percent
    );
    let _ = writeln!(
        out,
        "Unconfirmed:    {} ({}%)",
        summary.unconfirmed, summary.unconfirmed_percent
    );
    let _ = writeln!(
        out,
        "RSVP yes:       {} / {} ({}%)",
        summary.rsvp_yes, summary.total, summary.rsvp_percent
    );
    let _ = writeln!(
        out,
        "RSVP no:        {} ({}%)",
        summary.rsvp_no, summary.rsvp_no_percent
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Recently Added Guests");
    let _ = writeln!(out, "---------------------");
    if summary.recent.is_empty() {
        let _ = writeln!(out, "No guests added yet");
    }
    for guest in &summary.recent {
        let _ = writeln!(
            out,
            "{}  {} <{}>  {}",
            guest.id.short(),
            guest.name,
            guest.email,
            format_date(&guest.date_added, date_pattern)
        );
    }
    out
}

/// Field errors, one per line, for display next to the offending input.
#[must_use]
pub fn validation_text(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, err)| format!("  {field}: {err}"))
        .collect::<Vec<_>>()
        .join("\n")
}
