pub mod expenses;
pub mod layout;
pub mod pdf;
pub mod timeline;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::trip::Trip;

pub use layout::Document;

pub(crate) fn short_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// `Thursday, January 1, 2026`
pub(crate) fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub(crate) fn dates_line(trip: &Trip) -> String {
    format!(
        "Dates: {} - {}",
        short_date(trip.start_date),
        short_date(trip.end_date)
    )
}

pub(crate) fn generated_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub(crate) fn money(currency: &str, amount: f64) -> String {
    format!("{currency} {amount:.2}")
}

/// Download name such as `Timeline_Goa.pdf`, with characters that would break
/// a `Content-Disposition` header replaced.
pub fn file_name(prefix: &str, destination: &str) -> String {
    let cleaned: String = destination
        .trim()
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' | ';' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{prefix}_{cleaned}.pdf")
}
