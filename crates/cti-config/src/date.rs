//! Strict `yyyy-mm-dd` calendar dates.
//!
//! `chrono`'s `%Y-%m-%d` tolerates unpadded fields and signed years, so the
//! shape is checked first: exactly four digits, dash, two digits, dash, two
//! digits. Dates are naive; no timezone is ever applied.

use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `yyyy-mm-dd` calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if !has_date_shape(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Render a date back to `yyyy-mm-dd`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
