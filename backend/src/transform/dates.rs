//! `MM/DD/YYYY` template dates.
//!
//! Separators may be `/`, `.` or `-`, in any mix. Days past the end of the
//! month roll into the next month (`02/30/2000` is 1 March 2000), and years
//! below 100 fall in the 1900s.

use chrono::{Duration, NaiveDate};

/// True for the characters that separate date parts.
pub fn is_date_separator(c: char) -> bool {
    c == '/' || c == '.' || c == '-'
}

/// Split a template date into `(month, day, year)`.
pub fn split_date(value: &str) -> Option<(u32, u32, i32)> {
    let mut parts = value.split(is_date_separator);
    let month = parts.next()?.trim().parse().ok()?;
    let day = parts.next()?.trim().parse().ok()?;
    let year = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((month, day, year))
}

/// Build a calendar date from one-indexed month and day, rolling overflow
/// forward.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || day == 0 {
        return None;
    }
    let year = if (0..100).contains(&year) { year + 1900 } else { year };
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::days(i64::from(day) - 1))
}

/// Parse a template date string.
pub fn parse_template_date(value: &str) -> Option<NaiveDate> {
    let (month, day, year) = split_date(value)?;
    calendar_date(year, month, day)
}
