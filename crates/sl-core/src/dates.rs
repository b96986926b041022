//! Date parsing, filtering and month windows
//!
//! Record dates are stored as strings by the gateway; historical writers
//! used RFC 3339, bare dates, and RFC 2822 (`Date.toUTCString()`), so the
//! parser accepts all three.

use chrono::{DateTime, Datelike, NaiveDate};
use std::cmp::Ordering;

/// Granularity of a date filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// Match year, month and day
    Day,
    /// Match year and month
    Month,
}

/// Parse a record date string into a calendar date.
///
/// Accepts RFC 3339 timestamps, bare `YYYY-MM-DD` dates, and RFC 2822
/// timestamps. Returns `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    None
}

/// Check a record date string against an anchor date at the given
/// granularity. Unparseable dates never match.
pub fn matches(date_str: &str, anchor: NaiveDate, filter: DateFilter) -> bool {
    let Some(date) = parse_date(date_str) else {
        return false;
    };
    let month_matches = date.year() == anchor.year() && date.month() == anchor.month();
    match filter {
        DateFilter::Month => month_matches,
        DateFilter::Day => month_matches && date.day() == anchor.day(),
    }
}

/// Half-open `[start, end)` window covering one calendar month, as RFC 3339
/// midnight timestamps suitable for the gateway's `startDate`/`endDate`
/// query parameters.
pub fn month_window(year: i32, month: u32) -> Option<(String, String)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((format_window_bound(start), format_window_bound(end)))
}

fn format_window_bound(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

/// Short `M/d` display form of a record date (unparseable input echoes back).
pub fn format_short(date_str: &str) -> String {
    match parse_date(date_str) {
        Some(d) => format!("{}/{}", d.month(), d.day()),
        None => date_str.to_string(),
    }
}

/// Full `yyyy/M/d` display form of a record date.
pub fn format_full(date_str: &str) -> String {
    match parse_date(date_str) {
        Some(d) => format!("{}/{}/{}", d.year(), d.month(), d.day()),
        None => date_str.to_string(),
    }
}

/// Descending date ordering for record lists (newest first).
///
/// Unparseable dates sort last so fresh data stays on top.
pub fn cmp_desc(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
