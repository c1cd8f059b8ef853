//! Date and query-string helpers

use chrono::{Months, NaiveDate};

/// Add calendar months, clamping the day to the end of the target month
///
/// 2024-01-31 + 1 month → 2024-02-29.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Extract the `stampId` parameter from a URL query string
///
/// Accepts a leading `?`, decodes form-urlencoding and treats an empty value
/// as absent. The first non-empty occurrence wins.
pub fn stamp_source_from_query(query: &str) -> Option<String> {
    let query = query.trim().trim_start_matches('?');
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == "stampId" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Parse a stored `YYYY-MM-DD` date; empty means "never"
pub(crate) fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "Ignoring malformed stored date");
            None
        }
    }
}

/// Format a date the way it is stored
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
