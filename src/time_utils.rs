// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar-day normalization and date formatting.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format the UTC calendar day of a timestamp as `YYYY-MM-DD`.
pub fn format_day(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Midnight UTC of the given calendar day.
pub fn utc_midnight(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

/// Truncate a timestamp to midnight of its UTC calendar day.
pub fn start_of_utc_day(date: DateTime<Utc>) -> DateTime<Utc> {
    utc_midnight(date.date_naive())
}

/// UTC midnight of the calendar day `date` falls on at `offset`.
pub fn offset_day(date: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    utc_midnight(date.with_timezone(&offset).date_naive())
}

/// Half-open 24h window `[start, start + 1 day)`.
pub fn day_window(start: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (start, start + Duration::days(1))
}

/// Parse a client-supplied date: either `YYYY-MM-DD` (midnight UTC) or RFC3339.
pub fn parse_client_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(utc_midnight(day));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
