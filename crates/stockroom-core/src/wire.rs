// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire formats for dates and instants.
//!
//! Calendar dates travel as ISO-8601 `YYYY-MM-DD`. Instants travel as RFC 3339
//! in UTC with millisecond precision. These are the only accepted encodings;
//! anything else is a parse error rather than a guess.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

/// Format string for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Encode a calendar date.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Decode a calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

/// Encode an instant.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode an instant, normalizing any offset to UTC.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value.trim()).map(|dt| dt.with_timezone(&Utc))
}

/// The instant a calendar date starts, in UTC.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_uses_iso_calendar_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date(date), "2026-03-07");
        assert_eq!(parse_date("2026-03-07").unwrap(), date);
    }

    #[test]
    fn ambiguous_slash_dates_are_rejected() {
        assert!(parse_date("03/07/2026").is_err());
        assert!(parse_date("7.3.2026").is_err());
    }

    #[test]
    fn instants_normalize_to_utc() {
        let parsed = parse_instant("2026-03-07T10:00:00+02:00").unwrap();
        assert_eq!(format_instant(parsed), "2026-03-07T08:00:00.000Z");
    }

    #[test]
    fn start_of_day_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(format_instant(start_of_day(date)), "2026-01-02T00:00:00.000Z");
    }
}
