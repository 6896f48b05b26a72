// ABOUTME: Flexible time parsing for dates found in exports and article dumps.
// ABOUTME: Accepts RFC 3339/2822 strings, common feed date variants, and epoch numbers.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Epoch values at or above this are taken as milliseconds, below as seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Interprets a JSON date value: a number (epoch seconds or milliseconds),
/// a numeric string, or a date string understood by [`parse_flexible_time`].
pub fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            from_epoch(raw)
        }
        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(raw) => from_epoch(raw),
                Err(_) => parse_flexible_time(trimmed),
            }
        }
        _ => None,
    }
}

/// Converts an epoch number to UTC, guessing the unit from its magnitude.
pub fn from_epoch(raw: i64) -> Option<DateTime<Utc>> {
    if raw.unsigned_abs() >= EPOCH_MILLIS_THRESHOLD.unsigned_abs() {
        Utc.timestamp_millis_opt(raw).single()
    } else {
        Utc.timestamp_opt(raw, 0).single()
    }
}

/// Formats carrying a numeric offset.
const OFFSET_FORMATS: [&str; 6] = [
    "%a, %d %b %Y %H:%M:%S %z",
    "%a, %e %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
    "%e %b %Y %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Formats without zone information; read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%e %b %Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d %b %Y"];

/// Bases tried in front of a trailing zone abbreviation.
const NAMED_ZONE_BASES: [&str; 4] = [
    "%a, %d %b %Y %H:%M:%S",
    "%a, %e %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%e %b %Y %H:%M:%S",
];

/// Zone abbreviations chrono's `%Z` cannot parse, with their UTC offset in hours.
const ZONE_OFFSETS: [(&str, i32); 19] = [
    ("GMT", 0),
    ("UTC", 0),
    ("WET", 0),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("MDT", -6),
    ("PST", -8),
    ("PDT", -7),
    ("CET", 1),
    ("CEST", 2),
    ("EET", 2),
    ("EEST", 3),
    ("BST", 1),
    ("JST", 9),
    ("AEST", 10),
    ("AEDT", 11),
];

/// Parses a date string in any of the formats seen in feeds and exports.
///
/// RFC 3339 and RFC 2822 come first, then their loose variants (single-digit
/// day, no weekday, named zone), then naive timestamps and bare dates as UTC.
pub fn parse_flexible_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| parse_with_named_zone(s))
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

fn parse_with_named_zone(s: &str) -> Option<DateTime<Utc>> {
    // CEST, EEST and AEST all end in EST, so keep trying until a base parses.
    ZONE_OFFSETS.iter().find_map(|(zone, hours)| {
        let base = s.strip_suffix(zone)?.trim_end();
        let naive = NAMED_ZONE_BASES
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(base, fmt).ok())?;
        FixedOffset::east_opt(hours * 3600)?
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn test_rfc3339() {
        let dt = parse_flexible_time("2023-06-15T14:30:00Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 6, 15));
    }

    #[test]
    fn test_rfc2822_with_offset() {
        let dt = parse_flexible_time("Mon, 02 Jan 2006 15:04:05 -0700").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
    }

    #[test]
    fn test_named_timezone() {
        let dt = parse_flexible_time("Mon, 2 Jan 2006 15:04:05 PST").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2006, 1, 2, 23, 4, 5).unwrap());
    }

    #[test]
    fn test_date_only() {
        let dt = parse_flexible_time("2021-12-25").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2021, 12, 25, 0, 0, 0).unwrap());
    }

    #[test]
    fn zone_sharing_a_suffix() {
        let dt = parse_flexible_time("Tue, 4 Jun 2024 12:00:00 CEST").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 4, 10, 0, 0).unwrap());
    }

    #[test]
    fn day_month_year_without_time() {
        let dt = parse_flexible_time("05 Mar 2022").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2022, 3, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(parse_flexible_time("   ").is_none());
        assert!(parse_flexible_time("not a date").is_none());
    }

    #[test]
    fn epoch_seconds_and_millis() {
        let secs = parse_timestamp_value(&json!(1700000000)).unwrap();
        let millis = parse_timestamp_value(&json!(1700000000000i64)).unwrap();
        assert_eq!(secs, millis);
        assert_eq!(parse_timestamp_value(&json!("1700000000")), Some(secs));
    }

    #[test]
    fn string_dates_and_garbage() {
        assert_eq!(
            parse_timestamp_value(&json!("2024-02-03T10:00:00+00:00")),
            Some(Utc.with_ymd_and_hms(2024, 2, 3, 10, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp_value(&json!(true)), None);
        assert_eq!(parse_timestamp_value(&json!("soon")), None);
    }

    #[test]
    fn extreme_epochs_are_rejected() {
        assert_eq!(from_epoch(i64::MIN), None);
        assert_eq!(from_epoch(i64::MAX), None);
        assert_eq!(parse_timestamp_value(&json!(i64::MIN)), None);
        assert_eq!(parse_timestamp_value(&json!("-9223372036854775808")), None);
        assert_eq!(parse_timestamp_value(&json!(-1e30)), None);
    }

    #[test]
    fn negative_millis_before_1970() {
        let dt = from_epoch(-EPOCH_MILLIS_THRESHOLD).unwrap();
        assert_eq!(dt.timestamp(), -EPOCH_MILLIS_THRESHOLD / 1000);
    }
}
