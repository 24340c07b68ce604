use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive date-time layouts, tried in order. `%.f` also matches no fraction.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Offset-carrying layouts that RFC 3339 parsing rejects. `%#z` takes
/// `+05`, `+0530` and `+05:30`.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a calendar date/time string into a point in time.
///
/// Accepts RFC 3339, RFC 2822, ISO-like date-times with or without an
/// offset or seconds, and calendar dates down to a bare year. Values without
/// an offset are taken as UTC; calendar dates are their first midnight UTC.
/// Returns `None` for anything else, including out-of-range fields like
/// `2024-02-30`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    // A trailing `Z` is UTC, which is what naive layouts assume anyway
    let zone_less = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(zone_less, fmt) {
            return Some(naive.and_utc());
        }
    }

    parse_calendar_date(s).and_then(|date| date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()))
}

/// Parse a zone-less calendar date: `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM`
/// or `YYYY`. Reduced forms name their first day.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('-') {
        None if s.len() == 4 && digits(s) => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        Some((year, month)) if year.len() == 4 && month.len() == 2 && digits(year) && digits(month) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        _ => None,
    }
}

/// Check if a string names a well-defined point in time.
pub fn is_valid_timestamp(s: &str) -> bool {
    parse_timestamp(s).is_some()
}
