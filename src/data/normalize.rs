//! Latest-observation extraction from loosely structured float details.
//!
//! The backend does not commit to a schema for float details. Depending on
//! the ingestion path, the latest position may sit on the root object under
//! one of several aliases, inside one of several "position" sub-objects, or
//! only be derivable from the list of historical profiles. Each field is
//! resolved through an ordered table of [`Source`]s; the first source that
//! yields a valid value wins, and later sources are never consulted.
//!
//! ```text
//! lat / lon:  root aliases ─▶ nested position objects ─┐
//! date:       root aliases ─▶ nested position objects ─┤
//!                                                      ▼
//!                               latest entry of "profiles" (fills the gaps)
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use floatwatch_types::NormalizedObservation;

use super::timestamp::parse_timestamp;

/// Where to look for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    /// The details object itself.
    Root,
    /// A sub-object stored under this key of the details object.
    Nested(&'static str),
}

/// A container plus the field aliases to probe in it, in priority order.
#[derive(Debug, Clone, Copy)]
struct Source {
    container: Container,
    fields: &'static [&'static str],
}

impl Source {
    const fn root(fields: &'static [&'static str]) -> Self {
        Self {
            container: Container::Root,
            fields,
        }
    }

    const fn nested(key: &'static str, fields: &'static [&'static str]) -> Self {
        Self {
            container: Container::Nested(key),
            fields,
        }
    }

    fn select<'a>(&self, details: &'a Value) -> Option<&'a Value> {
        match self.container {
            Container::Root => Some(details),
            Container::Nested(key) => details.get(key),
        }
    }
}

const LAT_FIELDS: &[&str] = &["lat", "latitude"];
const LON_FIELDS: &[&str] = &["lon", "longitude"];
const DATE_FIELDS: &[&str] = &["date", "time", "timestamp"];

const LAT_SOURCES: &[Source] = &[
    Source::root(&["current_lat", "latest_lat", "last_lat"]),
    Source::nested("position", LAT_FIELDS),
    Source::nested("latest_position", LAT_FIELDS),
    Source::nested("last_position", LAT_FIELDS),
    Source::nested("current_position", LAT_FIELDS),
];

const LON_SOURCES: &[Source] = &[
    Source::root(&["current_lon", "latest_lon", "last_lon"]),
    Source::nested("position", LON_FIELDS),
    Source::nested("latest_position", LON_FIELDS),
    Source::nested("last_position", LON_FIELDS),
    Source::nested("current_position", LON_FIELDS),
];

const DATE_SOURCES: &[Source] = &[
    Source::root(&[
        "latest_date",
        "last_profile_date",
        "last_observation_date",
        "date",
    ]),
    Source::nested("position", DATE_FIELDS),
    Source::nested("latest_position", DATE_FIELDS),
    Source::nested("last_position", DATE_FIELDS),
    Source::nested("current_position", DATE_FIELDS),
];

/// Key of the historical profile list.
const PROFILES_KEY: &str = "profiles";

/// Resolve the latest latitude, longitude and date of a float.
///
/// Never fails: anything missing, mistyped or unparseable is treated as
/// absent. Non-object input yields an empty observation.
pub fn normalize(details: &Value) -> NormalizedObservation {
    let mut obs = NormalizedObservation {
        lat: resolve(details, LAT_SOURCES, pick_number),
        lon: resolve(details, LON_SOURCES, pick_number),
        date: resolve(details, DATE_SOURCES, pick_date),
    };

    if !obs.is_complete() {
        if let Some(latest) = latest_profile(details) {
            if obs.date.is_none() {
                obs.date = Some(latest.date.to_string());
            }
            if obs.lat.is_none() {
                obs.lat = pick_number(latest.record, LAT_FIELDS);
            }
            if obs.lon.is_none() {
                obs.lon = pick_number(latest.record, LON_FIELDS);
            }
        }
    }

    obs
}

fn resolve<T>(
    details: &Value,
    sources: &[Source],
    pick: fn(&Value, &[&str]) -> Option<T>,
) -> Option<T> {
    sources
        .iter()
        .find_map(|source| pick(source.select(details)?, source.fields))
}

/// First alias holding a finite JSON number.
fn pick_number(obj: &Value, fields: &[&str]) -> Option<f64> {
    fields
        .iter()
        .find_map(|field| obj.get(field)?.as_f64().filter(|v| v.is_finite()))
}

/// First alias holding a string that parses as a date.
fn pick_date(obj: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| {
        let s = obj.get(field)?.as_str()?;
        parse_timestamp(s).map(|_| s.to_string())
    })
}

/// The most recent profile and its raw date string.
struct LatestProfile<'a> {
    date: &'a str,
    record: &'a Value,
}

/// A profile's date-like value: the first present value among its date aliases.
///
/// "Present" means neither null, false, zero nor an empty string. A present
/// but unusable value (e.g. a malformed `date`) shadows later aliases.
fn date_like(profile: &Value) -> Option<&Value> {
    DATE_FIELDS
        .iter()
        .find_map(|field| profile.get(field).filter(|v| is_present(v)))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn latest_profile(details: &Value) -> Option<LatestProfile<'_>> {
    let profiles = details.get(PROFILES_KEY)?.as_array()?;

    // Strictly-later comparison keeps the first of several equal maxima
    let mut latest: Option<(DateTime<Utc>, &str)> = None;
    for profile in profiles {
        let Some(raw) = date_like(profile).and_then(Value::as_str) else {
            continue;
        };
        let Some(ts) = parse_timestamp(raw) else {
            continue;
        };
        if latest.map_or(true, |(best, _)| ts > best) {
            latest = Some((ts, raw));
        }
    }
    let (_, date) = latest?;

    let record = profiles
        .iter()
        .find(|p| date_like(p).and_then(Value::as_str) == Some(date))
        .or_else(|| profiles.first())?;

    Some(LatestProfile { date, record })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obs(lat: Option<f64>, lon: Option<f64>, date: Option<&str>) -> NormalizedObservation {
        NormalizedObservation {
            lat,
            lon,
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_direct_aliases() {
        let details = json!({ "current_lat": 12.5, "current_lon": 77.5, "date": "2024-01-01" });
        assert_eq!(
            normalize(&details),
            obs(Some(12.5), Some(77.5), Some("2024-01-01"))
        );
    }

    #[test]
    fn test_nested_position_with_root_date() {
        let details = json!({ "position": { "lat": 1, "lon": 2 }, "last_profile_date": "2023-05-05" });
        assert_eq!(
            normalize(&details),
            obs(Some(1.0), Some(2.0), Some("2023-05-05"))
        );
    }

    #[test]
    fn test_profiles_fallback_picks_latest() {
        let details = json!({
            "profiles": [
                { "date": "2022-01-01", "lat": 1, "lon": 1 },
                { "date": "2022-06-01", "lat": 2, "lon": 2 }
            ]
        });
        assert_eq!(
            normalize(&details),
            obs(Some(2.0), Some(2.0), Some("2022-06-01"))
        );
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(normalize(&json!({})), NormalizedObservation::default());
    }

    #[test]
    fn test_non_object_input() {
        assert!(normalize(&Value::Null).is_empty());
        assert!(normalize(&json!([1, 2, 3])).is_empty());
        assert!(normalize(&json!("2024-01-01")).is_empty());
    }

    #[test]
    fn test_direct_wins_over_everything_else() {
        let details = json!({
            "latest_lat": -33.25,
            "position": { "lat": 5.0, "lon": 6.0 },
            "profiles": [{ "date": "2030-01-01", "lat": 9, "lon": 9 }]
        });
        let result = normalize(&details);
        assert_eq!(result.lat, Some(-33.25));
        assert_eq!(result.lon, Some(6.0));
        assert_eq!(result.date.as_deref(), Some("2030-01-01"));
    }

    #[test]
    fn test_root_alias_priority() {
        let details = json!({ "last_lat": 3.0, "latest_lat": 2.0, "current_lat": 1.0 });
        assert_eq!(normalize(&details).lat, Some(1.0));

        let details = json!({ "last_lat": 3.0, "latest_lat": 2.0 });
        assert_eq!(normalize(&details).lat, Some(2.0));
    }

    #[test]
    fn test_non_numeric_values_are_skipped() {
        let details = json!({ "current_lat": "12.5", "latest_lat": null, "last_lat": 4.5 });
        assert_eq!(normalize(&details).lat, Some(4.5));

        let details = json!({ "current_lon": true });
        assert_eq!(normalize(&details).lon, None);
    }

    #[test]
    fn test_zero_is_a_value() {
        let details = json!({ "current_lat": 0, "current_lon": 0.0, "date": "2024-01-01" });
        assert_eq!(
            normalize(&details),
            obs(Some(0.0), Some(0.0), Some("2024-01-01"))
        );
    }

    #[test]
    fn test_nested_latitude_only() {
        let details = json!({ "position": { "latitude": -12.75 } });
        let result = normalize(&details);
        assert_eq!(result.lat, Some(-12.75));
        assert_eq!(result.lon, None);
        assert_eq!(result.date, None);
    }

    #[test]
    fn test_nested_lat_and_lon_from_different_containers() {
        let details = json!({
            "position": { "lat": 10.0 },
            "last_position": { "longitude": 20.0 },
            "current_position": { "lat": 99.0, "lon": 99.0 }
        });
        let result = normalize(&details);
        assert_eq!(result.lat, Some(10.0));
        assert_eq!(result.lon, Some(20.0));
    }

    #[test]
    fn test_nested_container_order() {
        let details = json!({
            "current_position": { "lat": 4.0 },
            "latest_position": { "lat": 2.0 },
            "last_position": { "lat": 3.0 }
        });
        assert_eq!(normalize(&details).lat, Some(2.0));
    }

    #[test]
    fn test_invalid_root_date_falls_through() {
        let details = json!({ "latest_date": "unknown", "last_profile_date": 20240101, "date": "2021-07-04" });
        assert_eq!(normalize(&details).date.as_deref(), Some("2021-07-04"));
    }

    #[test]
    fn test_reduced_precision_root_dates_are_valid() {
        let details = json!({ "latest_date": "2024-01-01T10:30Z", "date": "2020-01-01" });
        assert_eq!(normalize(&details).date.as_deref(), Some("2024-01-01T10:30Z"));

        let details = json!({ "latest_date": "2024-06", "date": "2020-01-01" });
        assert_eq!(normalize(&details).date.as_deref(), Some("2024-06"));
    }

    #[test]
    fn test_nested_date_aliases() {
        let details = json!({ "latest_position": { "timestamp": "2023-09-10T04:00:00Z" } });
        assert_eq!(
            normalize(&details).date.as_deref(),
            Some("2023-09-10T04:00:00Z")
        );
    }

    #[test]
    fn test_date_keeps_original_string() {
        let details = json!({ "date": "2023-09-10 04:00" });
        assert_eq!(normalize(&details).date.as_deref(), Some("2023-09-10 04:00"));
    }

    #[test]
    fn test_profiles_only_fill_unresolved_fields() {
        let details = json!({
            "current_lat": 1.0,
            "profiles": [
                { "date": "2020-01-01", "lat": 50.0, "lon": 60.0 },
                { "date": "2021-01-01", "lat": 70.0, "lon": 80.0 }
            ]
        });
        assert_eq!(
            normalize(&details),
            obs(Some(1.0), Some(80.0), Some("2021-01-01"))
        );
    }

    #[test]
    fn test_profiles_skipped_when_complete() {
        let details = json!({
            "current_lat": 1.0,
            "current_lon": 2.0,
            "date": "2019-01-01",
            "profiles": [{ "date": "2024-01-01", "lat": 50.0, "lon": 60.0 }]
        });
        assert_eq!(
            normalize(&details),
            obs(Some(1.0), Some(2.0), Some("2019-01-01"))
        );
    }

    #[test]
    fn test_profiles_unordered_and_mixed_aliases() {
        let details = json!({
            "profiles": [
                { "time": "2022-03-01T00:00:00Z", "latitude": 3.0, "longitude": 30.0 },
                { "timestamp": "2022-09-01T00:00:00Z", "latitude": 9.0, "longitude": 90.0 },
                { "date": "2022-05-01", "lat": 5.0, "lon": 50.0 }
            ]
        });
        assert_eq!(
            normalize(&details),
            obs(Some(9.0), Some(90.0), Some("2022-09-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_profiles_latest_without_position() {
        let details = json!({
            "profiles": [
                { "date": "2022-01-01", "lat": 1, "lon": 1 },
                { "date": "2022-06-01" }
            ]
        });
        assert_eq!(normalize(&details), obs(None, None, Some("2022-06-01")));
    }

    #[test]
    fn test_profiles_without_parseable_dates_are_ignored() {
        let details = json!({
            "profiles": [
                { "date": "n/a", "lat": 1, "lon": 1 },
                { "lat": 2, "lon": 2 }
            ]
        });
        assert!(normalize(&details).is_empty());
    }

    #[test]
    fn test_present_but_invalid_date_shadows_other_aliases() {
        let details = json!({
            "profiles": [
                { "date": "garbage", "time": "2025-01-01", "lat": 1, "lon": 1 },
                { "date": "", "time": "2022-01-01", "lat": 2, "lon": 2 }
            ]
        });
        assert_eq!(
            normalize(&details),
            obs(Some(2.0), Some(2.0), Some("2022-01-01"))
        );
    }

    #[test]
    fn test_profiles_tie_keeps_first_occurrence() {
        let details = json!({
            "profiles": [
                { "date": "2022-06-01T00:00:00Z", "lat": 1, "lon": 1 },
                { "date": "2022-06-01", "lat": 2, "lon": 2 }
            ]
        });
        assert_eq!(
            normalize(&details),
            obs(Some(1.0), Some(1.0), Some("2022-06-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_profiles_not_a_list() {
        let details = json!({ "profiles": { "date": "2022-06-01", "lat": 1, "lon": 1 } });
        assert!(normalize(&details).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let details = json!({
            "position": { "lat": 1.5 },
            "profiles": [{ "date": "2022-06-01", "lon": 7.0 }]
        });
        let first = normalize(&details);
        let second = normalize(&details);
        assert_eq!(first, second);
        assert_eq!(first, obs(Some(1.5), Some(7.0), Some("2022-06-01")));
    }
}
