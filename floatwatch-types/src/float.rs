//! Float summaries as listed by the backend, and their enriched form.

use crate::NormalizedObservation;

/// One float as returned by the listing endpoint.
///
/// Summaries are immutable once fetched and keyed by `float_id`. Text fields
/// the backend leaves out deserialize to empty strings; deployment values
/// are optional because some floats are listed before their launch metadata
/// is ingested.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatSummary {
    /// WMO identifier of the float.
    pub float_id: i64,

    /// Principal investigator.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pi_name: String,

    /// Operating institution.
    #[cfg_attr(feature = "serde", serde(default))]
    pub institution: String,

    /// Launch date (ISO-8601).
    #[cfg_attr(feature = "serde", serde(default))]
    pub deployment_date: Option<String>,

    /// Launch latitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub deployment_lat: Option<f64>,

    /// Launch longitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub deployment_lon: Option<f64>,

    /// Programme the float belongs to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub project_name: String,

    /// Data assembly center code (e.g. "IN", "AO").
    #[cfg_attr(feature = "serde", serde(default))]
    pub data_center: String,
}

impl FloatSummary {
    /// Create a builder for a summary with the given identifier.
    pub fn builder(float_id: i64) -> FloatSummaryBuilder {
        FloatSummaryBuilder::new(float_id)
    }
}

/// Builder for `FloatSummary`.
#[derive(Debug)]
pub struct FloatSummaryBuilder {
    summary: FloatSummary,
}

impl FloatSummaryBuilder {
    /// Create a new builder.
    pub fn new(float_id: i64) -> Self {
        Self {
            summary: FloatSummary {
                float_id,
                ..Default::default()
            },
        }
    }

    /// Set the principal investigator.
    pub fn pi_name(mut self, name: impl Into<String>) -> Self {
        self.summary.pi_name = name.into();
        self
    }

    /// Set the institution.
    pub fn institution(mut self, institution: impl Into<String>) -> Self {
        self.summary.institution = institution.into();
        self
    }

    /// Set the project name.
    pub fn project_name(mut self, project: impl Into<String>) -> Self {
        self.summary.project_name = project.into();
        self
    }

    /// Set the data center code.
    pub fn data_center(mut self, code: impl Into<String>) -> Self {
        self.summary.data_center = code.into();
        self
    }

    /// Set the deployment position and date.
    pub fn deployment(mut self, lat: Option<f64>, lon: Option<f64>, date: Option<&str>) -> Self {
        self.summary.deployment_lat = lat;
        self.summary.deployment_lon = lon;
        self.summary.deployment_date = date.map(str::to_string);
        self
    }

    /// Build the summary.
    pub fn build(self) -> FloatSummary {
        self.summary
    }
}

/// Body of the listing endpoint: `{ "floats": [...] }`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatListing {
    #[cfg_attr(feature = "serde", serde(default))]
    pub floats: Vec<FloatSummary>,
}

/// A float summary plus its resolved latest position and date.
///
/// When the details fetch succeeded, each `latest_*` field holds the
/// normalized value or, failing that, the deployment value. When the
/// details fetch failed the float is passed through and every `latest_*`
/// field is `None`; the display helpers then fall back to deployment values.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnrichedFloat {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub summary: FloatSummary,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub latest_lat: Option<f64>,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub latest_lon: Option<f64>,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub latest_date: Option<String>,
}

impl EnrichedFloat {
    /// Pass a summary through without any latest values.
    pub fn passthrough(summary: FloatSummary) -> Self {
        Self {
            summary,
            latest_lat: None,
            latest_lon: None,
            latest_date: None,
        }
    }

    /// Merge a normalized observation into a summary.
    ///
    /// Fields missing from the observation fall back to the deployment values.
    pub fn with_observation(summary: FloatSummary, latest: &NormalizedObservation) -> Self {
        Self {
            latest_lat: latest.lat.or(summary.deployment_lat),
            latest_lon: latest.lon.or(summary.deployment_lon),
            latest_date: latest
                .date
                .clone()
                .or_else(|| summary.deployment_date.clone()),
            summary,
        }
    }

    /// The float identifier.
    pub fn float_id(&self) -> i64 {
        self.summary.float_id
    }

    /// Position to display: latest if known, otherwise deployment.
    ///
    /// Returns `None` unless both coordinates are finite.
    pub fn display_position(&self) -> Option<(f64, f64)> {
        let lat = self.latest_lat.or(self.summary.deployment_lat)?;
        let lon = self.latest_lon.or(self.summary.deployment_lon)?;
        (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
    }

    /// Date to display: latest if known and non-empty, otherwise deployment.
    pub fn display_date(&self) -> Option<&str> {
        self.latest_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.summary.deployment_date.as_deref())
            .filter(|d| !d.is_empty())
    }
}

impl From<FloatSummary> for EnrichedFloat {
    fn from(summary: FloatSummary) -> Self {
        Self::passthrough(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> FloatSummary {
        FloatSummary::builder(2902746)
            .pi_name("M Ravichandran")
            .institution("INCOIS")
            .project_name("ARGO INDIA")
            .data_center("IN")
            .deployment(Some(10.0), Some(70.0), Some("2019-11-20"))
            .build()
    }

    #[test]
    fn test_builder() {
        let s = summary();
        assert_eq!(s.float_id, 2902746);
        assert_eq!(s.institution, "INCOIS");
        assert_eq!(s.deployment_lat, Some(10.0));
        assert_eq!(s.deployment_date.as_deref(), Some("2019-11-20"));
    }

    #[test]
    fn test_with_observation_prefers_latest() {
        let latest = NormalizedObservation {
            lat: Some(12.5),
            lon: Some(77.5),
            date: Some("2024-01-01".to_string()),
        };
        let float = EnrichedFloat::with_observation(summary(), &latest);
        assert_eq!(float.latest_lat, Some(12.5));
        assert_eq!(float.latest_lon, Some(77.5));
        assert_eq!(float.latest_date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_with_observation_falls_back_to_deployment() {
        let float = EnrichedFloat::with_observation(summary(), &NormalizedObservation::default());
        assert_eq!(float.latest_lat, Some(10.0));
        assert_eq!(float.latest_lon, Some(70.0));
        assert_eq!(float.latest_date.as_deref(), Some("2019-11-20"));
    }

    #[test]
    fn test_passthrough_display_uses_deployment() {
        let float = EnrichedFloat::passthrough(summary());
        assert!(float.latest_lat.is_none());
        assert_eq!(float.display_position(), Some((10.0, 70.0)));
        assert_eq!(float.display_date(), Some("2019-11-20"));
    }

    #[test]
    fn test_display_position_requires_both_coordinates() {
        let s = FloatSummary::builder(1).deployment(Some(1.0), None, None).build();
        let float = EnrichedFloat::passthrough(s);
        assert_eq!(float.display_position(), None);
        assert_eq!(float.display_date(), None);
    }

    #[test]
    fn test_display_date_skips_empty_latest() {
        let mut float = EnrichedFloat::passthrough(summary());
        float.latest_date = Some(String::new());
        assert_eq!(float.display_date(), Some("2019-11-20"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_listing_with_missing_fields() {
        let json = r#"{"floats":[{"float_id":42,"institution":"CSIRO","deployment_lat":-30.5}]}"#;
        let listing: FloatListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.floats.len(), 1);
        let f = &listing.floats[0];
        assert_eq!(f.float_id, 42);
        assert_eq!(f.institution, "CSIRO");
        assert_eq!(f.pi_name, "");
        assert_eq!(f.deployment_lat, Some(-30.5));
        assert!(f.deployment_lon.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_enriched_float_serializes_flat() {
        let float = EnrichedFloat::with_observation(summary(), &NormalizedObservation::default());
        let value = serde_json::to_value(&float).unwrap();
        assert_eq!(value["float_id"], 2902746);
        assert_eq!(value["latest_lat"], 10.0);
        assert_eq!(value["data_center"], "IN");
    }
}
