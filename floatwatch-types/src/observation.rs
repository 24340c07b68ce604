//! The normalized "latest observation" of a float.

/// Best-effort latest position and date of a float.
///
/// Every field is independently optional. `None` means the value could not
/// be determined from the details payload; it is never a stand-in for zero.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedObservation {
    /// Latitude in degrees (always finite when present).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub lat: Option<f64>,

    /// Longitude in degrees (always finite when present).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub lon: Option<f64>,

    /// Observation date exactly as found in the payload.
    ///
    /// Guaranteed to parse as a calendar date/time.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub date: Option<String>,
}

impl NormalizedObservation {
    /// Check if nothing could be resolved.
    pub fn is_empty(&self) -> bool {
        self.lat.is_none() && self.lon.is_none() && self.date.is_none()
    }

    /// Check if every field has been resolved.
    pub fn is_complete(&self) -> bool {
        self.lat.is_some() && self.lon.is_some() && self.date.is_some()
    }
}
