//! Observation request: what to look at, from where, and how to render it

use crate::constants::DEFAULT_MAGNITUDE_LIMIT;
use crate::provider::AberrationCorrection;
use crate::{ObsGeomError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default viewport edge length in pixels
const DEFAULT_VIEWPORT: u32 = 1024;

fn default_magnitude_limit() -> f64 {
    DEFAULT_MAGNITUDE_LIMIT
}

fn default_viewport() -> u32 {
    DEFAULT_VIEWPORT
}

/// Inputs of one snapshot computation
///
/// ```
/// use obsgeom::{AberrationCorrection, ObservationRequest};
///
/// let request = ObservationRequest::new("CASSINI_ISS_NAC", 0.0, "CASSINI")
///     .with_viewport(1024, 768)
///     .with_aberration_correction(AberrationCorrection::LightTimeStellar)
///     .with_magnitude_limit(6.5);
/// assert_eq!(request.viewport_height, 768);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRequest {
    /// Instrument name or NAIF ID
    pub instrument: String,
    /// Ephemeris time, TDB seconds past J2000
    pub epoch: f64,
    #[serde(default)]
    pub aberration_correction: AberrationCorrection,
    /// Observer name or NAIF ID
    pub observer: String,
    #[serde(default = "default_viewport")]
    pub viewport_width: u32,
    #[serde(default = "default_viewport")]
    pub viewport_height: u32,
    /// Only stars strictly brighter than this are reported
    #[serde(default = "default_magnitude_limit")]
    pub magnitude_limit: f64,
}

impl ObservationRequest {
    /// Create a request with default viewport, correction and magnitude limit
    pub fn new(instrument: &str, epoch: f64, observer: &str) -> Self {
        Self {
            instrument: instrument.to_string(),
            epoch,
            aberration_correction: AberrationCorrection::default(),
            observer: observer.to_string(),
            viewport_width: DEFAULT_VIEWPORT,
            viewport_height: DEFAULT_VIEWPORT,
            magnitude_limit: DEFAULT_MAGNITUDE_LIMIT,
        }
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_aberration_correction(mut self, correction: AberrationCorrection) -> Self {
        self.aberration_correction = correction;
        self
    }

    pub fn with_magnitude_limit(mut self, magnitude_limit: f64) -> Self {
        self.magnitude_limit = magnitude_limit;
        self
    }

    /// Parse a request from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Load a request from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check the viewport is usable
    pub fn validate(&self) -> Result<()> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ObsGeomError::InvalidGeometry(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        Ok(())
    }

    pub(crate) fn viewport(&self) -> (f64, f64) {
        (self.viewport_width as f64, self.viewport_height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_json() {
        let request = ObservationRequest::from_json_str(
            r#"{"instrument": "CAM", "epoch": 12.5, "observer": "CRAFT"}"#,
        )
        .unwrap();
        assert_eq!(request, ObservationRequest::new("CAM", 12.5, "CRAFT"));
        assert_eq!(request.magnitude_limit, 7.0);
        assert_eq!(request.aberration_correction, AberrationCorrection::None);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "instrument": "CASSINI_ISS_NAC",
                "epoch": 1.0e8,
                "aberration_correction": "LT+S",
                "observer": "CASSINI",
                "viewport_width": 640,
                "viewport_height": 480,
                "magnitude_limit": 5.5
            }}"#
        )
        .unwrap();

        let request = ObservationRequest::from_json_file(file.path()).unwrap();
        assert_eq!(
            request.aberration_correction,
            AberrationCorrection::LightTimeStellar
        );
        assert_eq!(request.viewport(), (640.0, 480.0));
        assert_eq!(request.magnitude_limit, 5.5);
    }

    #[test]
    fn test_rejects_empty_viewport() {
        let result = ObservationRequest::from_json_str(
            r#"{"instrument": "CAM", "epoch": 0, "observer": "CRAFT", "viewport_width": 0}"#,
        );
        assert!(matches!(result, Err(ObsGeomError::InvalidGeometry(_))));

        let bad_json = ObservationRequest::from_json_str("{");
        assert!(matches!(bad_json, Err(ObsGeomError::Json(_))));
    }
}
