//! Ephemeris, frame and star catalog provider interface
//!
//! The observation engine never owns kernel data. Every question of the form
//! "where is body X at time T in frame F", "what does instrument I see" or
//! "which stars are in the catalog" goes through an [`EphemerisProvider`]
//! session handed in by the caller.
//!
//! # Main Components
//!
//! - [`EphemerisProvider`]: the query contract a backing toolkit implements
//! - [`RawFov`], [`CatalogRow`], [`TimeWindow`]: values crossing that boundary
//! - `names`: fallback NAIF name/ID bindings
//! - [`InMemoryProvider`]: static fixture data for tests and demos
//! - Error types for provider failures
//!
//! # Sessions
//!
//! A provider is a handle over loaded kernel data. Loading is expected to happen
//! before the handle is passed in; the engine only issues read-only queries. A
//! provider that wraps process-wide toolkit state must be used from one thread
//! at a time or synchronized by its owner.

pub mod errors;
pub mod memory;
pub mod names;

pub use self::errors::ProviderError;
pub use self::memory::InMemoryProvider;

use self::errors::Result;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Light-time and stellar-aberration correction applied to observed positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AberrationCorrection {
    /// Geometric positions, no correction
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// Converged Newtonian light time, reception
    #[serde(rename = "LT")]
    LightTime,
    /// Light time plus stellar aberration, reception
    #[serde(rename = "LT+S")]
    LightTimeStellar,
    /// Converged light time, reception
    #[serde(rename = "CN")]
    Converged,
    /// Converged light time plus stellar aberration, reception
    #[serde(rename = "CN+S")]
    ConvergedStellar,
    /// Light time, transmission
    #[serde(rename = "XLT")]
    TransmitLightTime,
    /// Light time plus stellar aberration, transmission
    #[serde(rename = "XLT+S")]
    TransmitLightTimeStellar,
    /// Converged light time, transmission
    #[serde(rename = "XCN")]
    TransmitConverged,
    /// Converged light time plus stellar aberration, transmission
    #[serde(rename = "XCN+S")]
    TransmitConvergedStellar,
}

impl AberrationCorrection {
    /// Toolkit spelling of the correction
    pub fn as_str(&self) -> &'static str {
        match self {
            AberrationCorrection::None => "NONE",
            AberrationCorrection::LightTime => "LT",
            AberrationCorrection::LightTimeStellar => "LT+S",
            AberrationCorrection::Converged => "CN",
            AberrationCorrection::ConvergedStellar => "CN+S",
            AberrationCorrection::TransmitLightTime => "XLT",
            AberrationCorrection::TransmitLightTimeStellar => "XLT+S",
            AberrationCorrection::TransmitConverged => "XCN",
            AberrationCorrection::TransmitConvergedStellar => "XCN+S",
        }
    }
}

impl fmt::Display for AberrationCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AberrationCorrection {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match normalized.to_uppercase().as_str() {
            "NONE" => Ok(AberrationCorrection::None),
            "LT" => Ok(AberrationCorrection::LightTime),
            "LT+S" => Ok(AberrationCorrection::LightTimeStellar),
            "CN" => Ok(AberrationCorrection::Converged),
            "CN+S" => Ok(AberrationCorrection::ConvergedStellar),
            "XLT" => Ok(AberrationCorrection::TransmitLightTime),
            "XLT+S" => Ok(AberrationCorrection::TransmitLightTimeStellar),
            "XCN" => Ok(AberrationCorrection::TransmitConverged),
            "XCN+S" => Ok(AberrationCorrection::TransmitConvergedStellar),
            _ => Err(ProviderError::UnknownName(format!(
                "aberration correction '{s}'"
            ))),
        }
    }
}

/// Instrument field of view exactly as the toolkit describes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFov {
    /// Shape name: RECTANGLE, POLYGON, CIRCLE or ELLIPSE
    pub shape: String,
    /// Instrument reference frame name
    pub frame: String,
    /// Boresight direction in the instrument frame
    pub boresight: Vector3<f64>,
    /// Boundary vectors in the instrument frame
    pub boundary_vectors: Vec<Vector3<f64>>,
}

/// Closed interval of ephemeris time (TDB seconds past J2000)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Shape model used when testing a body against the FOV
///
/// Part of the [`EphemerisProvider::test_body_in_fov`] contract. The engine
/// asks for [`TargetShape::Ellipsoid`]; `Point` is the toolkit's other shape
/// model and stays available to callers testing bodies without radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    /// Triaxial ellipsoid from the body's radii, oriented in its body-fixed frame
    Ellipsoid,
    /// Body center only; needs no radii or frame
    Point,
}

impl TargetShape {
    /// Toolkit spelling of the shape, for providers forwarding to one
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetShape::Ellipsoid => "ELLIPSOID",
            TargetShape::Point => "POINT",
        }
    }
}

/// Star catalog selection
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StarQuery {
    /// Only return stars brighter than this visual magnitude, if set
    pub max_magnitude: Option<f64>,
}

/// One star catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    /// Catalog number
    pub id: i64,
    /// Right ascension in degrees
    pub ra_deg: f64,
    /// Declination in degrees
    pub dec_deg: f64,
    /// Visual magnitude
    pub magnitude: f64,
    /// Parallax in degrees
    pub parallax_deg: f64,
    /// Spectral type, e.g. "G2V"
    pub spectral_type: String,
}

/// Query contract of the ephemeris/frame/catalog toolkit
///
/// Epochs are ephemeris time in TDB seconds past J2000. Positions are in
/// kilometers, light times in seconds.
pub trait EphemerisProvider {
    /// Raw FOV definition of an instrument
    ///
    /// Fails with [`ProviderError::TooManyBoundaryVectors`] when the
    /// instrument defines more than `max_boundary_vectors` boundary vectors.
    fn get_instrument_fov(&self, instrument_id: i32, max_boundary_vectors: usize)
        -> Result<RawFov>;

    /// Position of `target` relative to `observer` in `frame`, and the one-way
    /// light time between them
    fn get_body_position(
        &self,
        target: &str,
        epoch: f64,
        frame: &str,
        correction: AberrationCorrection,
        observer: &str,
    ) -> Result<(Vector3<f64>, f64)>;

    /// Rotation taking vectors from `from_frame` to `to_frame` at `epoch`
    fn get_frame_rotation(&self, from_frame: &str, to_frame: &str, epoch: f64)
        -> Result<Matrix3<f64>>;

    /// Whether `target` is in the instrument FOV at any time within `window`
    ///
    /// A body without shape or frame data yields an error; the engine treats
    /// any error here as "not visible".
    #[allow(clippy::too_many_arguments)]
    fn test_body_in_fov(
        &self,
        instrument: &str,
        target: &str,
        shape: TargetShape,
        target_frame: &str,
        correction: AberrationCorrection,
        observer: &str,
        window: TimeWindow,
    ) -> Result<bool>;

    /// IDs of every body covered by the loaded ephemeris, in load order
    fn list_loaded_bodies(&self) -> Result<Vec<i32>>;

    /// Triaxial radii of a body in kilometers
    fn lookup_body_radii(&self, body_id: i32) -> Result<Vector3<f64>>;

    /// Configured body-fixed frame name of a body
    fn lookup_frame_name(&self, body_id: i32) -> Result<String>;

    /// Whether a frame with this name is registered
    fn frame_exists(&self, frame: &str) -> bool;

    /// Rows of the star catalog matching `query`, in catalog order
    fn query_star_catalog(&self, query: &StarQuery) -> Result<Vec<CatalogRow>>;

    /// Name bound to a body ID
    fn body_name(&self, body_id: i32) -> Option<String> {
        names::body_name(body_id).map(str::to_string)
    }

    /// ID bound to a body or instrument name
    fn body_id(&self, name: &str) -> Option<i32> {
        names::body_id(name)
    }
}
