//! Obsgeom: observation geometry for instrument fields of view
//!
//! Given an observer, an instrument and an epoch, this crate works out which
//! solar-system bodies and catalog stars fall inside the instrument's field of
//! view, where they land on a viewport, how bright they appear and how they are
//! oriented. The result is an [`ObservationSnapshot`] that a separate renderer
//! or serializer consumes.
//!
//! Ephemeris, frame and catalog data come from an [`EphemerisProvider`] session
//! handed in by the caller; this crate never owns kernel state itself.

use thiserror::Error;

pub mod bodies;
pub mod constants;
pub mod coordinates;
pub mod fov;
pub mod geometry;
pub mod provider;
pub mod snapshot;
pub mod stars;
pub mod time;

// Re-export commonly used types
pub use bodies::{BodyCategory, SkippedBody, TargetObservation};
pub use fov::{FieldOfView, FovShape};
pub use geometry::rect::Rect;
pub use provider::{AberrationCorrection, EphemerisProvider, ProviderError};
pub use snapshot::{compute_snapshot, ObservationRequest, ObservationSnapshot};
pub use stars::StarObservation;

/// Main error type for the obsgeom library
#[derive(Debug, Error)]
pub enum ObsGeomError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Unsupported FOV shape: {0}")]
    UnsupportedFovShape(String),

    #[error("FOV has {count} boundary vectors, at most {max} are supported")]
    FovTooComplex { count: usize, max: usize },

    #[error("No body-fixed frame for {name} ({naif_id})")]
    UnknownBodyFrame { naif_id: i32, name: String },

    #[error("No radii data for {name} ({naif_id})")]
    MissingRadiiData { naif_id: i32, name: String },

    #[error("Object lies on the viewing plane (z = 0)")]
    ObjectOnViewPlane,

    #[error("Malformed catalog row {id}: {reason}")]
    MalformedCatalogRow { id: i64, reason: String },

    #[error("Unknown body or instrument: {0}")]
    UnknownBody(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Time error: {0}")]
    Time(#[from] time::TimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for obsgeom operations
pub type Result<T> = std::result::Result<T, ObsGeomError>;
