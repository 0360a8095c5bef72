//! Solar-system bodies seen by an instrument
//!
//! - `visibility`: which loaded bodies intersect the FOV, and their full
//!   per-body observation (position, radii, orientation, screen position)
//! - `photometry`: simplified apparent-magnitude model

pub mod photometry;
pub mod visibility;

pub use photometry::{apparent_magnitude, phase_angle_deg};
pub use visibility::{find_visible_bodies, observe_body, orientation_matrix, VisibleBody};

use crate::snapshot::display::DisplayModel;
use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object class derived from a NAIF ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyCategory {
    Sun,
    Planet,
    Satellite,
    Barycenter,
    Spacecraft,
    /// Earth-orbiting artificial satellite
    Asat,
    /// Comets, asteroids and other small bodies
    SmallBody,
    Invalid,
}

impl BodyCategory {
    /// Classify a NAIF ID following the toolkit's numbering conventions
    pub fn from_naif_id(id: i32) -> Self {
        if id < -100_000 {
            BodyCategory::Asat
        } else if id < 0 {
            BodyCategory::Spacecraft
        } else if id < 10 {
            BodyCategory::Barycenter
        } else if id == 10 {
            BodyCategory::Sun
        } else if id < 100 {
            BodyCategory::Invalid
        } else if id % 100 == 99 {
            BodyCategory::Planet
        } else if id % 100 == 0 {
            BodyCategory::Invalid
        } else if id < 100_000 {
            BodyCategory::Satellite
        } else {
            BodyCategory::SmallBody
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyCategory::Sun => "SUN",
            BodyCategory::Planet => "PLANET",
            BodyCategory::Satellite => "SATELLITE",
            BodyCategory::Barycenter => "BARYCENTER",
            BodyCategory::Spacecraft => "SPACECRAFT",
            BodyCategory::Asat => "ASAT",
            BodyCategory::SmallBody => "SMALL_BODY",
            BodyCategory::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for BodyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visible solar-system body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetObservation {
    pub naif_id: i32,
    pub name: String,
    pub category: BodyCategory,
    /// Position relative to the observer in the instrument frame (km)
    pub position: Vector3<f64>,
    /// One-way light time to the observer (s)
    pub light_time: f64,
    /// Light-time distance to the observer (km)
    pub distance: f64,
    /// Apparent visual magnitude, if the body has a photometric model
    pub magnitude: Option<f64>,
    /// Triaxial radii (km)
    pub radii: Vector3<f64>,
    /// Rotation from the body-fixed frame into the instrument frame
    pub rotation: Matrix3<f64>,
    /// Position on the viewport in pixels
    pub screen_position: Vector2<f64>,
    /// Display models attached after the snapshot was computed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<DisplayModel>,
}

impl TargetObservation {
    /// Identifier used when exporting: planets are namespaced as `PLANET.<name>`
    pub fn export_id(&self) -> String {
        match self.category {
            BodyCategory::Planet => format!("PLANET.{}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// A visible body dropped from the snapshot, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBody {
    pub naif_id: i32,
    pub name: String,
    pub reason: String,
}
