//! Instrument field of view geometry
//!
//! Turns the toolkit's raw FOV description (shape name, frame, boresight and
//! boundary vectors) into the quantities the rest of the engine works with: a
//! bounding [`Rect`] on the focal plane, the maximum half-cone angle, the
//! vertical field of view and the aspect ratio.
//!
//! All vectors are in the instrument frame.

use crate::constants::{MAX_FOV_BOUNDARY_VECTORS, RAD2DEG};
use crate::coordinates::angle_between;
use crate::geometry::Rect;
use crate::provider::{EphemerisProvider, ProviderError, RawFov};
use crate::{ObsGeomError, Result};
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Angular step, in degrees, used when sampling an elliptical boundary
const ELLIPSE_SAMPLE_STEP_DEG: f64 = 1.0;
/// Number of samples over a quarter turn of an elliptical boundary
const ELLIPSE_SAMPLES: usize = 90;

/// FOV shapes the toolkit can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FovShape {
    Rectangle,
    Polygon,
    Circle,
    Ellipse,
}

impl FovShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            FovShape::Rectangle => "RECTANGLE",
            FovShape::Polygon => "POLYGON",
            FovShape::Circle => "CIRCLE",
            FovShape::Ellipse => "ELLIPSE",
        }
    }
}

impl fmt::Display for FovShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FovShape {
    type Err = ObsGeomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "RECTANGLE" => Ok(FovShape::Rectangle),
            "POLYGON" => Ok(FovShape::Polygon),
            "CIRCLE" => Ok(FovShape::Circle),
            "ELLIPSE" => Ok(FovShape::Ellipse),
            _ => Err(ObsGeomError::UnsupportedFovShape(s.to_string())),
        }
    }
}

/// Boundary description, carrying only what each shape needs
#[derive(Debug, Clone, PartialEq)]
enum Boundary<'a> {
    /// Corners of a rectangle or polygon
    Polygon(&'a [Vector3<f64>]),
    /// One point on the circle's edge
    Circle { edge: Vector3<f64> },
    /// Endpoints of the two semi-axes
    Ellipse {
        major: Vector3<f64>,
        minor: Vector3<f64>,
    },
}

impl<'a> Boundary<'a> {
    fn new(shape: FovShape, vectors: &'a [Vector3<f64>]) -> Result<Self> {
        let need = match shape {
            FovShape::Rectangle | FovShape::Polygon => 2,
            FovShape::Circle => 1,
            FovShape::Ellipse => 2,
        };
        if vectors.len() < need {
            return Err(ObsGeomError::InvalidGeometry(format!(
                "{shape} FOV needs at least {need} boundary vectors, got {}",
                vectors.len()
            )));
        }

        Ok(match shape {
            FovShape::Rectangle | FovShape::Polygon => Boundary::Polygon(vectors),
            FovShape::Circle => Boundary::Circle { edge: vectors[0] },
            FovShape::Ellipse => Boundary::Ellipse {
                major: vectors[0],
                minor: vectors[1],
            },
        })
    }

    /// (left, top, right, bottom) on the instrument focal plane
    fn bounds(&self, boresight: &Vector3<f64>) -> (f64, f64, f64, f64) {
        match self {
            Boundary::Polygon(vertices) => vertices.iter().fold(
                (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
                |(left, top, right, bottom), v| {
                    (left.min(v.x), top.min(v.y), right.max(v.x), bottom.max(v.y))
                },
            ),
            Boundary::Circle { edge } => {
                let r = (edge.x - boresight.x).hypot(edge.y - boresight.y);
                (
                    boresight.x - r,
                    boresight.y - r,
                    boresight.x + r,
                    boresight.y + r,
                )
            }
            Boundary::Ellipse { major, minor } => {
                let (cx, cy) = (boresight.x, boresight.y);
                let (dx, dy) = (major.x - cx, major.y - cy);
                let a = dx.hypot(dy);
                let (sin_t, cos_t) = dy.atan2(dx).sin_cos();
                let b = (minor.x - cx).hypot(minor.y - cy);

                // Sampled over a quarter turn, then mirrored about the center
                let mut right = cx;
                let mut bottom = cy;
                for i in 0..ELLIPSE_SAMPLES {
                    let (sin_r, cos_r) =
                        (i as f64 * ELLIPSE_SAMPLE_STEP_DEG).to_radians().sin_cos();
                    let tx = a * cos_r;
                    let ty = b * sin_r;
                    right = right.max(tx * cos_t - ty * sin_t + cx);
                    bottom = bottom.max(tx * sin_t + ty * cos_t + cy);
                }
                let left = right - (right - cx) * 2.0;
                let top = bottom - (bottom - cy) * 2.0;
                (left, top, right, bottom)
            }
        }
    }

    /// Largest angular distance from the boresight to the boundary, in radians
    fn max_half_angle(&self, boresight: &Vector3<f64>) -> f64 {
        match self {
            Boundary::Polygon(vertices) => {
                let mut max = -1.0_f64;
                for (i, a) in vertices.iter().enumerate() {
                    for b in &vertices[i + 1..] {
                        max = max.max(angle_between(a, b) * 0.5);
                    }
                }
                max
            }
            Boundary::Circle { edge } => angle_between(boresight, edge),
            // Only the first semi-axis is measured; the minor axis never widens
            // the cone.
            Boundary::Ellipse { major, .. } => angle_between(boresight, major),
        }
    }
}

/// Field of view of one instrument, read-only once computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    /// Instrument NAIF ID
    pub instrument_id: i32,
    pub shape: FovShape,
    /// Instrument reference frame
    pub frame: String,
    pub boresight: Vector3<f64>,
    pub boundary_vectors: Vec<Vector3<f64>>,
    /// Bounding rectangle of the boundary on the focal plane
    pub bounding_rect: Rect,
    /// Maximum half-cone angle in radians
    pub max_half_angle: f64,
    /// Full vertical field of view in degrees
    pub vertical_fov_deg: f64,
    /// Height over width of the bounding rectangle
    pub aspect: f64,
}

impl FieldOfView {
    /// Build the FOV geometry from a raw toolkit description
    pub fn new(instrument_id: i32, raw: RawFov) -> Result<Self> {
        if raw.boundary_vectors.len() > MAX_FOV_BOUNDARY_VECTORS {
            return Err(ObsGeomError::FovTooComplex {
                count: raw.boundary_vectors.len(),
                max: MAX_FOV_BOUNDARY_VECTORS,
            });
        }
        let shape: FovShape = raw.shape.parse()?;
        let boundary = Boundary::new(shape, &raw.boundary_vectors)?;

        let (left, top, right, bottom) = boundary.bounds(&raw.boresight);
        let depth = raw.boundary_vectors[0].z;
        let frame_tag = format!("({})", raw.frame);
        let bounding_rect = Rect::new(left, top, right, bottom, depth, Some(&frame_tag))?;

        let max_half_angle = boundary.max_half_angle(&raw.boresight);
        if !(max_half_angle > 0.0) {
            return Err(ObsGeomError::InvalidGeometry(format!(
                "FOV of instrument {instrument_id} has no angular extent"
            )));
        }

        let vertical_fov_deg =
            angle_between(&bounding_rect.center_vec(), &bounding_rect.top_vec()) * 2.0 * RAD2DEG;
        let aspect = bounding_rect.aspect();

        debug!(
            "FOV of {}: {} in {}, half angle {:.6} rad, rect {}",
            instrument_id, shape, raw.frame, max_half_angle, bounding_rect
        );

        Ok(Self {
            instrument_id,
            shape,
            frame: raw.frame,
            boresight: raw.boresight,
            boundary_vectors: raw.boundary_vectors,
            bounding_rect,
            max_half_angle,
            vertical_fov_deg,
            aspect,
        })
    }

    /// Query the provider for an instrument's FOV and build its geometry
    pub fn from_provider<P>(provider: &P, instrument_id: i32) -> Result<Self>
    where
        P: EphemerisProvider + ?Sized,
    {
        let raw = provider
            .get_instrument_fov(instrument_id, MAX_FOV_BOUNDARY_VECTORS)
            .map_err(|e| match e {
                ProviderError::TooManyBoundaryVectors { count, max, .. } => {
                    ObsGeomError::FovTooComplex { count, max }
                }
                other => ObsGeomError::Provider(other),
            })?;
        Self::new(instrument_id, raw)
    }

    /// Full cone angle in degrees
    pub fn fov_degrees(&self) -> f64 {
        self.max_half_angle * 2.0 * RAD2DEG
    }
}
