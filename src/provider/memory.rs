//! In-memory provider for tests, demos and renderer development
//!
//! Holds a static solar system: fixed body positions, fixed frame
//! orientations and a small star list. Nothing moves with time, which makes
//! every derived quantity easy to compute by hand.
//!
//! # Model
//!
//! - Body positions are J2000 vectors relative to a common origin (km).
//! - Each named frame stores the rotation taking J2000 vectors into it.
//! - Light time is the straight-line distance divided by the speed of light;
//!   aberration corrections are accepted but not applied.
//! - A body is in an instrument's FOV when its limb comes within the cone
//!   around the boresight that encloses every boundary vector. Bodies without
//!   radii have no shape model and fail the test with [`ProviderError::NoData`].
//!   The target frame is not consulted, so a body with radii but no
//!   registered body-fixed frame still tests as visible.

use super::errors::{ProviderError, Result};
use super::{
    names, AberrationCorrection, CatalogRow, EphemerisProvider, RawFov, StarQuery, TargetShape,
    TimeWindow,
};
use crate::constants::{CLIGHT_KM_S, INERTIAL_FRAME};
use crate::coordinates::angle_between;
use nalgebra::{Matrix3, Vector3};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Instrument {
    id: i32,
    fov: RawFov,
}

/// Static ephemeris, frame and catalog data held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    /// Loaded body IDs in load order
    bodies: Vec<i32>,
    names: HashMap<i32, String>,
    positions: HashMap<i32, Vector3<f64>>,
    radii: HashMap<i32, Vector3<f64>>,
    /// Rotation from J2000 into each named frame
    frames: HashMap<String, Matrix3<f64>>,
    frame_names: HashMap<i32, String>,
    instruments: HashMap<String, Instrument>,
    stars: Vec<CatalogRow>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body at a fixed J2000 position
    ///
    /// Bodies are enumerated in the order they are added.
    pub fn with_body(mut self, id: i32, name: &str, position: Vector3<f64>) -> Self {
        if !self.bodies.contains(&id) {
            self.bodies.push(id);
        }
        self.names.insert(id, name.to_uppercase());
        self.positions.insert(id, position);
        self
    }

    /// Give a body a shape
    pub fn with_radii(mut self, id: i32, radii: Vector3<f64>) -> Self {
        self.radii.insert(id, radii);
        self
    }

    /// Register a frame by its rotation from J2000
    pub fn with_frame(mut self, name: &str, from_j2000: Matrix3<f64>) -> Self {
        self.frames.insert(name.to_string(), from_j2000);
        self
    }

    /// Configure the body-fixed frame name of a body
    pub fn with_body_frame_name(mut self, id: i32, frame: &str) -> Self {
        self.frame_names.insert(id, frame.to_string());
        self
    }

    /// Add an instrument; its frame must be registered separately
    pub fn with_instrument(mut self, name: &str, id: i32, fov: RawFov) -> Self {
        self.instruments.insert(name.to_uppercase(), Instrument { id, fov });
        self
    }

    pub fn with_star(mut self, row: CatalogRow) -> Self {
        self.stars.push(row);
        self
    }

    fn resolve_body(&self, name: &str) -> Result<i32> {
        self.body_id(name)
            .filter(|id| self.positions.contains_key(id))
            .ok_or_else(|| ProviderError::NoData(format!("no ephemeris for {name}")))
    }

    fn rotation_from_j2000(&self, frame: &str) -> Result<Matrix3<f64>> {
        if frame == INERTIAL_FRAME {
            return Ok(Matrix3::identity());
        }
        self.frames
            .get(frame)
            .copied()
            .ok_or_else(|| ProviderError::UnknownName(format!("frame {frame}")))
    }

    fn instrument(&self, name: &str) -> Result<&Instrument> {
        self.instruments
            .get(&name.to_uppercase())
            .ok_or_else(|| ProviderError::UnknownName(format!("instrument {name}")))
    }
}

impl EphemerisProvider for InMemoryProvider {
    fn get_instrument_fov(
        &self,
        instrument_id: i32,
        max_boundary_vectors: usize,
    ) -> Result<RawFov> {
        let instrument = self
            .instruments
            .values()
            .find(|i| i.id == instrument_id)
            .ok_or_else(|| {
                ProviderError::NoData(format!("no FOV for instrument {instrument_id}"))
            })?;

        let count = instrument.fov.boundary_vectors.len();
        if count > max_boundary_vectors {
            return Err(ProviderError::TooManyBoundaryVectors {
                instrument: instrument_id,
                count,
                max: max_boundary_vectors,
            });
        }
        Ok(instrument.fov.clone())
    }

    fn get_body_position(
        &self,
        target: &str,
        _epoch: f64,
        frame: &str,
        _correction: AberrationCorrection,
        observer: &str,
    ) -> Result<(Vector3<f64>, f64)> {
        let target = self.positions[&self.resolve_body(target)?];
        let observer = self.positions[&self.resolve_body(observer)?];
        let relative = self.rotation_from_j2000(frame)? * (target - observer);
        Ok((relative, relative.norm() / CLIGHT_KM_S))
    }

    fn get_frame_rotation(
        &self,
        from_frame: &str,
        to_frame: &str,
        _epoch: f64,
    ) -> Result<Matrix3<f64>> {
        let from = self.rotation_from_j2000(from_frame)?;
        let to = self.rotation_from_j2000(to_frame)?;
        Ok(to * from.transpose())
    }

    fn test_body_in_fov(
        &self,
        instrument: &str,
        target: &str,
        shape: TargetShape,
        _target_frame: &str,
        correction: AberrationCorrection,
        observer: &str,
        window: TimeWindow,
    ) -> Result<bool> {
        let instrument = self.instrument(instrument)?;
        let target_id = self.resolve_body(target)?;
        // Bounding sphere of the ellipsoid; orientation never matters
        let radius = match shape {
            TargetShape::Ellipsoid => self
                .radii
                .get(&target_id)
                .map(|r| r.max())
                .ok_or_else(|| ProviderError::NoData(format!("no shape data for {target}")))?,
            TargetShape::Point => 0.0,
        };

        let fov = &instrument.fov;
        let (position, _) =
            self.get_body_position(target, window.start, &fov.frame, correction, observer)?;
        let cone = fov
            .boundary_vectors
            .iter()
            .map(|b| angle_between(&fov.boresight, b))
            .fold(0.0_f64, f64::max);
        let distance = position.norm();
        let angular_radius = if distance > radius {
            (radius / distance).asin()
        } else {
            std::f64::consts::PI
        };

        Ok(angle_between(&fov.boresight, &position) - angular_radius <= cone)
    }

    fn list_loaded_bodies(&self) -> Result<Vec<i32>> {
        Ok(self.bodies.clone())
    }

    fn lookup_body_radii(&self, body_id: i32) -> Result<Vector3<f64>> {
        self.radii
            .get(&body_id)
            .copied()
            .ok_or_else(|| ProviderError::NoData(format!("BODY{body_id}_RADII")))
    }

    fn lookup_frame_name(&self, body_id: i32) -> Result<String> {
        self.frame_names
            .get(&body_id)
            .cloned()
            .ok_or_else(|| ProviderError::NoData(format!("FRAME_{body_id}_NAME")))
    }

    fn frame_exists(&self, frame: &str) -> bool {
        frame == INERTIAL_FRAME || self.frames.contains_key(frame)
    }

    fn query_star_catalog(&self, query: &StarQuery) -> Result<Vec<CatalogRow>> {
        Ok(self
            .stars
            .iter()
            .filter(|row| query.max_magnitude.map_or(true, |m| row.magnitude < m))
            .cloned()
            .collect())
    }

    fn body_name(&self, body_id: i32) -> Option<String> {
        self.names
            .get(&body_id)
            .cloned()
            .or_else(|| names::body_name(body_id).map(str::to_string))
    }

    fn body_id(&self, name: &str) -> Option<i32> {
        let upper = name.trim().to_uppercase();
        self.names
            .iter()
            .find(|(_, n)| **n == upper)
            .map(|(id, _)| *id)
            .or_else(|| self.instruments.get(&upper).map(|i| i.id))
            .or_else(|| names::body_id(name))
            .or_else(|| upper.parse().ok())
    }
}
