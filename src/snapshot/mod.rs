//! Observation snapshot: everything an instrument sees at one epoch
//!
//! [`compute_snapshot`] runs the whole pipeline for one
//! [`ObservationRequest`]:
//!
//! 1. Resolve the instrument and build its [`FieldOfView`], date the epoch in UTC
//! 2. Observer position and the instrument/J2000 rotations
//! 3. Screen geometry: center RA/Dec, position angle, angular resolution
//! 4. Visible bodies, each fully observed or skipped with a recorded reason
//! 5. Catalog stars inside the FOV
//!
//! The resulting [`ObservationSnapshot`] is read-only apart from
//! [`ObservationSnapshot::attach_display_models`].

pub mod display;
pub mod request;

pub use display::{DisplayModel, DisplayModelTable};
pub use request::ObservationRequest;

use crate::bodies::{find_visible_bodies, observe_body, SkippedBody, TargetObservation};
use crate::constants::{INERTIAL_FRAME, RAD2DEG};
use crate::coordinates::ra_dec_degrees;
use crate::fov::FieldOfView;
use crate::geometry::{position_angle_and_distance, project_perspective};
use crate::provider::{AberrationCorrection, EphemerisProvider};
use crate::stars::{find_stars, StarObservation};
use crate::time::et_to_utc_iso;
use crate::{ObsGeomError, Result};
use log::{debug, warn};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Orientation and scale of the viewport on the sky
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScreenGeometry {
    ra: f64,
    dec: f64,
    position_angle: f64,
    angle_resolution: f64,
}

impl ScreenGeometry {
    fn new(
        fov: &FieldOfView,
        instrument_to_inertial: &Matrix3<f64>,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        let rect = &fov.bounding_rect;
        let center = instrument_to_inertial * rect.center_vec().normalize();
        let up = rect.top_vec().normalize();
        let up_inertial = instrument_to_inertial * up;

        let (pa, dist) = position_angle_and_distance(&center, &up_inertial);

        // Pixel scale from the screen center up to the middle of the top edge
        let top = project_perspective(rect, width, height, &up)?;
        let angle_resolution = dist / (height / 2.0 - top.y) * RAD2DEG;
        let (ra, dec) = ra_dec_degrees(&center);

        Ok(Self {
            ra,
            dec,
            position_angle: pa * RAD2DEG,
            angle_resolution,
        })
    }
}

/// Complete observation state for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSnapshot {
    pub request: ObservationRequest,
    /// UTC date of the epoch, ISO calendar form with milliseconds
    pub date: String,
    /// Resolved instrument NAIF ID
    pub instrument_id: i32,
    pub fov: FieldOfView,
    /// Full FOV cone angle in degrees
    pub fov_degrees: f64,
    /// Observer position relative to the Sun in the instrument frame (km)
    pub observer_position: Vector3<f64>,
    pub instrument_to_inertial: Matrix3<f64>,
    pub inertial_to_instrument: Matrix3<f64>,
    /// Right ascension of the screen center in degrees
    pub screen_center_ra: f64,
    /// Declination of the screen center in degrees
    pub screen_center_dec: f64,
    /// Position angle of screen-up in degrees, north through east
    pub position_angle: f64,
    /// Degrees per pixel along the vertical center line
    pub angle_resolution: f64,
    pub targets: Vec<TargetObservation>,
    pub stars: Vec<StarObservation>,
    /// Visible bodies left out of `targets`
    pub skipped: Vec<SkippedBody>,
}

fn resolve_instrument<P>(provider: &P, instrument: &str) -> Result<i32>
where
    P: EphemerisProvider + ?Sized,
{
    provider
        .body_id(instrument)
        .or_else(|| instrument.trim().parse().ok())
        .ok_or_else(|| ObsGeomError::UnknownBody(instrument.to_string()))
}

/// Errors that drop a single body instead of the whole snapshot
fn is_local_skip(error: &ObsGeomError) -> bool {
    matches!(
        error,
        ObsGeomError::UnknownBodyFrame { .. }
            | ObsGeomError::MissingRadiiData { .. }
            | ObsGeomError::ObjectOnViewPlane
    )
}

/// Compute the observation snapshot for a request
///
/// # Errors
///
/// Instrument resolution, FOV construction and provider failures abort the
/// computation. Bodies whose frame, radii or projection cannot be resolved are
/// left out and listed in [`ObservationSnapshot::skipped`].
pub fn compute_snapshot<P>(provider: &P, request: &ObservationRequest) -> Result<ObservationSnapshot>
where
    P: EphemerisProvider + ?Sized,
{
    request.validate()?;
    let epoch = request.epoch;
    let (width, height) = request.viewport();
    let date = et_to_utc_iso(epoch)?;

    let instrument_id = resolve_instrument(provider, &request.instrument)?;
    let fov = FieldOfView::from_provider(provider, instrument_id)?;

    let (observer_position, _) = provider.get_body_position(
        &request.observer,
        epoch,
        &fov.frame,
        request.aberration_correction,
        "SUN",
    )?;
    let instrument_to_inertial = provider.get_frame_rotation(&fov.frame, INERTIAL_FRAME, epoch)?;
    let inertial_to_instrument = provider.get_frame_rotation(INERTIAL_FRAME, &fov.frame, epoch)?;

    let screen = ScreenGeometry::new(&fov, &instrument_to_inertial, width, height)?;
    debug!(
        "Screen center RA {:.6} Dec {:.6}, position angle {:.4}, {:.3e} deg/px",
        screen.ra, screen.dec, screen.position_angle, screen.angle_resolution
    );

    let (observer_from_sun, _) = provider.get_body_position(
        &request.observer,
        epoch,
        INERTIAL_FRAME,
        AberrationCorrection::LightTimeStellar,
        "SUN",
    )?;

    let visible = find_visible_bodies(
        provider,
        &request.instrument,
        epoch,
        request.aberration_correction,
        &request.observer,
    )?;

    let mut targets = Vec::with_capacity(visible.len());
    let mut skipped = Vec::new();
    for body in &visible {
        match observe_body(provider, request, &fov, &observer_from_sun, body) {
            Ok(target) => targets.push(target),
            Err(e) if is_local_skip(&e) => {
                warn!("Skipping {} ({}): {}", body.name, body.naif_id, e);
                skipped.push(SkippedBody {
                    naif_id: body.naif_id,
                    name: body.name.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    let stars = find_stars(
        provider,
        &fov.bounding_rect.center_vec(),
        &inertial_to_instrument,
        &fov,
        width,
        height,
        request.magnitude_limit,
    )?;

    debug!(
        "Snapshot of {} at {} ({}): {} targets, {} skipped, {} stars",
        request.instrument,
        epoch,
        date,
        targets.len(),
        skipped.len(),
        stars.len()
    );

    Ok(ObservationSnapshot {
        request: request.clone(),
        date,
        instrument_id,
        fov_degrees: fov.fov_degrees(),
        fov,
        observer_position,
        instrument_to_inertial,
        inertial_to_instrument,
        screen_center_ra: screen.ra,
        screen_center_dec: screen.dec,
        position_angle: screen.position_angle,
        angle_resolution: screen.angle_resolution,
        targets,
        stars,
        skipped,
    })
}

impl ObservationSnapshot {
    /// Attach display models to every target with a table entry
    ///
    /// Targets without an entry keep whatever models they already had.
    pub fn attach_display_models(&mut self, table: &DisplayModelTable) {
        for target in &mut self.targets {
            if let Some(models) = table.lookup(target) {
                target.models = models;
            }
        }
    }

    /// Visible target by name
    pub fn target(&self, name: &str) -> Option<&TargetObservation> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
