//! Visible-body search and per-body observation geometry

use super::photometry::apparent_magnitude;
use super::{BodyCategory, TargetObservation};
use crate::constants::{BODY_FRAME_PREFIX, CLIGHT_KM_S, INERTIAL_FRAME, VISIBILITY_WINDOW_S};
use crate::fov::FieldOfView;
use crate::geometry::project_perspective;
use crate::provider::{AberrationCorrection, EphemerisProvider, TargetShape, TimeWindow};
use crate::snapshot::ObservationRequest;
use crate::{ObsGeomError, Result};
use log::debug;
use nalgebra::{Matrix3, Vector2, Vector3};

/// A loaded body found inside the field of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleBody {
    pub naif_id: i32,
    pub name: String,
}

fn body_frame_name(name: &str) -> String {
    format!("{BODY_FRAME_PREFIX}{name}")
}

/// Every loaded body that intersects the instrument FOV during
/// `[epoch, epoch + 1 s]`
///
/// Bodies are tested as ellipsoids in their `IAU_<name>` frame. A failed test
/// (typically a body with no shape or frame data) counts as not visible and is
/// never propagated. Results keep the provider's enumeration order.
pub fn find_visible_bodies<P>(
    provider: &P,
    instrument: &str,
    epoch: f64,
    correction: AberrationCorrection,
    observer: &str,
) -> Result<Vec<VisibleBody>>
where
    P: EphemerisProvider + ?Sized,
{
    let window = TimeWindow::new(epoch, epoch + VISIBILITY_WINDOW_S);
    let mut visible = Vec::new();

    for naif_id in provider.list_loaded_bodies()? {
        let name = provider
            .body_name(naif_id)
            .unwrap_or_else(|| naif_id.to_string());

        let in_fov = provider
            .test_body_in_fov(
                instrument,
                &name,
                TargetShape::Ellipsoid,
                &body_frame_name(&name),
                correction,
                observer,
                window,
            )
            .unwrap_or_else(|e| {
                debug!("Visibility test for {} failed, treating as absent: {}", name, e);
                false
            });

        if in_fov {
            visible.push(VisibleBody { naif_id, name });
        }
    }

    debug!("{} bodies visible from {} at {}", visible.len(), instrument, epoch);
    Ok(visible)
}

/// Rotation from a body's body-fixed frame into the instrument frame
///
/// The frame is `IAU_<name>` when registered, otherwise the body's configured
/// frame name. Fails with [`ObsGeomError::UnknownBodyFrame`] when neither
/// resolves; provider failures other than missing data propagate as
/// [`ObsGeomError::Provider`].
pub fn orientation_matrix<P>(
    provider: &P,
    naif_id: i32,
    name: &str,
    epoch: f64,
    instrument_frame: &str,
) -> Result<Matrix3<f64>>
where
    P: EphemerisProvider + ?Sized,
{
    let unknown = || ObsGeomError::UnknownBodyFrame {
        naif_id,
        name: name.to_string(),
    };

    let iau_frame = body_frame_name(name);
    let frame = if provider.frame_exists(&iau_frame) {
        iau_frame
    } else {
        match provider.lookup_frame_name(naif_id) {
            Ok(frame) if provider.frame_exists(&frame) => frame,
            Ok(_) => return Err(unknown()),
            Err(e) if e.is_missing_data() => return Err(unknown()),
            Err(e) => return Err(e.into()),
        }
    };

    Ok(provider.get_frame_rotation(&frame, instrument_frame, epoch)?)
}

/// Full observation of one visible body
///
/// # Arguments
///
/// * `provider` - Ephemeris session
/// * `request` - Epoch, observer, correction and viewport
/// * `fov` - Instrument field of view
/// * `observer_from_sun` - Observer position relative to the Sun in J2000 (km)
/// * `body` - Body to observe
///
/// Fails with [`ObsGeomError::MissingRadiiData`],
/// [`ObsGeomError::UnknownBodyFrame`] or [`ObsGeomError::ObjectOnViewPlane`]
/// for problems local to this body. Provider failures that are not missing
/// data come back as [`ObsGeomError::Provider`].
pub fn observe_body<P>(
    provider: &P,
    request: &ObservationRequest,
    fov: &FieldOfView,
    observer_from_sun: &Vector3<f64>,
    body: &VisibleBody,
) -> Result<TargetObservation>
where
    P: EphemerisProvider + ?Sized,
{
    let epoch = request.epoch;

    let (body_from_sun, _) = provider.get_body_position(
        &body.name,
        epoch,
        INERTIAL_FRAME,
        AberrationCorrection::LightTimeStellar,
        "SUN",
    )?;
    let magnitude = apparent_magnitude(body.naif_id, &body_from_sun, observer_from_sun);

    let (position, light_time) = provider.get_body_position(
        &body.name,
        epoch,
        &fov.frame,
        request.aberration_correction,
        &request.observer,
    )?;

    let radii = provider.lookup_body_radii(body.naif_id).map_err(|e| {
        if e.is_missing_data() {
            ObsGeomError::MissingRadiiData {
                naif_id: body.naif_id,
                name: body.name.clone(),
            }
        } else {
            ObsGeomError::Provider(e)
        }
    })?;

    let rotation = orientation_matrix(provider, body.naif_id, &body.name, epoch, &fov.frame)?;

    let (width, height) = request.viewport();
    let screen = project_perspective(&fov.bounding_rect, width, height, &position)?;

    Ok(TargetObservation {
        naif_id: body.naif_id,
        name: body.name.clone(),
        category: BodyCategory::from_naif_id(body.naif_id),
        position,
        light_time,
        distance: light_time * CLIGHT_KM_S,
        magnitude,
        radii,
        rotation,
        screen_position: Vector2::new(screen.x, screen.y),
        models: Vec::new(),
    })
}
