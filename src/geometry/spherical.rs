//! Position angles, great-circle distances and viewport projection

use super::rect::Rect;
use crate::constants::TAU;
use crate::coordinates::to_spherical;
use crate::{ObsGeomError, Result};
use nalgebra::Vector3;

/// Position angle and great-circle distance from `v1` to `v2`
///
/// Both vectors are reduced to right ascension and declination in their common
/// frame. The position angle is the bearing of `v2` seen from `v1`, measured
/// from north through east and normalized to [0, 2π). The distance uses the
/// haversine form, which stays well conditioned for small separations.
///
/// Returns `(angle, distance)` in radians.
pub fn position_angle_and_distance(v1: &Vector3<f64>, v2: &Vector3<f64>) -> (f64, f64) {
    let (_, ra1, dec1) = to_spherical(v1);
    let (_, ra2, dec2) = to_spherical(v2);
    let d_ra = ra2 - ra1;
    let d_dec = dec2 - dec1;

    let mut pa = (dec2.cos() * d_ra.sin())
        .atan2(dec1.cos() * dec2.sin() - dec1.sin() * dec2.cos() * d_ra.cos());
    if pa < 0.0 {
        pa += TAU;
    }

    let sda = (d_ra / 2.0).sin();
    let sdd = (d_dec / 2.0).sin();
    let hav = sdd * sdd + dec1.cos() * dec2.cos() * sda * sda;
    let dist = 2.0 * hav.sqrt().min(1.0).asin();

    (pa, dist)
}

/// Project a point through the pinhole onto a `width` x `height` viewport
///
/// The point is scaled onto the plane `z = rect.depth()` and then mapped so
/// that `rect.left()` lands on pixel 0 and `rect.right()` on pixel `width`
/// (likewise top/bottom for y). The z component is passed through unchanged.
///
/// Fails with [`ObsGeomError::ObjectOnViewPlane`] for `point.z == 0`.
pub fn project_perspective(
    rect: &Rect,
    width: f64,
    height: f64,
    point: &Vector3<f64>,
) -> Result<Vector3<f64>> {
    if point.z == 0.0 {
        return Err(ObsGeomError::ObjectOnViewPlane);
    }

    let scale = rect.depth() / point.z;
    Ok(Vector3::new(
        (scale * point.x - rect.left()) * width / rect.width(),
        (scale * point.y - rect.top()) * height / rect.height(),
        point.z,
    ))
}

/// Map a point already on the view plane onto a `width` x `height` viewport
pub fn project_orthographic(
    rect: &Rect,
    width: f64,
    height: f64,
    point: &Vector3<f64>,
) -> Vector3<f64> {
    Vector3::new(
        (point.x - rect.left()) * width / rect.width(),
        (point.y - rect.top()) * height / rect.height(),
        point.z,
    )
}
