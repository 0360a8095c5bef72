//! Apparent magnitudes of the Sun, Moon and planets
//!
//! This is a deliberately simple photometric model: a per-planet absolute
//! magnitude with inverse-square distance terms, a polynomial phase-angle
//! correction for Mercury, Venus, Mars and Jupiter, and a fixed ring-tilt
//! offset for Saturn. The Moon is a constant. Satellites other than the Moon,
//! small bodies and spacecraft have no model.

use crate::constants::AU_KM;
use crate::provider::names::ids;
use nalgebra::Vector3;

/// Visual magnitude of the Sun at 1 AU
const SUN_MAGNITUDE_1AU: f64 = -27.3;
/// Fixed magnitude used for the Moon
const MOON_MAGNITUDE: f64 = 0.38;
/// Offset applied to Saturn for a typical ring tilt
const SATURN_RING_CORRECTION: f64 = -1.1 * 0.3;

/// Absolute magnitude of the nine major planets
fn planet_absolute_magnitude(body_id: i32) -> Option<f64> {
    match body_id {
        ids::MERCURY => Some(-0.42),
        ids::VENUS => Some(-4.40),
        ids::EARTH => Some(-2.96),
        ids::MARS => Some(-1.52),
        ids::JUPITER => Some(-9.40),
        ids::SATURN => Some(-8.68),
        ids::URANUS => Some(-7.19),
        ids::NEPTUNE => Some(-6.87),
        ids::PLUTO => Some(-1.00),
        _ => None,
    }
}

/// Phase angle in degrees from the three sides of the Sun-body-observer triangle
///
/// The cosine is clamped to [-1, 1] so collinear geometry cannot push `acos`
/// out of its domain.
pub fn phase_angle_deg(body_sun: f64, body_observer: f64, sun_observer: f64) -> f64 {
    let cos_phase = (body_sun * body_sun + body_observer * body_observer
        - sun_observer * sun_observer)
        / (2.0 * body_sun * body_observer);
    cos_phase.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Apparent visual magnitude of a body
///
/// # Arguments
///
/// * `body_id` - NAIF ID of the body
/// * `body_from_sun` - Body position relative to the Sun (km)
/// * `observer_from_sun` - Observer position relative to the Sun (km)
///
/// # Returns
///
/// `None` for bodies without a photometric model.
pub fn apparent_magnitude(
    body_id: i32,
    body_from_sun: &Vector3<f64>,
    observer_from_sun: &Vector3<f64>,
) -> Option<f64> {
    let d_body_observer = (body_from_sun - observer_from_sun).norm() / AU_KM;
    let d_body_sun = body_from_sun.norm() / AU_KM;
    let d_sun_observer = observer_from_sun.norm() / AU_KM;

    match body_id {
        ids::SUN => return Some(SUN_MAGNITUDE_1AU + 5.0 * d_sun_observer.log10()),
        ids::MOON => return Some(MOON_MAGNITUDE),
        _ => {}
    }

    let mut mag = planet_absolute_magnitude(body_id)?;
    mag += 5.0 * (d_body_observer * d_body_sun).log10();

    let phase = || phase_angle_deg(d_body_sun, d_body_observer, d_sun_observer);
    match body_id {
        ids::MERCURY => {
            let pa = phase();
            mag += (0.0380 - 0.000273 * pa + 0.000002 * pa * pa) * pa;
        }
        ids::VENUS => {
            let pa = phase();
            mag += (0.0009 + 0.000239 * pa - 0.00000065 * pa * pa) * pa;
        }
        ids::MARS => mag += 0.016 * phase(),
        ids::JUPITER => mag += 0.005 * phase(),
        ids::SATURN => mag += SATURN_RING_CORRECTION,
        _ => {}
    }

    Some(mag)
}
