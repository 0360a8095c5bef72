//! # Cartesian Direction Helpers
//!
//! Conversions between rectangular vectors and (range, right ascension,
//! declination) triples, plus the angular separation of two vectors.
//!
//! ## Coordinate System Convention
//!
//! - **X-axis**: Points toward RA = 0°, Dec = 0° of the frame
//! - **Y-axis**: Points toward RA = 90°, Dec = 0°
//! - **Z-axis**: Points toward Dec = +90°
//!
//! The same convention holds in any frame the vectors are expressed in, so the
//! helpers work equally for J2000 and instrument-frame directions.
//!
//! ## Examples
//!
//! ```rust
//! use obsgeom::coordinates::cartesian::{from_spherical, to_spherical};
//!
//! let v = from_spherical(2.0, 0.0, 0.0);
//! let (range, ra, dec) = to_spherical(&v);
//! assert!((range - 2.0).abs() < 1e-15);
//! assert!(ra.abs() < 1e-15);
//! assert!(dec.abs() < 1e-15);
//! ```

use crate::constants::TAU;
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Creates a rectangular vector from spherical coordinates
///
/// # Arguments
///
/// * `range` - Distance from origin (1.0 for unit vectors)
/// * `ra` - Right ascension in radians
/// * `dec` - Declination in radians
///
/// # Mathematical Conversion
///
/// - `x = range * cos(dec) * cos(ra)`
/// - `y = range * cos(dec) * sin(ra)`
/// - `z = range * sin(dec)`
pub fn from_spherical(range: f64, ra: f64, dec: f64) -> Vector3<f64> {
    let cos_dec = dec.cos();
    Vector3::new(
        range * cos_dec * ra.cos(),
        range * cos_dec * ra.sin(),
        range * dec.sin(),
    )
}

/// Converts a rectangular vector to spherical coordinates
///
/// Returns `(range, ra, dec)` with right ascension normalized to [0, 2π) and
/// declination in [-π/2, π/2]. The zero vector maps to `(0, 0, 0)`.
pub fn to_spherical(v: &Vector3<f64>) -> (f64, f64, f64) {
    let range = v.norm();

    if range == 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let dec = (v.z / range).clamp(-1.0, 1.0).asin();
    let ra = if v.x == 0.0 && v.y == 0.0 {
        0.0 // Arbitrary choice at poles
    } else {
        let mut ra = v.y.atan2(v.x);
        if ra < 0.0 {
            ra += TAU;
        }
        ra
    };

    (range, ra, dec)
}

/// Angular separation between two vectors in radians
///
/// Uses the chord-length form, which stays accurate for nearly parallel and
/// nearly anti-parallel vectors where `acos` of the dot product loses
/// precision. Returns 0 if either vector is zero.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let (Some(u1), Some(u2)) = (a.try_normalize(0.0), b.try_normalize(0.0)) else {
        return 0.0;
    };

    if u1.dot(&u2) > 0.0 {
        2.0 * ((u1 - u2).norm() / 2.0).min(1.0).asin()
    } else if u1.dot(&u2) < 0.0 {
        PI - 2.0 * ((u1 + u2).norm() / 2.0).min(1.0).asin()
    } else {
        PI / 2.0
    }
}
