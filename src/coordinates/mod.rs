pub mod cartesian;

pub use cartesian::{angle_between, from_spherical, to_spherical};

use crate::constants::RAD2DEG;
use nalgebra::Vector3;

/// Right ascension and declination of a direction, in degrees
pub fn ra_dec_degrees(v: &Vector3<f64>) -> (f64, f64) {
    let (_, ra, dec) = to_spherical(v);
    (ra * RAD2DEG, dec * RAD2DEG)
}
