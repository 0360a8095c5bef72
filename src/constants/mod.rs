//! Constants module for observation geometry

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in kilometers
pub const AU_KM: f64 = 149_597_870.700;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Time
/// Seconds per day
pub const DAY_S: f64 = 86_400.0;
/// TT - TAI in seconds
pub const TT_MINUS_TAI_S: f64 = 32.184;

// Physics
/// Speed of light in km/s
pub const CLIGHT_KM_S: f64 = 299_792.458;

// Frames
/// Inertial reference frame used for magnitudes and screen-center RA/Dec
pub const INERTIAL_FRAME: &str = "J2000";
/// Prefix of the conventional body-fixed frame name
pub const BODY_FRAME_PREFIX: &str = "IAU_";

// Limits
/// Maximum number of FOV boundary vectors requested from the provider
pub const MAX_FOV_BOUNDARY_VECTORS: usize = 256;
/// Default limiting visual magnitude for star searches
pub const DEFAULT_MAGNITUDE_LIMIT: f64 = 7.0;
/// Length in seconds of the visibility search window starting at the epoch
pub const VISIBILITY_WINDOW_S: f64 = 1.0;
