//! Catalog star search inside an instrument field of view
//!
//! Stars are read from the provider's catalog, rotated into the instrument
//! frame and kept when they are both inside the FOV cone and brighter than the
//! magnitude limit. Each kept star is projected onto the viewport and given a
//! display color from its spectral class.

use crate::constants::{AU_KM, DEG2RAD};
use crate::coordinates::from_spherical;
use crate::fov::FieldOfView;
use crate::geometry::{position_angle_and_distance, project_perspective};
use crate::provider::{CatalogRow, EphemerisProvider, StarQuery};
use crate::{ObsGeomError, Result};
use lazy_static::lazy_static;
use log::{debug, warn};
use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Color used for spectral classes missing from the table
const DEFAULT_STAR_COLOR: [u8; 3] = [255, 192, 192];

lazy_static! {
    /// Display color by leading spectral class letter
    static ref SPECTRAL_COLORS: HashMap<char, [u8; 3]> = {
        let mut m = HashMap::new();
        m.insert('O', [128, 128, 255]);
        m.insert('W', [128, 128, 255]); // Wolf-Rayet
        m.insert('B', [160, 160, 255]);
        m.insert('A', [192, 192, 255]);
        m.insert('F', [224, 224, 255]);
        m.insert('G', DEFAULT_STAR_COLOR);
        m.insert('K', [255, 160, 160]);
        m.insert('k', [255, 160, 160]);
        m.insert('R', [255, 160, 160]);
        m.insert('M', [255, 128, 128]);
        m.insert('N', [255, 128, 128]);
        m.insert('S', [255, 128, 128]);
        m.insert('s', [255, 128, 128]);
        m.insert('C', [255, 128, 128]); // carbon star
        m
    };
}

/// One catalog star inside the field of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarObservation {
    /// Catalog number
    pub catalog_id: i64,
    /// Unit direction in the instrument frame
    pub direction: Vector3<f64>,
    /// Right ascension in radians
    pub ra: f64,
    /// Declination in radians
    pub dec: f64,
    pub spectral_type: String,
    pub visual_magnitude: f64,
    /// Distance derived from parallax (km)
    pub distance: f64,
    /// Position on the viewport in pixels
    pub screen_position: Vector2<f64>,
    /// Display color
    pub color: [u8; 3],
}

/// RGB display color for a spectral type
///
/// The class letter is the first character, or the second when the type starts
/// with `(` or `D` (uncertain types and white dwarfs). Unknown or empty types
/// get the G-class color.
pub fn star_color(spectral_type: &str) -> [u8; 3] {
    let mut chars = spectral_type.chars();
    let class = match chars.next() {
        Some('(') | Some('D') => chars.next(),
        first => first,
    };
    class
        .and_then(|c| SPECTRAL_COLORS.get(&c).copied())
        .unwrap_or(DEFAULT_STAR_COLOR)
}

/// Distance in km for a parallax given in degrees
pub fn parallax_distance_km(parallax_deg: f64) -> f64 {
    1.0 / (parallax_deg * DEG2RAD).tan() * AU_KM
}

fn check_row(row: &CatalogRow) -> Result<()> {
    let fields = [
        ("ra", row.ra_deg),
        ("dec", row.dec_deg),
        ("magnitude", row.magnitude),
        ("parallax", row.parallax_deg),
    ];
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(ObsGeomError::MalformedCatalogRow {
            id: row.id,
            reason: format!("{field} is {value}"),
        }),
        None => Ok(()),
    }
}

/// Catalog stars inside the FOV and brighter than `magnitude_limit`
///
/// # Arguments
///
/// * `provider` - Catalog session
/// * `screen_center` - Bounding-rect center in the instrument frame
/// * `inertial_to_instrument` - Rotation from J2000 into the instrument frame
/// * `fov` - Instrument field of view
/// * `width`, `height` - Viewport size in pixels
/// * `magnitude_limit` - Only strictly brighter stars are kept
///
/// Results keep catalog order.
pub fn find_stars<P>(
    provider: &P,
    screen_center: &Vector3<f64>,
    inertial_to_instrument: &Matrix3<f64>,
    fov: &FieldOfView,
    width: f64,
    height: f64,
    magnitude_limit: f64,
) -> Result<Vec<StarObservation>>
where
    P: EphemerisProvider + ?Sized,
{
    let rows = provider.query_star_catalog(&StarQuery {
        max_magnitude: Some(magnitude_limit),
    })?;

    let mut stars = Vec::new();
    for row in rows {
        check_row(&row)?;

        let ra = row.ra_deg * DEG2RAD;
        let dec = row.dec_deg * DEG2RAD;
        let direction = inertial_to_instrument * from_spherical(1.0, ra, dec);

        let (_, separation) = position_angle_and_distance(screen_center, &direction);
        if !(separation < fov.max_half_angle && row.magnitude < magnitude_limit) {
            continue;
        }

        // Projection only depends on direction; a zero parallax gives an
        // infinite distance that must not reach the projection
        let distance = parallax_distance_km(row.parallax_deg);
        let screen = match project_perspective(&fov.bounding_rect, width, height, &direction) {
            Ok(screen) => screen,
            Err(e) => {
                warn!("Skipping star {}: {}", row.id, e);
                continue;
            }
        };

        stars.push(StarObservation {
            catalog_id: row.id,
            direction,
            ra,
            dec,
            color: star_color(&row.spectral_type),
            spectral_type: row.spectral_type,
            visual_magnitude: row.magnitude,
            distance,
            screen_position: Vector2::new(screen.x, screen.y),
        });
    }

    debug!("{} stars brighter than {} in view", stars.len(), magnitude_limit);
    Ok(stars)
}
