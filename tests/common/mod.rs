//! Shared fixture: a spacecraft one AU from the Sun with a narrow circular camera

#![allow(dead_code)]

use nalgebra::{Matrix3, Vector3};
use obsgeom::constants::AU_KM;
use obsgeom::coordinates::to_spherical;
use obsgeom::provider::{
    AberrationCorrection, CatalogRow, EphemerisProvider, InMemoryProvider, ProviderError, RawFov,
    StarQuery, TargetShape, TimeWindow,
};
use std::collections::HashMap;

pub const CAMERA: &str = "CRAFT_CAM";
pub const CAMERA_ID: i32 = -77001;
pub const OBSERVER: &str = "CRAFT";

/// Half-width of the camera's bounding square on the focal plane at depth 1
pub const FOCAL_HALF_WIDTH: f64 = 0.05;

/// Camera tilt about the J2000 x axis, radians
const TILT: f64 = 0.5;

/// Rotation from J2000 into the camera frame
pub fn camera_rotation() -> Matrix3<f64> {
    let (s, c) = TILT.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

pub fn observer_position() -> Vector3<f64> {
    Vector3::new(AU_KM, 0.0, 0.0)
}

/// J2000 position of a point given relative to the observer in camera axes
pub fn place_in_camera(camera_offset: Vector3<f64>) -> Vector3<f64> {
    observer_position() + camera_rotation().transpose() * camera_offset
}

pub const MARS_OFFSET: [f64; 3] = [2000.0, -1000.0, 1.0e6];
pub const PHOBOS_OFFSET: [f64; 3] = [-3000.0, 500.0, 2.0e6];
pub const AMALTHEA_OFFSET: [f64; 3] = [1500.0, 2500.0, 5.0e6];

fn star(id: i64, direction_j2000: Vector3<f64>, magnitude: f64, spectral: &str) -> CatalogRow {
    let (_, ra, dec) = to_spherical(&direction_j2000);
    CatalogRow {
        id,
        ra_deg: ra.to_degrees(),
        dec_deg: dec.to_degrees(),
        magnitude,
        parallax_deg: 2.0e-4,
        spectral_type: spectral.to_string(),
    }
}

/// Boresight direction in J2000
pub fn boresight_j2000() -> Vector3<f64> {
    camera_rotation().transpose() * Vector3::z()
}

/// Fixture with the Sun, the spacecraft, Mars and Phobos in view, Deimos in view
/// but without shape data, Jupiter engulfing the spacecraft and Amalthea in view
/// without any body-fixed frame
pub fn provider() -> InMemoryProvider {
    let fov = RawFov {
        shape: "CIRCLE".to_string(),
        frame: CAMERA.to_string(),
        boresight: Vector3::z(),
        boundary_vectors: vec![Vector3::new(FOCAL_HALF_WIDTH, 0.0, 1.0)],
    };
    let off_axis = camera_rotation().transpose() * Vector3::new(0.5, 0.0, 1.0);

    InMemoryProvider::new()
        .with_body(10, "SUN", Vector3::zeros())
        .with_body(-77, OBSERVER, observer_position())
        .with_body(499, "MARS", place_in_camera(Vector3::from(MARS_OFFSET)))
        .with_radii(499, Vector3::new(3396.19, 3396.19, 3376.20))
        .with_frame("IAU_MARS", Matrix3::identity())
        .with_body(401, "PHOBOS", place_in_camera(Vector3::from(PHOBOS_OFFSET)))
        .with_radii(401, Vector3::new(13.0, 11.4, 9.1))
        .with_frame("IAU_PHOBOS", Matrix3::identity())
        .with_body(402, "DEIMOS", place_in_camera(Vector3::new(0.0, 0.0, 3.0e6)))
        // Centered on the focal plane, radius larger than its distance
        .with_body(599, "JUPITER", place_in_camera(Vector3::new(1000.0, 0.0, 0.0)))
        .with_radii(599, Vector3::new(71492.0, 71492.0, 66854.0))
        .with_frame("IAU_JUPITER", Matrix3::identity())
        .with_body(505, "AMALTHEA", place_in_camera(Vector3::from(AMALTHEA_OFFSET)))
        .with_radii(505, Vector3::new(125.0, 73.0, 64.0))
        .with_frame(CAMERA, camera_rotation())
        .with_instrument(CAMERA, CAMERA_ID, fov)
        .with_star(star(1001, boresight_j2000(), 3.5, "G2V"))
        .with_star(star(1002, boresight_j2000(), 9.0, "M0"))
        .with_star(star(1003, off_axis, 1.0, "B5"))
}

/// Fixture provider with selected radii and frame-name lookups replaced by
/// errors, as a toolkit with a partial or failing kernel pool would report
pub struct FaultyProvider {
    inner: InMemoryProvider,
    radii_faults: HashMap<i32, ProviderError>,
    frame_name_faults: HashMap<i32, ProviderError>,
}

impl FaultyProvider {
    pub fn new(inner: InMemoryProvider) -> Self {
        Self {
            inner,
            radii_faults: HashMap::new(),
            frame_name_faults: HashMap::new(),
        }
    }

    pub fn with_radii_fault(mut self, body_id: i32, error: ProviderError) -> Self {
        self.radii_faults.insert(body_id, error);
        self
    }

    pub fn with_frame_name_fault(mut self, body_id: i32, error: ProviderError) -> Self {
        self.frame_name_faults.insert(body_id, error);
        self
    }
}

impl EphemerisProvider for FaultyProvider {
    fn get_instrument_fov(
        &self,
        instrument_id: i32,
        max_boundary_vectors: usize,
    ) -> Result<RawFov, ProviderError> {
        self.inner.get_instrument_fov(instrument_id, max_boundary_vectors)
    }

    fn get_body_position(
        &self,
        target: &str,
        epoch: f64,
        frame: &str,
        correction: AberrationCorrection,
        observer: &str,
    ) -> Result<(Vector3<f64>, f64), ProviderError> {
        self.inner
            .get_body_position(target, epoch, frame, correction, observer)
    }

    fn get_frame_rotation(
        &self,
        from_frame: &str,
        to_frame: &str,
        epoch: f64,
    ) -> Result<Matrix3<f64>, ProviderError> {
        self.inner.get_frame_rotation(from_frame, to_frame, epoch)
    }

    fn test_body_in_fov(
        &self,
        instrument: &str,
        target: &str,
        shape: TargetShape,
        target_frame: &str,
        correction: AberrationCorrection,
        observer: &str,
        window: TimeWindow,
    ) -> Result<bool, ProviderError> {
        self.inner.test_body_in_fov(
            instrument,
            target,
            shape,
            target_frame,
            correction,
            observer,
            window,
        )
    }

    fn list_loaded_bodies(&self) -> Result<Vec<i32>, ProviderError> {
        self.inner.list_loaded_bodies()
    }

    fn lookup_body_radii(&self, body_id: i32) -> Result<Vector3<f64>, ProviderError> {
        match self.radii_faults.get(&body_id) {
            Some(error) => Err(error.clone()),
            None => self.inner.lookup_body_radii(body_id),
        }
    }

    fn lookup_frame_name(&self, body_id: i32) -> Result<String, ProviderError> {
        match self.frame_name_faults.get(&body_id) {
            Some(error) => Err(error.clone()),
            None => self.inner.lookup_frame_name(body_id),
        }
    }

    fn frame_exists(&self, frame: &str) -> bool {
        self.inner.frame_exists(frame)
    }

    fn query_star_catalog(&self, query: &StarQuery) -> Result<Vec<CatalogRow>, ProviderError> {
        self.inner.query_star_catalog(query)
    }

    fn body_name(&self, body_id: i32) -> Option<String> {
        self.inner.body_name(body_id)
    }

    fn body_id(&self, name: &str) -> Option<i32> {
        self.inner.body_id(name)
    }
}
