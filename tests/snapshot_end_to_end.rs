mod common;

use approx::assert_relative_eq;
use common::*;
use nalgebra::Vector3;
use obsgeom::snapshot::{DisplayModel, DisplayModelTable};
use obsgeom::{
    compute_snapshot, AberrationCorrection, BodyCategory, ObservationRequest, ObsGeomError,
    ProviderError,
};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn request() -> ObservationRequest {
    ObservationRequest::new(CAMERA, 0.0, OBSERVER)
        .with_viewport(WIDTH, HEIGHT)
        .with_aberration_correction(AberrationCorrection::LightTimeStellar)
}

/// Pinhole projection of a camera-frame point onto the fixture's viewport
fn expected_pixel(point: [f64; 3]) -> (f64, f64) {
    let span = 2.0 * FOCAL_HALF_WIDTH;
    (
        (point[0] / point[2] + FOCAL_HALF_WIDTH) * WIDTH as f64 / span,
        (point[1] / point[2] + FOCAL_HALF_WIDTH) * HEIGHT as f64 / span,
    )
}

#[test]
fn test_planet_screen_position() {
    let snapshot = compute_snapshot(&provider(), &request()).unwrap();

    let names: Vec<&str> = snapshot.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["MARS", "PHOBOS"]);

    let mars = snapshot.target("MARS").unwrap();
    assert_eq!(mars.naif_id, 499);
    assert_eq!(mars.category, BodyCategory::Planet);
    assert_eq!(mars.export_id(), "PLANET.MARS");
    assert_eq!(mars.radii, Vector3::new(3396.19, 3396.19, 3376.20));

    let (x, y) = expected_pixel(MARS_OFFSET);
    assert_relative_eq!(mars.screen_position.x, x, epsilon = 1e-6);
    assert_relative_eq!(mars.screen_position.y, y, epsilon = 1e-6);
    assert_relative_eq!(mars.position, Vector3::from(MARS_OFFSET), epsilon = 1e-6);
    assert_relative_eq!(mars.distance, mars.position.norm(), max_relative = 1e-12);
    assert!(mars.magnitude.is_some());

    let phobos = snapshot.target("PHOBOS").unwrap();
    assert_eq!(phobos.category, BodyCategory::Satellite);
    assert_eq!(phobos.magnitude, None);
    let (x, y) = expected_pixel(PHOBOS_OFFSET);
    assert_relative_eq!(phobos.screen_position.x, x, epsilon = 1e-6);
    assert_relative_eq!(phobos.screen_position.y, y, epsilon = 1e-6);
}

#[test]
fn test_failed_visibility_is_absent() {
    // Deimos sits on the boresight but has no shape data
    let snapshot = compute_snapshot(&provider(), &request()).unwrap();
    assert!(snapshot.target("DEIMOS").is_none());
    assert!(snapshot.skipped.iter().all(|s| s.name != "DEIMOS"));
}

#[test]
fn test_body_on_view_plane_is_skipped() {
    let snapshot = compute_snapshot(&provider(), &request()).unwrap();

    assert!(snapshot.target("JUPITER").is_none());
    let skipped = snapshot.skipped.iter().find(|s| s.naif_id == 599).unwrap();
    assert_eq!(skipped.name, "JUPITER");
    assert_eq!(skipped.reason, ObsGeomError::ObjectOnViewPlane.to_string());
}

#[test]
fn test_body_without_frame_is_skipped() {
    // Amalthea is in view with radii, but neither IAU_AMALTHEA nor a
    // configured frame name exists
    let snapshot = compute_snapshot(&provider(), &request()).unwrap();

    assert!(snapshot.target("AMALTHEA").is_none());
    let ids: Vec<i32> = snapshot.skipped.iter().map(|s| s.naif_id).collect();
    assert_eq!(ids, vec![599, 505]);
    let expected = ObsGeomError::UnknownBodyFrame {
        naif_id: 505,
        name: "AMALTHEA".to_string(),
    };
    assert_eq!(snapshot.skipped[1].reason, expected.to_string());
}

#[test]
fn test_body_without_radii_is_skipped() {
    // Visible by the provider's shape model, but its radii lookup has no data
    let partial = FaultyProvider::new(provider())
        .with_radii_fault(401, ProviderError::NoData("BODY401_RADII".to_string()));
    let snapshot = compute_snapshot(&partial, &request()).unwrap();

    let names: Vec<&str> = snapshot.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["MARS"]);
    let phobos = snapshot.skipped.iter().find(|s| s.naif_id == 401).unwrap();
    let expected = ObsGeomError::MissingRadiiData {
        naif_id: 401,
        name: "PHOBOS".to_string(),
    };
    assert_eq!(phobos.reason, expected.to_string());
    assert_eq!(snapshot.skipped.len(), 3);
}

#[test]
fn test_unavailable_radii_lookup_is_fatal() {
    let unreachable = FaultyProvider::new(provider()).with_radii_fault(
        499,
        ProviderError::Unavailable("kernel pool unreachable".to_string()),
    );
    assert!(matches!(
        compute_snapshot(&unreachable, &request()),
        Err(ObsGeomError::Provider(ProviderError::Unavailable(_)))
    ));
}

#[test]
fn test_unavailable_frame_name_lookup_is_fatal() {
    // Amalthea falls back to its configured frame name, which now errors
    // instead of reporting no data
    let failing = FaultyProvider::new(provider())
        .with_frame_name_fault(505, ProviderError::Other("toolkit failure".to_string()));
    assert!(matches!(
        compute_snapshot(&failing, &request()),
        Err(ObsGeomError::Provider(ProviderError::Other(_)))
    ));

    // Missing data on the same lookup stays a per-body skip
    let missing = FaultyProvider::new(provider())
        .with_frame_name_fault(505, ProviderError::UnknownName("AMALTHEA".to_string()));
    let snapshot = compute_snapshot(&missing, &request()).unwrap();
    assert!(snapshot.skipped.iter().any(|s| s.naif_id == 505));
}

#[test]
fn test_snapshot_geometry() {
    let snapshot = compute_snapshot(&provider(), &request()).unwrap();

    assert_eq!(snapshot.date, "2000-01-01T11:58:55.816");
    assert_eq!(snapshot.instrument_id, CAMERA_ID);
    assert_relative_eq!(
        snapshot.fov_degrees,
        2.0 * FOCAL_HALF_WIDTH.atan().to_degrees(),
        epsilon = 1e-10
    );
    // Tilt is about x, so the Sun-to-spacecraft vector is unchanged
    assert_relative_eq!(snapshot.observer_position, observer_position(), max_relative = 1e-12);
    assert_relative_eq!(
        snapshot.instrument_to_inertial * snapshot.inertial_to_instrument,
        nalgebra::Matrix3::identity(),
        epsilon = 1e-12
    );

    let (_, ra, dec) = obsgeom::coordinates::to_spherical(&boresight_j2000());
    assert_relative_eq!(snapshot.screen_center_ra, ra.to_degrees(), epsilon = 1e-9);
    assert_relative_eq!(snapshot.screen_center_dec, dec.to_degrees(), epsilon = 1e-9);
    assert!(snapshot.position_angle >= 0.0 && snapshot.position_angle < 360.0);
    assert_relative_eq!(
        snapshot.angle_resolution,
        FOCAL_HALF_WIDTH.atan().to_degrees() / (HEIGHT as f64 / 2.0),
        epsilon = 1e-12
    );
}

#[test]
fn test_star_search() {
    let snapshot = compute_snapshot(&provider(), &request()).unwrap();

    assert_eq!(snapshot.stars.len(), 1);
    let star = &snapshot.stars[0];
    assert_eq!(star.catalog_id, 1001);
    assert_eq!(star.color, [255, 192, 192]);
    assert_relative_eq!(star.screen_position.x, WIDTH as f64 / 2.0, epsilon = 1e-6);
    assert_relative_eq!(star.screen_position.y, HEIGHT as f64 / 2.0, epsilon = 1e-6);

    // Tightening the limit below the star's magnitude removes it
    let dim = compute_snapshot(&provider(), &request().with_magnitude_limit(3.5)).unwrap();
    assert!(dim.stars.is_empty());
}

#[test]
fn test_attach_display_models_and_export() {
    let mut snapshot = compute_snapshot(&provider(), &request()).unwrap();
    let table = DisplayModelTable::from_json_str(
        r#"{
            "PLANET.MARS": {"type": "texture-body", "file": "mars.png"},
            "DEIMOS": {"type": "texture-body", "file": "deimos.png"}
        }"#,
    )
    .unwrap();

    snapshot.attach_display_models(&table);
    let mars = snapshot.target("MARS").unwrap();
    assert_eq!(
        mars.models,
        vec![DisplayModel::BodyTexture {
            file: "mars.png".to_string()
        }]
    );
    assert!(snapshot.target("PHOBOS").unwrap().models.is_empty());

    let exported: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(exported["instrument_id"], CAMERA_ID);
    assert_eq!(exported["date"], "2000-01-01T11:58:55.816");
    assert_eq!(exported["request"]["aberration_correction"], "LT+S");
    assert_eq!(exported["targets"][0]["category"], "PLANET");
    assert_eq!(exported["targets"][0]["models"][0]["type"], "texture-body");
    assert!(exported["targets"][1]["magnitude"].is_null());
    assert!(exported["targets"][1].get("models").is_none());

    let pretty = snapshot.to_json_pretty().unwrap();
    assert!(pretty.contains("\n  \"stars\""));
}

#[test]
fn test_unknown_observer_is_fatal() {
    let request = ObservationRequest::new(CAMERA, 0.0, "VOYAGER 3");
    assert!(matches!(
        compute_snapshot(&provider(), &request),
        Err(ObsGeomError::Provider(_))
    ));
}
