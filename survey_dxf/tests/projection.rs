use survey_dxf::crs::{ElevationModel, Geodetic, Projector, METERS_TO_US_FEET};

#[test]
fn round_trip_within_tolerance() {
    let projector = Projector::maryland().unwrap();
    for (lon, lat) in [(-77.0, 38.9), (-76.5, 39.2), (-79.3, 39.6)] {
        let (x, y) = projector.project_xy(lon, lat).unwrap();
        let (lon2, lat2) = projector.unproject_xy(x, y).unwrap();
        assert!((lon - lon2).abs() < 1e-6, "{lon} vs {lon2}");
        assert!((lat - lat2).abs() < 1e-6, "{lat} vs {lat2}");
    }
}

#[test]
fn null_island_is_finite_and_deterministic() {
    let projector = Projector::maryland().unwrap();
    let a = projector.project_xy(0.0, 0.0).unwrap();
    let b = projector.project_xy(0.0, 0.0).unwrap();
    assert!(a.0.is_finite() && a.1.is_finite());
    assert_eq!(a, b);
}

#[test]
fn known_maryland_coordinates() {
    let projector = Projector::maryland().unwrap();
    let (x, y) = projector.project_xy(-77.1, 38.95).unwrap();
    assert!((x - 1_283_894.07).abs() < 0.05, "x = {x}");
    assert!((y - 467_389.08).abs() < 0.05, "y = {y}");
}

#[test]
fn project_applies_elevation_model() {
    let projector = Projector::maryland().unwrap();
    let p = projector
        .project(
            Geodetic::new(-77.0, 38.9, 100.0),
            1.6,
            &ElevationModel::with_geoid_offset(34.67),
        )
        .unwrap();
    assert!((p.z - (100.0 + 34.67 - 1.6) * METERS_TO_US_FEET).abs() < 1e-9);
    let (x, y) = projector.project_xy(-77.0, 38.9).unwrap();
    assert_eq!((p.x, p.y), (x, y));
}

#[test]
fn out_of_range_input_fails() {
    let projector = Projector::maryland().unwrap();
    assert!(projector.project_xy(181.0, 38.0).is_err());
    assert!(projector
        .project(Geodetic::new(-77.0, -90.5, 0.0), 0.0, &ElevationModel::direct())
        .is_err());
}
