//! End-to-end tests: write a catalog file, load it, filter it against a stub
//! observer and project the visible set.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use vispe::{
    project, read_catalog, visible_stars, AltAz, Catalog, CatalogError, ConstellationTable,
    EquatorialPosition, FormatError, HorizonObserver, Observe, ObserveError, SiderealTime,
    SkyPassConfig, VisibilityConfig,
};


/// Reports the same elevation for every target.
struct FixedElevation(f64);

impl Observe for FixedElevation {
    type Instant = ();

    fn observe(&self, _: &EquatorialPosition, _: &()) -> Result<AltAz, ObserveError> {
        Ok(AltAz {
            altitude_deg: self.0,
            azimuth_deg: 123.0,
            distance: f64::INFINITY,
        })
    }
}

/// Elevation taken from right ascension: 0h..24h maps to -90°..+90°.
/// Targets with RA between 23h and 24h cannot be observed.
struct ElevationFromRa;

impl Observe for ElevationFromRa {
    type Instant = ();

    fn observe(&self, target: &EquatorialPosition, _: &()) -> Result<AltAz, ObserveError> {
        let hours = target.ra.to_hours();
        if hours >= 23.0 {
            return Err(ObserveError::UndefinedPosition(format!("ra {hours}")));
        }
        Ok(AltAz {
            altitude_deg: hours / 24.0 * 180.0 - 90.0,
            azimuth_deg: 0.0,
            distance: f64::INFINITY,
        })
    }
}

#[test]
fn single_star_file_end_to_end() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let dir = test_data::scratch_dir("single_star");
    let bytes = test_data::catalog_bytes(&[test_data::record(1.0, 0.0, 0.0, 300)]);
    assert_eq!(bytes.len(), 60);
    let path = test_data::write_file(&dir, "BSC5", &bytes);

    let catalog = read_catalog(&path).expect("Failed to read catalog");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.records()[0].catalog_id, 1.0);
    assert_eq!(catalog.magnitudes()[0], 3.0);
    assert_eq!(catalog.stars()[0].mag, 3.0);

    let observer = FixedElevation(10.0);
    let visible = visible_stars(&catalog, &observer, &(), &VisibilityConfig::default());
    assert_eq!(visible.len(), 1);
    assert_eq!(visible.entries[0].id, 1.0);
    assert_eq!(visible.entries[0].mag, 3.0);

    let strict = VisibilityConfig::default().with_limiting_magnitude(2.0);
    assert!(visible_stars(&catalog, &observer, &(), &strict).is_empty());

    let point = project(visible.entries[0].altaz.azimuth_deg, visible.entries[0].altaz.altitude_deg);
    assert_eq!(point.radius, 80.0);
}

#[test]
fn record_count_follows_file_length() {
    let dir = test_data::scratch_dir("record_count");
    for n in [0usize, 1, 7, 64] {
        let records: Vec<_> = (0..n)
            .map(|i| test_data::record(i as f32 + 1.0, 0.01 * i as f64, 0.0, 100))
            .collect();
        let bytes = test_data::catalog_bytes(&records);
        let path = test_data::write_file(&dir, &format!("cat{n}"), &bytes);
        let catalog = read_catalog(&path).unwrap();
        assert_eq!(catalog.len(), (bytes.len() - 28) / 32);
        assert_eq!(catalog.ids().len(), catalog.stars().len());
        assert_eq!(catalog.magnitudes().len(), catalog.stars().len());
    }
}

#[test]
fn misaligned_file_fails_without_partial_catalog() {
    let dir = test_data::scratch_dir("misaligned");
    let mut bytes = test_data::catalog_bytes(&[
        test_data::record(1.0, 0.1, 0.1, 100),
        test_data::record(2.0, 0.2, 0.2, 200),
    ]);
    bytes.pop();
    let path = test_data::write_file(&dir, "BSC5", &bytes);

    match read_catalog(&path) {
        Err(CatalogError::Format(FormatError::Misaligned { remainder, .. })) => {
            assert_eq!(remainder, 31)
        }
        other => panic!("expected misaligned error, got {other:?}"),
    }
}

#[test]
fn short_and_missing_files() {
    let dir = test_data::scratch_dir("short_missing");
    let path = test_data::write_file(&dir, "tiny", &[0u8; 10]);
    assert!(matches!(
        read_catalog(&path),
        Err(CatalogError::Format(FormatError::BadHeader { len: 10 }))
    ));
    assert!(matches!(
        read_catalog(dir.join("absent")),
        Err(CatalogError::Io(_))
    ));
}

#[test]
fn randomized_filter_respects_both_predicates() {
    let _ = tracing_subscriber::fmt().with_env_filter("warn").try_init();
    let mut rng = StdRng::seed_from_u64(1950);

    let records: Vec<_> = (0..500)
        .map(|i| {
            let ra = rng.random::<f64>() * std::f64::consts::TAU;
            let dec = (rng.random::<f64>() * 2.0 - 1.0).asin();
            let vmag = (rng.random::<f64>() * 800.0 - 150.0) as i16;
            test_data::record(i as f32 + 1.0, ra, dec, vmag)
        })
        .collect();
    let catalog = Catalog::from_bytes(&test_data::catalog_bytes(&records)).unwrap();

    let config = VisibilityConfig::default().with_limiting_magnitude(3.5);
    let visible = visible_stars(&catalog, &ElevationFromRa, &(), &config);

    let mut last_index = None;
    for v in visible.iter() {
        assert!(v.altaz.altitude_deg > 5.0);
        assert!(v.mag <= 3.5);
        // Strictly increasing catalog index: stable order, no duplicates.
        assert!(last_index.map_or(true, |last| v.index > last));
        last_index = Some(v.index);
        assert_eq!(catalog.ids()[v.index], v.id);
    }

    // Every entry either passed, failed both-predicate check, or failed to observe.
    let mut expected = 0;
    let mut expected_failures = 0;
    for star in catalog.stars() {
        match ElevationFromRa.observe(&star.position, &()) {
            Ok(altaz) if altaz.altitude_deg > 5.0 && star.mag <= 3.5 => expected += 1,
            Ok(_) => {}
            Err(_) => expected_failures += 1,
        }
    }
    assert_eq!(visible.len(), expected);
    assert_eq!(visible.failures.len(), expected_failures);
    assert!(expected > 0 && expected_failures > 0);
}

#[test]
fn constellations_and_stars_from_config() {
    let dir = test_data::scratch_dir("config");
    let catalog_path = test_data::write_file(
        &dir,
        "BSC5",
        &test_data::catalog_bytes(&[
            // Near the north celestial pole: always up from mid-northern latitudes.
            test_data::record(424.0, 0.66, 1.55, 202),
            // Deep south: never up.
            test_data::record(2326.0, 1.68, -0.92, -72),
        ]),
    );
    let cons_path = test_data::write_file(
        &dir,
        "constellations.csv",
        b"# abbr, name, ra, dec\nUMi, Ursa Minor, 15 0, 77 0\nCar, Carina, 8 40, -63 0\n",
    );

    let config = SkyPassConfig {
        catalog_path,
        constellation_path: Some(cons_path),
        ..Default::default()
    };
    let catalog = config.load_catalog().unwrap();
    let table: ConstellationTable = config.load_constellations().unwrap();

    let observer = HorizonObserver::new(45.0, 0.0);
    let now = SiderealTime { gst_rad: 0.0 };

    let stars = visible_stars(&catalog, &observer, &now, &config.visibility);
    let ids: Vec<f32> = stars.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![424.0]);

    let cons = table.visible(&observer, &now, &config.visibility);
    let names: Vec<&str> = cons.iter().map(|c| c.entry.name.as_str()).collect();
    assert_eq!(names, vec!["Ursa Minor"]);
}
