//! Relocated from src/array.rs inline tests: these use `test-utils`
//! fixtures, which depend on this crate, so they must run as integration
//! tests to avoid a dev-dependency crate-duplication cycle.
#![allow(unused_imports)]

use std::sync::Arc;

use dggs_common::{CrsCode, DirectPosition, GeoExtent};
use dggs_core::{DiscreteGlobalGrid, GeographicQuadGrid, RefinementLevel, ZoneId};
use dggs_coverage::*;
use test_utils::{geometry_at_level, quad_grid};


    fn one_band() -> Vec<BandDescriptor> {
        vec![BandDescriptor::named("band_0")]
    }

    #[test]
    fn test_band_shape_mismatch_fails_fast() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let n = geometry.len();

        let result = ZoneArrayCoverage::new(
            geometry,
            vec![BandDescriptor::named("short")],
            vec![vec![0.0; n - 1]],
        );
        assert!(matches!(
            result,
            Err(CoverageError::BandShapeMismatch {
                band: 0,
                actual,
                ..
            }) if actual == n - 1
        ));
    }

    #[test]
    fn test_duplicate_zone_rejected() {
        let grid = quad_grid();
        let mut ids = grid.root_zone_ids();
        ids.push(ids[0].clone());
        let n = ids.len();
        let geometry = Arc::new(GridGeometry::new(grid, ids));

        let result = ZoneArrayCoverage::new(geometry, one_band(), vec![vec![0.0; n]]);
        assert!(matches!(result, Err(CoverageError::DuplicateZone(_))));
    }

    #[test]
    fn test_index_bijection() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let n = geometry.len();
        let coverage =
            ZoneArrayCoverage::filled(geometry.clone(), one_band(), 0.0).unwrap();

        for (slot, id) in geometry.zone_ids().iter().enumerate() {
            assert_eq!(coverage.index_of(id), Some(slot));
        }
        assert_eq!(coverage.zone_count(), n);
    }

    #[test]
    fn test_iterator_yields_domain_in_order() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let n = geometry.len();
        let bands = vec![(0..n).map(|i| i as f64).collect::<Vec<_>>()];
        let coverage = ZoneArrayCoverage::new(geometry, one_band(), bands).unwrap();

        let mut it = coverage.iter();
        let mut seen = 0usize;
        while it.advance() {
            assert_eq!(it.position(), Some(seen));
            assert_eq!(it.sample_double(0), seen as f64);
            seen += 1;
        }
        assert_eq!(seen, n);
        assert!(!it.advance());
    }

    #[test]
    fn test_move_to_unknown_zone_fails() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let n = geometry.len();
        let coverage = ZoneArrayCoverage::filled(geometry, one_band(), 0.0).unwrap();

        let mut it = coverage.iter();
        let result = it.move_to(&ZoneId::Text("nowhere".to_string()));
        assert!(matches!(result, Err(CoverageError::ZoneNotInDomain(_))));
    }

    #[test]
    fn test_writes_visible_to_readers() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let n = geometry.len();
        let target = geometry.zone_ids()[3].clone();
        let mut coverage = ZoneArrayCoverage::filled(geometry, one_band(), 0.0).unwrap();

        let mut writer = coverage.iter_mut();
        writer.move_to(&target).unwrap();
        writer.set_sample(0, 42.5);
        writer.close();

        let mut reader = coverage.iter();
        reader.move_to(&target).unwrap();
        assert_eq!(reader.sample_double(0), 42.5);
    }

    #[test]
    fn test_sample_rasterizes_with_nan_outside() {
        // Regional grid over a western-hemisphere box; raster spans the
        // whole globe, so pixels outside the box stay NaN.
        let area = GeoExtent::new(-120.0, -45.0, -30.0, 45.0);
        let grid: Arc<dyn DiscreteGlobalGrid> =
            Arc::new(GeographicQuadGrid::regional(area, 8));
        let geometry = geometry_at_level(&grid, 2);
        let n = geometry.len();
        let coverage = ZoneArrayCoverage::filled(geometry, one_band(), 7.0).unwrap();

        let patch = coverage.sample(&RasterSpec {
            width: 36,
            height: 18,
            extent: GeoExtent::new(-180.0, -90.0, 180.0, 90.0),
            crs: CrsCode::Epsg4326,
        });

        // Inside the supported area.
        let inside = patch.value(8, 9, 0).unwrap(); // (-95°, -5°)
        assert_eq!(inside, 7.0);
        // Outside it.
        let outside = patch.value(30, 9, 0).unwrap(); // (125°, -5°)
        assert!(outside.is_nan());
    }
