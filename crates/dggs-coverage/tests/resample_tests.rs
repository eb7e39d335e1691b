//! Relocated from src/resample.rs inline tests (see array_tests.rs).
#![allow(unused_imports)]

use std::sync::Arc;

use dggs_common::{transform_extent, transform_position, CrsCode, DirectPosition, GeoExtent};
use dggs_core::{DiscreteGlobalGrid, ZoneCoder};
use dggs_coverage::*;
use test_utils::{geometry_at_level, quad_grid, GradientSource, ZonalTable};


    #[test]
    fn test_resample_fills_from_source() {
        let geometry = geometry_at_level(&quad_grid(), 2);
        let source = GradientSource::global();

        let coverage = resample_to_zones(&source, geometry.clone()).unwrap();
        assert_eq!(coverage.zone_count(), geometry.len());

        // A zone centered at (x, y) carries the source gradient x + y.
        let coder = geometry.grid().coder();
        let mut cursor = coverage.iter();
        while cursor.advance() {
            let zone = coder.decode(cursor.zone_id().unwrap()).unwrap();
            let expected = zone.position().x + zone.position().y;
            assert!((cursor.sample_double(0) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resample_hole_stays_nan() {
        let geometry = geometry_at_level(&quad_grid(), 2);
        let hole = GeoExtent::new(-45.0, -45.0, 45.0, 45.0);
        let source = GradientSource::with_hole(hole);

        let coverage = resample_to_zones(&source, geometry.clone()).unwrap();

        let coder = geometry.grid().coder();
        let mut cursor = coverage.iter();
        while cursor.advance() {
            let zone = coder.decode(cursor.zone_id().unwrap()).unwrap();
            let position = zone.position();
            let value = cursor.sample_double(0);
            if hole.contains(position.x, position.y) {
                assert!(value.is_nan(), "zone inside hole must stay NaN");
            } else {
                assert!(!value.is_nan(), "zone outside hole must carry data");
            }
        }
    }

    #[test]
    fn test_missing_data_downgraded_to_all_nan() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let source = GradientSource::unavailable();

        let coverage = resample_to_zones(&source, geometry).unwrap();
        let mut cursor = coverage.iter();
        while cursor.advance() {
            assert!(cursor.sample_double(0).is_nan());
        }
    }

    #[test]
    fn test_zonal_resample_by_ordinal() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let n = geometry.len();
        let source = ZonalTable::new((0..n).map(|i| i as f64 * 2.0).collect());

        let coverage = resample_zonal(&source, geometry).unwrap();
        let mut cursor = coverage.iter();
        while cursor.advance() {
            let ordinal = cursor.position().unwrap();
            assert_eq!(cursor.sample_double(0), ordinal as f64 * 2.0);
        }
    }

    #[test]
    fn test_zonal_length_mismatch_fails() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let source = ZonalTable::new(vec![1.0; 3]);

        assert!(matches!(
            resample_zonal(&source, geometry),
            Err(CoverageError::ZonalLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_resampled_coverage_evaluates() {
        let geometry = geometry_at_level(&quad_grid(), 2);
        let source = GradientSource::global();
        let coverage = resample_to_zones(&source, geometry).unwrap();

        let mut evaluator = coverage.evaluator(EvaluatorOptions::default());
        let point = DirectPosition::new(100.0, 30.0);
        let values = evaluator.evaluate(&point).unwrap().unwrap();

        // The value is the gradient at the covering zone's center, which
        // sits within half a zone span of the query point.
        assert!((values[0] - 130.0).abs() <= 45.0 + 22.5);
    }
