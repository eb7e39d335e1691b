//! Relocated from src/eval.rs inline tests (see array_tests.rs).
#![allow(unused_imports)]

use std::sync::Arc;

use dggs_common::{DirectPosition, GeoExtent};
use dggs_core::{DiscreteGlobalGrid, RefinementLevel, ZoneCoder, ZoneId};
use dggs_coverage::*;
use test_utils::{geometry_at_level, quad_grid};


    fn coverage_with_value(value: f64) -> ZoneArrayCoverage {
        let geometry = geometry_at_level(&quad_grid(), 1);
        ZoneArrayCoverage::filled(geometry, vec![BandDescriptor::named("v")], value).unwrap()
    }

    #[test]
    fn test_single_level_hit() {
        let coverage = coverage_with_value(3.25);
        let mut evaluator = coverage.evaluator(EvaluatorOptions::default());

        let values = evaluator
            .evaluate(&DirectPosition::new(12.0, 40.0))
            .unwrap()
            .unwrap();
        assert_eq!(values, vec![3.25]);
    }

    #[test]
    fn test_coarser_level_wins_on_overlap() {
        // A domain mixing one level-2 zone with all four of its level-3
        // children, all covering the same point. Ascending search must
        // return the level-2 value.
        let grid = quad_grid();
        let mut coder = grid.coder();
        coder.set_precision_level(RefinementLevel(2)).unwrap();

        let point = DirectPosition::new(33.0, 44.0);
        let coarse_id = coder.encode_id(&point).unwrap().unwrap();
        let coarse = coder.decode(&coarse_id).unwrap();
        drop(coder);

        let mut ids = vec![coarse_id];
        ids.extend(coarse.children.iter().cloned());
        let n = ids.len();
        let geometry = Arc::new(GridGeometry::new(grid, ids));

        // Band value = 100 + slot, so the coarse zone holds 100.0.
        let bands = vec![(0..n).map(|i| 100.0 + i as f64).collect::<Vec<_>>()];
        let coverage =
            ZoneArrayCoverage::new(geometry, vec![BandDescriptor::named("v")], bands).unwrap();

        assert_eq!(coverage.min_level(), RefinementLevel(2));
        assert_eq!(coverage.max_level(), RefinementLevel(3));

        let mut evaluator = coverage.evaluator(EvaluatorOptions::default());
        let values = evaluator.evaluate(&point).unwrap().unwrap();
        assert_eq!(values, vec![100.0]);
    }

    #[test]
    fn test_outside_null_or_error() {
        // Coverage over a single root zone; points in other roots have
        // no covering zone.
        let grid = quad_grid();
        let ids = vec![grid.root_zone_ids()[0].clone()]; // NW root: lon -180..-60, lat 0..90
        let geometry = Arc::new(GridGeometry::new(grid, ids));
        let coverage =
            ZoneArrayCoverage::filled(geometry, vec![BandDescriptor::named("v")], 1.0).unwrap();

        let outside = DirectPosition::new(100.0, -45.0);

        let mut strict = coverage.evaluator(EvaluatorOptions::default());
        assert!(matches!(
            strict.evaluate(&outside),
            Err(CoverageError::PointOutsideCoverage { .. })
        ));

        let mut lenient = coverage.evaluator(EvaluatorOptions {
            null_if_outside: true,
            ..EvaluatorOptions::default()
        });
        assert_eq!(lenient.evaluate(&outside).unwrap(), None);
    }

    #[test]
    fn test_wraparound_normalizes_longitude() {
        let coverage = coverage_with_value(9.0);

        let mut evaluator = coverage.evaluator(EvaluatorOptions {
            wraparound: true,
            ..EvaluatorOptions::default()
        });

        // 370° wraps to 10°.
        let values = evaluator
            .evaluate(&DirectPosition::new(370.0, 20.0))
            .unwrap()
            .unwrap();
        assert_eq!(values, vec![9.0]);

        // Without wraparound the same position is a transform failure.
        let mut plain = coverage.evaluator(EvaluatorOptions::default());
        assert!(plain.evaluate(&DirectPosition::new(370.0, 20.0)).is_err());
    }

    #[test]
    fn test_text_domain_resolves() {
        // A domain listed in textual identifiers still resolves: the
        // evaluator retries the lookup with the text form.
        let grid = quad_grid();
        let coder = grid.coder();
        let ids: Vec<_> = grid
            .root_zone_ids()
            .iter()
            .map(|id| coder.id_to_text(id).unwrap())
            .collect();
        drop(coder);

        let geometry = Arc::new(GridGeometry::new(grid, ids));
        let coverage =
            ZoneArrayCoverage::filled(geometry, vec![BandDescriptor::named("v")], 5.5).unwrap();

        let mut evaluator = coverage.evaluator(EvaluatorOptions::default());
        let values = evaluator
            .evaluate(&DirectPosition::new(0.0, 0.0))
            .unwrap()
            .unwrap();
        assert_eq!(values, vec![5.5]);
    }
