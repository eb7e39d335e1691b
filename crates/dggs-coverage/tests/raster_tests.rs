//! Relocated from src/raster.rs inline tests (see array_tests.rs).
#![allow(unused_imports)]

use std::sync::Arc;

use dggs_core::{DiscreteGlobalGrid, QuadAddress, RefinementLevel, ZoneId};
use dggs_coverage::*;
use test_utils::{geometry_at_level, quad_grid};


    #[test]
    fn test_layout_round_trip() {
        let layout = QuadRasterLayout::full_level(RefinementLevel(1));
        let geometry = geometry_at_level(&quad_grid(), 1);

        for id in geometry.zone_ids() {
            let (col, row) = layout.zone_to_pixel(id).unwrap();
            assert_eq!(layout.pixel_to_zone(col, row).as_ref(), Some(id));
        }
        assert_eq!(layout.pixel_to_zone(100, 100), None);
    }

    #[test]
    fn test_pixel_count_mismatch_fails() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let raster = RasterGrid::filled(3, 2, 1, 0.0); // 6 pixels, 24 zones

        let result = ZoneRasterCoverage::new(
            geometry,
            vec![BandDescriptor::named("b")],
            raster,
            Box::new(QuadRasterLayout::full_level(RefinementLevel(1))),
        );
        assert!(matches!(
            result,
            Err(CoverageError::BandShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_level_layout_is_unmappable() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let raster = RasterGrid::filled(6, 4, 1, 0.0);

        let result = ZoneRasterCoverage::new(
            geometry,
            vec![BandDescriptor::named("b")],
            raster,
            Box::new(QuadRasterLayout::full_level(RefinementLevel(2))),
        );
        assert!(matches!(result, Err(CoverageError::UnmappableZone(_))));
    }

    #[test]
    fn test_iteration_matches_pixel_values() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        // 6x4 zones at level 1; value = row-major pixel ordinal.
        let data: Vec<f64> = (0..24).map(|i| i as f64).collect();
        let raster = RasterGrid::new(6, 4, 1, data).unwrap();
        let layout = QuadRasterLayout::full_level(RefinementLevel(1));

        let coverage = ZoneRasterCoverage::new(
            geometry,
            vec![BandDescriptor::named("b")],
            raster,
            Box::new(layout),
        )
        .unwrap();

        let mut it = coverage.iter();
        let mut count = 0;
        while it.advance() {
            let id = it.zone_id().unwrap();
            let (col, row) = layout.zone_to_pixel(id).unwrap();
            assert_eq!(it.sample_double(0), (row * 6 + col) as f64);
            count += 1;
        }
        assert_eq!(count, 24);
    }

    #[test]
    fn test_writable_cursor_updates_pixels() {
        let geometry = geometry_at_level(&quad_grid(), 1);
        let target = geometry.zone_ids()[5].clone();
        let raster = RasterGrid::filled(6, 4, 2, 0.0);

        let mut coverage = ZoneRasterCoverage::new(
            geometry,
            vec![BandDescriptor::named("a"), BandDescriptor::named("b")],
            raster,
            Box::new(QuadRasterLayout::full_level(RefinementLevel(1))),
        )
        .unwrap();

        let mut writer = coverage.iter_mut();
        writer.move_to(&target).unwrap();
        writer.set_cell(&[1.5, 2.5]);
        writer.close();

        let mut reader = coverage.iter();
        reader.move_to(&target).unwrap();
        let mut out = [0.0; 2];
        reader.cell(&mut out);
        assert_eq!(out, [1.5, 2.5]);
    }
