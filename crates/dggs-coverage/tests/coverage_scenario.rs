//! End-to-end scenario: six root zones, a 24-zone level-1 domain, both
//! storage backends, iteration and point evaluation.

use std::sync::Arc;

use anyhow::Result;
use dggs_common::{DirectPosition, GeoExtent};
use dggs_core::{DiscreteGlobalGrid, RefinementLevel, ZoneCoder, ZoneId};
use dggs_coverage::{
    BandDescriptor, EvaluatorOptions, GridGeometry, QuadRasterLayout, RasterGrid,
    ZoneArrayCoverage, ZoneIterator, ZoneRasterCoverage,
};
use test_utils::{geometry_at_level, init_test_logging, quad_grid};

#[test]
fn whole_globe_level_one_coverage() -> Result<()> {
    init_test_logging();

    let grid = quad_grid();

    // Six root zones.
    assert_eq!(grid.root_zone_ids().len(), 6);

    // Intersecting the whole globe at precision level 1 yields 24 zones.
    let geometry = geometry_at_level(&grid, 1);
    assert_eq!(geometry.len(), 24);
    assert_eq!(geometry.refinement_level()?, RefinementLevel(1));
    assert_eq!(
        geometry.envelope().unwrap(),
        GeoExtent::new(-180.0, -90.0, 180.0, 90.0)
    );

    // A one-band coverage initialized to zero.
    let coverage =
        ZoneArrayCoverage::filled(geometry.clone(), vec![BandDescriptor::named("zero")], 0.0)?;

    // The iterator yields exactly 24 positions in domain order.
    let mut cursor = coverage.iter();
    let mut positions = Vec::new();
    while cursor.advance() {
        positions.push(cursor.position().unwrap());
        assert_eq!(cursor.zone_id(), Some(&geometry.zone_ids()[positions.len() - 1]));
    }
    assert_eq!(positions, (0..24).collect::<Vec<_>>());
    assert!(!cursor.advance());

    // Any valid point evaluates to [0.0].
    let mut evaluator = coverage.evaluator(EvaluatorOptions::default());
    for &(x, y) in &[(0.0, 0.0), (-120.0, 60.0), (179.0, -89.0), (42.0, 13.5)] {
        let values = evaluator.evaluate(&DirectPosition::new(x, y))?.unwrap();
        assert_eq!(values, vec![0.0]);
    }

    Ok(())
}

#[test]
fn backends_agree_on_samples() -> Result<()> {
    init_test_logging();

    let grid = quad_grid();
    let geometry = geometry_at_level(&grid, 1);
    let n = geometry.len();

    // Per-zone value derived from the identifier's row/column fields so
    // both backends can be populated independently of domain order.
    let value_of = |id: &ZoneId| {
        let v = id.as_long().unwrap();
        (((v >> 29) & 0xff) * 10 + (v & 0xff)) as f64
    };

    let bands = vec![geometry.zone_ids().iter().map(value_of).collect::<Vec<_>>()];
    let array =
        ZoneArrayCoverage::new(geometry.clone(), vec![BandDescriptor::named("v")], bands)?;

    let layout = QuadRasterLayout::full_level(RefinementLevel(1));
    let mut raster = RasterGrid::filled(6, 4, 1, f64::NAN);
    for id in geometry.zone_ids() {
        use dggs_coverage::ZoneLayout;
        let (col, row) = layout.zone_to_pixel(id).unwrap();
        raster.set_value(col, row, 0, value_of(id));
    }
    let raster_coverage = ZoneRasterCoverage::new(
        geometry.clone(),
        vec![BandDescriptor::named("v")],
        raster,
        Box::new(layout),
    )?;
    assert_eq!(raster_coverage.zone_count(), n);

    let mut array_eval = array.evaluator(EvaluatorOptions::default());
    let mut raster_eval = raster_coverage.evaluator(EvaluatorOptions::default());

    for &(x, y) in &[(-170.0, 80.0), (-10.0, 10.0), (95.0, -50.0), (179.9, -89.9)] {
        let p = DirectPosition::new(x, y);
        assert_eq!(array_eval.evaluate(&p)?, raster_eval.evaluate(&p)?);
    }

    Ok(())
}

#[test]
fn mixed_representation_domain_round_trips() -> Result<()> {
    init_test_logging();

    // Build the same domain in textual form; storage, iteration and
    // move_to work identically, keyed by the text identifiers.
    let grid = quad_grid();
    let coder = grid.coder();
    let text_ids: Vec<ZoneId> = {
        let mut level_coder = grid.coder();
        level_coder.set_precision_level(RefinementLevel(1))?;
        level_coder
            .intersect(&GeoExtent::new(-180.0, -90.0, 180.0, 90.0))
            .map(|z| z.and_then(|z| coder.id_to_text(&z.id)))
            .collect::<std::result::Result<_, _>>()?
    };
    drop(coder);

    let geometry = Arc::new(GridGeometry::new(grid, text_ids));
    let coverage =
        ZoneArrayCoverage::filled(geometry.clone(), vec![BandDescriptor::named("v")], 1.5)?;

    let target = geometry.zone_ids()[7].clone();
    let mut cursor = coverage.iter();
    cursor.move_to(&target)?;
    assert_eq!(cursor.sample_double(0), 1.5);

    // Point evaluation falls back to the textual identifier form.
    let mut evaluator = coverage.evaluator(EvaluatorOptions::default());
    let values = evaluator
        .evaluate(&DirectPosition::new(77.0, -33.0))?
        .unwrap();
    assert_eq!(values, vec![1.5]);

    Ok(())
}
