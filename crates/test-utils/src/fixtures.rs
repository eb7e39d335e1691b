//! Common grid and domain fixtures.

use std::sync::Arc;

use dggs_common::GeoExtent;
use dggs_core::{DiscreteGlobalGrid, GeographicQuadGrid, RefinementLevel, ZoneCoder};
use dggs_coverage::GridGeometry;

/// The standard global quad grid used across workspace tests.
pub fn quad_grid() -> Arc<dyn DiscreteGlobalGrid> {
    Arc::new(GeographicQuadGrid::global())
}

/// A geometry over every zone of the grid at one refinement level, in
/// the order the intersect search yields them.
pub fn geometry_at_level(grid: &Arc<dyn DiscreteGlobalGrid>, level: u8) -> Arc<GridGeometry> {
    let mut coder = grid.coder();
    coder
        .set_precision_level(RefinementLevel(level))
        .expect("fixture level within hierarchy");

    let ids = coder
        .intersect(&GeoExtent::new(-180.0, -90.0, 180.0, 90.0))
        .map(|zone| zone.map(|z| z.id))
        .collect::<Result<Vec<_>, _>>()
        .expect("fixture zones decode");
    drop(coder);

    Arc::new(GridGeometry::new(grid.clone(), ids))
}
