//! Resampling between conventional coverages and zone coverages.

use std::sync::Arc;

use dggs_common::{transform_extent, transform_position, CrsCode, DirectPosition, GeoExtent};
use dggs_core::{DiscreteGlobalGrid, ZoneCoder};

use crate::array::ZoneArrayCoverage;
use crate::band::BandDescriptor;
use crate::error::{CoverageError, Result};
use crate::geometry::GridGeometry;
use crate::iter::{WritableZoneIterator, ZoneIterator};

/// Point-evaluation view over a read source region.
///
/// "Outside the source" is a normal outcome, not an error: `None`.
pub trait PointSampler {
    /// Band values at a position in the source's CRS, or `None` when
    /// the position has no data.
    fn sample_at(&self, position: &DirectPosition) -> Option<Vec<f64>>;
}

/// A conventional coverage resource consumed by the resampling
/// processor: band data readable over a requested region, plus an
/// envelope and band list.
pub trait SourceCoverage {
    fn crs(&self) -> CrsCode;
    fn envelope(&self) -> GeoExtent;
    fn bands(&self) -> &[BandDescriptor];

    /// Read band data over `extent`, returning a point-evaluation view.
    /// A region with no data fails with
    /// [`CoverageError::MissingData`]; resampling downgrades that to
    /// no-data.
    fn read(&self, extent: &GeoExtent) -> Result<Box<dyn PointSampler + '_>>;
}

/// A source whose one axis is already indexed by zone ordinal — one
/// sample per zone along an explicit cell axis.
pub trait ZonalSource {
    fn bands(&self) -> &[BandDescriptor];
    fn zone_count(&self) -> usize;

    /// Band values of one cell into `out`. A cell with no data fails
    /// with [`CoverageError::MissingData`]; resampling downgrades that
    /// to no-data.
    fn read_cell(&self, ordinal: usize, out: &mut [f64]) -> Result<()>;
}

/// Convert a conventional coverage into an array-backed zone coverage.
///
/// Every target zone's value is the source evaluated at the zone's
/// representative position. Bands start NaN-filled; zones the source
/// has no data for stay NaN. A missing-data failure while reading the
/// source region is downgraded to "leave everything as no-data" — the
/// one place a failure becomes a sentinel. A coordinate-transform
/// failure is fatal and aborts the whole resampling.
pub fn resample_to_zones(
    source: &dyn SourceCoverage,
    geometry: Arc<GridGeometry>,
) -> Result<ZoneArrayCoverage> {
    let descriptors = source.bands().to_vec();
    let band_count = descriptors.len();
    let mut coverage = ZoneArrayCoverage::filled(geometry.clone(), descriptors, f64::NAN)?;

    let grid_crs = geometry.grid().crs();
    let target_envelope = geometry
        .envelope()
        .ok_or(CoverageError::EnvelopeUnavailable)?;
    let read_extent = transform_extent(&target_envelope, grid_crs, source.crs())?;

    let sampler = match source.read(&read_extent) {
        Ok(sampler) => sampler,
        Err(CoverageError::MissingData(reason)) => {
            tracing::warn!(%reason, "source has no data for the target extent; leaving no-data");
            return Ok(coverage);
        }
        Err(e) => return Err(e),
    };

    let coder = geometry.grid().coder();
    let mut cursor = coverage.iter_mut();
    while cursor.advance() {
        let id = cursor.zone_id().expect("positioned").clone();
        let zone = coder.decode(&id)?;
        let position = transform_position(zone.position(), grid_crs, source.crs())?;

        if let Some(values) = sampler.sample_at(&position) {
            debug_assert_eq!(values.len(), band_count);
            cursor.set_cell(&values);
        }
    }
    cursor.close();

    Ok(coverage)
}

/// Convert a zone-ordinal-indexed source into an array-backed zone
/// coverage, looking cells up by ordinal rather than by geographic
/// position.
pub fn resample_zonal(
    source: &dyn ZonalSource,
    geometry: Arc<GridGeometry>,
) -> Result<ZoneArrayCoverage> {
    if source.zone_count() != geometry.len() {
        return Err(CoverageError::ZonalLengthMismatch {
            expected: geometry.len(),
            actual: source.zone_count(),
        });
    }

    let descriptors = source.bands().to_vec();
    let band_count = descriptors.len();
    let mut coverage = ZoneArrayCoverage::filled(geometry, descriptors, f64::NAN)?;

    let mut values = vec![f64::NAN; band_count];
    let mut cursor = coverage.iter_mut();
    while cursor.advance() {
        let ordinal = cursor.position().expect("positioned");
        match source.read_cell(ordinal, &mut values) {
            Ok(()) => cursor.set_cell(&values),
            Err(CoverageError::MissingData(reason)) => {
                tracing::warn!(ordinal, %reason, "cell has no data; leaving no-data");
            }
            Err(e) => return Err(e),
        }
    }
    cursor.close();

    Ok(coverage)
}

