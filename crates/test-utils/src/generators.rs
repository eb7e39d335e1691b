//! Synthetic band data and coverage sources.

use dggs_common::{CrsCode, DirectPosition, GeoExtent};
use dggs_coverage::{
    BandDescriptor, CoverageError, PointSampler, Result, SourceCoverage, ZonalSource,
};

/// One band of ascending values `0, 1, 2, ...`.
pub fn linear_band(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

/// One band filled with a constant.
pub fn constant_band(n: usize, value: f64) -> Vec<f64> {
    vec![value; n]
}

/// A synthetic conventional coverage whose value at `(x, y)` is
/// `x + y`, with an optional rectangular hole of missing data and an
/// "entirely unavailable" mode for exercising the missing-data
/// downgrade.
pub struct GradientSource {
    bands: Vec<BandDescriptor>,
    envelope: GeoExtent,
    hole: Option<GeoExtent>,
    unavailable: bool,
}

impl GradientSource {
    /// Gradient over the whole globe, no holes.
    pub fn global() -> Self {
        Self {
            bands: vec![BandDescriptor::named("gradient")],
            envelope: GeoExtent::new(-180.0, -90.0, 180.0, 90.0),
            hole: None,
            unavailable: false,
        }
    }

    /// Gradient with a rectangular region of missing data.
    pub fn with_hole(hole: GeoExtent) -> Self {
        Self {
            hole: Some(hole),
            ..Self::global()
        }
    }

    /// A source whose every read fails with a missing-data condition.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::global()
        }
    }
}

impl SourceCoverage for GradientSource {
    fn crs(&self) -> CrsCode {
        CrsCode::Epsg4326
    }

    fn envelope(&self) -> GeoExtent {
        self.envelope
    }

    fn bands(&self) -> &[BandDescriptor] {
        &self.bands
    }

    fn read(&self, _extent: &GeoExtent) -> Result<Box<dyn PointSampler + '_>> {
        if self.unavailable {
            return Err(CoverageError::MissingData(
                "no granule covers the requested extent".to_string(),
            ));
        }
        Ok(Box::new(GradientSampler {
            envelope: self.envelope,
            hole: self.hole,
        }))
    }
}

struct GradientSampler {
    envelope: GeoExtent,
    hole: Option<GeoExtent>,
}

impl PointSampler for GradientSampler {
    fn sample_at(&self, position: &DirectPosition) -> Option<Vec<f64>> {
        if !self.envelope.contains(position.x, position.y) {
            return None;
        }
        if let Some(hole) = &self.hole {
            if hole.contains(position.x, position.y) {
                return None;
            }
        }
        Some(vec![position.x + position.y])
    }
}

/// A zone-ordinal-indexed source: one band, one value per cell along
/// the cell axis. NaN entries behave as missing data.
pub struct ZonalTable {
    bands: Vec<BandDescriptor>,
    values: Vec<f64>,
}

impl ZonalTable {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            bands: vec![BandDescriptor::named("cells")],
            values,
        }
    }
}

impl ZonalSource for ZonalTable {
    fn bands(&self) -> &[BandDescriptor] {
        &self.bands
    }

    fn zone_count(&self) -> usize {
        self.values.len()
    }

    fn read_cell(&self, ordinal: usize, out: &mut [f64]) -> Result<()> {
        let value = self.values[ordinal];
        if value.is_nan() {
            return Err(CoverageError::MissingData(format!(
                "cell {} has no value",
                ordinal
            )));
        }
        out[0] = value;
        Ok(())
    }
}
