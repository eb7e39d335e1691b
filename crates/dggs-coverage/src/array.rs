//! Array-backed coverage storage: one flat array per band plus an
//! identifier → slot index.

use std::collections::HashMap;
use std::sync::Arc;

use dggs_common::{transform_position, CrsCode, DirectPosition, GeoExtent};
use dggs_core::{DiscreteGlobalGrid, RefinementLevel, ZoneId};
use rayon::prelude::*;

use crate::band::BandDescriptor;
use crate::error::{CoverageError, Result};
use crate::eval::{EvaluatorOptions, PointEvaluator, ZoneValueLookup};
use crate::geometry::{scan_level_range, GridGeometry};
use crate::iter::{DomainCursor, WritableZoneIterator, ZoneIterator};

/// Zone coverage backed by one flat numeric array per band.
///
/// Slot `i` of every band holds the sample for the `i`-th zone of the
/// domain. An identifier → slot hash index is built once at
/// construction (O(n) build, O(1) lookup) and is a bijection between
/// domain identifiers and storage slots. The storage is never resized;
/// mutation happens in place through writable iterators.
pub struct ZoneArrayCoverage {
    geometry: Arc<GridGeometry>,
    descriptors: Vec<BandDescriptor>,
    bands: Vec<Vec<f64>>,
    index: HashMap<ZoneId, usize>,
    min_level: RefinementLevel,
    max_level: RefinementLevel,
}

impl ZoneArrayCoverage {
    /// Build a coverage over `geometry` from per-band sample arrays.
    ///
    /// Fails fast, leaving no partial coverage, when any band's length
    /// differs from the domain zone count, when the domain repeats an
    /// identifier, or when any domain zone fails to decode during the
    /// refinement-level scan.
    pub fn new(
        geometry: Arc<GridGeometry>,
        descriptors: Vec<BandDescriptor>,
        bands: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let n = geometry.len();
        for (band, samples) in bands.iter().enumerate() {
            if samples.len() != n {
                return Err(CoverageError::BandShapeMismatch {
                    band,
                    expected: n,
                    actual: samples.len(),
                });
            }
        }

        let mut index = HashMap::with_capacity(n);
        for (slot, id) in geometry.zone_ids().iter().enumerate() {
            if index.insert(id.clone(), slot).is_some() {
                return Err(CoverageError::DuplicateZone(id.clone()));
            }
        }

        let (min_level, max_level) = scan_level_range(&geometry)?;
        tracing::debug!(
            zones = n,
            bands = bands.len(),
            %min_level,
            %max_level,
            "built array-backed zone coverage"
        );

        Ok(Self {
            geometry,
            descriptors,
            bands,
            index,
            min_level,
            max_level,
        })
    }

    /// Build a coverage with every band filled with one value, one band
    /// per descriptor.
    pub fn filled(
        geometry: Arc<GridGeometry>,
        descriptors: Vec<BandDescriptor>,
        value: f64,
    ) -> Result<Self> {
        let n = geometry.len();
        let bands = vec![vec![value; n]; descriptors.len()];
        Self::new(geometry, descriptors, bands)
    }

    pub fn geometry(&self) -> &Arc<GridGeometry> {
        &self.geometry
    }

    pub fn descriptors(&self) -> &[BandDescriptor] {
        &self.descriptors
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn zone_count(&self) -> usize {
        self.geometry.len()
    }

    /// Storage slot of an identifier, if it belongs to the domain.
    pub fn index_of(&self, id: &ZoneId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Coarsest refinement level present in the domain.
    pub fn min_level(&self) -> RefinementLevel {
        self.min_level
    }

    /// Finest refinement level present in the domain.
    pub fn max_level(&self) -> RefinementLevel {
        self.max_level
    }

    pub(crate) fn slot_value(&self, slot: usize, band: usize) -> f64 {
        self.bands[band][slot]
    }

    pub(crate) fn slot_set(&mut self, slot: usize, band: usize, value: f64) {
        self.bands[band][slot] = value;
    }

    /// A fresh read cursor. Independent cursors never share position
    /// state but all read the same underlying arrays.
    pub fn iter(&self) -> ArrayZoneIter<'_> {
        ArrayZoneIter {
            coverage: self,
            cursor: DomainCursor::new(self.zone_count()),
        }
    }

    /// A fresh writable cursor, holding the coverage exclusively until
    /// closed or dropped.
    pub fn iter_mut(&mut self) -> ArrayZoneIterMut<'_> {
        let cursor = DomainCursor::new(self.zone_count());
        ArrayZoneIterMut {
            coverage: self,
            cursor,
        }
    }

    /// A point evaluator over this coverage.
    pub fn evaluator(&self, options: EvaluatorOptions) -> PointEvaluator<'_> {
        PointEvaluator::new(self, options)
    }

    /// Rasterize this coverage onto a conventional pixel grid.
    ///
    /// Every output pixel center is transformed into the coverage's
    /// native CRS and evaluated; pixels outside the coverage's support
    /// (or inexpressible in its CRS) keep the NaN no-data sentinel.
    /// The work parallelizes per output row: evaluation is read-only
    /// and each worker chunk gets its own evaluator, since evaluators
    /// hold cursor state and must not be shared.
    pub fn sample(&self, spec: &RasterSpec) -> RasterPatch {
        let nbands = self.band_count();
        let row_len = spec.width * nbands;
        let mut data = vec![f64::NAN; row_len * spec.height];

        let dx = spec.extent.width() / spec.width as f64;
        let dy = spec.extent.height() / spec.height as f64;
        let native = self.geometry.grid().crs();

        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, out_row)| {
                let mut evaluator = self.evaluator(EvaluatorOptions {
                    null_if_outside: true,
                    ..EvaluatorOptions::default()
                });

                for col in 0..spec.width {
                    let x = spec.extent.min_x + (col as f64 + 0.5) * dx;
                    let y = spec.extent.max_y - (row as f64 + 0.5) * dy;

                    let pos = DirectPosition::new(x, y);
                    let Ok(native_pos) = transform_position(&pos, spec.crs, native) else {
                        continue;
                    };

                    if let Ok(Some(values)) = evaluator.evaluate(&native_pos) {
                        out_row[col * nbands..(col + 1) * nbands].copy_from_slice(&values);
                    }
                }
            });

        RasterPatch {
            width: spec.width,
            height: spec.height,
            bands: nbands,
            extent: spec.extent,
            crs: spec.crs,
            data,
        }
    }
}

impl ZoneValueLookup for ZoneArrayCoverage {
    fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn level_range(&self) -> (RefinementLevel, RefinementLevel) {
        (self.min_level, self.max_level)
    }

    fn zone_values(&self, id: &ZoneId, out: &mut [f64]) -> bool {
        match self.index.get(id) {
            Some(&slot) => {
                for (band, value) in out.iter_mut().enumerate() {
                    *value = self.bands[band][slot];
                }
                true
            }
            None => false,
        }
    }
}

/// Specification of a conventional output raster for
/// [`ZoneArrayCoverage::sample`].
#[derive(Debug, Clone, Copy)]
pub struct RasterSpec {
    pub width: usize,
    pub height: usize,
    pub extent: GeoExtent,
    pub crs: CrsCode,
}

/// A rasterized patch of zone data: row-major, band-interleaved, NaN
/// as the no-data sentinel.
#[derive(Debug, Clone)]
pub struct RasterPatch {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
    pub extent: GeoExtent,
    pub crs: CrsCode,
    pub data: Vec<f64>,
}

impl RasterPatch {
    pub fn value(&self, col: usize, row: usize, band: usize) -> Option<f64> {
        if col >= self.width || row >= self.height || band >= self.bands {
            return None;
        }
        Some(self.data[(row * self.width + col) * self.bands + band])
    }
}

/// Read cursor over an array-backed coverage.
pub struct ArrayZoneIter<'a> {
    coverage: &'a ZoneArrayCoverage,
    cursor: DomainCursor,
}

impl ZoneIterator for ArrayZoneIter<'_> {
    fn rewind(&mut self) {
        self.cursor.rewind();
    }

    fn advance(&mut self) -> bool {
        self.cursor.advance()
    }

    fn move_to(&mut self, id: &ZoneId) -> Result<()> {
        let slot = self
            .coverage
            .index_of(id)
            .ok_or_else(|| CoverageError::ZoneNotInDomain(id.clone()))?;
        self.cursor.jump(slot);
        Ok(())
    }

    fn position(&self) -> Option<usize> {
        self.cursor.position()
    }

    fn zone_id(&self) -> Option<&ZoneId> {
        self.cursor
            .position()
            .map(|slot| &self.coverage.geometry.zone_ids()[slot])
    }

    fn sample_double(&self, band: usize) -> f64 {
        self.coverage.slot_value(self.cursor.expect_position(), band)
    }

    fn cell(&self, out: &mut [f64]) {
        let slot = self.cursor.expect_position();
        for (band, value) in out.iter_mut().enumerate() {
            *value = self.coverage.slot_value(slot, band);
        }
    }
}

/// Writable cursor over an array-backed coverage.
pub struct ArrayZoneIterMut<'a> {
    coverage: &'a mut ZoneArrayCoverage,
    cursor: DomainCursor,
}

impl ZoneIterator for ArrayZoneIterMut<'_> {
    fn rewind(&mut self) {
        self.cursor.rewind();
    }

    fn advance(&mut self) -> bool {
        self.cursor.advance()
    }

    fn move_to(&mut self, id: &ZoneId) -> Result<()> {
        let slot = self
            .coverage
            .index_of(id)
            .ok_or_else(|| CoverageError::ZoneNotInDomain(id.clone()))?;
        self.cursor.jump(slot);
        Ok(())
    }

    fn position(&self) -> Option<usize> {
        self.cursor.position()
    }

    fn zone_id(&self) -> Option<&ZoneId> {
        self.cursor
            .position()
            .map(|slot| &self.coverage.geometry.zone_ids()[slot])
    }

    fn sample_double(&self, band: usize) -> f64 {
        self.coverage.slot_value(self.cursor.expect_position(), band)
    }

    fn cell(&self, out: &mut [f64]) {
        let slot = self.cursor.expect_position();
        for (band, value) in out.iter_mut().enumerate() {
            *value = self.coverage.slot_value(slot, band);
        }
    }
}

impl WritableZoneIterator for ArrayZoneIterMut<'_> {
    fn set_sample(&mut self, band: usize, value: f64) {
        let slot = self.cursor.expect_position();
        self.coverage.slot_set(slot, band, value);
    }

    fn set_cell(&mut self, values: &[f64]) {
        let slot = self.cursor.expect_position();
        for (band, value) in values.iter().enumerate() {
            self.coverage.slot_set(slot, band, *value);
        }
    }
}

