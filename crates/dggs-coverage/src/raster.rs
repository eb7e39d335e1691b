//! Raster-backed coverage storage: band samples in a single multi-band
//! pixel grid, with a geometric zone ↔ pixel mapping.
//!
//! Useful when a tessellation has a natural 2D layout — the geographic
//! quad grid at a fixed level is exactly a regular raster — trading the
//! array backend's hash index for direct coordinate arithmetic.

use std::collections::HashSet;
use std::sync::Arc;

use dggs_core::{QuadAddress, RefinementLevel, ZoneId};

use crate::band::BandDescriptor;
use crate::error::{CoverageError, Result};
use crate::eval::{EvaluatorOptions, PointEvaluator, ZoneValueLookup};
use crate::geometry::{scan_level_range, GridGeometry};
use crate::iter::{DomainCursor, WritableZoneIterator, ZoneIterator};

/// A multi-band pixel grid, row-major and band-interleaved.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    width: u32,
    height: u32,
    bands: usize,
    data: Vec<f64>,
}

impl RasterGrid {
    /// Wrap existing pixel data. Fails when the buffer length does not
    /// match `width * height * bands`.
    pub fn new(width: u32, height: u32, bands: usize, data: Vec<f64>) -> Result<Self> {
        let expected = width as usize * height as usize * bands;
        if data.len() != expected {
            return Err(CoverageError::BandShapeMismatch {
                band: 0,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bands,
            data,
        })
    }

    /// A grid with every sample set to one value.
    pub fn filled(width: u32, height: u32, bands: usize, value: f64) -> Self {
        Self {
            width,
            height,
            bands,
            data: vec![value; width as usize * height as usize * bands],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn band_count(&self) -> usize {
        self.bands
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn offset(&self, col: u32, row: u32, band: usize) -> usize {
        (row as usize * self.width as usize + col as usize) * self.bands + band
    }

    pub fn value(&self, col: u32, row: u32, band: usize) -> f64 {
        self.data[self.offset(col, row, band)]
    }

    pub fn set_value(&mut self, col: u32, row: u32, band: usize, value: f64) {
        let offset = self.offset(col, row, band);
        self.data[offset] = value;
    }
}

/// Bidirectional mapping between zone identifiers and pixel coordinates.
///
/// `zone_to_pixel` must be injective over the identifiers it maps. The
/// reverse mapping is optional — layouts without a use for it keep the
/// default `None` implementation; coverage code never requires it.
pub trait ZoneLayout: Send + Sync {
    /// Pixel coordinate `(col, row)` of a zone, or `None` when the zone
    /// is outside the layout.
    fn zone_to_pixel(&self, id: &ZoneId) -> Option<(u32, u32)>;

    /// Zone identifier of a pixel, when the layout supports the reverse
    /// direction.
    fn pixel_to_zone(&self, _col: u32, _row: u32) -> Option<ZoneId> {
        None
    }
}

/// Layout for a rectangular block of geographic quad grid zones at one
/// refinement level: zone `(col, row)` maps to pixel
/// `(col - origin_col, row - origin_row)`.
#[derive(Debug, Clone, Copy)]
pub struct QuadRasterLayout {
    level: u8,
    origin_col: u32,
    origin_row: u32,
    width: u32,
    height: u32,
}

impl QuadRasterLayout {
    /// A block of `width × height` zones starting at grid position
    /// `(origin_col, origin_row)`.
    ///
    /// # Panics
    /// Panics when the block extends past the level's grid dimensions.
    pub fn new(level: RefinementLevel, origin_col: u32, origin_row: u32, width: u32, height: u32) -> Self {
        let (cols, rows) = QuadAddress::grid_size(level.index());
        assert!(
            origin_col + width <= cols && origin_row + height <= rows,
            "layout block {}x{} at ({}, {}) exceeds level {} grid {}x{}",
            width,
            height,
            origin_col,
            origin_row,
            level,
            cols,
            rows
        );
        Self {
            level: level.index(),
            origin_col,
            origin_row,
            width,
            height,
        }
    }

    /// The whole grid at one level as a raster.
    pub fn full_level(level: RefinementLevel) -> Self {
        let (cols, rows) = QuadAddress::grid_size(level.index());
        Self::new(level, 0, 0, cols, rows)
    }
}

impl ZoneLayout for QuadRasterLayout {
    fn zone_to_pixel(&self, id: &ZoneId) -> Option<(u32, u32)> {
        let address = QuadAddress::from_numeric(id.as_long()?)?;
        if address.level != self.level {
            return None;
        }

        let col = address.col.checked_sub(self.origin_col)?;
        let row = address.row.checked_sub(self.origin_row)?;
        if col < self.width && row < self.height {
            Some((col, row))
        } else {
            None
        }
    }

    fn pixel_to_zone(&self, col: u32, row: u32) -> Option<ZoneId> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let address = QuadAddress {
            level: self.level,
            row: self.origin_row + row,
            col: self.origin_col + col,
        };
        Some(ZoneId::Long(address.to_numeric()))
    }
}

/// Zone coverage backed by a multi-band pixel grid.
///
/// Same external contract as [`ZoneArrayCoverage`](crate::ZoneArrayCoverage):
/// the domain order still defines cursor order; samples live at the
/// pixel each zone maps to.
pub struct ZoneRasterCoverage {
    geometry: Arc<GridGeometry>,
    descriptors: Vec<BandDescriptor>,
    raster: RasterGrid,
    layout: Box<dyn ZoneLayout>,
    /// Pixel coordinate of each domain slot, resolved once at
    /// construction.
    pixels: Vec<(u32, u32)>,
    min_level: RefinementLevel,
    max_level: RefinementLevel,
}

impl ZoneRasterCoverage {
    /// Build a coverage whose samples live in `raster`, placed by
    /// `layout`.
    ///
    /// Fails fast when the pixel count differs from the domain zone
    /// count, when any domain zone has no pixel under the layout, or
    /// when two zones collide on one pixel.
    pub fn new(
        geometry: Arc<GridGeometry>,
        descriptors: Vec<BandDescriptor>,
        raster: RasterGrid,
        layout: Box<dyn ZoneLayout>,
    ) -> Result<Self> {
        let n = geometry.len();
        if raster.pixel_count() != n {
            return Err(CoverageError::BandShapeMismatch {
                band: 0,
                expected: n,
                actual: raster.pixel_count(),
            });
        }

        let mut pixels = Vec::with_capacity(n);
        let mut seen = HashSet::with_capacity(n);
        for id in geometry.zone_ids() {
            let (col, row) = layout
                .zone_to_pixel(id)
                .filter(|&(c, r)| c < raster.width() && r < raster.height())
                .ok_or_else(|| CoverageError::UnmappableZone(id.clone()))?;
            if !seen.insert((col, row)) {
                return Err(CoverageError::PixelCollision {
                    zone: id.clone(),
                    col,
                    row,
                });
            }
            pixels.push((col, row));
        }

        let (min_level, max_level) = scan_level_range(&geometry)?;
        tracing::debug!(
            zones = n,
            width = raster.width(),
            height = raster.height(),
            "built raster-backed zone coverage"
        );

        Ok(Self {
            geometry,
            descriptors,
            raster,
            layout,
            pixels,
            min_level,
            max_level,
        })
    }

    pub fn geometry(&self) -> &Arc<GridGeometry> {
        &self.geometry
    }

    pub fn descriptors(&self) -> &[BandDescriptor] {
        &self.descriptors
    }

    pub fn raster(&self) -> &RasterGrid {
        &self.raster
    }

    pub fn zone_count(&self) -> usize {
        self.geometry.len()
    }

    /// Storage slot of an identifier. Linear in the domain size — the
    /// raster backend carries no hash index; random access by position
    /// goes through the layout instead.
    pub fn index_of(&self, id: &ZoneId) -> Option<usize> {
        self.geometry.zone_ids().iter().position(|z| z == id)
    }

    pub fn iter(&self) -> RasterZoneIter<'_> {
        RasterZoneIter {
            coverage: self,
            cursor: DomainCursor::new(self.zone_count()),
        }
    }

    pub fn iter_mut(&mut self) -> RasterZoneIterMut<'_> {
        let cursor = DomainCursor::new(self.zone_count());
        RasterZoneIterMut {
            coverage: self,
            cursor,
        }
    }

    pub fn evaluator(&self, options: EvaluatorOptions) -> PointEvaluator<'_> {
        PointEvaluator::new(self, options)
    }
}

impl ZoneValueLookup for ZoneRasterCoverage {
    fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    fn band_count(&self) -> usize {
        self.raster.band_count()
    }

    fn level_range(&self) -> (RefinementLevel, RefinementLevel) {
        (self.min_level, self.max_level)
    }

    fn zone_values(&self, id: &ZoneId, out: &mut [f64]) -> bool {
        let Some((col, row)) = self.layout.zone_to_pixel(id) else {
            return false;
        };
        if col >= self.raster.width() || row >= self.raster.height() {
            return false;
        }
        for (band, value) in out.iter_mut().enumerate() {
            *value = self.raster.value(col, row, band);
        }
        true
    }
}

/// Read cursor over a raster-backed coverage.
pub struct RasterZoneIter<'a> {
    coverage: &'a ZoneRasterCoverage,
    cursor: DomainCursor,
}

impl ZoneIterator for RasterZoneIter<'_> {
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
        let (col, row) = self.coverage.pixels[self.cursor.expect_position()];
        self.coverage.raster.value(col, row, band)
    }

    fn cell(&self, out: &mut [f64]) {
        let (col, row) = self.coverage.pixels[self.cursor.expect_position()];
        for (band, value) in out.iter_mut().enumerate() {
            *value = self.coverage.raster.value(col, row, band);
        }
    }
}

/// Writable cursor over a raster-backed coverage.
pub struct RasterZoneIterMut<'a> {
    coverage: &'a mut ZoneRasterCoverage,
    cursor: DomainCursor,
}

impl ZoneIterator for RasterZoneIterMut<'_> {
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
        let (col, row) = self.coverage.pixels[self.cursor.expect_position()];
        self.coverage.raster.value(col, row, band)
    }

    fn cell(&self, out: &mut [f64]) {
        let (col, row) = self.coverage.pixels[self.cursor.expect_position()];
        for (band, value) in out.iter_mut().enumerate() {
            *value = self.coverage.raster.value(col, row, band);
        }
    }
}

impl WritableZoneIterator for RasterZoneIterMut<'_> {
    fn set_sample(&mut self, band: usize, value: f64) {
        let (col, row) = self.coverage.pixels[self.cursor.expect_position()];
        self.coverage.raster.set_value(col, row, band, value);
    }

    fn set_cell(&mut self, values: &[f64]) {
        let (col, row) = self.coverage.pixels[self.cursor.expect_position()];
        for (band, value) in values.iter().enumerate() {
            self.coverage.raster.set_value(col, row, band, *value);
        }
    }
}

