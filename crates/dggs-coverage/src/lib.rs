//! Zone-indexed coverage storage for discrete global grids.
//!
//! A coverage attaches numeric band data to the zones of a
//! [`GridGeometry`] — an ordered domain of zone identifiers. Two
//! interchangeable storage backends exist:
//!
//! - [`ZoneArrayCoverage`]: one flat array per band plus a hash index
//!   from identifier to storage slot
//! - [`ZoneRasterCoverage`]: one multi-band pixel grid plus a direct
//!   geometric zone ↔ pixel mapping
//!
//! On top of either backend sit forward-only cursors
//! ([`ZoneIterator`] / [`WritableZoneIterator`]), random-access point
//! evaluation ([`PointEvaluator`]: position → covering zone → band
//! values, searching across refinement levels for mixed-resolution
//! coverages), rasterization of zone data onto conventional pixel grids
//! ([`ZoneArrayCoverage::sample`]), and the reverse conversion from
//! conventional rasters into zone coverages ([`resample_to_zones`]).

pub mod array;
pub mod band;
pub mod error;
pub mod eval;
pub mod geometry;
pub mod iter;
pub mod raster;
pub mod resample;

pub use array::{RasterPatch, RasterSpec, ZoneArrayCoverage};
pub use band::BandDescriptor;
pub use error::{CoverageError, Result};
pub use eval::{EvaluatorOptions, PointEvaluator, ZoneValueLookup};
pub use geometry::GridGeometry;
pub use iter::{WritableZoneIterator, ZoneIterator};
pub use raster::{QuadRasterLayout, RasterGrid, ZoneLayout, ZoneRasterCoverage};
pub use resample::{resample_to_zones, resample_zonal, PointSampler, SourceCoverage, ZonalSource};
