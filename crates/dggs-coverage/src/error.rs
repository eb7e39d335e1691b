//! Error types for coverage storage and evaluation.

use dggs_common::TransformError;
use dggs_core::{CoderError, RefinementLevel, ZoneId};
use thiserror::Error;

/// Errors that can occur building, reading or resampling coverages.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// A band array's length does not match the domain zone count.
    /// Construction fails immediately; no partial coverage exists.
    #[error("band {band} has {actual} samples, domain has {expected} zones")]
    BandShapeMismatch {
        band: usize,
        expected: usize,
        actual: usize,
    },

    /// The same identifier appears twice in one domain, breaking the
    /// identifier ↔ slot bijection.
    #[error("duplicate zone {0} in coverage domain")]
    DuplicateZone(ZoneId),

    /// An iterator was moved to an identifier outside its coverage's
    /// domain.
    #[error("zone {0} is not part of this coverage's domain")]
    ZoneNotInDomain(ZoneId),

    /// A raster layout has no pixel for a domain zone.
    #[error("layout cannot map zone {0} to a pixel")]
    UnmappableZone(ZoneId),

    /// Two domain zones map to the same pixel, breaking the
    /// zone ↔ pixel bijection.
    #[error("zone {zone} maps to pixel ({col}, {row}) already used by another zone")]
    PixelCollision { zone: ZoneId, col: u32, row: u32 },

    /// A geometry's identifiers do not all share one refinement level.
    #[error("inconsistent geometry: zone {zone} is at level {found}, expected {expected}")]
    InconsistentGeometry {
        expected: RefinementLevel,
        found: RefinementLevel,
        zone: ZoneId,
    },

    /// The domain envelope could not be computed (some zone failed to
    /// decode or transform).
    #[error("coverage domain envelope could not be computed")]
    EnvelopeUnavailable,

    /// A position has no covering zone in the coverage.
    #[error("point ({x}, {y}) is outside the coverage")]
    PointOutsideCoverage { x: f64, y: f64 },

    /// A zonal source's cell axis does not match the target domain.
    #[error("zonal source has {actual} cells, target domain has {expected} zones")]
    ZonalLengthMismatch { expected: usize, actual: usize },

    /// The source has no data for a requested region. Resampling
    /// downgrades this to no-data; everywhere else it propagates.
    #[error("no data available: {0}")]
    MissingData(String),

    /// Addressing failure from the underlying coder.
    #[error(transparent)]
    Coder(#[from] CoderError),
}

impl From<TransformError> for CoverageError {
    fn from(err: TransformError) -> Self {
        CoverageError::Coder(CoderError::Transform(err))
    }
}

/// Result type for coverage operations.
pub type Result<T> = std::result::Result<T, CoverageError>;
