//! Point-to-cell resolution: position → covering zone → band values.

use dggs_common::{wrap_longitude, DirectPosition};
use dggs_core::{DiscreteGlobalGrid, RefinementLevel, ZoneCoder, ZoneId};

use crate::error::{CoverageError, Result};
use crate::geometry::GridGeometry;

/// The read surface point evaluation needs from a coverage backend.
pub trait ZoneValueLookup {
    fn geometry(&self) -> &GridGeometry;
    fn band_count(&self) -> usize;
    /// Minimum and maximum refinement level present in the domain,
    /// observed once at construction.
    fn level_range(&self) -> (RefinementLevel, RefinementLevel);
    /// Copy the band values of a zone into `out`; `false` when the
    /// identifier is not part of the coverage.
    fn zone_values(&self, id: &ZoneId, out: &mut [f64]) -> bool;
}

/// Options controlling point evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluatorOptions {
    /// Report a position with no covering zone as an absent result
    /// instead of an error.
    pub null_if_outside: bool,
    /// Normalize longitudes into the CRS range before encoding. Affects
    /// only candidate-position normalization, never the level search
    /// order.
    pub wraparound: bool,
}

/// Resolves arbitrary positions to covering zones and their band values.
///
/// Holds a stateful coder; create one evaluator per worker rather than
/// sharing (the rasterization path does exactly that).
pub struct PointEvaluator<'a> {
    coverage: &'a dyn ZoneValueLookup,
    coder: Box<dyn ZoneCoder + 'a>,
    options: EvaluatorOptions,
}

impl<'a> PointEvaluator<'a> {
    pub fn new(coverage: &'a dyn ZoneValueLookup, options: EvaluatorOptions) -> Self {
        let coder = coverage.geometry().grid().coder();
        Self {
            coverage,
            coder,
            options,
        }
    }

    /// Find the zone covering `position` and return its band values.
    ///
    /// A single-level coverage is resolved at that level only. A
    /// multi-resolution coverage is searched from its minimum to its
    /// maximum observed level in ascending order, returning the first
    /// hit — the evaluator deliberately prefers the least-refined
    /// covering zone when resolutions overlap, and that tie-break must
    /// not change.
    ///
    /// With no covering zone: `Ok(None)` when
    /// [`null_if_outside`](EvaluatorOptions::null_if_outside) is set,
    /// otherwise [`CoverageError::PointOutsideCoverage`].
    pub fn evaluate(&mut self, position: &DirectPosition) -> Result<Option<Vec<f64>>> {
        let pos = if self.options.wraparound && self.coder.crs().is_geographic() {
            DirectPosition::new(wrap_longitude(position.x), position.y)
        } else {
            *position
        };

        let (min, max) = self.coverage.level_range();
        let mut out = vec![f64::NAN; self.coverage.band_count()];

        for level in min.index()..=max.index() {
            self.coder.set_precision_level(RefinementLevel(level))?;

            let id = match self.coder.encode_id(&pos)? {
                Some(id) => id,
                // Outside the scheme's supported area entirely; finer
                // levels cannot change that.
                None => break,
            };

            if self.coverage.zone_values(&id, &mut out) {
                return Ok(Some(out));
            }

            // Domains may list their identifiers in textual form.
            let text = self.coder.id_to_text(&id)?;
            if self.coverage.zone_values(&text, &mut out) {
                return Ok(Some(out));
            }
        }

        if self.options.null_if_outside {
            Ok(None)
        } else {
            Err(CoverageError::PointOutsideCoverage {
                x: position.x,
                y: position.y,
            })
        }
    }
}

