//! Coverage domains: ordered, addressable collections of zone identifiers.

use std::sync::{Arc, OnceLock};

use dggs_common::{transform_extent, CrsCode, GeoExtent};
use dggs_core::{DiscreteGlobalGrid, RefinementLevel, ZoneCoder, ZoneId};

use crate::error::{CoverageError, Result};

/// The domain of one coverage: an ordered list of zone identifiers plus
/// the reference system they belong to.
///
/// The identifier order is significant — it defines storage slot order
/// for every backend built over this geometry. All identifiers are
/// expected to be at the same refinement level; violating that is a
/// usage error detected lazily the first time
/// [`refinement_level`](Self::refinement_level) is queried.
///
/// Envelope, resolution and refinement level are computed once and
/// memoized. The cache cells are one-time-initialization
/// ([`OnceLock`]); concurrent first access may recompute redundantly
/// but each computation is idempotent and only the first store wins.
/// The geometry is otherwise immutable after construction.
pub struct GridGeometry {
    grid: Arc<dyn DiscreteGlobalGrid>,
    zone_ids: Vec<ZoneId>,
    envelope: OnceLock<Option<GeoExtent>>,
    resolution: OnceLock<Option<(f64, f64)>>,
    level: OnceLock<RefinementLevel>,
}

impl GridGeometry {
    /// Create a geometry over an ordered zone identifier list.
    ///
    /// # Panics
    /// Panics on an empty domain; a coverage over zero zones is a usage
    /// error.
    pub fn new(grid: Arc<dyn DiscreteGlobalGrid>, zone_ids: Vec<ZoneId>) -> Self {
        assert!(!zone_ids.is_empty(), "coverage domain must not be empty");
        Self {
            grid,
            zone_ids,
            envelope: OnceLock::new(),
            resolution: OnceLock::new(),
            level: OnceLock::new(),
        }
    }

    /// The reference system this domain belongs to.
    pub fn grid(&self) -> &Arc<dyn DiscreteGlobalGrid> {
        &self.grid
    }

    /// The coverage domain in storage slot order.
    pub fn zone_ids(&self) -> &[ZoneId] {
        &self.zone_ids
    }

    pub fn len(&self) -> usize {
        self.zone_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zone_ids.is_empty()
    }

    /// Bounding envelope of the domain in the grid's CRS: the union of
    /// every decoded zone extent.
    ///
    /// Returns `None` if any zone fails to decode — absent rather than
    /// partial data.
    pub fn envelope(&self) -> Option<GeoExtent> {
        *self.envelope.get_or_init(|| {
            let coder = self.grid.coder();
            let mut acc: Option<GeoExtent> = None;
            for id in &self.zone_ids {
                match coder.decode(id) {
                    Ok(zone) => {
                        acc = Some(match acc {
                            Some(e) => e.union(&zone.extent),
                            None => zone.extent,
                        });
                    }
                    Err(e) => {
                        tracing::debug!(zone = %id, error = %e, "envelope unavailable");
                        return None;
                    }
                }
            }
            acc
        })
    }

    /// Bounding envelope expressed in another CRS. `None` when the
    /// native envelope is unavailable or the transform fails.
    pub fn envelope_in(&self, crs: CrsCode) -> Option<GeoExtent> {
        let native = self.envelope()?;
        transform_extent(&native, self.grid.crs(), crs).ok()
    }

    /// Domain resolution as the minimum per-axis span observed across
    /// all decoded zone extents — a conservative, finest-resolution
    /// figure, not an average.
    ///
    /// With `allow_estimate`, the hierarchy's nominal resolution for the
    /// domain's refinement level is returned instead of decoding every
    /// zone; the estimate is per-axis-uniform and may be coarser along
    /// one axis than the exact answer.
    pub fn resolution(&self, allow_estimate: bool) -> Option<(f64, f64)> {
        if allow_estimate {
            if let Ok(level) = self.refinement_level() {
                if let Some(spec) = self.grid.hierarchy().get(level) {
                    return Some((spec.resolution, spec.resolution));
                }
            }
        }

        *self.resolution.get_or_init(|| {
            let coder = self.grid.coder();
            let mut finest: Option<(f64, f64)> = None;
            for id in &self.zone_ids {
                let zone = match coder.decode(id) {
                    Ok(zone) => zone,
                    Err(_) => return None,
                };
                let span = (zone.extent.width(), zone.extent.height());
                finest = Some(match finest {
                    Some((x, y)) => (x.min(span.0), y.min(span.1)),
                    None => span,
                });
            }
            finest
        })
    }

    /// The single refinement level shared by every zone of the domain.
    ///
    /// Decodes every identifier on first call and fails with
    /// [`CoverageError::InconsistentGeometry`] if the levels differ —
    /// a structural invariant violation, not a soft error. Failures are
    /// not cached; each call re-checks until a consistent answer is
    /// stored.
    pub fn refinement_level(&self) -> Result<RefinementLevel> {
        if let Some(level) = self.level.get() {
            return Ok(*level);
        }

        let coder = self.grid.coder();
        let mut expected: Option<RefinementLevel> = None;
        for id in &self.zone_ids {
            let zone = coder.decode(id)?;
            match expected {
                None => expected = Some(zone.level),
                Some(level) if level != zone.level => {
                    return Err(CoverageError::InconsistentGeometry {
                        expected: level,
                        found: zone.level,
                        zone: id.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        // Non-empty domain, so expected is set. Racing initializers
        // computed the same value; the first store wins.
        let level = expected.expect("non-empty domain");
        let _ = self.level.set(level);
        Ok(level)
    }
}

/// Scan a domain once and report the minimum and maximum refinement
/// level present. Multi-resolution point evaluation needs the range;
/// a decode failure here is fatal to coverage construction.
pub(crate) fn scan_level_range(
    geometry: &GridGeometry,
) -> Result<(RefinementLevel, RefinementLevel)> {
    let coder = geometry.grid().coder();
    let mut range: Option<(RefinementLevel, RefinementLevel)> = None;

    for id in geometry.zone_ids() {
        let level = coder.decode(id)?.level;
        range = Some(match range {
            Some((min, max)) => (min.min(level), max.max(level)),
            None => (level, level),
        });
    }

    Ok(range.expect("non-empty domain"))
}
