//! The addressing engine: position ↔ identifier coding and spatial search.

use std::collections::VecDeque;

use dggs_common::{CrsCode, DirectPosition, GeoExtent, TransformError};
use thiserror::Error;

use crate::{RefinementLevel, Zone, ZoneId};

/// Errors raised by zone coders.
#[derive(Debug, Error)]
pub enum CoderError {
    /// A requested precision cannot be mapped to this scheme's geometry.
    /// Indicates a unit/scale programming error, not a data condition.
    #[error("incommensurable precision: {0}")]
    IncommensurablePrecision(String),

    /// The position cannot be expressed in the reference system's
    /// coordinate system.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The position is expressible but falls outside the scheme's
    /// supported area. [`ZoneCoder::encode_id`] converts this into an
    /// absent result; it only surfaces from `encode_numeric`.
    #[error("position ({x}, {y}) is outside the grid's supported area")]
    OutsideGrid { x: f64, y: f64 },

    /// An identifier that does not name a zone of this scheme.
    #[error("malformed zone identifier: {0}")]
    MalformedId(String),
}

pub type Result<T> = std::result::Result<T, CoderError>;

/// Stateful encoder/decoder between geographic positions and zone
/// identifiers.
///
/// A coder holds a current precision level used by subsequent encode
/// operations. It is deliberately not `Sync`: confine each coder to one
/// thread, or create one per worker via
/// [`DiscreteGlobalGrid::coder`](crate::DiscreteGlobalGrid::coder).
pub trait ZoneCoder {
    /// The CRS positions handed to this coder are expressed in.
    fn crs(&self) -> CrsCode;

    /// The refinement level used by subsequent encode operations.
    fn precision_level(&self) -> RefinementLevel;

    /// Set the precision level. Fails with
    /// [`CoderError::IncommensurablePrecision`] when the level is outside
    /// the scheme's hierarchy.
    fn set_precision_level(&mut self, level: RefinementLevel) -> Result<()>;

    /// Set the precision from a physical resolution in CRS units,
    /// selecting the coarsest level at least that fine. Same failure
    /// condition as [`set_precision_level`](Self::set_precision_level).
    fn set_precision(&mut self, resolution: f64) -> Result<()>;

    /// Map a position to the numeric identifier of the zone containing
    /// it at the current precision level.
    ///
    /// Fails with [`CoderError::Transform`] when the position cannot be
    /// expressed in the scheme's coordinate system, and with
    /// [`CoderError::OutsideGrid`] when it is expressible but not
    /// covered by the scheme.
    fn encode_numeric(&self, position: &DirectPosition) -> Result<u64>;

    /// Map a position to a zone identifier.
    ///
    /// A position outside the scheme's supported area is a normal,
    /// expected outcome and yields `Ok(None)`; transform failures still
    /// propagate as errors.
    fn encode_id(&self, position: &DirectPosition) -> Result<Option<ZoneId>> {
        match self.encode_numeric(position) {
            Ok(value) => Ok(Some(ZoneId::Long(value))),
            Err(CoderError::OutsideGrid { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Reconstruct the full zone description for an identifier,
    /// dispatching on its representation. Malformed identifiers of
    /// either representation fail fast.
    fn decode(&self, id: &ZoneId) -> Result<Zone>;

    /// Convert an identifier to its textual representation, losslessly.
    fn id_to_text(&self, id: &ZoneId) -> Result<ZoneId>;

    /// Convert an identifier to its numeric representation, losslessly.
    fn id_to_numeric(&self, id: &ZoneId) -> Result<ZoneId>;

    /// Identifiers of the scheme's root zones, in the scheme's canonical
    /// representation.
    fn root_zone_ids(&self) -> Vec<ZoneId>;

    /// Lazily yield every zone at the current precision level whose
    /// extent intersects the envelope. Results are unordered; restart by
    /// creating a fresh iterator.
    fn intersect<'a>(&'a self, envelope: &GeoExtent) -> IntersectIter<'a>;
}

/// Lazy breadth-first intersection search over a zone hierarchy.
///
/// The default search algorithm shared by all schemes: descend from the
/// root zones, pruning every subtree whose extent does not intersect the
/// envelope, recursing while above the target level and yielding zones
/// at it. Correctness-first — a scheme with a natural arithmetic
/// addressing can provide its own `intersect` instead.
pub struct IntersectIter<'a> {
    coder: &'a dyn ZoneCoder,
    envelope: Option<GeoExtent>,
    target: RefinementLevel,
    queue: VecDeque<ZoneId>,
    fused: bool,
}

impl<'a> IntersectIter<'a> {
    pub fn new(coder: &'a dyn ZoneCoder, envelope: &GeoExtent) -> Self {
        // Clamp the search envelope to the CRS domain of validity; the
        // roots tile exactly that domain, so descent covers every
        // requestable region.
        let valid = coder.crs().valid_bounds();
        let clamped = envelope.intersection(&valid);
        if clamped.is_none() {
            tracing::debug!(?envelope, "intersect envelope entirely outside CRS domain");
        } else if clamped.as_ref() != Some(envelope) {
            tracing::debug!(?envelope, "intersect envelope clamped to CRS domain");
        }

        let queue = if clamped.is_some() {
            coder.root_zone_ids().into()
        } else {
            VecDeque::new()
        };

        Self {
            coder,
            envelope: clamped,
            target: coder.precision_level(),
            queue,
            fused: false,
        }
    }
}

impl Iterator for IntersectIter<'_> {
    type Item = Result<Zone>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        let envelope = self.envelope?;

        while let Some(id) = self.queue.pop_front() {
            let zone = match self.coder.decode(&id) {
                Ok(zone) => zone,
                Err(e) => {
                    // A decode failure mid-search is a structural error;
                    // surface it once and stop.
                    self.fused = true;
                    return Some(Err(e));
                }
            };

            if !zone.extent.intersects(&envelope) {
                continue;
            }

            if zone.level < self.target {
                self.queue.extend(zone.children.iter().cloned());
            } else {
                return Some(Ok(zone));
            }
        }

        None
    }
}
