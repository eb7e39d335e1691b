//! Decoded zone descriptions.

use chrono::{DateTime, Utc};
use dggs_common::{DirectPosition, GeoExtent};

use crate::{RefinementLevel, ZoneId};

/// Shape class of a zone's cell geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneShape {
    Triangle,
    Quadrilateral,
    Pentagon,
    Hexagon,
}

/// One cell of a tessellation at a given refinement level.
///
/// A `Zone` is a transient value computed on demand by
/// [`ZoneCoder::decode`](crate::ZoneCoder::decode); it is never persisted
/// and holds no references to other zones. Parent, child and neighbor
/// edges are identifier lists — materializing them means decoding again,
/// which keeps the zone hierarchy a pure function of identifiers and the
/// object graph cycle-free.
#[derive(Debug, Clone)]
pub struct Zone {
    /// The identifier this zone was decoded from.
    pub id: ZoneId,
    /// Compact numeric form of the identifier (always available, even
    /// when `id` is textual).
    pub indexed_id: u64,
    /// The refinement level this zone belongs to.
    pub level: RefinementLevel,
    pub shape: ZoneShape,
    /// Closed boundary ring in the scheme's CRS (first == last vertex).
    pub boundary: Vec<DirectPosition>,
    /// Axis-aligned extent of the boundary.
    pub extent: GeoExtent,
    /// Canonical point for point-sampling, commonly the centroid.
    pub representative_position: DirectPosition,
    /// Surface area in square meters, when the scheme computes one.
    pub area_sq_m: Option<f64>,
    /// Temporal validity, for schemes whose zones carry a time slice.
    pub temporal_extent: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Identifiers of the next-coarser zones containing this one
    /// (usually one, empty at level 0).
    pub parents: Vec<ZoneId>,
    /// Identifiers of the next-finer zones tiling this one (empty at the
    /// hierarchy maximum).
    pub children: Vec<ZoneId>,
    /// Identifiers of the edge-adjacent zones at the same level.
    pub neighbors: Vec<ZoneId>,
}

impl Zone {
    /// The representative position, as used by point resampling.
    pub fn position(&self) -> &DirectPosition {
        &self.representative_position
    }
}
