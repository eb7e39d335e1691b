//! Reference system descriptors.

use dggs_common::CrsCode;
use serde::{Deserialize, Serialize};

use crate::{RefinementHierarchy, RefinementLevel, ZoneCoder, ZoneId};

/// Ordering rule for a zone's sub-zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubZoneOrder {
    /// Row-major scanline order within the parent.
    RowMajor,
    /// Z-order (Morton) interleaving within the parent.
    Morton,
}

/// Descriptor of one discrete global grid reference system.
///
/// Implementations are immutable and safe to share across threads; the
/// only mutable piece of the addressing machinery is the [`ZoneCoder`]
/// this descriptor hands out, which holds a current precision level and
/// must be confined to one thread. Create one coder per worker rather
/// than sharing.
pub trait DiscreteGlobalGrid: Send + Sync {
    /// Short scheme name, e.g. `"GeographicQuadGrid"`.
    fn name(&self) -> &str;

    /// Authority URI for the scheme, when one exists.
    fn uri(&self) -> Option<&str> {
        None
    }

    /// Keyword metadata.
    fn keywords(&self) -> &[String] {
        &[]
    }

    /// The coordinate reference system zone geometry is expressed in.
    fn crs(&self) -> CrsCode;

    /// The ordered refinement hierarchy.
    fn hierarchy(&self) -> &RefinementHierarchy;

    /// Identifiers of the level-0 zones.
    fn root_zone_ids(&self) -> Vec<ZoneId>;

    /// Default refinement depth for operations that don't specify one.
    fn default_depth(&self) -> RefinementLevel;

    /// The scheme's sub-zone ordering rule.
    fn sub_zone_order(&self) -> SubZoneOrder;

    /// Create a fresh coder positioned at the default depth.
    fn coder(&self) -> Box<dyn ZoneCoder + '_>;
}
