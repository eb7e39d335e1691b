//! Refinement levels and hierarchy descriptions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coder::CoderError;

/// One refinement level of a grid hierarchy.
///
/// Levels are ordered `0..N`; level 0 has the fewest, coarsest zones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RefinementLevel(pub u8);

impl RefinementLevel {
    pub fn index(&self) -> u8 {
        self.0
    }

    /// The next-coarser level, or `None` at level 0.
    pub fn parent(&self) -> Option<RefinementLevel> {
        self.0.checked_sub(1).map(RefinementLevel)
    }

    /// The next-finer level, or `None` past the hierarchy maximum.
    pub fn child(&self, max: RefinementLevel) -> Option<RefinementLevel> {
        if self.0 < max.0 {
            Some(RefinementLevel(self.0 + 1))
        } else {
            None
        }
    }
}

impl fmt::Display for RefinementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Description of one level in a refinement hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSpec {
    pub level: RefinementLevel,
    /// Number of addressable zones at this level.
    pub zone_count: u64,
    /// Nominal angular resolution (per-axis zone span) in CRS units.
    pub resolution: f64,
}

/// The ordered list of refinement levels of one tessellation scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementHierarchy {
    levels: Vec<LevelSpec>,
}

impl RefinementHierarchy {
    /// Build a hierarchy from ordered level descriptions.
    ///
    /// # Panics
    /// Panics if the list is empty or levels are not contiguous from 0;
    /// a scheme handing over a gapped hierarchy is a programming error.
    pub fn new(levels: Vec<LevelSpec>) -> Self {
        assert!(!levels.is_empty(), "hierarchy must have at least one level");
        for (i, spec) in levels.iter().enumerate() {
            assert_eq!(
                spec.level.index() as usize,
                i,
                "hierarchy levels must be contiguous from 0"
            );
        }
        Self { levels }
    }

    pub fn levels(&self) -> &[LevelSpec] {
        &self.levels
    }

    pub fn max_level(&self) -> RefinementLevel {
        self.levels[self.levels.len() - 1].level
    }

    pub fn contains(&self, level: RefinementLevel) -> bool {
        (level.index() as usize) < self.levels.len()
    }

    pub fn get(&self, level: RefinementLevel) -> Option<&LevelSpec> {
        self.levels.get(level.index() as usize)
    }

    /// Map a physical resolution to the coarsest level at least that fine.
    ///
    /// Fails with the incommensurable-precision condition when the
    /// resolution is not a positive finite number or is finer than the
    /// finest representable level — that is a unit/scale programming
    /// error, distinct from a data-boundary condition.
    pub fn level_for_resolution(&self, resolution: f64) -> Result<RefinementLevel, CoderError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(CoderError::IncommensurablePrecision(format!(
                "resolution {} is not a positive finite value",
                resolution
            )));
        }

        for spec in &self.levels {
            if spec.resolution <= resolution {
                return Ok(spec.level);
            }
        }

        Err(CoderError::IncommensurablePrecision(format!(
            "resolution {} is finer than the finest level ({} at {})",
            resolution,
            self.max_level(),
            self.levels[self.levels.len() - 1].resolution
        )))
    }
}
