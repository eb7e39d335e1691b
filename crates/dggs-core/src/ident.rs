//! Zone identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier for one zone of a tessellation.
///
/// Two representations exist: a compact unsigned 64-bit integer (the
/// default on performance-critical paths) and an opaque text code for
/// schemes whose native addressing is not integer-friendly. Equality and
/// hashing are representation-specific; a `Long` never equals a `Text`,
/// and no implicit conversion exists — callers must know which
/// representation a given scheme's coder produces. A coder can convert
/// explicitly via `id_to_text` / `id_to_numeric`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneId {
    /// Compact numeric identifier. The value is unsigned; the high bit
    /// carries no special meaning.
    Long(u64),
    /// Opaque textual identifier.
    Text(String),
}

impl ZoneId {
    /// The numeric value, if this is a `Long` identifier.
    pub fn as_long(&self) -> Option<u64> {
        match self {
            ZoneId::Long(v) => Some(*v),
            ZoneId::Text(_) => None,
        }
    }

    /// The text code, if this is a `Text` identifier.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ZoneId::Long(_) => None,
            ZoneId::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ZoneId {
    /// Numeric identifiers render as unsigned decimal, text identifiers
    /// literally.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneId::Long(v) => write!(f, "{}", v),
            ZoneId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for ZoneId {
    fn from(v: u64) -> Self {
        ZoneId::Long(v)
    }
}
