//! Band (sample dimension) metadata.

use serde::{Deserialize, Serialize};

/// Metadata describing one band of a coverage.
///
/// Carried through storage and resampling unchanged; the coverage core
/// neither interprets nor validates the content beyond counting bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandDescriptor {
    /// Band name, e.g. `"TMP"`.
    pub name: String,
    /// Physical units, e.g. `"K"`.
    pub units: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Declared fill/missing value of the source, if any.
    pub nodata: Option<f64>,
}

impl BandDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: None,
            description: None,
            nodata: None,
        }
    }
}
