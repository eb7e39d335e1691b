//! Common geospatial types shared across the dggs-grid workspace.

pub mod crs;
pub mod extent;
pub mod position;
pub mod transform;

pub use crs::CrsCode;
pub use extent::GeoExtent;
pub use position::DirectPosition;
pub use transform::{transform_extent, transform_position, wrap_longitude, TransformError};
