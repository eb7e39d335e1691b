//! Position and extent transforms between supported reference systems.
//!
//! Implements the projection math from scratch without external
//! dependencies. Datum shifts between the two geographic systems are
//! below the resolution this core cares about and are treated as
//! identity.

use thiserror::Error;

use crate::{CrsCode, DirectPosition, GeoExtent};

/// WGS84 semi-major axis in meters (spherical Mercator radius).
const EARTH_RADIUS_M: f64 = 6378137.0;

/// Latitude limit of the Web Mercator projection, in degrees.
const MERCATOR_MAX_LAT: f64 = 85.05112877980659;

/// Errors raised while transforming coordinates between reference systems.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The position cannot be expressed in the source or target CRS.
    #[error("position ({x}, {y}) is outside the domain of validity of {crs}")]
    OutsideDomain { x: f64, y: f64, crs: CrsCode },
}

/// Normalize a longitude in degrees into `[-180, 180)`.
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Transform a position between two supported reference systems.
pub fn transform_position(
    pos: &DirectPosition,
    from: CrsCode,
    to: CrsCode,
) -> Result<DirectPosition, TransformError> {
    if from == to {
        return check_domain(pos, from);
    }

    match (from.is_geographic(), to.is_geographic()) {
        // Geographic-to-geographic: datum shift treated as identity.
        (true, true) => check_domain(pos, from),
        (true, false) => geographic_to_mercator(pos),
        (false, true) => mercator_to_geographic(pos),
        (false, false) => check_domain(pos, from),
    }
}

/// Transform an extent by transforming its corners.
///
/// Adequate for the axis-aligned transforms supported here: both
/// projections are monotonic per axis, so corner images bound the
/// region image.
pub fn transform_extent(
    extent: &GeoExtent,
    from: CrsCode,
    to: CrsCode,
) -> Result<GeoExtent, TransformError> {
    let lower = transform_position(&DirectPosition::new(extent.min_x, extent.min_y), from, to)?;
    let upper = transform_position(&DirectPosition::new(extent.max_x, extent.max_y), from, to)?;

    Ok(GeoExtent::new(
        lower.x.min(upper.x),
        lower.y.min(upper.y),
        lower.x.max(upper.x),
        lower.y.max(upper.y),
    ))
}

fn check_domain(pos: &DirectPosition, crs: CrsCode) -> Result<DirectPosition, TransformError> {
    if crs.valid_bounds().contains(pos.x, pos.y) {
        Ok(*pos)
    } else {
        Err(TransformError::OutsideDomain {
            x: pos.x,
            y: pos.y,
            crs,
        })
    }
}

fn geographic_to_mercator(pos: &DirectPosition) -> Result<DirectPosition, TransformError> {
    if pos.x < -180.0 || pos.x > 180.0 || pos.y.abs() > MERCATOR_MAX_LAT {
        return Err(TransformError::OutsideDomain {
            x: pos.x,
            y: pos.y,
            crs: CrsCode::Epsg3857,
        });
    }

    let x = EARTH_RADIUS_M * pos.x.to_radians();
    let lat_rad = pos.y.to_radians();
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat_rad / 2.0).tan().ln();

    Ok(DirectPosition::new(x, y))
}

fn mercator_to_geographic(pos: &DirectPosition) -> Result<DirectPosition, TransformError> {
    if !CrsCode::Epsg3857.valid_bounds().contains(pos.x, pos.y) {
        return Err(TransformError::OutsideDomain {
            x: pos.x,
            y: pos.y,
            crs: CrsCode::Epsg3857,
        });
    }

    let lon = (pos.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (pos.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();

    Ok(DirectPosition::new(lon, lat))
}
