//! The geographic quad grid: six root quadrilaterals over WGS84 with
//! quaternary refinement.
//!
//! Level 0 tiles the globe with a 3 × 2 arrangement of 120° × 90°
//! quadrilaterals (top-left origin, row-major). Each zone splits into a
//! 2 × 2 block of children, so level L holds `6 · 4^L` zones on a
//! `3·2^L × 2·2^L` grid. Addressing is pure arithmetic: no lookup
//! tables, no seams — the roots tile the whole CRS domain of validity.
//!
//! Numeric identifiers pack the refinement level into the top six bits
//! and row/column into two 29-bit fields. Text identifiers are
//! quadkey-style digit strings: a root digit `0..=5` followed by one
//! base-4 digit per refinement step, so a child's code is its parent's
//! code plus one digit.

use dggs_common::{CrsCode, DirectPosition, GeoExtent, TransformError};

use crate::coder::{CoderError, IntersectIter, Result, ZoneCoder};
use crate::{
    DiscreteGlobalGrid, LevelSpec, RefinementHierarchy, RefinementLevel, SubZoneOrder, Zone,
    ZoneId, ZoneShape,
};

const LEVEL_SHIFT: u32 = 58;
const ROW_SHIFT: u32 = 29;
const FIELD_MASK: u64 = (1 << 29) - 1;

/// Finest level whose column count (`3·2^L`) still fits a 29-bit field.
const MAX_SUPPORTED_LEVEL: u8 = 27;

/// Authalic sphere radius in meters, for cell areas.
const AUTHALIC_RADIUS_M: f64 = 6371007.1809;

const ROOT_COLS: u32 = 3;
const ROOT_ROWS: u32 = 2;

fn cols_at(level: u8) -> u32 {
    ROOT_COLS << level
}

fn rows_at(level: u8) -> u32 {
    ROOT_ROWS << level
}

fn lon_span(level: u8) -> f64 {
    360.0 / cols_at(level) as f64
}

fn lat_span(level: u8) -> f64 {
    180.0 / rows_at(level) as f64
}

fn pack(level: u8, row: u32, col: u32) -> u64 {
    ((level as u64) << LEVEL_SHIFT) | ((row as u64) << ROW_SHIFT) | col as u64
}

/// The grid address behind a numeric quad-grid identifier.
///
/// Exposes the scheme's arithmetic addressing to collaborators that lay
/// zones out geometrically (raster-backed storage) without going through
/// a full decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadAddress {
    pub level: u8,
    pub row: u32,
    pub col: u32,
}

impl QuadAddress {
    /// Unpack a numeric identifier, validating the bit layout.
    pub fn from_numeric(value: u64) -> Option<Self> {
        let level = (value >> LEVEL_SHIFT) as u8;
        let row = ((value >> ROW_SHIFT) & FIELD_MASK) as u32;
        let col = (value & FIELD_MASK) as u32;

        if level > MAX_SUPPORTED_LEVEL || col >= cols_at(level) || row >= rows_at(level) {
            return None;
        }
        Some(Self { level, row, col })
    }

    pub fn to_numeric(self) -> u64 {
        pack(self.level, self.row, self.col)
    }

    /// Grid dimensions (columns, rows) at this address's level.
    pub fn grid_size(level: u8) -> (u32, u32) {
        (cols_at(level), rows_at(level))
    }
}

/// The geographic quad grid reference system.
///
/// Immutable after construction and safe to share across threads. A
/// `regional` variant restricts the supported area to a sub-extent:
/// positions outside it are an expected absent-encode outcome rather
/// than an error, the way regional forecast grids cover only part of
/// the globe.
#[derive(Debug)]
pub struct GeographicQuadGrid {
    name: String,
    uri: Option<String>,
    keywords: Vec<String>,
    hierarchy: RefinementHierarchy,
    max_level: RefinementLevel,
    default_depth: RefinementLevel,
    coverage_area: Option<GeoExtent>,
}

impl GeographicQuadGrid {
    /// A global grid refined down to `max_level`.
    ///
    /// # Panics
    /// Panics if `max_level` exceeds the addressable maximum (27).
    pub fn new(max_level: u8) -> Self {
        assert!(
            max_level <= MAX_SUPPORTED_LEVEL,
            "max_level {} exceeds addressable maximum {}",
            max_level,
            MAX_SUPPORTED_LEVEL
        );

        let hierarchy = RefinementHierarchy::new(
            (0..=max_level)
                .map(|l| LevelSpec {
                    level: RefinementLevel(l),
                    zone_count: 6 * 4u64.pow(l as u32),
                    resolution: lat_span(l),
                })
                .collect(),
        );

        Self {
            name: "GeographicQuadGrid".to_string(),
            uri: Some("https://example.org/def/dggrs/GeographicQuadGrid".to_string()),
            keywords: vec!["DGGS".to_string(), "quadrilateral".to_string()],
            hierarchy,
            max_level: RefinementLevel(max_level),
            default_depth: RefinementLevel(max_level.min(8)),
            coverage_area: None,
        }
    }

    /// The standard global configuration (16 refinement levels,
    /// ~1.4 km zones at the finest level).
    pub fn global() -> Self {
        Self::new(16)
    }

    /// A grid whose supported area is restricted to `area` (in
    /// EPSG:4326 degrees). Addressing arithmetic is unchanged; encodes
    /// of positions outside the area report an absent zone.
    pub fn regional(area: GeoExtent, max_level: u8) -> Self {
        let mut grid = Self::new(max_level);
        grid.name = "GeographicQuadGrid-regional".to_string();
        grid.coverage_area = Some(area);
        grid
    }

    fn unpack(&self, value: u64) -> Result<(u8, u32, u32)> {
        let address = QuadAddress::from_numeric(value)
            .filter(|a| a.level <= self.max_level.index())
            .ok_or_else(|| {
                CoderError::MalformedId(format!(
                    "{} does not address a zone of {}",
                    value, self.name
                ))
            })?;

        Ok((address.level, address.row, address.col))
    }

    /// Parse a quadkey-style text code into `(level, row, col)`.
    fn parse_text(&self, code: &str) -> Result<(u8, u32, u32)> {
        let malformed = || CoderError::MalformedId(format!("\"{}\"", code));

        let mut chars = code.chars();
        let root = chars.next().ok_or_else(malformed)?;
        let root_index = root.to_digit(10).filter(|d| *d < 6).ok_or_else(malformed)?;

        let mut col = root_index % ROOT_COLS;
        let mut row = root_index / ROOT_COLS;
        let mut level: u8 = 0;

        for c in chars {
            let quadrant = c.to_digit(4).ok_or_else(malformed)?;
            col = col * 2 + (quadrant & 1);
            row = row * 2 + (quadrant >> 1);
            level = level.checked_add(1).ok_or_else(malformed)?;
            if level > self.max_level.index() {
                return Err(malformed());
            }
        }

        Ok((level, row, col))
    }

    fn to_text(&self, level: u8, row: u32, col: u32) -> String {
        let root_col = col >> level;
        let root_row = row >> level;
        let mut code = (root_row * ROOT_COLS + root_col).to_string();

        for step in (0..level).rev() {
            let dc = (col >> step) & 1;
            let dr = (row >> step) & 1;
            code.push(char::from(b'0' + (dr * 2 + dc) as u8));
        }

        code
    }

    /// Build the full zone description for an address, tagged with the
    /// identifier representation the caller used.
    fn build_zone(&self, id: ZoneId, level: u8, row: u32, col: u32) -> Zone {
        let dlon = lon_span(level);
        let dlat = lat_span(level);

        let min_x = -180.0 + col as f64 * dlon;
        let max_x = -180.0 + (col + 1) as f64 * dlon;
        let max_y = 90.0 - row as f64 * dlat;
        let min_y = 90.0 - (row + 1) as f64 * dlat;
        let extent = GeoExtent::new(min_x, min_y, max_x, max_y);

        let boundary = vec![
            DirectPosition::new(min_x, min_y),
            DirectPosition::new(max_x, min_y),
            DirectPosition::new(max_x, max_y),
            DirectPosition::new(min_x, max_y),
            DirectPosition::new(min_x, min_y),
        ];

        // Spherical zone of a latitude band slice:
        // A = R² · Δλ · (sin φ_max − sin φ_min)
        let area = AUTHALIC_RADIUS_M.powi(2)
            * dlon.to_radians()
            * (max_y.to_radians().sin() - min_y.to_radians().sin());

        let parents = match level {
            0 => Vec::new(),
            _ => vec![ZoneId::Long(pack(level - 1, row / 2, col / 2))],
        };

        let children = if level < self.max_level.index() {
            let (cl, cr, cc) = (level + 1, row * 2, col * 2);
            vec![
                ZoneId::Long(pack(cl, cr, cc)),
                ZoneId::Long(pack(cl, cr, cc + 1)),
                ZoneId::Long(pack(cl, cr + 1, cc)),
                ZoneId::Long(pack(cl, cr + 1, cc + 1)),
            ]
        } else {
            Vec::new()
        };

        let cols = cols_at(level);
        let rows = rows_at(level);
        let mut neighbors = vec![
            // East/west wrap across the antimeridian.
            ZoneId::Long(pack(level, row, (col + cols - 1) % cols)),
            ZoneId::Long(pack(level, row, (col + 1) % cols)),
        ];
        if row > 0 {
            neighbors.push(ZoneId::Long(pack(level, row - 1, col)));
        }
        if row + 1 < rows {
            neighbors.push(ZoneId::Long(pack(level, row + 1, col)));
        }

        Zone {
            id,
            indexed_id: pack(level, row, col),
            level: RefinementLevel(level),
            shape: ZoneShape::Quadrilateral,
            boundary,
            extent,
            representative_position: DirectPosition::new(
                (min_x + max_x) / 2.0,
                (min_y + max_y) / 2.0,
            ),
            area_sq_m: Some(area),
            temporal_extent: None,
            parents,
            children,
            neighbors,
        }
    }
}

impl DiscreteGlobalGrid for GeographicQuadGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn crs(&self) -> CrsCode {
        CrsCode::Epsg4326
    }

    fn hierarchy(&self) -> &RefinementHierarchy {
        &self.hierarchy
    }

    fn root_zone_ids(&self) -> Vec<ZoneId> {
        (0..ROOT_ROWS)
            .flat_map(|row| (0..ROOT_COLS).map(move |col| ZoneId::Long(pack(0, row, col))))
            .collect()
    }

    fn default_depth(&self) -> RefinementLevel {
        self.default_depth
    }

    fn sub_zone_order(&self) -> SubZoneOrder {
        SubZoneOrder::RowMajor
    }

    fn coder(&self) -> Box<dyn ZoneCoder + '_> {
        Box::new(QuadCoder::new(self))
    }
}

/// Coder for the geographic quad grid. Stateful (current precision
/// level); create one per worker.
pub struct QuadCoder<'a> {
    grid: &'a GeographicQuadGrid,
    precision: RefinementLevel,
}

impl<'a> QuadCoder<'a> {
    pub fn new(grid: &'a GeographicQuadGrid) -> Self {
        Self {
            grid,
            precision: grid.default_depth,
        }
    }
}

impl ZoneCoder for QuadCoder<'_> {
    fn crs(&self) -> CrsCode {
        CrsCode::Epsg4326
    }

    fn precision_level(&self) -> RefinementLevel {
        self.precision
    }

    fn set_precision_level(&mut self, level: RefinementLevel) -> Result<()> {
        if !self.grid.hierarchy.contains(level) {
            return Err(CoderError::IncommensurablePrecision(format!(
                "level {} is outside the hierarchy 0..={}",
                level,
                self.grid.max_level
            )));
        }
        self.precision = level;
        Ok(())
    }

    fn set_precision(&mut self, resolution: f64) -> Result<()> {
        self.precision = self.grid.hierarchy.level_for_resolution(resolution)?;
        Ok(())
    }

    fn encode_numeric(&self, position: &DirectPosition) -> Result<u64> {
        let valid = self.crs().valid_bounds();
        if !valid.contains(position.x, position.y) {
            return Err(TransformError::OutsideDomain {
                x: position.x,
                y: position.y,
                crs: self.crs(),
            }
            .into());
        }

        if let Some(area) = &self.grid.coverage_area {
            if !area.contains(position.x, position.y) {
                return Err(CoderError::OutsideGrid {
                    x: position.x,
                    y: position.y,
                });
            }
        }

        let level = self.precision.index();
        let cols = cols_at(level);
        let rows = rows_at(level);

        // The east and south edges of the domain belong to the last
        // column/row.
        let col = (((position.x + 180.0) / lon_span(level)) as u32).min(cols - 1);
        let row = (((90.0 - position.y) / lat_span(level)) as u32).min(rows - 1);

        Ok(pack(level, row, col))
    }

    fn decode(&self, id: &ZoneId) -> Result<Zone> {
        let (level, row, col) = match id {
            ZoneId::Long(value) => self.grid.unpack(*value)?,
            ZoneId::Text(code) => self.grid.parse_text(code)?,
        };
        Ok(self.grid.build_zone(id.clone(), level, row, col))
    }

    fn id_to_text(&self, id: &ZoneId) -> Result<ZoneId> {
        let (level, row, col) = match id {
            ZoneId::Long(value) => self.grid.unpack(*value)?,
            ZoneId::Text(code) => {
                self.grid.parse_text(code)?;
                return Ok(id.clone());
            }
        };
        Ok(ZoneId::Text(self.grid.to_text(level, row, col)))
    }

    fn id_to_numeric(&self, id: &ZoneId) -> Result<ZoneId> {
        let (level, row, col) = match id {
            ZoneId::Long(value) => {
                self.grid.unpack(*value)?;
                return Ok(id.clone());
            }
            ZoneId::Text(code) => self.grid.parse_text(code)?,
        };
        Ok(ZoneId::Long(pack(level, row, col)))
    }

    fn root_zone_ids(&self) -> Vec<ZoneId> {
        self.grid.root_zone_ids()
    }

    fn intersect<'b>(&'b self, envelope: &GeoExtent) -> IntersectIter<'b> {
        IntersectIter::new(self, envelope)
    }
}
