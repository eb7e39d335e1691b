//! Zone model and addressing for discrete global grid systems.
//!
//! A discrete global grid system (DGGS) tessellates a reference surface
//! into a hierarchy of zones. This crate provides:
//!
//! - **Zone identifiers** ([`ZoneId`]): compact 64-bit or opaque text codes
//! - **Zones** ([`Zone`]): decoded cell descriptions with geometry and topology
//! - **Reference systems** ([`DiscreteGlobalGrid`]): tessellation descriptors
//! - **Coders** ([`ZoneCoder`]): position ↔ identifier addressing engines
//! - **One concrete scheme** ([`GeographicQuadGrid`]): six root quadrilaterals
//!   over WGS84 with quaternary refinement
//!
//! # Architecture
//!
//! ```text
//! DiscreteGlobalGrid (immutable, shared)
//!      │
//!      ├─► coder()  (stateful, one per worker)
//!      │      │
//!      │      ├─► encode: DirectPosition ─► ZoneId
//!      │      ├─► decode: ZoneId ─► Zone (geometry + topology)
//!      │      └─► intersect: GeoExtent ─► lazy zone stream
//!      │
//!      └─► hierarchy(): ordered refinement levels
//! ```
//!
//! Zones are transient values recomputed on demand from identifiers;
//! parent/child/neighbor edges are identifier lists, never object
//! references, so the hierarchy stays a pure function of identifiers.

pub mod coder;
pub mod dggrs;
pub mod ident;
pub mod level;
pub mod quad;
pub mod zone;

pub use coder::{CoderError, IntersectIter, ZoneCoder};
pub use dggrs::{DiscreteGlobalGrid, SubZoneOrder};
pub use ident::ZoneId;
pub use level::{LevelSpec, RefinementHierarchy, RefinementLevel};
pub use quad::{GeographicQuadGrid, QuadAddress, QuadCoder};
pub use zone::{Zone, ZoneShape};
