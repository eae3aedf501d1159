//! # Sensorweb Platforms
//!
//! Unified read access to environmental-monitoring platforms. Platforms are
//! physically split across two backing sources — fixed feature records and
//! mobile platform records — and classified along two independent axes:
//! mobility (stationary/mobile) and sensing mode (insitu/remote). This crate
//! resolves composite identifiers into their taxonomy partition, fetches from
//! the right source, merges the heterogeneous records into one platform
//! shape, and derives a last-known location from a platform's datasets when
//! the record itself carries no static position.
//!
//! Read path: decode/partition → source fetch → normalize → assemble
//! (condensed, or expanded with dataset join and location resolution).
//!
//! Every operation is a fresh, independent read — no caching, no write path.

pub mod access;
pub mod assembler;
pub mod config;
pub mod db;
pub mod error;
pub mod geometry;
pub mod location;
pub mod model;
pub mod platform_id;
pub mod query;
pub mod readers;

pub use access::AccessService;
pub use assembler::PlatformAssembler;
pub use error::{Error, Result};
pub use geometry::Geometry;
pub use model::{CondensedPlatform, ExpandedPlatform, SearchResult, UrlHelper};
pub use platform_id::{Mobility, PlatformId, SensingMode};
pub use query::{Partition, Query};
