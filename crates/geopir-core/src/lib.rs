//! geopir-core: shared types for privacy-preserving reverse geocoding
//!
//! A client converts GPS coordinates into a grid cell index, then runs two
//! chained PIR queries against the service: grid cell -> street-segment
//! identifier, segment identifier -> street name. The service answers both
//! without learning which cell or segment was queried.
//!
//! # Privacy & Threat Model
//!
//! - **Server model**: single-server, honest-but-curious
//! - **Security goal**: query index confidentiality within each database
//! - **Non-goals**: network anonymity, transport security, authentication
//!
//! | Information | Server Knowledge |
//! |-------------|------------------|
//! | Queried database (segment/street) | **YES** - the endpoint reveals it |
//! | Grid cell / segment identifier | NO - encrypted by PIR |
//! | Query timing, client identity | YES - via network metadata |
//!
//! The cryptographic scheme itself lives behind the [`engine`] traits and is
//! supplied externally; this crate carries the orchestration-side model:
//! grid mapping, database loading, parameter negotiation, configuration.

pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod grid;
pub mod negotiation;
pub mod params;
pub mod stub;

pub use config::ServiceConfig;
pub use database::load_fixed_records;
pub use engine::{PirClientHandle, PirEngine, PirServerHandle};
pub use error::Error;
pub use grid::GridBounds;
pub use negotiation::{DbShape, InitResponse};
pub use params::{LinPirParams, LweParams, PirParams, LINPIR_PARAMS, LWE_PARAMS};
pub use stub::StubEngine;

pub type Result<T> = std::result::Result<T, Error>;

/// Database shape constants for the Beijing dataset.
pub mod constants {
    /// Segment database: one record per grid cell, row-major.
    pub const SEGMENT_DB_ROWS: u32 = 256;
    pub const SEGMENT_DB_COLS: u32 = 256;
    /// Little-endian u16 street-segment identifier.
    pub const SEGMENT_RECORD_SIZE: usize = 2;

    /// Street-name database: one record per segment identifier.
    pub const STREET_DB_ROWS: u32 = 134;
    pub const STREET_DB_COLS: u32 = 134;
    /// UTF-8 street name, NUL-padded to a fixed width.
    pub const STREET_RECORD_SIZE: usize = 60;
}
