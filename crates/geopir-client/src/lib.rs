//! geopir-client: two-stage reverse-geocode PIR client
//!
//! Maps a GPS coordinate to a grid cell index, privately retrieves the
//! street-segment identifier for that cell, then privately retrieves the
//! street name for that segment. The service learns neither index.

pub mod client;
pub mod error;

pub use client::{ClientBuilder, ReverseGeocodeClient};
pub use error::ClientError;
