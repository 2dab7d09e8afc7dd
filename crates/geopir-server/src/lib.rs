//! geopir-server: privacy-preserving reverse geocoding service
//!
//! Owns two independently initialized PIR server instances (segment and
//! street), answers parameter-negotiation requests and encrypted query
//! requests, and never learns which grid cell or segment a client resolves.

pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ServerError;
pub use routes::create_router;
pub use server::{ReverseGeocodeServer, ServerBuilder};
pub use state::{DatabaseState, ServiceState, SharedState};
