//! Workspace umbrella crate for the geopir integration tests.

pub use geopir_client::{ClientBuilder, ReverseGeocodeClient};
pub use geopir_core::{GridBounds, ServiceConfig, StubEngine};
pub use geopir_server::{ReverseGeocodeServer, ServerBuilder};
