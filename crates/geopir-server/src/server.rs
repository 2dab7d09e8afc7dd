//! Reverse-geocode PIR server

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;

use geopir_core::engine::PirEngine;
use geopir_core::ServiceConfig;

use crate::error::{Result, ServerError};
use crate::routes::create_router;
use crate::state::{ServiceState, SharedState};

pub struct ReverseGeocodeServer {
    state: SharedState,
    addr: SocketAddr,
    metrics_handle: Option<PrometheusHandle>,
}

impl ReverseGeocodeServer {
    /// Run the server until the process is terminated. A failed request is
    /// answered with an error status; the listening loop survives it.
    pub async fn run(self) -> Result<()> {
        let mut router = create_router(self.state);
        if let Some(handle) = self.metrics_handle {
            router = router.route("/metrics", get(move || std::future::ready(handle.render())));
        }

        tracing::info!("Starting reverse-geocode PIR server on {}", self.addr);

        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Get the server state for testing
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }
}

/// Builder for ReverseGeocodeServer
pub struct ServerBuilder {
    config: ServiceConfig,
    engine: Arc<dyn PirEngine>,
    addr: SocketAddr,
    metrics_handle: Option<PrometheusHandle>,
}

impl ServerBuilder {
    pub fn new(config: ServiceConfig, engine: Arc<dyn PirEngine>) -> Self {
        Self {
            config,
            engine,
            addr: ([127, 0, 0, 1], 8083).into(),
            metrics_handle: None,
        }
    }

    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Load both databases and preprocess both PIR servers. Expensive; runs
    /// once, before serving starts.
    pub fn build(self) -> Result<ReverseGeocodeServer> {
        let state = ServiceState::initialize(self.config, self.engine.as_ref())?;
        Ok(ReverseGeocodeServer {
            state: Arc::new(state),
            addr: self.addr,
            metrics_handle: self.metrics_handle,
        })
    }
}
