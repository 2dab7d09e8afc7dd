//! Service state: two independently preprocessed PIR databases
//!
//! Built once at startup and passed to every request handler; there is no
//! process-global state.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use geopir_core::engine::{PirEngine, PirServerHandle};
use geopir_core::negotiation::{encode_public_params, DbShape, InitResponse};
use geopir_core::{load_fixed_records, PirParams, ServiceConfig};

use crate::error::Result;

/// One PIR database: parameters, cached public parameters, and the engine
/// server handle behind its own lock.
///
/// The engine does not guarantee reentrancy for a single handle, so every
/// `handle_request` call is serialized by the mutex. The segment and street
/// databases hold independent locks and serve concurrently.
pub struct DatabaseState {
    pub name: &'static str,
    pub params: PirParams,
    /// Base64 form served at negotiation, cached once so repeated fetches
    /// are byte-identical.
    pub public_params_b64: String,
    pub record_count: u64,
    handle: Mutex<Box<dyn PirServerHandle>>,
}

impl DatabaseState {
    /// Load a flat-file database and stand up its PIR server: create the
    /// handle, append every record in ordinal order, run the one-time
    /// preprocessing, and cache the public parameters.
    pub fn initialize(
        engine: &dyn PirEngine,
        name: &'static str,
        path: &Path,
        params: PirParams,
    ) -> Result<Self> {
        let records = load_fixed_records(path, params.record_size(), params.record_count() as usize)?;
        tracing::info!(db = name, records = records.len(), "database loaded");

        let start = Instant::now();
        let mut handle = engine.create_server(&params)?;
        for record in &records {
            handle.append_record(record)?;
        }
        tracing::info!(
            db = name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "records appended"
        );

        tracing::info!(db = name, "preprocessing (one-time, may take up to a minute)");
        let start = Instant::now();
        handle.preprocess()?;
        tracing::info!(
            db = name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "preprocessing complete"
        );
        crate::metrics::record_preprocess(name, start.elapsed());

        let record_count = records.len() as u64;
        let db = Self::from_handle(name, params, record_count, handle)?;
        crate::metrics::set_database_ready(name, true);
        Ok(db)
    }

    /// Wrap an already-preprocessed engine handle.
    pub fn from_handle(
        name: &'static str,
        params: PirParams,
        record_count: u64,
        handle: Box<dyn PirServerHandle>,
    ) -> Result<Self> {
        let public = handle.public_params()?;
        Ok(Self {
            name,
            params,
            public_params_b64: encode_public_params(&public),
            record_count,
            handle: Mutex::new(handle),
        })
    }

    /// Pass one opaque encrypted request to the engine. Response bytes are
    /// returned verbatim, with no transformation.
    pub async fn handle_request(&self, request: &[u8]) -> Result<Vec<u8>> {
        let mut handle = self.handle.lock().await;
        Ok(handle.handle_request(request)?)
    }

    pub fn shape(&self) -> DbShape {
        DbShape::of(&self.params)
    }
}

/// Process-wide service context holding both databases.
pub struct ServiceState {
    pub segment: DatabaseState,
    pub street: DatabaseState,
    pub config: ServiceConfig,
}

impl ServiceState {
    /// Load both databases and preprocess both PIR servers. The two are
    /// independent engine instances; initialization runs sequentially.
    pub fn initialize(config: ServiceConfig, engine: &dyn PirEngine) -> Result<Self> {
        let segment = DatabaseState::initialize(
            engine,
            crate::metrics::DB_SEGMENT,
            &config.segment_db,
            config.segment_params(),
        )?;
        let street = DatabaseState::initialize(
            engine,
            crate::metrics::DB_STREET,
            &config.street_db,
            config.street_params(),
        )?;
        Ok(Self {
            segment,
            street,
            config,
        })
    }

    /// Parameter-negotiation payload for `GET /pir?init=1`.
    pub fn init_response(&self) -> InitResponse {
        InitResponse {
            status: "success".into(),
            segment_params: self.segment.shape(),
            segment_public_params: self.segment.public_params_b64.clone(),
            street_params: self.street.shape(),
            street_public_params: self.street.public_params_b64.clone(),
        }
    }
}

/// Shared server state type
pub type SharedState = Arc<ServiceState>;
