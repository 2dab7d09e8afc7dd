//! Two-stage reverse-geocode PIR client

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};

use geopir_core::engine::{PirClientHandle, PirEngine};
use geopir_core::negotiation::{decode_public_params, DbShape, InitResponse};
use geopir_core::{Error, GridBounds, PirParams};

use crate::error::{ClientError, Result};

/// Stage-1 records are little-endian u16 segment identifiers.
const SEGMENT_ID_SIZE: usize = 2;

/// One database's client-side session: the engine handle bound to the
/// service's public parameters, plus the agreed parameters.
struct DbSession {
    handle: Box<dyn PirClientHandle>,
    params: PirParams,
}

/// Reverse-geocode client driving the two-stage protocol.
pub struct ReverseGeocodeClient {
    http: Client,
    init_url: String,
    query_url: String,
    bounds: GridBounds,
    engine: Arc<dyn PirEngine>,
    segment: Option<DbSession>,
    street: Option<DbSession>,
}

impl ReverseGeocodeClient {
    /// Fetch parameters from the service and construct both PIR client
    /// handles. Both databases are required for the two-stage query; any
    /// failure here is fatal to the run.
    pub async fn init(&mut self) -> Result<()> {
        let url = format!("{}/pir?init=1", self.init_url);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Server {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        let init: InitResponse = resp.json().await?;

        let segment = self.open_session(&init.segment_params, &init.segment_public_params)?;
        if segment.params.record_size() != SEGMENT_ID_SIZE {
            return Err(Error::ParamsMismatch {
                field: "segment record size".into(),
                expected: SEGMENT_ID_SIZE.to_string(),
                actual: segment.params.record_size().to_string(),
            }
            .into());
        }
        let street = self.open_session(&init.street_params, &init.street_public_params)?;

        tracing::info!(
            segment_records = segment.params.record_count(),
            street_records = street.params.record_count(),
            "client initialized with both databases"
        );

        self.segment = Some(segment);
        self.street = Some(street);
        Ok(())
    }

    fn open_session(&self, shape: &DbShape, public_params_b64: &str) -> Result<DbSession> {
        let params = shape.to_params()?;
        let public = decode_public_params(public_params_b64)?;
        let handle = self.engine.create_client(&params, &public)?;
        Ok(DbSession { handle, params })
    }

    /// Resolve a coordinate to a street name via the two-stage private
    /// lookup. Strictly sequential: the stage-1 segment identifier is,
    /// unmodified, the stage-2 index.
    pub async fn query(&self, lat: f64, lon: f64) -> Result<String> {
        let index = self.bounds.to_index(lat, lon)?;
        tracing::debug!(index, "coordinate mapped to grid cell");

        let segment_id = self.query_segment(index).await?;
        tracing::debug!(segment_id, "segment identifier recovered");

        self.query_street(segment_id).await
    }

    /// Stage 1: grid index -> segment identifier.
    async fn query_segment(&self, index: u64) -> Result<u16> {
        let session = self
            .segment
            .as_ref()
            .ok_or_else(|| ClientError::NotInitialized("segment database".into()))?;

        let record = self.fetch_record(session, "/reverse/segment", index).await?;
        let bytes: [u8; SEGMENT_ID_SIZE] = record.as_slice().try_into().map_err(|_| {
            Error::Decode(format!(
                "segment record is {} bytes, expected {}",
                record.len(),
                SEGMENT_ID_SIZE
            ))
        })?;
        Ok(u16::from_le_bytes(bytes))
    }

    /// Stage 2: segment identifier -> street name.
    async fn query_street(&self, segment_id: u16) -> Result<String> {
        let session = self
            .street
            .as_ref()
            .ok_or_else(|| ClientError::NotInitialized("street database".into()))?;

        let index = segment_id as u64;
        if index >= session.params.record_count() {
            return Err(Error::IndexOutOfRange {
                index,
                max: session.params.record_count(),
            }
            .into());
        }

        let record = self.fetch_record(session, "/reverse/street", index).await?;
        Ok(decode_street_name(&record))
    }

    /// Generate an encrypted request for `index`, POST it as an opaque body,
    /// and recover the plaintext record from the response.
    async fn fetch_record(&self, session: &DbSession, path: &str, index: u64) -> Result<Vec<u8>> {
        let request = session.handle.generate_request(index)?;

        let resp = self
            .http
            .post(format!("{}{}", self.query_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(request)
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(ClientError::Server {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let body = resp.bytes().await?;
        let record = session.handle.recover_record(&body)?;
        tracing::debug!(path, record = hex::encode(&record), "record recovered");
        Ok(record)
    }
}

/// Strip trailing NUL padding and decode the fixed-width record lossily.
fn decode_street_name(record: &[u8]) -> String {
    String::from_utf8_lossy(record)
        .trim_end_matches('\0')
        .to_string()
}

/// Accept `host:port` as well as full URLs, without a trailing slash.
fn normalize_url(url: &str) -> String {
    let url = url.trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Builder for ReverseGeocodeClient
pub struct ClientBuilder {
    init_url: String,
    query_url: Option<String>,
    engine: Arc<dyn PirEngine>,
    bounds: GridBounds,
    timeout: Duration,
}

impl ClientBuilder {
    pub fn new(init_url: impl Into<String>, engine: Arc<dyn PirEngine>) -> Self {
        Self {
            init_url: init_url.into(),
            query_url: None,
            engine,
            bounds: GridBounds::BEIJING,
            timeout: Duration::from_secs(30),
        }
    }

    /// Separate query server URL; defaults to the init URL.
    pub fn query_url(mut self, url: impl Into<String>) -> Self {
        self.query_url = Some(url.into());
        self
    }

    pub fn bounds(mut self, bounds: GridBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Timeout on the network leg only; engine latency is inherent and
    /// bounded by the cryptographic parameters.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ReverseGeocodeClient> {
        let init_url = normalize_url(&self.init_url);
        let query_url = self
            .query_url
            .map(|url| normalize_url(&url))
            .unwrap_or_else(|| init_url.clone());

        let http = Client::builder().timeout(self.timeout).build()?;

        Ok(ReverseGeocodeClient {
            http,
            init_url,
            query_url,
            bounds: self.bounds,
            engine: self.engine,
            segment: None,
            street: None,
        })
    }
}
