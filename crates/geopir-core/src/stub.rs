//! Stub PIR engine for development and orchestration tests
//!
//! Implements the engine traits with a plaintext bincode wire format: the
//! same call sequence and failure modes as the real engine, but no privacy.
//! The production lattice engine plugs in behind the same traits.

use serde::{Deserialize, Serialize};

use crate::engine::{PirClientHandle, PirEngine, PirServerHandle};
use crate::error::Error;
use crate::params::PirParams;
use crate::Result;

#[derive(Serialize, Deserialize)]
struct StubRequest {
    index: u64,
}

#[derive(Serialize, Deserialize)]
struct StubResponse {
    record: Vec<u8>,
}

/// Deterministic, so repeated parameter fetches from an unchanged server are
/// byte-identical.
#[derive(Serialize, Deserialize, PartialEq, Eq)]
struct StubPublicParams {
    record_size: u64,
    record_count: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StubEngine;

impl PirEngine for StubEngine {
    fn create_client(
        &self,
        params: &PirParams,
        public_params: &[u8],
    ) -> Result<Box<dyn PirClientHandle>> {
        let public: StubPublicParams = bincode::deserialize(public_params)
            .map_err(|e| Error::Engine(format!("invalid public params: {}", e)))?;

        if public.record_size != params.record_size() as u64
            || public.record_count != params.record_count()
        {
            return Err(Error::ParamsMismatch {
                field: "database shape".into(),
                expected: format!(
                    "{} records of {} bytes",
                    params.record_count(),
                    params.record_size()
                ),
                actual: format!(
                    "{} records of {} bytes",
                    public.record_count, public.record_size
                ),
            });
        }

        Ok(Box::new(StubClient {
            record_size: public.record_size,
            record_count: public.record_count,
        }))
    }

    fn create_server(&self, params: &PirParams) -> Result<Box<dyn PirServerHandle>> {
        Ok(Box::new(StubServer {
            record_size: params.record_size(),
            capacity: params.record_count(),
            records: Vec::new(),
            preprocessed: false,
        }))
    }
}

struct StubClient {
    record_size: u64,
    record_count: u64,
}

impl PirClientHandle for StubClient {
    fn generate_request(&self, index: u64) -> Result<Vec<u8>> {
        if index >= self.record_count {
            return Err(Error::Engine(format!(
                "index {} out of range for {} records",
                index, self.record_count
            )));
        }
        bincode::serialize(&StubRequest { index }).map_err(|e| Error::Engine(e.to_string()))
    }

    fn recover_record(&self, response: &[u8]) -> Result<Vec<u8>> {
        let response: StubResponse = bincode::deserialize(response)
            .map_err(|e| Error::Engine(format!("malformed response: {}", e)))?;
        if response.record.len() as u64 != self.record_size {
            return Err(Error::Engine(format!(
                "recovered record is {} bytes, expected {}",
                response.record.len(),
                self.record_size
            )));
        }
        Ok(response.record)
    }
}

struct StubServer {
    record_size: usize,
    capacity: u64,
    records: Vec<Vec<u8>>,
    preprocessed: bool,
}

impl PirServerHandle for StubServer {
    fn append_record(&mut self, record: &[u8]) -> Result<()> {
        if self.preprocessed {
            return Err(Error::Engine("server already preprocessed".into()));
        }
        if record.len() != self.record_size {
            return Err(Error::Engine(format!(
                "record is {} bytes, expected {}",
                record.len(),
                self.record_size
            )));
        }
        if self.records.len() as u64 >= self.capacity {
            return Err(Error::Engine(format!(
                "database full: capacity {}",
                self.capacity
            )));
        }
        self.records.push(record.to_vec());
        Ok(())
    }

    fn preprocess(&mut self) -> Result<()> {
        if self.preprocessed {
            return Err(Error::Engine("server already preprocessed".into()));
        }
        self.preprocessed = true;
        Ok(())
    }

    fn public_params(&self) -> Result<Vec<u8>> {
        if !self.preprocessed {
            return Err(Error::Engine("server not preprocessed".into()));
        }
        bincode::serialize(&StubPublicParams {
            record_size: self.record_size as u64,
            record_count: self.records.len() as u64,
        })
        .map_err(|e| Error::Engine(e.to_string()))
    }

    fn handle_request(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        if !self.preprocessed {
            return Err(Error::Engine("server not preprocessed".into()));
        }
        let request: StubRequest = bincode::deserialize(request)
            .map_err(|e| Error::Engine(format!("malformed request: {}", e)))?;
        let record = self
            .records
            .get(request.index as usize)
            .ok_or_else(|| Error::Engine(format!("index {} out of range", request.index)))?;
        bincode::serialize(&StubResponse {
            record: record.clone(),
        })
        .map_err(|e| Error::Engine(e.to_string()))
    }
}
