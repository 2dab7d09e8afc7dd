//! Parameter-exchange payload between service and client
//!
//! An explicit, fixed field set per database: only the shape travels over
//! the wire. Cryptographic tuning constants are shared configuration on
//! both sides (see [`crate::params`]) and are reapplied when the client
//! rebuilds its parameters from the transmitted shape.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::params::PirParams;
use crate::Result;

/// Shape of one database as transmitted at negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbShape {
    pub db_rows: u32,
    pub db_cols: u32,
    pub db_record_bit_size: u32,
}

impl DbShape {
    pub fn of(params: &PirParams) -> Self {
        Self {
            db_rows: params.db_rows,
            db_cols: params.db_cols,
            db_record_bit_size: params.db_record_bit_size,
        }
    }

    /// Rebuild full parameters from the transmitted shape plus the shared
    /// tuning constants.
    pub fn to_params(&self) -> Result<PirParams> {
        if self.db_rows == 0 || self.db_cols == 0 {
            return Err(Error::ParamsMismatch {
                field: "db dimensions".into(),
                expected: "non-zero rows and cols".into(),
                actual: format!("{}x{}", self.db_rows, self.db_cols),
            });
        }
        if self.db_record_bit_size == 0 || self.db_record_bit_size % 8 != 0 {
            return Err(Error::ParamsMismatch {
                field: "db_record_bit_size".into(),
                expected: "non-zero multiple of 8".into(),
                actual: self.db_record_bit_size.to_string(),
            });
        }
        Ok(PirParams::for_database(
            self.db_rows,
            self.db_cols,
            self.db_record_bit_size / 8,
        ))
    }
}

/// Body of `GET /pir?init=1`: shapes and base64 public parameters for both
/// databases, keyed by database name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitResponse {
    pub status: String,
    pub segment_params: DbShape,
    pub segment_public_params: String,
    pub street_params: DbShape,
    pub street_public_params: String,
}

pub fn encode_public_params(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub fn decode_public_params(encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|e| Error::Decode(format!("invalid base64 public params: {}", e)))
}
