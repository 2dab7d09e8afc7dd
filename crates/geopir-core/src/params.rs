//! PIR parameter model
//!
//! Only the database shape (rows, cols, record bit width) travels over the
//! wire at parameter negotiation. The cryptographic tuning constants below
//! are shared configuration that client and service must agree on
//! out-of-band; they are never renegotiated.

use serde::{Deserialize, Serialize};

/// LWE tuning constants for the outer PIR layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LweParams {
    pub secret_dim: u32,
    pub modulus_bit_size: u32,
    pub plaintext_bit_size: u32,
    pub error_variance: u32,
}

/// Tuning constants for the LinPIR auxiliary sub-protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinPirParams {
    pub log_n: u32,
    pub qs: [u64; 2],
    pub ts: [u64; 2],
    pub gadget_log_bs: [u32; 2],
    pub error_variance: u32,
    pub rows_per_block: u32,
}

/// Fixed LWE constants, optimized for this use-case.
pub const LWE_PARAMS: LweParams = LweParams {
    secret_dim: 1024,
    modulus_bit_size: 32,
    plaintext_bit_size: 8,
    error_variance: 8,
};

/// Fixed LinPIR constants, optimized for this use-case.
pub const LINPIR_PARAMS: LinPirParams = LinPirParams {
    log_n: 12,
    qs: [35184371884033, 35184371703809],
    ts: [2056193, 1990657],
    gadget_log_bs: [16, 16],
    error_variance: 8,
    rows_per_block: 1024,
};

/// Full parameter set for one database.
///
/// Must be identical on client and service for queries to succeed; a
/// mismatch is a hard error, never silently tolerated. Immutable after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PirParams {
    pub db_rows: u32,
    pub db_cols: u32,
    pub db_record_bit_size: u32,
    pub lwe: LweParams,
    pub linpir: LinPirParams,
}

impl PirParams {
    /// Build parameters for a database shape, applying the fixed tuning
    /// constants.
    pub fn for_database(db_rows: u32, db_cols: u32, record_size_bytes: u32) -> Self {
        Self {
            db_rows,
            db_cols,
            db_record_bit_size: record_size_bytes * 8,
            lwe: LWE_PARAMS,
            linpir: LINPIR_PARAMS,
        }
    }

    /// Record width in bytes.
    pub fn record_size(&self) -> usize {
        (self.db_record_bit_size / 8) as usize
    }

    /// Number of records the database holds.
    pub fn record_count(&self) -> u64 {
        self.db_rows as u64 * self.db_cols as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_database_shape() {
        let params = PirParams::for_database(256, 256, 2);
        assert_eq!(params.db_record_bit_size, 16);
        assert_eq!(params.record_size(), 2);
        assert_eq!(params.record_count(), 65536);
        assert_eq!(params.lwe, LWE_PARAMS);
        assert_eq!(params.linpir, LINPIR_PARAMS);
    }

    #[test]
    fn test_client_and_server_construction_agree() {
        // Both sides rebuild from shape only; tuning constants are implicit.
        let server = PirParams::for_database(134, 134, 60);
        let client = PirParams::for_database(134, 134, 60);
        assert_eq!(server, client);
    }

    #[test]
    fn test_serde_round_trip() {
        let params = PirParams::for_database(134, 134, 60);
        let json = serde_json::to_string(&params).unwrap();
        let parsed: PirParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, parsed);
    }
}
