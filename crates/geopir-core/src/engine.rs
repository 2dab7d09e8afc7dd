//! Interface to the external PIR cryptographic engine
//!
//! The lattice-based scheme (encryption, request/response encoding,
//! homomorphic lookup) is an external collaborator consumed strictly through
//! these traits. The orchestration layer never inspects cryptographic
//! internals; it only sequences the engine's operations, and every engine
//! failure surfaces as [`crate::Error::Engine`] carrying the engine's own
//! message.

use crate::params::PirParams;
use crate::Result;

/// Factory for per-database client and server handles.
///
/// A handle pair is bound to exactly one database's parameters; handles are
/// never shared across databases.
pub trait PirEngine: Send + Sync {
    /// Construct a client handle from the database parameters and the
    /// service's public parameters for that database.
    fn create_client(
        &self,
        params: &PirParams,
        public_params: &[u8],
    ) -> Result<Box<dyn PirClientHandle>>;

    /// Construct a server handle for one database.
    fn create_server(&self, params: &PirParams) -> Result<Box<dyn PirServerHandle>>;
}

/// Client-side handle: generates encrypted requests and recovers records.
pub trait PirClientHandle: Send {
    /// Produce an encrypted request for the record at `index`. The request
    /// is valid for exactly this handle and this index.
    fn generate_request(&self, index: u64) -> Result<Vec<u8>>;

    /// Recover the plaintext record from an encrypted response. The
    /// response is valid for exactly one prior request.
    fn recover_record(&self, response: &[u8]) -> Result<Vec<u8>>;
}

/// Server-side handle: owns the plaintext database and answers requests.
pub trait PirServerHandle: Send {
    /// Append the next record in ordinal order. All records must be
    /// appended before preprocessing.
    fn append_record(&mut self, record: &[u8]) -> Result<()>;

    /// One-time setup after all records are appended. Potentially expensive
    /// (up to on the order of a minute) and not cancellable once dispatched.
    fn preprocess(&mut self) -> Result<()>;

    /// Public parameters handed to clients. Contains no secret material and
    /// is deterministic for an unchanged server.
    fn public_params(&self) -> Result<Vec<u8>>;

    /// Answer one encrypted request. Not guaranteed reentrant: callers must
    /// serialize calls against a single handle.
    fn handle_request(&mut self, request: &[u8]) -> Result<Vec<u8>>;
}
