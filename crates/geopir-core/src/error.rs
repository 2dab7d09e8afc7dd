//! Error types for geopir-core

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database file not found: {0:?}")]
    DatabaseNotFound(PathBuf),

    #[error("Database size mismatch for {path:?}: expected {expected} bytes, found {actual}")]
    DatabaseSize {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error(
        "Coordinate ({lat}, {lon}) out of bounds: valid range lat [{lat_min}, {lat_max}], lon [{lon_min}, {lon_max}]"
    )]
    OutOfBounds {
        lat: f64,
        lon: f64,
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    },

    #[error("Parameter mismatch: {field} - expected {expected}, got {actual}")]
    ParamsMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("PIR engine error: {0}")]
    Engine(String),

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Index out of range: {index} >= {max}")]
    IndexOutOfRange { index: u64, max: u64 },
}
