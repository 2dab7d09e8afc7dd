//! Service configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::params::PirParams;

/// Configuration for the reverse-geocode service: database file locations
/// and shapes. Built once at startup and carried inside the service context
/// rather than held as process globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Flat binary file mapping grid cell -> segment identifier.
    pub segment_db: PathBuf,
    /// Flat binary file mapping segment identifier -> street name.
    pub street_db: PathBuf,
    #[serde(default = "default_segment_rows")]
    pub segment_rows: u32,
    #[serde(default = "default_segment_cols")]
    pub segment_cols: u32,
    #[serde(default = "default_segment_record_size")]
    pub segment_record_size: u32,
    #[serde(default = "default_street_rows")]
    pub street_rows: u32,
    #[serde(default = "default_street_cols")]
    pub street_cols: u32,
    #[serde(default = "default_street_record_size")]
    pub street_record_size: u32,
}

fn default_segment_rows() -> u32 {
    constants::SEGMENT_DB_ROWS
}
fn default_segment_cols() -> u32 {
    constants::SEGMENT_DB_COLS
}
fn default_segment_record_size() -> u32 {
    constants::SEGMENT_RECORD_SIZE as u32
}
fn default_street_rows() -> u32 {
    constants::STREET_DB_ROWS
}
fn default_street_cols() -> u32 {
    constants::STREET_DB_COLS
}
fn default_street_record_size() -> u32 {
    constants::STREET_RECORD_SIZE as u32
}

impl ServiceConfig {
    /// Configuration for the standard file layout under `base_dir`:
    ///
    /// ```text
    /// base_dir/
    ///   beijing_grid_to_id.bin
    ///   street_names.bin
    /// ```
    pub fn from_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base = base_dir.into();
        Self {
            segment_db: base.join("beijing_grid_to_id.bin"),
            street_db: base.join("street_names.bin"),
            segment_rows: default_segment_rows(),
            segment_cols: default_segment_cols(),
            segment_record_size: default_segment_record_size(),
            street_rows: default_street_rows(),
            street_cols: default_street_cols(),
            street_record_size: default_street_record_size(),
        }
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    pub fn segment_params(&self) -> PirParams {
        PirParams::for_database(self.segment_rows, self.segment_cols, self.segment_record_size)
    }

    pub fn street_params(&self) -> PirParams {
        PirParams::for_database(self.street_rows, self.street_cols, self.street_record_size)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_base_dir("./data/database")
    }
}
