//! Fixed-record flat-file database loading
//!
//! Databases are headerless flat binary files keyed by position: the record
//! at ordinal `i` lives at byte offset `i * record_size`. They are read once
//! at startup and handed to the PIR server builder in ordinal order.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Error;
use crate::Result;

/// Load a flat file of `record_count` records of `record_size` bytes each.
///
/// A missing file is reported as [`Error::DatabaseNotFound`]. The file
/// length must equal `record_size * record_count` exactly; a short or long
/// file is a hard error rather than a silent truncation.
pub fn load_fixed_records(
    path: &Path,
    record_size: usize,
    record_count: usize,
) -> Result<Vec<Vec<u8>>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::DatabaseNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let expected = record_size as u64 * record_count as u64;
    if bytes.len() as u64 != expected {
        return Err(Error::DatabaseSize {
            path: path.to_path_buf(),
            expected,
            actual: bytes.len() as u64,
        });
    }

    Ok(bytes.chunks_exact(record_size).map(<[u8]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("geopir-db-test-{}", name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_records_in_ordinal_order() {
        let path = temp_file("ordinal.bin", &[0, 1, 2, 3, 4, 5]);
        let records = load_fixed_records(&path, 2, 3).unwrap();
        assert_eq!(records, vec![vec![0, 1], vec![2, 3], vec![4, 5]]);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("geopir-db-test-does-not-exist.bin");
        assert!(matches!(
            load_fixed_records(&path, 2, 3),
            Err(Error::DatabaseNotFound(_))
        ));
    }

    #[test]
    fn test_short_file_is_hard_error() {
        let path = temp_file("short.bin", &[0, 1, 2, 3]);
        assert!(matches!(
            load_fixed_records(&path, 2, 3),
            Err(Error::DatabaseSize {
                expected: 6,
                actual: 4,
                ..
            })
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_long_file_is_hard_error() {
        let path = temp_file("long.bin", &[0; 8]);
        assert!(matches!(
            load_fixed_records(&path, 2, 3),
            Err(Error::DatabaseSize { .. })
        ));
        let _ = fs::remove_file(path);
    }
}
