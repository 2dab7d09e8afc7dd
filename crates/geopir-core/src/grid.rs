//! Coordinate-to-grid-index mapping
//!
//! The geographic bounding box is discretized into a rows x cols grid,
//! indexed row-major. One grid cell maps to exactly one index; nearby
//! coordinates quantize to the same cell.

use crate::error::Error;
use crate::Result;

/// A fixed geographic bounding box and its grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub rows: u64,
    pub cols: u64,
}

impl GridBounds {
    /// The Beijing service area: 256x256 cells.
    pub const BEIJING: GridBounds = GridBounds {
        lat_min: 39.84,
        lat_max: 39.99,
        lon_min: 116.28,
        lon_max: 116.48,
        rows: 256,
        cols: 256,
    };

    pub fn lat_step(&self) -> f64 {
        (self.lat_max - self.lat_min) / self.rows as f64
    }

    pub fn lon_step(&self) -> f64 {
        (self.lon_max - self.lon_min) / self.cols as f64
    }

    /// Total number of grid cells.
    pub fn cell_count(&self) -> u64 {
        self.rows * self.cols
    }

    /// Map a coordinate to its row-major grid index.
    ///
    /// Coordinates outside the bounding box (inclusive on both edges) are
    /// rejected. Row and column are clamped to the last cell so that the
    /// exact upper boundary does not overflow past the grid.
    pub fn to_index(&self, lat: f64, lon: f64) -> Result<u64> {
        if !(self.lat_min..=self.lat_max).contains(&lat)
            || !(self.lon_min..=self.lon_max).contains(&lon)
        {
            return Err(Error::OutOfBounds {
                lat,
                lon,
                lat_min: self.lat_min,
                lat_max: self.lat_max,
                lon_min: self.lon_min,
                lon_max: self.lon_max,
            });
        }

        let row = (((lat - self.lat_min) / self.lat_step()) as u64).min(self.rows - 1);
        let col = (((lon - self.lon_min) / self.lon_step()) as u64).min(self.cols - 1);

        Ok(row * self.cols + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEIJING: GridBounds = GridBounds::BEIJING;

    #[test]
    fn test_lower_left_corner_is_index_zero() {
        assert_eq!(BEIJING.to_index(39.84, 116.28).unwrap(), 0);
    }

    #[test]
    fn test_upper_right_corner_clamps_to_last_cell() {
        // Exactly at LAT_MAX/LON_MAX: row and col clamp to 255, not 256.
        assert_eq!(BEIJING.to_index(39.99, 116.48).unwrap(), 65535);
    }

    #[test]
    fn test_upper_boundary_single_axis_clamps() {
        let idx = BEIJING.to_index(39.99, 116.28).unwrap();
        assert_eq!(idx, 255 * 256);

        let idx = BEIJING.to_index(39.84, 116.48).unwrap();
        assert_eq!(idx, 255);
    }

    #[test]
    fn test_interior_coordinate_in_range() {
        let idx = BEIJING.to_index(39.9075, 116.3974).unwrap();
        assert!(idx < BEIJING.cell_count());

        let row = ((39.9075 - BEIJING.lat_min) / BEIJING.lat_step()) as u64;
        let col = ((116.3974 - BEIJING.lon_min) / BEIJING.lon_step()) as u64;
        assert_eq!(idx, row * 256 + col);
    }

    #[test]
    fn test_latitude_out_of_bounds() {
        assert!(matches!(
            BEIJING.to_index(40.0, 116.3),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(BEIJING.to_index(39.83, 116.3).is_err());
    }

    #[test]
    fn test_longitude_out_of_bounds() {
        assert!(BEIJING.to_index(39.9, 116.27).is_err());
        assert!(BEIJING.to_index(39.9, 116.49).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(BEIJING.to_index(f64::NAN, 116.3).is_err());
        assert!(BEIJING.to_index(39.9, f64::NAN).is_err());
    }

    #[test]
    fn test_deterministic() {
        let a = BEIJING.to_index(39.92, 116.40).unwrap();
        let b = BEIJING.to_index(39.92, 116.40).unwrap();
        assert_eq!(a, b);
    }
}
