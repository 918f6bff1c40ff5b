//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and geographic coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// Tiles cut out of a raster keep the parent's cell size and rotation and
/// only move the origin, see [`GeoTransform::shifted`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    /// Rotation about X axis (usually 0)
    pub row_rotation: f64,
    /// Rotation about Y axis (usually 0)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a new GeoTransform with no rotation (north-up image)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Geographic coordinates of the top-left corner of a pixel
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        let col_f = col as f64;
        let row_f = row as f64;

        let x = self.origin_x + col_f * self.pixel_width + row_f * self.row_rotation;
        let y = self.origin_y + col_f * self.col_rotation + row_f * self.pixel_height;

        (x, y)
    }

    /// Geographic coordinates of the centre of a pixel
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let (x, y) = self.pixel_to_geo_corner(col, row);
        (
            x + 0.5 * (self.pixel_width + self.row_rotation),
            y + 0.5 * (self.col_rotation + self.pixel_height),
        )
    }

    /// Transform of a sub-grid whose top-left pixel is `(row, col)` of this grid
    pub fn shifted(&self, row: usize, col: usize) -> Self {
        let (origin_x, origin_y) = self.pixel_to_geo_corner(col, row);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }

    /// Get the cell size (assumes square pixels and no rotation)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_centre() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
        let (x, y) = gt.pixel_to_geo(5, 10);

        assert_relative_eq!(x, 155.0, epsilon = 1e-10);
        assert_relative_eq!(y, 95.0, epsilon = 1e-10);
    }

    #[test]
    fn test_shifted_keeps_geometry() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
        let sub = gt.shifted(3, 4);

        assert_relative_eq!(sub.origin_x, 140.0, epsilon = 1e-10);
        assert_relative_eq!(sub.origin_y, 170.0, epsilon = 1e-10);
        assert_relative_eq!(sub.cell_size(), 10.0, epsilon = 1e-10);

        // Pixel (0, 0) of the sub-grid is pixel (3, 4) of the parent
        assert_eq!(sub.pixel_to_geo(0, 0), gt.pixel_to_geo(4, 3));
    }
}
