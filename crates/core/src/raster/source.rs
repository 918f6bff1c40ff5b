//! Read-only random access to raster samples

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement, RasterTile, Region};

/// Read-only pixel access in image coordinates.
///
/// A source only answers for the cells of its [`extent`](Self::extent):
/// a whole raster, or a tile holding the padded region a streaming
/// pipeline requested. Sources are shared by all worker threads and are
/// never written through this trait.
pub trait PixelSource<T: RasterElement>: Sync {
    /// Cells that can be read
    fn extent(&self) -> Region;

    /// Raw value at (row, col), `None` outside the extent
    fn pixel(&self, row: usize, col: usize) -> Option<T>;

    /// No-data value of the source
    fn nodata(&self) -> Option<T>;

    /// Value at (row, col) as a finite `f64`.
    ///
    /// `None` outside the extent and for no-data, NaN or infinite values.
    #[inline]
    fn sample(&self, row: usize, col: usize) -> Option<f64> {
        self.pixel(row, col)?.to_sample(self.nodata())
    }

    /// Copy `region` into an owned tile.
    ///
    /// This is how a streaming pipeline pulls just the padded input region
    /// of one output tile instead of the whole image.
    fn read_region(&self, region: Region) -> Result<RasterTile<T>> {
        let extent = self.extent();
        if !extent.contains_region(&region) {
            return Err(Error::RegionOutside { region, extent });
        }

        let mut data = Vec::with_capacity(region.len());
        for (row, col) in region.indices() {
            let value = self.pixel(row, col).ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: extent.row_end(),
                cols: extent.col_end(),
            })?;
            data.push(value);
        }

        let array = Array2::from_shape_vec(region.shape(), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        let mut raster = Raster::from_array(array);
        raster.set_nodata(self.nodata());
        RasterTile::new(region.row, region.col, raster)
    }
}

impl<T: RasterElement> PixelSource<T> for Raster<T> {
    fn extent(&self) -> Region {
        Raster::extent(self)
    }

    #[inline]
    fn pixel(&self, row: usize, col: usize) -> Option<T> {
        self.data().get((row, col)).copied()
    }

    fn nodata(&self) -> Option<T> {
        Raster::nodata(self)
    }

    fn read_region(&self, region: Region) -> Result<RasterTile<T>> {
        self.crop(region)
    }
}

impl<T: RasterElement> PixelSource<T> for RasterTile<T> {
    fn extent(&self) -> Region {
        self.region()
    }

    #[inline]
    fn pixel(&self, row: usize, col: usize) -> Option<T> {
        let region = self.region();
        if !region.contains(row, col) {
            return None;
        }
        let (r, c) = region.to_local(row, col);
        self.raster().data().get((r, c)).copied()
    }

    fn nodata(&self) -> Option<T> {
        self.raster().nodata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rows: usize, cols: usize) -> Raster<f32> {
        let data = (0..rows * cols).map(|v| v as f32).collect();
        Raster::from_vec(data, rows, cols).unwrap()
    }

    #[test]
    fn test_sample_outside_extent() {
        let r = ramp(3, 3);
        assert_eq!(r.sample(2, 2), Some(8.0));
        assert_eq!(r.sample(3, 0), None);
    }

    #[test]
    fn test_sample_nodata() {
        let mut r = ramp(3, 3);
        r.set_nodata(Some(4.0));
        assert_eq!(r.sample(1, 1), None);
        r.set(0, 0, f32::NAN).unwrap();
        assert_eq!(r.sample(0, 0), None);
    }

    #[test]
    fn test_tile_source_uses_image_coordinates() {
        let r = ramp(6, 6);
        let tile = r.read_region(Region::new(2, 3, 3, 2)).unwrap();

        assert_eq!(tile.extent(), Region::new(2, 3, 3, 2));
        assert_eq!(tile.sample(2, 3), r.sample(2, 3));
        assert_eq!(tile.sample(4, 4), Some(28.0));
        assert_eq!(tile.sample(1, 3), None);
    }

    #[test]
    fn test_default_read_region_from_tile() {
        let r = ramp(6, 6);
        let tile = r.read_region(Region::new(1, 1, 4, 4)).unwrap();
        let inner = tile.read_region(Region::new(2, 2, 2, 2)).unwrap();

        assert_eq!(inner.get(3, 3).unwrap(), 21.0);
        assert!(tile.read_region(Region::new(0, 0, 2, 2)).is_err());
    }
}
