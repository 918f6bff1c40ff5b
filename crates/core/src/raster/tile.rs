//! Rasters anchored inside a larger image

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement, Region};
use crate::Mosaic;
use ndarray::s;

/// A raster holding only the cells of `region` of some larger image.
///
/// All accessors take image coordinates. Tiles are what a streaming
/// pipeline reads (the padded input chip) and what a filter writes (one
/// output band for one requested region).
#[derive(Debug, Clone)]
pub struct RasterTile<T: RasterElement> {
    region: Region,
    raster: Raster<T>,
}

impl<T: RasterElement> RasterTile<T> {
    /// Anchor `raster` with its top-left cell at (row, col) of the image
    pub fn new(row: usize, col: usize, raster: Raster<T>) -> Result<Self> {
        let (rows, cols) = raster.shape();
        let region = Region::new(row, col, rows, cols);
        // Region ends must stay representable
        if row.checked_add(rows).is_none() || col.checked_add(cols).is_none() {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        Ok(Self { region, raster })
    }

    /// A zero-filled tile covering `region`
    pub fn zeros(region: Region) -> Self {
        Self {
            region,
            raster: Raster::new(region.rows, region.cols),
        }
    }

    /// Cells of the image held by this tile
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn raster(&self) -> &Raster<T> {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut Raster<T> {
        &mut self.raster
    }

    pub fn into_raster(self) -> Raster<T> {
        self.raster
    }

    /// Value at image coordinates (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let (r, c) = self.local(row, col)?;
        self.raster.get(r, c)
    }

    /// Set the value at image coordinates (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (r, c) = self.local(row, col)?;
        self.raster.set(r, c, value)
    }

    fn local(&self, row: usize, col: usize) -> Result<(usize, usize)> {
        if !self.region.contains(row, col) {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.region.row_end(),
                cols: self.region.col_end(),
            });
        }
        Ok(self.region.to_local(row, col))
    }
}

impl<T: RasterElement> Mosaic for RasterTile<T> {
    fn blank(region: Region) -> Self {
        Self::zeros(region)
    }

    fn region(&self) -> Region {
        self.region
    }

    fn paste(&mut self, tile: &Self) -> Result<()> {
        let src = tile.region;
        if !self.region.contains_region(&src) {
            return Err(Error::RegionOutside {
                region: src,
                extent: self.region,
            });
        }
        if src.is_empty() {
            return Ok(());
        }

        let (r0, c0) = self.region.to_local(src.row, src.col);
        self.raster
            .data_mut()
            .slice_mut(s![r0..r0 + src.rows, c0..c0 + src.cols])
            .assign(tile.raster.data());
        Ok(())
    }
}
