//! Tiled, streamed processing for rasters too large to hold at once

use texgis_core::raster::{PixelSource, Radius, RasterElement, Region};
use texgis_core::{Error, Mosaic, Result, WindowedFilter};
use tracing::{debug, info, trace};

use crate::strategy::{ParallelStrategy, ProcessingMode};

/// Iterator over disjoint tiles covering an extent, row by row.
///
/// Tiles on the right and bottom edges are cut to the extent.
pub struct TileIterator {
    extent: Region,
    tile_rows: usize,
    tile_cols: usize,
    current_row: usize,
    current_col: usize,
}

impl TileIterator {
    pub fn new(extent: Region, tile_rows: usize, tile_cols: usize) -> Self {
        Self {
            extent,
            tile_rows: tile_rows.max(1),
            tile_cols: tile_cols.max(1),
            current_row: extent.row,
            current_col: extent.col,
        }
    }
}

impl Iterator for TileIterator {
    type Item = Region;

    fn next(&mut self) -> Option<Self::Item> {
        if self.extent.is_empty() || self.current_row >= self.extent.row_end() {
            return None;
        }

        let rows = self.tile_rows.min(self.extent.row_end() - self.current_row);
        let cols = self.tile_cols.min(self.extent.col_end() - self.current_col);
        let tile = Region::new(self.current_row, self.current_col, rows, cols);

        // Move to next tile
        self.current_col += self.tile_cols;
        if self.current_col >= self.extent.col_end() {
            self.current_col = self.extent.col;
            self.current_row += self.tile_rows;
        }

        Some(tile)
    }
}

/// Drives a [`WindowedFilter`] over an image one output tile at a time.
///
/// For every tile only the padded input region (the tile grown by the
/// filter radius, clipped to the image) is read from the source. Tiles are
/// computed in batches of one tile per worker, so memory stays bounded by
/// the batch whatever the image size. The whole run, per-pixel loops
/// included, stays on the thread pool of the configured [`ProcessingMode`].
#[derive(Debug, Clone)]
pub struct StreamingProcessor {
    tile_rows: usize,
    tile_cols: usize,
    mode: ProcessingMode,
}

impl StreamingProcessor {
    /// Processor producing tiles of at most `tile_rows` x `tile_cols` cells
    pub fn new(tile_rows: usize, tile_cols: usize) -> Result<Self> {
        if tile_rows == 0 || tile_cols == 0 {
            return Err(Error::invalid_parameter(
                "tile_size",
                format!("{}x{}", tile_rows, tile_cols),
                "tiles must hold at least one cell",
            ));
        }
        Ok(Self {
            tile_rows,
            tile_cols,
            mode: ProcessingMode::default(),
        })
    }

    /// Default processor with 256x256 tiles on all cores
    pub fn default_for_texture() -> Self {
        Self {
            tile_rows: 256,
            tile_cols: 256,
            mode: ProcessingMode::Parallel,
        }
    }

    /// Same processor running in `mode`
    pub fn with_mode(self, mode: ProcessingMode) -> Self {
        Self { mode, ..self }
    }

    /// Output tiles covering `extent`
    pub fn tiles(&self, extent: Region) -> TileIterator {
        TileIterator::new(extent, self.tile_rows, self.tile_cols)
    }

    /// Input cells needed to compute `tile` with a filter of `radius`
    pub fn input_region(tile: Region, radius: Radius, extent: Region) -> Region {
        tile.padded(radius).intersection(&extent)
    }

    /// Compute every tile of the source extent and hand each result to
    /// `sink`, in tile order.
    pub fn for_each_tile<T, S, F, K>(&self, source: &S, filter: &F, mut sink: K) -> Result<()>
    where
        T: RasterElement,
        S: PixelSource<T>,
        F: WindowedFilter<T>,
        K: FnMut(F::Output) -> Result<()>,
    {
        let extent = source.extent();
        let radius = filter.radius();
        let tiles: Vec<Region> = self.tiles(extent).collect();
        let executor = self.mode.executor()?;
        let batch = executor.threads();

        info!(%extent, tiles = tiles.len(), batch, "streaming filter over tiles");

        for chunk in tiles.chunks(batch) {
            let outputs = executor.par_map(0..chunk.len(), |i| {
                let tile = chunk[i];
                let padded = Self::input_region(tile, radius, extent);
                trace!(%tile, %padded, "processing tile");

                let chip = source.read_region(padded)?;
                filter.process_region(&chip, tile)
            })?;

            for output in outputs {
                sink(output?)?;
            }
            debug!(tiles = chunk.len(), "batch done");
        }
        Ok(())
    }

    /// Compute the whole source extent tile by tile and assemble the result
    pub fn process<T, S, F>(&self, source: &S, filter: &F) -> Result<F::Output>
    where
        T: RasterElement,
        S: PixelSource<T>,
        F: WindowedFilter<T>,
    {
        let mut mosaic = F::Output::blank(source.extent());
        self.for_each_tile(source, filter, |tile| mosaic.paste(&tile))?;
        Ok(mosaic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_are_disjoint_and_cover_extent() {
        let extent = Region::new(3, 5, 100, 70);
        let mut covered = vec![vec![0u8; 70]; 100];

        for tile in TileIterator::new(extent, 32, 24) {
            assert!(extent.contains_region(&tile));
            for (r, c) in tile.indices() {
                covered[r - 3][c - 5] += 1;
            }
        }

        for r in 0..100 {
            for c in 0..70 {
                assert_eq!(covered[r][c], 1, "Cell ({}, {}) covered {} times", r, c, covered[r][c]);
            }
        }
    }

    #[test]
    fn test_tile_count() {
        let tiles: Vec<_> = TileIterator::new(Region::from_shape((100, 100)), 32, 32).collect();
        assert_eq!(tiles.len(), 16);
        assert_eq!(tiles[0], Region::new(0, 0, 32, 32));
        assert_eq!(tiles[15], Region::new(96, 96, 4, 4));
    }

    #[test]
    fn test_empty_extent_has_no_tiles() {
        assert_eq!(TileIterator::new(Region::new(4, 4, 0, 10), 8, 8).count(), 0);
    }

    #[test]
    fn test_input_region_is_clipped() {
        let extent = Region::from_shape((50, 50));
        let padded = StreamingProcessor::input_region(Region::new(0, 40, 10, 10), Radius::new(2, 3), extent);
        assert_eq!(padded, Region::new(0, 37, 12, 13));
    }

    #[test]
    fn test_rejects_empty_tiles() {
        assert!(StreamingProcessor::new(0, 16).is_err());
        assert!(StreamingProcessor::new(16, 16).is_ok());
    }
}
