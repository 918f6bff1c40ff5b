//! Building co-occurrence histograms from clipped windows

use serde::{Deserialize, Serialize};
use std::fmt;
use texgis_core::raster::{PixelSource, RasterElement, Window};
use texgis_core::{Error, Result};

use super::histogram::{Histogram, ValueRange};

/// Displacement between the two pixels of a co-occurring pair.
///
/// `dx` moves along columns (positive to the east), `dy` along rows
/// (positive to the south).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: isize,
    pub dy: isize,
}

impl Offset {
    pub const fn new(dx: isize, dy: isize) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Unit offsets at 0°, 45°, ..., 315°, counter-clockwise from east
    pub const COMPASS: [Offset; 8] = [
        Offset::new(1, 0),
        Offset::new(1, -1),
        Offset::new(0, -1),
        Offset::new(-1, -1),
        Offset::new(-1, 0),
        Offset::new(-1, 1),
        Offset::new(0, 1),
        Offset::new(1, 1),
    ];
}

impl Default for Offset {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// Builds the normalized co-occurrence histogram of one window.
///
/// Every pixel `p` of the window whose partner `p + offset` also lies in
/// the window contributes one pair, counted in both orders. Pairs leaving
/// the window are skipped, and so are pairs where either pixel is no-data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooccurrenceBuilder {
    offset: Offset,
    range: ValueRange,
    bins: usize,
}

impl CooccurrenceBuilder {
    pub fn new(offset: Offset, range: ValueRange, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::invalid_parameter(
                "bins_per_axis",
                bins,
                "histogram needs at least one bin per axis",
            ));
        }
        if offset.is_zero() {
            return Err(Error::invalid_parameter(
                "offset",
                offset,
                "co-occurrence offset must be non-zero",
            ));
        }
        Ok(Self { offset, range, bins })
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Histogram of the pairs inside `window`, sampled from `source`.
    ///
    /// Never fails: a window without any valid pair gives an all-zero
    /// histogram.
    pub fn build<T, S>(&self, source: &S, window: &Window) -> Histogram
    where
        T: RasterElement,
        S: PixelSource<T> + ?Sized,
    {
        let mut histogram = Histogram::zeros(self.bins, self.range);
        let Offset { dx, dy } = self.offset;

        for (row, col) in window.bounds().indices() {
            let Some((r2, c2)) = window.offset_within(row, col, dy, dx) else {
                continue;
            };
            let (Some(a), Some(b)) = (source.sample(row, col), source.sample(r2, c2)) else {
                continue;
            };
            histogram.accumulate_pair(self.range.bin(a, self.bins), self.range.bin(b, self.bins));
        }

        histogram.normalize();
        histogram
    }
}
