//! Joint (co-occurrence) histogram of quantized gray levels

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use texgis_core::raster::{Raster, RasterElement};
use texgis_core::{Error, Result};

/// Value interval mapped linearly onto histogram bins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Range `[min, max]`; both ends and the width must be finite and `min < max`
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::invalid_parameter(
                "input_min/input_max",
                format!("[{}, {}]", min, max),
                "range bounds must be finite",
            ));
        }
        if min >= max {
            return Err(Error::invalid_parameter(
                "input_min/input_max",
                format!("[{}, {}]", min, max),
                "input minimum must be strictly below input maximum",
            ));
        }
        if !(max - min).is_finite() {
            return Err(Error::invalid_parameter(
                "input_min/input_max",
                format!("[{}, {}]", min, max),
                "range width must be finite",
            ));
        }
        Ok(Self { min, max })
    }

    /// Range spanned by the valid cells of `raster`
    pub fn from_raster<T: RasterElement>(raster: &Raster<T>) -> Result<Self> {
        let stats = raster.statistics();
        match (stats.min, stats.max) {
            (Some(min), Some(max)) if min < max => Self::new(min, max),
            _ => Err(Error::Algorithm("Raster has no value range for GLCM".into())),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Bin of `value` among `bins` equal-width bins.
    ///
    /// Values below the range land in bin 0, values at or above `max` in
    /// the last bin.
    #[inline]
    pub fn bin(&self, value: f64, bins: usize) -> usize {
        let scaled = (value - self.min) / (self.max - self.min) * bins as f64;
        // float -> usize casts saturate, negatives become 0
        (scaled.floor() as usize).min(bins - 1)
    }
}

/// Normalized co-occurrence histogram over `B x B` bins.
///
/// Cell `(i, j)` holds the fraction of sampled pixel pairs whose first
/// value fell in bin `i` and second in bin `j`. Both orderings of every
/// pair are counted, so the table is symmetric. An empty window yields an
/// all-zero table whose [`total`](Self::total) is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    cells: Array2<f64>,
    range: ValueRange,
}

impl Histogram {
    pub(crate) fn zeros(bins: usize, range: ValueRange) -> Self {
        Self {
            cells: Array2::zeros((bins, bins)),
            range,
        }
    }

    /// Count the pair `(i, j)` in both orders
    #[inline]
    pub(crate) fn accumulate_pair(&mut self, i: usize, j: usize) {
        self.cells[(i, j)] += 1.0;
        self.cells[(j, i)] += 1.0;
    }

    /// Turn counts into frequencies. An all-zero table is left as is.
    pub(crate) fn normalize(&mut self) {
        let total = self.cells.sum();
        if total > 0.0 {
            self.cells.mapv_inplace(|c| c / total);
        }
    }

    /// Number of bins per axis
    pub fn bin_count(&self) -> usize {
        self.cells.nrows()
    }

    /// Value range used for quantization
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Frequency of bin pair (i, j)
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get((i, j)).copied()
    }

    pub fn cells(&self) -> ArrayView2<'_, f64> {
        self.cells.view()
    }

    /// Sum of all cells: 1 after normalization, 0 for an empty window
    pub fn total(&self) -> f64 {
        self.cells.sum()
    }

    /// Whether no pair was sampled
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0.0)
    }

    /// Row sums `t(i) = sum_j g(i, j)`; equal to the column sums by symmetry
    pub fn marginal(&self) -> Vec<f64> {
        self.cells.rows().into_iter().map(|row| row.sum()).collect()
    }

    /// Iterate over (i, j, g(i, j)) for non-zero cells
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells
            .indexed_iter()
            .filter(|&(_, &g)| g > 0.0)
            .map(|((i, j), &g)| (i, j, g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_range_validation() {
        assert!(ValueRange::new(0.0, 10.0).is_ok());
        assert!(matches!(
            ValueRange::new(5.0, 5.0),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(ValueRange::new(10.0, 0.0).is_err());
        assert!(ValueRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_range_width_must_be_finite() {
        assert!(matches!(
            ValueRange::new(-f64::MAX, f64::MAX),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(ValueRange::new(-f64::MAX / 2.0, f64::MAX / 2.0).is_ok());

        let huge = Raster::from_vec(vec![-f64::MAX, 0.0, f64::MAX, 1.0], 2, 2).unwrap();
        assert!(ValueRange::from_raster(&huge).is_err());
    }

    #[test]
    fn test_bin_edges() {
        let range = ValueRange::new(0.0, 10.0).unwrap();
        assert_eq!(range.bin(0.0, 2), 0);
        assert_eq!(range.bin(4.999, 2), 0);
        assert_eq!(range.bin(5.0, 2), 1);
        assert_eq!(range.bin(10.0, 2), 1);
        // Out of range values are clamped
        assert_eq!(range.bin(-3.0, 2), 0);
        assert_eq!(range.bin(1e9, 2), 1);
        assert_eq!(range.bin(7.0, 1), 0);
    }

    #[test]
    fn test_range_from_raster() {
        let raster = Raster::from_vec(vec![3u8, 9, 4, 7], 2, 2).unwrap();
        let range = ValueRange::from_raster(&raster).unwrap();
        assert_eq!(range.min(), 3.0);
        assert_eq!(range.max(), 9.0);

        let flat: Raster<f64> = Raster::filled(3, 3, 1.0);
        assert!(matches!(ValueRange::from_raster(&flat), Err(Error::Algorithm(_))));
    }

    #[test]
    fn test_accumulate_and_normalize() {
        let range = ValueRange::new(0.0, 1.0).unwrap();
        let mut h = Histogram::zeros(3, range);
        h.accumulate_pair(0, 2);
        h.accumulate_pair(1, 1);
        h.normalize();

        assert_relative_eq!(h.total(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(h.get(0, 2).unwrap(), 0.25);
        assert_relative_eq!(h.get(2, 0).unwrap(), 0.25);
        assert_relative_eq!(h.get(1, 1).unwrap(), 0.5);
        assert_eq!(h.marginal(), vec![0.25, 0.5, 0.25]);
        assert_eq!(h.iter_nonzero().count(), 3);
    }

    #[test]
    fn test_empty_stays_zero() {
        let mut h = Histogram::zeros(4, ValueRange::new(0.0, 1.0).unwrap());
        h.normalize();
        assert!(h.is_empty());
        assert_eq!(h.total(), 0.0);
        assert_eq!(h.bin_count(), 4);
    }
}
