//! Rectangular index regions in image coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Radius;

/// A half-open rectangle of cell indices: rows `row..row + rows`,
/// columns `col..col + cols`.
///
/// Regions are expressed in the coordinates of the full image, so the same
/// `Region` identifies the same pixels whether it is applied to the whole
/// raster or to a tile cut out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Region {
    /// First row
    pub row: usize,
    /// First column
    pub col: usize,
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Region {
    pub fn new(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self { row, col, rows, cols }
    }

    /// Region starting at (0, 0) with the given (rows, cols) shape
    pub fn from_shape((rows, cols): (usize, usize)) -> Self {
        Self::new(0, 0, rows, cols)
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// One past the last row
    pub fn row_end(&self) -> usize {
        self.row + self.rows
    }

    /// One past the last column
    pub fn col_end(&self) -> usize {
        self.col + self.cols
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row_end() && col >= self.col && col < self.col_end()
    }

    /// Whether every cell of `other` lies in `self`. An empty region is
    /// contained everywhere.
    pub fn contains_region(&self, other: &Region) -> bool {
        other.is_empty()
            || (other.row >= self.row
                && other.col >= self.col
                && other.row_end() <= self.row_end()
                && other.col_end() <= self.col_end())
    }

    /// Cells shared by both regions (empty when they are disjoint)
    pub fn intersection(&self, other: &Region) -> Region {
        let row = self.row.max(other.row);
        let col = self.col.max(other.col);
        let row_end = self.row_end().min(other.row_end());
        let col_end = self.col_end().min(other.col_end());

        Region::new(
            row,
            col,
            row_end.saturating_sub(row),
            col_end.saturating_sub(col),
        )
    }

    /// Grow the region by `radius` on every side.
    ///
    /// The leading edges stop at index 0; clip the trailing edges with
    /// [`intersection`](Self::intersection) against the image extent.
    pub fn padded(&self, radius: Radius) -> Region {
        let row = self.row.saturating_sub(radius.rows);
        let col = self.col.saturating_sub(radius.cols);
        Region::new(
            row,
            col,
            self.row_end().saturating_add(radius.rows) - row,
            self.col_end().saturating_add(radius.cols) - col,
        )
    }

    /// Convert image coordinates to coordinates relative to the region origin
    pub fn to_local(&self, row: usize, col: usize) -> (usize, usize) {
        (row - self.row, col - self.col)
    }

    /// Iterate over (row, col) in row-major order
    pub fn indices(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let (col, col_end) = (self.col, self.col_end());
        (self.row..self.row_end()).flat_map(move |r| (col..col_end).map(move |c| (r, c)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}]",
            self.row,
            self.row_end(),
            self.col,
            self.col_end()
        )
    }
}
