//! Square neighborhoods clipped to the available image extent

use serde::{Deserialize, Serialize};

use super::Region;

/// Per-axis half-width of a neighborhood.
///
/// The full window spans `2 * rows + 1` rows and `2 * cols + 1` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Radius {
    pub rows: usize,
    pub cols: usize,
}

impl Radius {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Same half-width along both axes
    pub fn square(radius: usize) -> Self {
        Self::new(radius, radius)
    }

    /// Smallest of the two half-widths
    pub fn min(&self) -> usize {
        self.rows.min(self.cols)
    }

    /// Window size as (rows, cols), `None` when it does not fit a `usize`
    pub fn size(&self) -> Option<(usize, usize)> {
        let span = |r: usize| r.checked_mul(2)?.checked_add(1);
        Some((span(self.rows)?, span(self.cols)?))
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::square(1)
    }
}

/// The neighborhood of one output cell.
///
/// A window never extends past the extent it was clipped to: cells near
/// the image edge get a smaller window, and a centre outside the extent
/// gets an empty one. There is no wrap-around or synthetic padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    center: (usize, usize),
    bounds: Region,
}

impl Window {
    /// Window of `radius` centred on (row, col), clipped to `extent`
    pub fn clipped(row: usize, col: usize, radius: Radius, extent: Region) -> Self {
        let bounds = Region::new(row, col, 1, 1)
            .padded(radius)
            .intersection(&extent);
        Self {
            center: (row, col),
            bounds,
        }
    }

    /// Centre cell (row, col)
    pub fn center(&self) -> (usize, usize) {
        self.center
    }

    /// Cells covered by the window
    pub fn bounds(&self) -> Region {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Number of cells in the window
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// The cell at (row + dy, col + dx), if it is still inside the window
    #[inline]
    pub fn offset_within(&self, row: usize, col: usize, dy: isize, dx: isize) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(dy)?;
        let c = col.checked_add_signed(dx)?;
        self.bounds.contains(r, c).then_some((r, c))
    }
}
