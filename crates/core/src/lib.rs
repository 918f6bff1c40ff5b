//! # texgis Core
//!
//! Core types and traits for the texgis texture library.
//!
//! This crate provides:
//! - `Raster<T>`: Generic raster grid type
//! - `Region`, `Radius`, `Window`: index rectangles and clipped neighborhoods
//! - `RasterTile<T>`: a raster anchored inside a larger image
//! - `PixelSource` / `Mosaic`: the read side and write side of streamed filters
//! - Algorithm traits for consistent API

pub mod error;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{
    GeoTransform, PixelSource, Radius, Raster, RasterElement, RasterTile, Region, Window,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{
        GeoTransform, PixelSource, Radius, Raster, RasterElement, RasterTile, Region, Window,
    };
    pub use crate::{Algorithm, Mosaic, WindowedFilter};
}

/// Core trait for all algorithms in texgis.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}

/// Output of a region-based filter that can be assembled from disjoint tiles.
pub trait Mosaic: Sized + Send {
    /// An output covering `region`, with every cell set to zero
    fn blank(region: Region) -> Self;

    /// The region of the image this output covers
    fn region(&self) -> Region;

    /// Copy `tile` into the matching cells of `self`.
    ///
    /// Fails with [`Error::RegionOutside`] when `tile` is not fully covered.
    fn paste(&mut self, tile: &Self) -> Result<()>;
}

/// A configured filter that computes each output cell from a square
/// neighborhood of the input.
///
/// `process_region` must only read input cells within [`radius`](Self::radius)
/// of `region`, so a caller may hand it a chip holding just the padded
/// requested region instead of the whole image.
pub trait WindowedFilter<T: RasterElement>: Sync {
    /// Output produced for one region
    type Output: Mosaic;

    /// Half-width of the neighborhood read around every output cell
    fn radius(&self) -> Radius;

    /// Compute the output for `region` (image coordinates)
    fn process_region<S: PixelSource<T>>(&self, input: &S, region: Region) -> Result<Self::Output>;
}
