//! Raster data structures and operations

mod element;
mod geotransform;
mod grid;
mod region;
mod source;
mod tile;
mod window;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
pub use region::Region;
pub use source::PixelSource;
pub use tile::RasterTile;
pub use window::{Radius, Window};
