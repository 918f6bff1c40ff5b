//! Texture and feature extraction algorithms
//!
//! - **GLCM**: co-occurrence histograms built over a sliding window
//! - **Haralick**: eight texture descriptors per window, written to eight bands
//! - **PanTex**: minimum contrast over eight directions (built-up presence index)

mod bands;
mod cooccurrence;
mod filter;
mod haralick;
mod histogram;
mod pantex;

pub use bands::TextureBands;
pub use cooccurrence::{CooccurrenceBuilder, Offset};
pub use filter::{haralick_textures, HaralickTextures, TextureParams, TextureWindowFilter};
pub use haralick::{haralick_coefficients, inertia, HaralickFeature, TextureDescriptors};
pub use histogram::{Histogram, ValueRange};
pub use pantex::{pantex, PanTex, PanTexFilter, PanTexParams};
