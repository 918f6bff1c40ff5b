//! # texgis Algorithms
//!
//! Texture analysis algorithms for texgis.
//!
//! ## Available Algorithm Categories
//!
//! - **texture**: sliding-window GLCM (Haralick) descriptors and the PanTex
//!   built-up presence index

mod maybe_rayon;
pub mod texture;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::texture::{
        haralick_textures, pantex, CooccurrenceBuilder, HaralickFeature, HaralickTextures,
        Histogram, Offset, PanTex, PanTexFilter, PanTexParams, TextureBands,
        TextureDescriptors, TextureParams, TextureWindowFilter, ValueRange,
    };
    pub use texgis_core::prelude::*;
}
