//! # texgis Parallel
//!
//! Streamed, tiled and parallel execution of window filters.
//!
//! This crate provides:
//! - Splitting an image extent into disjoint output tiles
//! - Reading only the padded input region each tile needs
//! - Row- or tile-parallel execution using Rayon

#[cfg(feature = "parallel")]
pub mod strategy;
#[cfg(feature = "parallel")]
pub mod tiled;

#[cfg(feature = "parallel")]
pub use strategy::{Executor, ParallelStrategy, ProcessingMode};
#[cfg(feature = "parallel")]
pub use tiled::{StreamingProcessor, TileIterator};
