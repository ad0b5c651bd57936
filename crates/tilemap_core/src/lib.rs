//! Core data structures for tilemap autotiling
//!
//! This crate provides the plain data shared between the autotiler and the
//! editor/renderer that drives it:
//! - `Tileset` - Tile id to image and pixel-size table (atlas or image collection)
//! - `TerrainGrid` - Logical per-cell terrain assignments
//! - `GridRect` - A rectangle of cells

mod grid;
mod tileset;

pub use grid::{GridRect, TerrainGrid, TerrainId};
pub use tileset::{TileImage, Tileset, TilesetImage};
