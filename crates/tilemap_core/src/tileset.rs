//! Tileset descriptors with atlas and image-collection support

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single atlas image within a tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetImage {
    pub name: String,
    /// Path to the image file (relative to the assets directory)
    pub source: String,
    pub columns: u32,
    pub rows: u32,
}

impl TilesetImage {
    pub fn new(name: String, source: String, columns: u32, rows: u32) -> Self {
        Self {
            name,
            source,
            columns,
            rows,
        }
    }

    /// Total number of tiles in this image
    pub fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }
}

/// A tile with its own image (image-collection tilesets)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileImage {
    pub source: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Tileset descriptor, owned by the asset layer and read-only to the autotiler.
///
/// Tiles come either from atlas images, which are sliced into a grid of
/// `tile_width` x `tile_height` cells and numbered consecutively across images,
/// or from per-tile images keyed by an explicit tile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    pub name: String,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Atlas images, numbered in order
    #[serde(default)]
    pub images: Vec<TilesetImage>,
    /// Per-tile images for image-collection tilesets
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tiles: BTreeMap<u32, TileImage>,
}

impl Tileset {
    /// Create a tileset backed by a single atlas image
    pub fn new_atlas(
        name: String,
        source: String,
        tile_width: u32,
        tile_height: u32,
        columns: u32,
        rows: u32,
    ) -> Self {
        let image = TilesetImage::new("Main".to_string(), source, columns, rows);
        Self {
            name,
            tile_width,
            tile_height,
            images: vec![image],
            tiles: BTreeMap::new(),
        }
    }

    /// Create an empty image-collection tileset
    pub fn new_collection(name: String, tile_width: u32, tile_height: u32) -> Self {
        Self {
            name,
            tile_width,
            tile_height,
            images: Vec::new(),
            tiles: BTreeMap::new(),
        }
    }

    /// Add an atlas image; its tiles are numbered after the existing atlas tiles
    pub fn add_image(&mut self, name: String, source: String, columns: u32, rows: u32) {
        self.images.push(TilesetImage::new(name, source, columns, rows));
    }

    /// Add or replace a per-tile image
    pub fn add_tile(&mut self, tile_id: u32, source: String, width: u32, height: u32) {
        self.tiles.insert(
            tile_id,
            TileImage {
                source,
                width,
                height,
            },
        );
    }

    fn atlas_tile_count(&self) -> u32 {
        self.images.iter().map(|img| img.tile_count()).sum()
    }

    /// Total number of tiles across atlas images and per-tile images
    pub fn tile_count(&self) -> u32 {
        self.atlas_tile_count() + self.tiles.len() as u32
    }

    /// Check whether a tile id exists in this tileset
    pub fn contains_tile(&self, tile_id: u32) -> bool {
        self.tiles.contains_key(&tile_id) || tile_id < self.atlas_tile_count()
    }

    /// Convert an atlas tile id to (image_index, local_tile_index)
    pub fn virtual_to_local(&self, tile_id: u32) -> Option<(usize, u32)> {
        let mut offset = 0u32;
        for (img_idx, image) in self.images.iter().enumerate() {
            let tile_count = image.tile_count();
            if tile_id < offset + tile_count {
                return Some((img_idx, tile_id - offset));
            }
            offset += tile_count;
        }
        None
    }

    /// Convert a local tile index to (column, row) within an atlas image
    pub fn local_to_grid(&self, image_index: usize, local_index: u32) -> Option<(u32, u32)> {
        let image = self.images.get(image_index)?;
        if local_index >= image.tile_count() {
            return None;
        }
        Some((local_index % image.columns, local_index / image.columns))
    }

    /// Pixel size of a tile: its own image size for collection tiles,
    /// the grid cell size for atlas tiles
    pub fn tile_size(&self, tile_id: u32) -> Option<(u32, u32)> {
        if let Some(tile) = self.tiles.get(&tile_id) {
            return Some((tile.width, tile.height));
        }
        self.virtual_to_local(tile_id)
            .map(|_| (self.tile_width, self.tile_height))
    }

    /// Image source a renderer needs to draw this tile
    pub fn tile_source(&self, tile_id: u32) -> Option<&str> {
        if let Some(tile) = self.tiles.get(&tile_id) {
            return Some(&tile.source);
        }
        let (img_idx, _) = self.virtual_to_local(tile_id)?;
        Some(&self.images[img_idx].source)
    }
}
