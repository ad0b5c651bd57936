//! Wang set definitions as supplied by the asset loader
//!
//! These are the raw, unvalidated records. [`Catalog::load`](crate::Catalog::load)
//! checks them and builds the lookup index.

use crate::wang::{TerrainId, WangId, WangPosition};
use serde::{Deserialize, Serialize};

/// Type of Wang set - determines which positions of a Wang id are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerrainSetType {
    /// 4 corners per tile (TR, BR, BL, TL)
    /// Good for basic terrain transitions
    #[default]
    Corner,
    /// 4 edges per tile (Top, Right, Bottom, Left)
    /// Good for roads, platforms, paths
    Edge,
    /// 4 corners + 4 edges per tile
    Mixed,
}

impl TerrainSetType {
    /// Positions that take part in matching for this set type
    pub fn active_positions(&self) -> &'static [WangPosition] {
        match self {
            TerrainSetType::Corner => &WangPosition::CORNERS,
            TerrainSetType::Edge => &WangPosition::EDGES,
            TerrainSetType::Mixed => &WangPosition::ALL,
        }
    }

    /// Get the number of positions used by this set type
    pub fn position_count(&self) -> usize {
        self.active_positions().len()
    }

    pub fn uses_corners(&self) -> bool {
        matches!(self, TerrainSetType::Corner | TerrainSetType::Mixed)
    }

    pub fn uses_edges(&self) -> bool {
        matches!(self, TerrainSetType::Edge | TerrainSetType::Mixed)
    }
}

fn default_probability() -> f32 {
    1.0
}

/// A terrain color within a Wang set (e.g., "Grass", "Dirt")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangColor {
    pub name: String,
    /// Display color for UI visualization ("#rrggbb")
    #[serde(default)]
    pub color: String,
    /// Relative weight when several tiles match
    #[serde(default = "default_probability")]
    pub probability: f32,
}

impl WangColor {
    pub fn new(name: impl Into<String>, color: impl Into<String>, probability: f32) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            probability,
        }
    }
}

/// The Wang id assigned to one tile of the tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangTileDefinition {
    pub tile_id: u32,
    pub wang_id: WangId,
    /// Per-tile weight, multiplied with the color probabilities
    #[serde(default = "default_probability")]
    pub probability: f32,
}

impl WangTileDefinition {
    pub fn new(tile_id: u32, wang_id: WangId) -> Self {
        Self {
            tile_id,
            wang_id,
            probability: 1.0,
        }
    }

    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability;
        self
    }
}

/// A named Wang set: its colors and the tile to Wang id table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangSetDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub set_type: TerrainSetType,
    /// Colors in declaration order; color number n refers to `colors[n - 1]`
    pub colors: Vec<WangColor>,
    #[serde(default)]
    pub tiles: Vec<WangTileDefinition>,
    /// Color names from highest to lowest precedence when neighboring terrains
    /// meet at a corner. Empty means declaration order. Colors not listed rank
    /// after the listed ones, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub priority: Vec<String>,
}

impl WangSetDefinition {
    pub fn new(name: impl Into<String>, set_type: TerrainSetType) -> Self {
        Self {
            name: name.into(),
            set_type,
            colors: Vec::new(),
            tiles: Vec::new(),
            priority: Vec::new(),
        }
    }

    /// Add a color, returning its color number (1-based).
    /// None once all 255 color numbers are taken; the color is not added.
    pub fn add_color(&mut self, color: WangColor) -> Option<TerrainId> {
        let number = TerrainId::try_from(self.colors.len() + 1).ok()?;
        self.colors.push(color);
        Some(number)
    }

    pub fn add_tile(&mut self, tile: WangTileDefinition) {
        self.tiles.push(tile);
    }

    pub fn with_priority(mut self, priority: Vec<String>) -> Self {
        self.priority = priority;
        self
    }
}
