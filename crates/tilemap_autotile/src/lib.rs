//! Tiled-compatible Wang tile autotiling
//!
//! This crate picks concrete tiles for a grid of painted terrain, using Wang
//! sets in the same shape Tiled stores them.
//!
//! # Features
//! - Corner, Edge, and Mixed Wang set types
//! - Validated catalog with exact-match lookup and precedence-ordered colors
//! - Deterministic weighted tie-break between equivalent tiles
//! - Region, cancellable, parallel and incremental (dirty cell) resolution
//!
//! # Example
//!
//! ```rust
//! use tilemap_autotile::{
//!     AutotileConfig, Autotiler, Catalog, TerrainSetType, WangColor, WangId,
//!     WangSetDefinition, WangTileDefinition,
//! };
//! use tilemap_autotile::tilemap_core::TerrainGrid;
//!
//! let mut ground = WangSetDefinition::new("Ground", TerrainSetType::Corner);
//! let grass = ground.add_color(WangColor::new("Grass", "#00ff00", 1.0)).unwrap();
//! ground.add_tile(WangTileDefinition::new(51, WangId::corners_filled(grass)));
//! let catalog = Catalog::load(vec![ground]).unwrap();
//!
//! let grid = TerrainGrid::filled(4, 4, grass).unwrap();
//! let autotiler = Autotiler::for_grid(&grid, AutotileConfig::new(1234));
//! let resolution = autotiler
//!     .resolve_region(&grid, &catalog, "Ground", grid.bounds())
//!     .unwrap();
//! assert_eq!(resolution.tile_at(2, 3), Some(51));
//! ```

pub mod autotiler;
pub mod catalog;
pub mod config;
pub mod constraint;
pub mod error;
pub mod resolver;
pub mod terrain;
pub mod wang;

pub use tilemap_core;

// Re-export main types at crate root
pub use autotiler::{Autotiler, Resolution, DEFAULT_BAND_ROWS};
pub use catalog::{Catalog, TileCandidate, TileMatches, WangSet, WangTile};
pub use config::{AutotileConfig, BoundaryPolicy, CornerRule};
pub use constraint::derive_constraint;
pub use error::{AutotileError, ConfigError, DefinitionError, NoMatchError};
pub use resolver::{cell_seed, resolve, resolve_cell, resolve_in_set};
pub use terrain::{TerrainSetType, WangColor, WangSetDefinition, WangTileDefinition};
pub use wang::{ParseWangIdError, TerrainId, WangId, WangPosition};
