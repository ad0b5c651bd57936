//! Resolution against the sample 32px terrain tileset (Dirt / Grass / Edge)

use std::collections::HashSet;
use tilemap_autotile::tilemap_core::{GridRect, TerrainGrid, Tileset};
use tilemap_autotile::{
    resolve, AutotileConfig, AutotileError, Autotiler, BoundaryPolicy, Catalog, DefinitionError,
    WangId, WangSetDefinition,
};

const FIXTURE: &str = include_str!("fixtures/terrain.json");

const DIRT: u8 = 1;
const GRASS: u8 = 2;
const EDGE: u8 = 3;

fn definitions() -> Vec<WangSetDefinition> {
    serde_json::from_str(FIXTURE).unwrap()
}

fn catalog() -> Catalog {
    Catalog::from_json(FIXTURE).unwrap()
}

fn wid(s: &str) -> WangId {
    s.parse().unwrap()
}

fn tile_ids(catalog: &Catalog, wang_id: &str) -> Vec<u32> {
    catalog.lookup("Dirt", &wid(wang_id)).map(|c| c.tile_id).collect()
}

/// Grass everywhere except a dirt cell on the left edge of the middle row
fn scenario_grid() -> TerrainGrid {
    TerrainGrid::from_rows(&[
        vec![GRASS, GRASS, GRASS],
        vec![DIRT, GRASS, GRASS],
        vec![GRASS, GRASS, GRASS],
    ])
    .unwrap()
}

#[test]
fn every_tile_is_found_by_its_own_wang_id() {
    let catalog = catalog();
    let set = catalog.wang_set("Dirt").unwrap();
    assert_eq!(set.colors().len(), 3);
    assert_eq!(set.tile_count(), 46);

    for def in &definitions()[0].tiles {
        let found = tile_ids(&catalog, &def.wang_id.to_string());
        assert!(found.contains(&def.tile_id), "tile {} missing", def.tile_id);
    }
}

#[test]
fn duplicate_transitions_are_ordered_by_tile_id() {
    let catalog = catalog();
    assert_eq!(tile_ids(&catalog, "0,2,0,1,0,1,0,2"), vec![1, 61]);
    assert_eq!(tile_ids(&catalog, "0,2,0,2,0,1,0,1"), vec![12, 50]);
    assert_eq!(tile_ids(&catalog, "0,0,0,3,0,3,0,0"), vec![34, 36, 74, 76]);
    assert_eq!(tile_ids(&catalog, "0,2,0,2,0,2,0,2"), vec![51]);
}

#[test]
fn candidate_weight_includes_color_probabilities() {
    let catalog = catalog();
    let grass = catalog.lookup("Dirt", &wid("0,2,0,2,0,2,0,2")).next().unwrap();
    assert_eq!(grass.probability, 85.0f64.powi(4));

    let mixed = catalog.lookup("Dirt", &wid("0,2,0,1,0,1,0,2")).next().unwrap();
    assert_eq!(mixed.probability, 85.0 * 85.0);
}

#[test]
fn unmatched_transition_is_empty() {
    let catalog = catalog();
    assert!(tile_ids(&catalog, "0,1,0,2,0,1,0,2").is_empty());
    assert!(catalog.lookup("Water", &wid("0,2,0,2,0,2,0,2")).next().is_none());

    let result = resolve(&catalog, "Dirt", &wid("0,1,0,2,0,1,0,2"), 0);
    assert!(matches!(result, Err(AutotileError::NoMatch(_))));
}

#[test]
fn dirt_cell_on_grass_field() {
    let catalog = catalog();
    let grid = scenario_grid();
    let autotiler = Autotiler::for_grid(&grid, AutotileConfig::new(1234));
    let resolution = autotiler
        .resolve_region(&grid, &catalog, "Dirt", grid.bounds())
        .unwrap();
    assert!(resolution.is_complete());

    let tile = |x, y| resolution.tile_at(x, y).unwrap();
    assert!([1, 61].contains(&tile(0, 0)));
    assert_eq!(tile(0, 1), 11);
    assert!([12, 50].contains(&tile(1, 1)));
    assert!([21, 41].contains(&tile(0, 2)));
    for (x, y) in [(1, 0), (2, 0), (2, 1), (1, 2), (2, 2)] {
        assert_eq!(tile(x, y), 51, "cell ({x}, {y})");
    }
}

#[test]
fn unchanged_cells_keep_their_tile() {
    let catalog = catalog();
    let grid = scenario_grid();
    let config = AutotileConfig::new(77);
    let first = Autotiler::for_grid(&grid, config.clone())
        .resolve_region(&grid, &catalog, "Dirt", grid.bounds())
        .unwrap();
    let second = Autotiler::for_grid(&grid, config)
        .resolve_region(&grid, &catalog, "Dirt", grid.bounds())
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn uniform_fields_use_fill_tiles() {
    let catalog = catalog();
    for (terrain, expected) in [(GRASS, 51), (DIRT, 11)] {
        let grid = TerrainGrid::filled(6, 4, terrain).unwrap();
        let autotiler = Autotiler::for_grid(&grid, AutotileConfig::new(3));
        let resolution = autotiler
            .resolve_region_parallel(&grid, &catalog, "Dirt", grid.bounds(), 2)
            .unwrap();
        assert_eq!(resolution.tiles.len(), 24);
        assert!(resolution.tiles.values().all(|&t| t == expected));
    }
}

#[test]
fn strict_boundary_reports_border_cells() {
    let catalog = catalog();
    let grid = TerrainGrid::filled(3, 3, GRASS).unwrap();
    let config = AutotileConfig::new(5).with_boundary(BoundaryPolicy::None);
    let resolution = Autotiler::for_grid(&grid, config)
        .resolve_region(&grid, &catalog, "Dirt", grid.bounds())
        .unwrap();

    // Only the middle cell is free of the border; the grass set has no border tiles
    assert_eq!(resolution.tile_at(1, 1), Some(51));
    assert_eq!(resolution.failures.len(), 8);
    let failure = resolution.failure_at(0, 0).unwrap();
    assert_eq!(failure.wang_id, wid("0,0,0,2,0,0,0,0"));
}

#[test]
fn strict_boundary_picks_edge_tiles() {
    let catalog = catalog();
    let grid = TerrainGrid::filled(40, 3, EDGE).unwrap();
    let config = AutotileConfig::new(9).with_boundary(BoundaryPolicy::None);
    let resolution = Autotiler::for_grid(&grid, config)
        .resolve_region(&grid, &catalog, "Dirt", GridRect::new(1, 0, 38, 1))
        .unwrap();

    let picked: HashSet<u32> = resolution.tiles.values().copied().collect();
    assert_eq!(resolution.tiles.len(), 38);
    assert!(picked.is_subset(&HashSet::from([34, 36, 74, 76])));
    assert!(picked.len() > 1);
}

#[test]
fn incremental_paint_matches_full_resolution() {
    let catalog = catalog();
    let mut grid = TerrainGrid::filled(8, 8, GRASS).unwrap();
    let mut autotiler = Autotiler::for_grid(&grid, AutotileConfig::new(42));
    autotiler.invalidate_all();
    let mut tiles = autotiler.resolve_dirty(&grid, &catalog, "Dirt").unwrap();

    for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
        autotiler.paint(&mut grid, x, y, DIRT).unwrap();
    }
    assert_eq!(autotiler.dirty_count(), 16);
    tiles.merge(autotiler.resolve_dirty(&grid, &catalog, "Dirt").unwrap());

    let full = autotiler
        .resolve_region(&grid, &catalog, "Dirt", grid.bounds())
        .unwrap();
    assert_eq!(tiles, full);
    assert_eq!(full.tile_at(3, 3), Some(11));
    assert_eq!(full.tile_at(0, 0), Some(51));
}

#[test]
fn catalog_checks_tiles_against_tileset() {
    let atlas = Tileset::new_atlas(
        "terrain".to_string(),
        "terrain.png".to_string(),
        32,
        32,
        10,
        16,
    );
    let catalog = Catalog::load_for_tileset(definitions(), &atlas).unwrap();
    assert_eq!(catalog.len(), 1);

    let short = Tileset::new_atlas(
        "terrain".to_string(),
        "terrain.png".to_string(),
        32,
        32,
        10,
        9,
    );
    let result = Catalog::load_for_tileset(definitions(), &short);
    assert_eq!(
        result.unwrap_err(),
        DefinitionError::UnknownTile {
            set: "Dirt".to_string(),
            tile_id: 94,
            tileset: "terrain".to_string(),
        }
    );
}
