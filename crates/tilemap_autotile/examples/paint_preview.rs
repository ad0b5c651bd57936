//! Paints a small island of dirt onto grass and prints the resolved tile ids.
//!
//! Run with: cargo run -p tilemap_autotile --example paint_preview

use tilemap_autotile::tilemap_core::{GridRect, TerrainGrid};
use tilemap_autotile::{AutotileConfig, Autotiler, Catalog};

const TERRAIN: &str = include_str!("../tests/fixtures/terrain.json");

fn print_resolution(grid: &TerrainGrid, resolution: &tilemap_autotile::Resolution) {
    for y in 0..grid.height() {
        let row: Vec<String> = (0..grid.width())
            .map(|x| match resolution.tile_at(x, y) {
                Some(tile) => format!("{tile:>3}"),
                None => "  ?".to_string(),
            })
            .collect();
        println!("{}", row.join(" "));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::from_json(TERRAIN)?;
    let set = catalog.wang_set("Dirt").ok_or("missing wang set")?;
    let dirt = set.color_index("Dirt").ok_or("missing dirt color")?;
    let grass = set.color_index("Grass").ok_or("missing grass color")?;

    let mut grid = TerrainGrid::filled(10, 8, grass).ok_or("grid too large")?;
    let mut autotiler = Autotiler::for_grid(&grid, AutotileConfig::new(2024));

    grid.fill_rect(GridRect::new(3, 2, 4, 3), dirt);
    let mut tiles = autotiler.resolve_region(&grid, &catalog, "Dirt", grid.bounds())?;
    println!("Initial map:");
    print_resolution(&grid, &tiles);

    autotiler.paint(&mut grid, 7, 5, dirt)?;
    tiles.merge(autotiler.resolve_dirty(&grid, &catalog, "Dirt")?);
    println!("\nAfter painting (7, 5):");
    print_resolution(&grid, &tiles);

    if !tiles.failures.is_empty() {
        println!("\n{} cells have no matching tile:", tiles.failures.len());
        for ((x, y), failure) in &tiles.failures {
            println!("  ({x}, {y}): {failure}");
        }
    }
    Ok(())
}
