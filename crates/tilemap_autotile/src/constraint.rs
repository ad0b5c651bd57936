//! Corner constraint model
//!
//! Derives the Wang id a cell's tile must carry from the terrain painted on the
//! cell and on its neighbors. Where terrains meet, the color with the higher
//! precedence in the Wang set takes the slot.

use crate::catalog::WangSet;
use crate::config::{AutotileConfig, BoundaryPolicy, CornerRule};
use crate::error::AutotileError;
use crate::wang::{TerrainId, WangId, WangPosition};
use tilemap_core::TerrainGrid;

/// Combine the terrain of the cell at (x, y) with its neighbors in `directions`
fn merge_slot(
    grid: &TerrainGrid,
    set: &WangSet,
    x: u32,
    y: u32,
    own: TerrainId,
    directions: &[WangPosition],
    boundary: BoundaryPolicy,
) -> TerrainId {
    let mut color = set.prefer(own, 0);
    for &dir in directions {
        let (dx, dy) = dir.offset();
        match grid.sample(x as i64 + dx, y as i64 + dy) {
            Some(terrain) => color = set.prefer(color, terrain),
            None => {
                if boundary == BoundaryPolicy::None {
                    return 0;
                }
            }
        }
    }
    color
}

/// Derive the required Wang id for the cell at (x, y).
///
/// Positions the set does not match stay 0. Out-of-grid neighbors sample as
/// none and are handled according to `config.boundary`.
pub fn derive_constraint(
    grid: &TerrainGrid,
    set: &WangSet,
    x: u32,
    y: u32,
    config: &AutotileConfig,
) -> Result<WangId, AutotileError> {
    let own = grid.get(x, y).ok_or(AutotileError::OutOfRange {
        x: x as u64,
        y: y as u64,
        width: grid.width(),
        height: grid.height(),
    })?;

    let set_type = set.set_type();
    let mut wang_id = WangId::NONE;

    if set_type.uses_corners() {
        for corner in WangPosition::CORNERS {
            let sides = [corner.prev(), corner.next()];
            let vertex = [corner.prev(), corner, corner.next()];
            let directions: &[WangPosition] = match config.corner_rule {
                CornerRule::Orthogonal => &sides,
                CornerRule::Vertex => &vertex,
            };
            let color = merge_slot(grid, set, x, y, own, directions, config.boundary);
            wang_id.set(corner, color);
        }
    }

    if set_type.uses_edges() {
        for edge in WangPosition::EDGES {
            let color = merge_slot(grid, set, x, y, own, &[edge], config.boundary);
            wang_id.set(edge, color);
        }
    }

    Ok(wang_id)
}
