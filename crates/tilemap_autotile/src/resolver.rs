//! Tile resolver: picks the concrete tile for a constraint
//!
//! Exact matches come from [`Catalog::lookup`]. When several tiles match, one is
//! chosen by weighted random selection with a generator seeded from the cell
//! coordinates and the world seed, so an unchanged cell always resolves to the
//! same tile.

use crate::catalog::{Catalog, TileCandidate, WangSet};
use crate::config::AutotileConfig;
use crate::constraint::derive_constraint;
use crate::error::{AutotileError, NoMatchError};
use crate::wang::WangId;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tilemap_core::TerrainGrid;

/// Deterministic seed for the cell at (x, y)
pub fn cell_seed(world_seed: u64, x: u32, y: u32) -> u64 {
    // splitmix64 finalizer over the packed coordinates
    let mut z = world_seed ^ (((x as u64) << 32) | y as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Pick a candidate weighted by probability.
/// Falls back to the first candidate when every weight is zero.
fn weighted_pick(candidates: &[TileCandidate], rng: &mut impl Rng) -> Option<u32> {
    match candidates {
        [] => None,
        [only] => Some(only.tile_id),
        _ => {
            let total: f64 = candidates.iter().map(|c| c.probability).sum();
            if !total.is_finite() || total <= 0.0 {
                return candidates.first().map(|c| c.tile_id);
            }

            let mut pick = rng.gen::<f64>() * total;
            for candidate in candidates {
                if pick < candidate.probability {
                    return Some(candidate.tile_id);
                }
                pick -= candidate.probability;
            }

            // Rounding can leave a sliver past the last weight
            candidates
                .iter()
                .rev()
                .find(|c| c.probability > 0.0)
                .map(|c| c.tile_id)
        }
    }
}

/// Resolve a constraint against an already looked-up Wang set
pub fn resolve_in_set(set: &WangSet, constraint: &WangId, seed: u64) -> Result<u32, NoMatchError> {
    let matches = set.lookup(constraint);
    let mut rng = SmallRng::seed_from_u64(seed);
    weighted_pick(matches.as_slice(), &mut rng).ok_or_else(|| NoMatchError {
        set: set.name().to_string(),
        wang_id: *constraint,
    })
}

/// Resolve a constraint to a tile id.
///
/// Fails with [`AutotileError::NoMatch`] when no tile of the set matches; an
/// arbitrary tile is never substituted.
pub fn resolve(
    catalog: &Catalog,
    set_name: &str,
    constraint: &WangId,
    seed: u64,
) -> Result<u32, AutotileError> {
    let set = catalog
        .wang_set(set_name)
        .ok_or_else(|| AutotileError::UnknownWangSet(set_name.to_string()))?;
    Ok(resolve_in_set(set, constraint, seed)?)
}

/// Derive the constraint for the cell at (x, y) and resolve it
pub fn resolve_cell(
    catalog: &Catalog,
    set_name: &str,
    grid: &TerrainGrid,
    x: u32,
    y: u32,
    config: &AutotileConfig,
) -> Result<u32, AutotileError> {
    let set = catalog
        .wang_set(set_name)
        .ok_or_else(|| AutotileError::UnknownWangSet(set_name.to_string()))?;
    let constraint = derive_constraint(grid, set, x, y, config)?;
    Ok(resolve_in_set(set, &constraint, cell_seed(config.world_seed, x, y))?)
}
