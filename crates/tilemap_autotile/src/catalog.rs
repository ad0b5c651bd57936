//! Immutable registry of validated Wang sets
//!
//! A [`Catalog`] is built once from the asset loader's [`WangSetDefinition`]s and
//! never changes afterwards. It is plain data (`Send + Sync`) and is passed by
//! reference to every resolution call.

use crate::error::DefinitionError;
use crate::terrain::{TerrainSetType, WangColor, WangSetDefinition};
use crate::wang::{TerrainId, WangId};
use std::collections::{BTreeMap, HashMap, HashSet};
use tilemap_core::Tileset;

/// A tile satisfying a Wang id, with its selection weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileCandidate {
    pub tile_id: u32,
    /// Tile probability times the probabilities of the colors it uses
    pub probability: f64,
}

/// A tile's declared Wang id and weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WangTile {
    pub wang_id: WangId,
    pub probability: f32,
}

/// Lazy sequence of lookup results, ordered by descending probability then
/// ascending tile id. Cloning restarts it from the current position.
#[derive(Debug, Clone)]
pub struct TileMatches<'a> {
    inner: std::slice::Iter<'a, TileCandidate>,
}

impl<'a> TileMatches<'a> {
    fn new(candidates: &'a [TileCandidate]) -> Self {
        Self {
            inner: candidates.iter(),
        }
    }

    /// The remaining candidates as a slice
    pub fn as_slice(&self) -> &'a [TileCandidate] {
        self.inner.as_slice()
    }
}

impl Iterator for TileMatches<'_> {
    type Item = TileCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for TileMatches<'_> {}

/// A validated Wang set with its lookup index
#[derive(Debug, Clone)]
pub struct WangSet {
    name: String,
    set_type: TerrainSetType,
    colors: Vec<WangColor>,
    tiles: BTreeMap<u32, WangTile>,
    /// Masked Wang id -> sorted candidates
    index: HashMap<WangId, Vec<TileCandidate>>,
    /// Priority rank per color (index = color number - 1), lower wins
    ranks: Vec<usize>,
}

impl WangSet {
    fn from_definition(def: WangSetDefinition) -> Result<Self, DefinitionError> {
        let set = def.name.clone();

        let mut seen = HashSet::new();
        for color in &def.colors {
            if !seen.insert(color.name.as_str()) {
                return Err(DefinitionError::DuplicateColor {
                    set,
                    color: color.name.clone(),
                });
            }
            check_probability(&set, &format!("color '{}'", color.name), color.probability)?;
        }
        if def.colors.len() > TerrainId::MAX as usize {
            return Err(DefinitionError::TooManyColors {
                set,
                count: def.colors.len(),
                max: TerrainId::MAX as usize,
            });
        }

        let ranks = priority_ranks(&set, &def.colors, &def.priority)?;

        let active = def.set_type.active_positions();
        let mut tiles = BTreeMap::new();
        let mut index: HashMap<WangId, Vec<TileCandidate>> = HashMap::new();

        for tile in &def.tiles {
            let max_color = tile.wang_id.max_color();
            if max_color as usize > def.colors.len() {
                return Err(DefinitionError::UndeclaredColor {
                    set,
                    tile_id: tile.tile_id,
                    color: max_color,
                    declared: def.colors.len(),
                });
            }
            check_probability(&set, &format!("tile {}", tile.tile_id), tile.probability)?;

            let wang_tile = WangTile {
                wang_id: tile.wang_id,
                probability: tile.probability,
            };
            if tiles.insert(tile.tile_id, wang_tile).is_some() {
                return Err(DefinitionError::DuplicateTile {
                    set,
                    tile_id: tile.tile_id,
                });
            }

            let key = tile.wang_id.masked(active);
            let color_weight: f64 = active
                .iter()
                .map(|&pos| key.get(pos))
                .filter(|&c| c != 0)
                .map(|c| def.colors[c as usize - 1].probability as f64)
                .product();

            index.entry(key).or_default().push(TileCandidate {
                tile_id: tile.tile_id,
                probability: tile.probability as f64 * color_weight,
            });
        }

        for candidates in index.values_mut() {
            candidates.sort_by(|a, b| {
                b.probability
                    .total_cmp(&a.probability)
                    .then(a.tile_id.cmp(&b.tile_id))
            });
        }

        Ok(Self {
            name: def.name,
            set_type: def.set_type,
            colors: def.colors,
            tiles,
            index,
            ranks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_type(&self) -> TerrainSetType {
        self.set_type
    }

    pub fn colors(&self) -> &[WangColor] {
        &self.colors
    }

    /// Get color by color number (1-based, 0 = none)
    pub fn color(&self, id: TerrainId) -> Option<&WangColor> {
        (id as usize).checked_sub(1).and_then(|i| self.colors.get(i))
    }

    /// Get color number by name
    pub fn color_index(&self, name: &str) -> Option<TerrainId> {
        self.colors
            .iter()
            .position(|c| c.name == name)
            .map(|i| (i + 1) as TerrainId)
    }

    /// Precedence of a color, lower wins. None for 0 and undeclared colors.
    pub fn priority_rank(&self, id: TerrainId) -> Option<usize> {
        (id as usize)
            .checked_sub(1)
            .and_then(|i| self.ranks.get(i))
            .copied()
    }

    /// Of two colors, the one with higher precedence. None (0) never wins
    /// against a declared color.
    pub fn prefer(&self, a: TerrainId, b: TerrainId) -> TerrainId {
        match (self.priority_rank(a), self.priority_rank(b)) {
            (Some(ra), Some(rb)) => {
                if rb < ra {
                    b
                } else {
                    a
                }
            }
            (Some(_), None) => a,
            (None, Some(_)) => b,
            (None, None) => 0,
        }
    }

    /// Declared Wang id of a tile
    pub fn wang_id_of(&self, tile_id: u32) -> Option<WangId> {
        self.tiles.get(&tile_id).map(|t| t.wang_id)
    }

    /// All tiles of this set, by ascending tile id
    pub fn tiles(&self) -> impl Iterator<Item = (u32, &WangTile)> + '_ {
        self.tiles.iter().map(|(&id, tile)| (id, tile))
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles whose matched positions all carry `color` (interior fill tiles)
    pub fn fill_tiles(&self, color: TerrainId) -> Vec<u32> {
        let active = self.set_type.active_positions();
        self.tiles
            .iter()
            .filter(|(_, tile)| active.iter().all(|&pos| tile.wang_id.get(pos) == color))
            .map(|(&id, _)| id)
            .collect()
    }

    /// Tiles whose Wang id equals `wang_id` on the positions this set matches
    pub fn lookup(&self, wang_id: &WangId) -> TileMatches<'_> {
        let key = wang_id.masked(self.set_type.active_positions());
        TileMatches::new(self.index.get(&key).map(Vec::as_slice).unwrap_or(&[]))
    }
}

fn check_probability(set: &str, subject: &str, value: f32) -> Result<(), DefinitionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DefinitionError::InvalidProbability {
            set: set.to_string(),
            subject: subject.to_string(),
            value,
        })
    }
}

/// Rank every color: listed names first in list order, the rest in declaration order
fn priority_ranks(
    set: &str,
    colors: &[WangColor],
    priority: &[String],
) -> Result<Vec<usize>, DefinitionError> {
    let mut ranks = vec![usize::MAX; colors.len()];
    for (rank, name) in priority.iter().enumerate() {
        let Some(idx) = colors.iter().position(|c| &c.name == name) else {
            return Err(DefinitionError::InvalidPriority {
                set: set.to_string(),
                reason: format!("unknown color '{}'", name),
            });
        };
        if ranks[idx] != usize::MAX {
            return Err(DefinitionError::InvalidPriority {
                set: set.to_string(),
                reason: format!("color '{}' listed twice", name),
            });
        }
        ranks[idx] = rank;
    }

    let mut next = priority.len();
    for rank in ranks.iter_mut().filter(|r| **r == usize::MAX) {
        *rank = next;
        next += 1;
    }
    Ok(ranks)
}

/// All Wang sets available to the autotiler, addressed by name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sets: Vec<WangSet>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Validate definitions and build the catalog
    pub fn load(defs: Vec<WangSetDefinition>) -> Result<Self, DefinitionError> {
        let mut catalog = Catalog::default();
        for def in defs {
            if catalog.by_name.contains_key(&def.name) {
                return Err(DefinitionError::DuplicateSet(def.name));
            }
            let set = WangSet::from_definition(def)?;
            log::debug!(
                "Loaded wang set '{}' ({:?}, {} colors, {} tiles)",
                set.name,
                set.set_type,
                set.colors.len(),
                set.tiles.len()
            );
            catalog.by_name.insert(set.name.clone(), catalog.sets.len());
            catalog.sets.push(set);
        }
        Ok(catalog)
    }

    /// Like [`Catalog::load`], also checking every tile id exists in `tileset`
    pub fn load_for_tileset(
        defs: Vec<WangSetDefinition>,
        tileset: &Tileset,
    ) -> Result<Self, DefinitionError> {
        for def in &defs {
            if let Some(tile) = def.tiles.iter().find(|t| !tileset.contains_tile(t.tile_id)) {
                return Err(DefinitionError::UnknownTile {
                    set: def.name.clone(),
                    tile_id: tile.tile_id,
                    tileset: tileset.name.clone(),
                });
            }
        }
        Self::load(defs)
    }

    /// Parse a JSON array of Wang set definitions and build the catalog
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let defs: Vec<WangSetDefinition> =
            serde_json::from_str(json).map_err(|e| DefinitionError::Parse(e.to_string()))?;
        Self::load(defs)
    }

    pub fn wang_set(&self, name: &str) -> Option<&WangSet> {
        self.by_name.get(name).map(|&i| &self.sets[i])
    }

    /// Wang sets in load order
    pub fn wang_sets(&self) -> &[WangSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Every tile of `set_name` matching `wang_id` exactly on the set's positions.
    /// Unknown sets and unmatched ids give an empty sequence.
    pub fn lookup(&self, set_name: &str, wang_id: &WangId) -> TileMatches<'_> {
        match self.wang_set(set_name) {
            Some(set) => set.lookup(wang_id),
            None => TileMatches::new(&[]),
        }
    }
}
