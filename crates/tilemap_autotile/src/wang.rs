//! Wang ids and positions
//!
//! Positions follow Tiled's indexing, clockwise from the top edge:
//!   7|0|1
//!   6|X|2
//!   5|4|3
//! - Even indices (0,2,4,6) = Edges (Top, Right, Bottom, Left)
//! - Odd indices (1,3,5,7) = Corners (TopRight, BottomRight, BottomLeft, TopLeft)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use tilemap_core::TerrainId;

/// A slot of a Wang id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WangPosition {
    Top = 0,
    TopRight = 1,
    Right = 2,
    BottomRight = 3,
    Bottom = 4,
    BottomLeft = 5,
    Left = 6,
    TopLeft = 7,
}

impl WangPosition {
    pub const ALL: [WangPosition; 8] = [
        WangPosition::Top,
        WangPosition::TopRight,
        WangPosition::Right,
        WangPosition::BottomRight,
        WangPosition::Bottom,
        WangPosition::BottomLeft,
        WangPosition::Left,
        WangPosition::TopLeft,
    ];

    pub const CORNERS: [WangPosition; 4] = [
        WangPosition::TopRight,
        WangPosition::BottomRight,
        WangPosition::BottomLeft,
        WangPosition::TopLeft,
    ];

    pub const EDGES: [WangPosition; 4] = [
        WangPosition::Top,
        WangPosition::Right,
        WangPosition::Bottom,
        WangPosition::Left,
    ];

    /// Create from index (wraps modulo 8)
    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 8]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the opposite position (across the tile)
    #[inline]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    #[inline]
    pub fn is_corner(self) -> bool {
        self.index() % 2 == 1
    }

    /// Get next position clockwise
    #[inline]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Get previous position counter-clockwise
    #[inline]
    pub fn prev(self) -> Self {
        Self::from_index(self.index() + 7)
    }

    /// Grid offset of the neighbor in this direction (y grows downward)
    pub fn offset(self) -> (i64, i64) {
        match self {
            WangPosition::Top => (0, -1),
            WangPosition::TopRight => (1, -1),
            WangPosition::Right => (1, 0),
            WangPosition::BottomRight => (1, 1),
            WangPosition::Bottom => (0, 1),
            WangPosition::BottomLeft => (-1, 1),
            WangPosition::Left => (-1, 0),
            WangPosition::TopLeft => (-1, -1),
        }
    }
}

/// Terrain colors at all 8 positions of a tile.
///
/// Color 0 = none. Layout: [Top, TopRight, Right, BottomRight, Bottom, BottomLeft, Left, TopLeft]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WangId {
    pub colors: [TerrainId; 8],
}

impl WangId {
    /// All positions none
    pub const NONE: Self = WangId { colors: [0; 8] };

    pub const fn new(colors: [TerrainId; 8]) -> Self {
        WangId { colors }
    }

    /// Create a WangId with all positions set to one terrain
    pub fn filled(terrain: TerrainId) -> Self {
        WangId {
            colors: [terrain; 8],
        }
    }

    /// Create a WangId with the four corners set to one terrain and edges none
    pub fn corners_filled(terrain: TerrainId) -> Self {
        let mut id = Self::NONE;
        for pos in WangPosition::CORNERS {
            id.set(pos, terrain);
        }
        id
    }

    #[inline]
    pub fn get(&self, pos: WangPosition) -> TerrainId {
        self.colors[pos.index()]
    }

    #[inline]
    pub fn set(&mut self, pos: WangPosition, color: TerrainId) {
        self.colors[pos.index()] = color;
    }

    /// Keep only the positions in `active`, clearing the others to none
    pub fn masked(&self, active: &[WangPosition]) -> Self {
        let mut id = Self::NONE;
        for &pos in active {
            id.set(pos, self.get(pos));
        }
        id
    }

    /// Highest color number used in any slot
    pub fn max_color(&self) -> TerrainId {
        self.colors.iter().copied().max().unwrap_or(0)
    }

    pub fn has_any_terrain(&self) -> bool {
        self.colors.iter().any(|&c| c != 0)
    }
}

impl fmt::Display for WangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.colors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for WangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WangId({self})")
    }
}

/// Error parsing the comma separated Tiled form of a Wang id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid wang id '{0}': expected 8 comma separated color numbers")]
pub struct ParseWangIdError(pub String);

impl FromStr for WangId {
    type Err = ParseWangIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut colors = [0; 8];
        let mut count = 0;
        for part in s.split(',') {
            if count == 8 {
                return Err(ParseWangIdError(s.to_string()));
            }
            colors[count] = part
                .trim()
                .parse()
                .map_err(|_| ParseWangIdError(s.to_string()))?;
            count += 1;
        }
        if count != 8 {
            return Err(ParseWangIdError(s.to_string()));
        }
        Ok(WangId { colors })
    }
}

impl TryFrom<String> for WangId {
    type Error = ParseWangIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WangId> for String {
    fn from(id: WangId) -> Self {
        id.to_string()
    }
}
