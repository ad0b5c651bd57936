//! Terrain grid and cell rectangles

use serde::{Deserialize, Serialize};

/// Terrain color number as used in Wang ids (0 = no terrain)
pub type TerrainId = u8;

/// A rectangle of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GridRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && (x as u64) < self.right() && (y as u64) < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &GridRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The square of cells within `radius` of (x, y), clipped to this rectangle
    pub fn around(&self, x: u32, y: u32, radius: u32) -> GridRect {
        let min_x = x.saturating_sub(radius).max(self.x);
        let min_y = y.saturating_sub(radius).max(self.y);
        let max_x = (x as u64 + radius as u64 + 1).min(self.right());
        let max_y = (y as u64 + radius as u64 + 1).min(self.bottom());
        GridRect {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x as u64) as u32,
            height: max_y.saturating_sub(min_y as u64) as u32,
        }
    }

    /// Cell coordinates in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + Clone {
        let rect = *self;
        (rect.y..rect.y + rect.height)
            .flat_map(move |y| (rect.x..rect.x + rect.width).map(move |x| (x, y)))
    }

    /// Split into horizontal bands of at most `rows` rows each
    pub fn row_bands(&self, rows: u32) -> Vec<GridRect> {
        let rows = rows.max(1);
        let mut bands = Vec::new();
        let mut y = self.y;
        while (y as u64) < self.bottom() {
            let height = rows.min((self.bottom() - y as u64) as u32);
            bands.push(GridRect::new(self.x, y, self.width, height));
            y += height;
        }
        bands
    }
}

/// Number of cells in a `width` x `height` grid, None if it does not fit in memory
fn cell_count(width: u32, height: u32) -> Option<usize> {
    (width as u64)
        .checked_mul(height as u64)
        .and_then(|n| usize::try_from(n).ok())
}

/// Serialized form of [`TerrainGrid`], checked on the way in
#[derive(Deserialize)]
struct RawTerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<TerrainId>,
}

impl TryFrom<RawTerrainGrid> for TerrainGrid {
    type Error = String;

    fn try_from(raw: RawTerrainGrid) -> Result<Self, Self::Error> {
        match cell_count(raw.width, raw.height) {
            Some(count) if count == raw.cells.len() => Ok(Self {
                width: raw.width,
                height: raw.height,
                cells: raw.cells,
            }),
            _ => Err(format!(
                "terrain grid is {}x{} but has {} cells",
                raw.width,
                raw.height,
                raw.cells.len()
            )),
        }
    }
}

/// Logical terrain assignments for a map, row-major with y = 0 at the top.
///
/// Each cell holds the terrain color number painted there (0 = unpainted).
/// `cells.len() == width * height` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTerrainGrid")]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<TerrainId>,
}

impl TerrainGrid {
    /// Create an unpainted grid. None if the cell count overflows.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Self::filled(width, height, 0)
    }

    /// Create a grid with every cell set to `terrain`. None if the cell count overflows.
    pub fn filled(width: u32, height: u32, terrain: TerrainId) -> Option<Self> {
        let count = cell_count(width, height)?;
        Some(Self {
            width,
            height,
            cells: vec![terrain; count],
        })
    }

    /// Build a grid from rows of terrain. Returns None if rows are ragged.
    pub fn from_rows(rows: &[Vec<TerrainId>]) -> Option<Self> {
        let height = u32::try_from(rows.len()).ok()?;
        let width = u32::try_from(rows.first().map(|r| r.len()).unwrap_or(0)).ok()?;
        if rows.iter().any(|r| r.len() != width as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.concat(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rectangle covering the whole grid
    pub fn bounds(&self) -> GridRect {
        GridRect::new(0, 0, self.width, self.height)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the terrain at a cell, None when outside the grid
    pub fn get(&self, x: u32, y: u32) -> Option<TerrainId> {
        if !self.contains(x, y) {
            return None;
        }
        self.cells.get(self.index(x, y)).copied()
    }

    /// Get the terrain at signed coordinates, for neighbor sampling
    pub fn sample(&self, x: i64, y: i64) -> Option<TerrainId> {
        if x < 0 || y < 0 || x > u32::MAX as i64 || y > u32::MAX as i64 {
            return None;
        }
        self.get(x as u32, y as u32)
    }

    /// Set the terrain at a cell. Returns false when outside the grid.
    pub fn set(&mut self, x: u32, y: u32, terrain: TerrainId) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = terrain;
        true
    }

    /// Fill every in-grid cell of `rect` with `terrain`
    pub fn fill_rect(&mut self, rect: GridRect, terrain: TerrainId) {
        for (x, y) in rect.cells() {
            self.set(x, y, terrain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_get_set() {
        let mut grid = TerrainGrid::filled(3, 2, 2).unwrap();
        assert_eq!(grid.get(2, 1), Some(2));
        assert_eq!(grid.get(3, 0), None);

        assert!(grid.set(0, 1, 1));
        assert_eq!(grid.get(0, 1), Some(1));
        assert!(!grid.set(0, 2, 1));
    }

    #[test]
    fn test_sample_outside_grid() {
        let grid = TerrainGrid::filled(2, 2, 2).unwrap();
        assert_eq!(grid.sample(-1, 0), None);
        assert_eq!(grid.sample(0, -1), None);
        assert_eq!(grid.sample(2, 0), None);
        assert_eq!(grid.sample(1, 1), Some(2));
    }

    #[test]
    fn test_from_rows() {
        let grid = TerrainGrid::from_rows(&[vec![2, 2], vec![1, 2]]).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(0, 1), Some(1));

        assert!(TerrainGrid::from_rows(&[vec![2, 2], vec![1]]).is_none());
    }

    #[test]
    fn test_cell_count_does_not_wrap() {
        assert_eq!(cell_count(3, 2), Some(6));
        assert_eq!(cell_count(0, u32::MAX), Some(0));
        // 65536 * 65536 overflows u32 but not the u64 intermediate
        assert_eq!(cell_count(65536, 65536), usize::try_from(1u64 << 32).ok());
        let max = u32::MAX as u64;
        assert_eq!(cell_count(u32::MAX, u32::MAX), usize::try_from(max * max).ok());
    }

    #[test]
    fn test_deserialize_checks_cell_count() {
        let grid: TerrainGrid =
            serde_json::from_str(r#"{"width":2,"height":2,"cells":[2,2,1,2]}"#).unwrap();
        assert_eq!(grid.get(0, 1), Some(1));

        let short = serde_json::from_str::<TerrainGrid>(r#"{"width":3,"height":3,"cells":[2,2]}"#);
        let err = short.unwrap_err().to_string();
        assert!(err.contains("3x3 but has 2 cells"), "{err}");

        let long = serde_json::from_str::<TerrainGrid>(r#"{"width":1,"height":1,"cells":[2,2]}"#);
        assert!(long.is_err());
    }

    #[test]
    fn test_serde_roundtrip_keeps_cells() {
        let grid = TerrainGrid::from_rows(&[vec![1, 2, 3], vec![0, 2, 1]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<TerrainGrid>(&json).unwrap(), grid);
    }

    #[test]
    fn test_rect_around_is_clipped() {
        let bounds = GridRect::new(0, 0, 5, 5);
        assert_eq!(bounds.around(2, 2, 1), GridRect::new(1, 1, 3, 3));
        assert_eq!(bounds.around(0, 0, 1), GridRect::new(0, 0, 2, 2));
        assert_eq!(bounds.around(4, 4, 1), GridRect::new(3, 3, 2, 2));
    }

    #[test]
    fn test_rect_cells_row_major() {
        let cells: Vec<_> = GridRect::new(1, 1, 2, 2).cells().collect();
        assert_eq!(cells, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
        assert_eq!(GridRect::new(0, 0, 0, 4).cells().count(), 0);
    }

    #[test]
    fn test_row_bands_cover_rect() {
        let rect = GridRect::new(2, 1, 4, 5);
        let bands = rect.row_bands(2);
        assert_eq!(
            bands,
            vec![
                GridRect::new(2, 1, 4, 2),
                GridRect::new(2, 3, 4, 2),
                GridRect::new(2, 5, 4, 1),
            ]
        );
        assert!(bands.iter().all(|b| rect.contains_rect(b)));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut grid = TerrainGrid::new(3, 3).unwrap();
        grid.fill_rect(GridRect::new(2, 2, 4, 4), 1);
        assert_eq!(grid.get(2, 2), Some(1));
        assert_eq!(grid.get(1, 1), Some(0));
    }
}
