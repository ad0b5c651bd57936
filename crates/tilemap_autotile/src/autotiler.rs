//! Grid autotiler: resolves whole regions and incremental edits
//!
//! Per-cell failures never abort a region. A cell whose constraint matches no
//! tile is recorded in [`Resolution::failures`] and resolution continues, since
//! edits routinely pass through unmatched configurations (e.g. mid-drag).

use crate::catalog::{Catalog, WangSet};
use crate::config::AutotileConfig;
use crate::constraint::derive_constraint;
use crate::error::{AutotileError, NoMatchError};
use crate::resolver::{cell_seed, resolve_in_set};
use crate::wang::TerrainId;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tilemap_core::{GridRect, TerrainGrid};

/// Rows per band for [`Autotiler::resolve_region_parallel`]
pub const DEFAULT_BAND_ROWS: u32 = 32;

/// Resolved tiles and per-cell failures for a set of cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// (x, y) -> resolved tile id
    pub tiles: BTreeMap<(u32, u32), u32>,
    /// (x, y) -> why the cell has no tile
    pub failures: BTreeMap<(u32, u32), NoMatchError>,
    /// Resolution stopped early; cells after the stop point are missing
    pub cancelled: bool,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<u32> {
        self.tiles.get(&(x, y)).copied()
    }

    pub fn failure_at(&self, x: u32, y: u32) -> Option<&NoMatchError> {
        self.failures.get(&(x, y))
    }

    /// Number of cells with either a tile or a failure
    pub fn len(&self) -> usize {
        self.tiles.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.failures.is_empty()
    }

    /// Every requested cell was resolved to a tile
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty()
    }

    /// Overlay a newer resolution; its cells replace ours
    pub fn merge(&mut self, newer: Resolution) {
        for (pos, tile) in newer.tiles {
            self.failures.remove(&pos);
            self.tiles.insert(pos, tile);
        }
        for (pos, failure) in newer.failures {
            self.tiles.remove(&pos);
            self.failures.insert(pos, failure);
        }
        self.cancelled |= newer.cancelled;
    }
}

/// Resolves terrain grids and tracks cells invalidated by edits.
///
/// The autotiler owns only the dirty set and configuration. The grid and
/// catalog are borrowed per call.
#[derive(Debug, Clone)]
pub struct Autotiler {
    width: u32,
    height: u32,
    config: AutotileConfig,
    dirty: BTreeSet<(u32, u32)>,
}

impl Autotiler {
    pub fn new(width: u32, height: u32, config: AutotileConfig) -> Self {
        Self {
            width,
            height,
            config,
            dirty: BTreeSet::new(),
        }
    }

    /// Create an autotiler sized for `grid`
    pub fn for_grid(grid: &TerrainGrid, config: AutotileConfig) -> Self {
        Self::new(grid.width(), grid.height(), config)
    }

    pub fn config(&self) -> &AutotileConfig {
        &self.config
    }

    fn bounds(&self) -> GridRect {
        GridRect::new(0, 0, self.width, self.height)
    }

    fn out_of_range(&self, x: u64, y: u64) -> AutotileError {
        AutotileError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    fn check_grid(&self, grid: &TerrainGrid) -> Result<(), AutotileError> {
        if grid.width() != self.width || grid.height() != self.height {
            return Err(AutotileError::GridSizeMismatch {
                width: self.width,
                height: self.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        Ok(())
    }

    fn check_rect(grid: &TerrainGrid, rect: &GridRect) -> Result<(), AutotileError> {
        if grid.bounds().contains_rect(rect) {
            return Ok(());
        }
        Err(AutotileError::OutOfRange {
            x: rect.right().saturating_sub(1).max(rect.x as u64),
            y: rect.bottom().saturating_sub(1).max(rect.y as u64),
            width: grid.width(),
            height: grid.height(),
        })
    }

    fn wang_set<'c>(catalog: &'c Catalog, set_name: &str) -> Result<&'c WangSet, AutotileError> {
        catalog
            .wang_set(set_name)
            .ok_or_else(|| AutotileError::UnknownWangSet(set_name.to_string()))
    }

    // ─── Incremental invalidation ────────────────────────────────────────────

    pub fn is_dirty(&self, x: u32, y: u32) -> bool {
        self.dirty.contains(&(x, y))
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Mark the cell and its in-grid 8 neighbors for re-resolution
    pub fn invalidate(&mut self, x: u32, y: u32) -> Result<(), AutotileError> {
        if !self.bounds().contains(x, y) {
            return Err(self.out_of_range(x as u64, y as u64));
        }
        self.dirty.extend(self.bounds().around(x, y, 1).cells());
        Ok(())
    }

    /// Invalidate every cell of `rect` and their neighbors
    pub fn invalidate_rect(&mut self, rect: GridRect) -> Result<(), AutotileError> {
        if !self.bounds().contains_rect(&rect) {
            return Err(self.out_of_range(rect.right(), rect.bottom()));
        }
        if rect.is_empty() {
            return Ok(());
        }
        let bounds = self.bounds();
        let min_x = rect.x.saturating_sub(1);
        let min_y = rect.y.saturating_sub(1);
        let max_x = (rect.right() + 1).min(bounds.right()) as u32;
        let max_y = (rect.bottom() + 1).min(bounds.bottom()) as u32;
        let grown = GridRect::new(min_x, min_y, max_x - min_x, max_y - min_y);
        self.dirty.extend(grown.cells());
        Ok(())
    }

    /// Mark the whole grid dirty
    pub fn invalidate_all(&mut self) {
        self.dirty.extend(self.bounds().cells());
    }

    /// Paint a cell and invalidate its neighborhood
    pub fn paint(
        &mut self,
        grid: &mut TerrainGrid,
        x: u32,
        y: u32,
        terrain: TerrainId,
    ) -> Result<(), AutotileError> {
        self.check_grid(grid)?;
        if !grid.set(x, y, terrain) {
            return Err(self.out_of_range(x as u64, y as u64));
        }
        self.invalidate(x, y)
    }

    // ─── Resolution ──────────────────────────────────────────────────────────

    /// Resolve `cells` in order, stopping early when `should_stop` returns true
    fn resolve_cells(
        &self,
        grid: &TerrainGrid,
        set: &WangSet,
        cells: impl Iterator<Item = (u32, u32)>,
        mut should_stop: impl FnMut() -> bool,
    ) -> Result<Resolution, AutotileError> {
        let mut resolution = Resolution::new();
        for (x, y) in cells {
            if should_stop() {
                log::debug!(
                    "Autotile of wang set '{}' cancelled after {} cells",
                    set.name(),
                    resolution.len()
                );
                resolution.cancelled = true;
                break;
            }

            let constraint = derive_constraint(grid, set, x, y, &self.config)?;
            match resolve_in_set(set, &constraint, cell_seed(self.config.world_seed, x, y)) {
                Ok(tile) => {
                    resolution.tiles.insert((x, y), tile);
                }
                Err(failure) => {
                    log::trace!("Cell ({}, {}): {}", x, y, failure);
                    resolution.failures.insert((x, y), failure);
                }
            }
        }

        if !resolution.failures.is_empty() {
            log::debug!(
                "Wang set '{}': {} of {} cells have no matching tile",
                set.name(),
                resolution.failures.len(),
                resolution.len()
            );
        }
        Ok(resolution)
    }

    /// Resolve every cell in `rect`.
    ///
    /// Fails only for programmer errors (rectangle outside the grid, unknown
    /// set). Cells without a matching tile are reported in the result.
    pub fn resolve_region(
        &self,
        grid: &TerrainGrid,
        catalog: &Catalog,
        set_name: &str,
        rect: GridRect,
    ) -> Result<Resolution, AutotileError> {
        self.resolve_region_until(grid, catalog, set_name, rect, || false)
    }

    /// Resolve `rect`, checking `should_stop` before each cell.
    ///
    /// On early exit the partial result is returned with `cancelled` set.
    pub fn resolve_region_until(
        &self,
        grid: &TerrainGrid,
        catalog: &Catalog,
        set_name: &str,
        rect: GridRect,
        should_stop: impl FnMut() -> bool,
    ) -> Result<Resolution, AutotileError> {
        Self::check_rect(grid, &rect)?;
        let set = Self::wang_set(catalog, set_name)?;
        self.resolve_cells(grid, set, rect.cells(), should_stop)
    }

    /// Resolve `rect` on the rayon pool, in bands of `band_rows` rows.
    ///
    /// The result is identical to [`Autotiler::resolve_region`].
    pub fn resolve_region_parallel(
        &self,
        grid: &TerrainGrid,
        catalog: &Catalog,
        set_name: &str,
        rect: GridRect,
        band_rows: u32,
    ) -> Result<Resolution, AutotileError> {
        Self::check_rect(grid, &rect)?;
        let set = Self::wang_set(catalog, set_name)?;

        let bands = rect
            .row_bands(band_rows)
            .into_par_iter()
            .map(|band| self.resolve_cells(grid, set, band.cells(), || false))
            .collect::<Result<Vec<_>, _>>()?;

        let mut resolution = Resolution::new();
        for band in bands {
            resolution.merge(band);
        }
        Ok(resolution)
    }

    /// Resolve only the cells invalidated since the last call, then clear them
    pub fn resolve_dirty(
        &mut self,
        grid: &TerrainGrid,
        catalog: &Catalog,
        set_name: &str,
    ) -> Result<Resolution, AutotileError> {
        self.check_grid(grid)?;
        let set = Self::wang_set(catalog, set_name)?;

        let dirty = std::mem::take(&mut self.dirty);
        log::trace!("Re-resolving {} dirty cells", dirty.len());
        self.resolve_cells(grid, set, dirty.into_iter(), || false)
    }
}
