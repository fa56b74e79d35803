//! Uniform spatial grid
//!
//! Cells are stored column-major: the cell for column `c`, row `r` lives at
//! `r + c * height_cells`, so one grid column is a contiguous run of
//! `height_cells` cells. Cells hold indices into the engine's body list and
//! are rebuilt every substep, so they never outlive a reallocation.

use std::fmt;
use std::ops::Range;

use super::body::Body;
use super::bounds::Bounds;
use super::vector::Vector2;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: u32,
    width_cells: usize,
    height_cells: usize,
    /// World position of the grid's (0, 0) corner
    origin: Vector2,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// Grid covering `bounds` with square cells of `cell_size` pixels
    ///
    /// Partial cells at the right and bottom edges are kept, so every point
    /// inside `bounds` maps to a cell.
    pub fn new(cell_size: u32, bounds: &Bounds) -> Self {
        let mut grid = Self {
            cell_size: cell_size.max(1),
            width_cells: 0,
            height_cells: 0,
            origin: Vector2::ZERO,
            cells: Vec::new(),
        };
        grid.resize(bounds);
        grid
    }

    /// Recompute dimensions for new bounds (window resize)
    pub fn resize(&mut self, bounds: &Bounds) {
        let cell = self.cell_size;
        self.width_cells = bounds.width().div_ceil(cell) as usize;
        self.height_cells = bounds.height().div_ceil(cell) as usize;
        self.origin = bounds.origin();
        self.cells = vec![Vec::new(); self.width_cells * self.height_cells];
    }

    /// Change the cell size and rebuild for `bounds`
    pub fn set_cell_size(&mut self, cell_size: u32, bounds: &Bounds) {
        self.cell_size = cell_size.max(1);
        self.resize(bounds);
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn width_cells(&self) -> usize {
        self.width_cells
    }

    pub fn height_cells(&self) -> usize {
        self.height_cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, idx: usize) -> &[usize] {
        &self.cells[idx]
    }

    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Empty every cell, keeping allocations
    pub fn reset_cells(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Unchecked index formula: `row + col * height_cells`
    ///
    /// Positions outside the grid produce indices outside `0..len()` (or
    /// alias a neighbouring column), so callers wanting a real cell use
    /// [`SpatialGrid::cell_index`].
    pub fn position_to_cell_idx(&self, pos: Vector2) -> i64 {
        let (col, row) = self.column_row(pos);
        row + col * self.height_cells as i64
    }

    /// Cell containing `pos`, or `None` if it lies outside the grid
    pub fn cell_index(&self, pos: Vector2) -> Option<usize> {
        let (col, row) = self.column_row(pos);
        let in_cols = (0..self.width_cells as i64).contains(&col);
        let in_rows = (0..self.height_cells as i64).contains(&row);
        (in_cols && in_rows).then(|| row as usize + col as usize * self.height_cells)
    }

    fn column_row(&self, pos: Vector2) -> (i64, i64) {
        let local = pos - self.origin;
        let size = self.cell_size as f32;
        ((local.x / size).floor() as i64, (local.y / size).floor() as i64)
    }

    /// Clear and refill the cells from `bodies`
    ///
    /// Bodies that map outside the grid are skipped with a warning and take
    /// no part in collision search this substep. Returns how many were
    /// skipped.
    pub fn partition(&mut self, bodies: &[Body]) -> usize {
        self.reset_cells();
        let mut skipped = 0;
        for (i, body) in bodies.iter().enumerate() {
            match self.cell_index(body.position) {
                Some(idx) => self.cells[idx].push(i),
                None => {
                    skipped += 1;
                    log::warn!(
                        "Grid index out of range: body {} at ({:.1}, {:.1}) -> index {} in {} cells ({})",
                        i,
                        body.position.x,
                        body.position.y,
                        self.position_to_cell_idx(body.position),
                        self.cells.len(),
                        self.info(),
                    );
                }
            }
        }
        skipped
    }

    /// Row of a cell index
    #[inline]
    pub fn row_of(&self, idx: usize) -> usize {
        idx % self.height_cells
    }

    /// Column of a cell index
    #[inline]
    pub fn column_of(&self, idx: usize) -> usize {
        idx / self.height_cells
    }

    /// Highest row (largest y)
    pub fn is_top_row(&self, idx: usize) -> bool {
        self.row_of(idx) == self.height_cells - 1
    }

    /// Row zero (smallest y)
    pub fn is_bottom_row(&self, idx: usize) -> bool {
        self.row_of(idx) == 0
    }

    pub fn is_left_col(&self, idx: usize) -> bool {
        idx < self.height_cells
    }

    pub fn is_right_col(&self, idx: usize) -> bool {
        idx >= self.cells.len() - self.height_cells
    }

    /// True if the full 3x3 neighbourhood of `idx` lies inside the grid
    pub fn is_interior(&self, idx: usize) -> bool {
        !(self.is_top_row(idx)
            || self.is_bottom_row(idx)
            || self.is_left_col(idx)
            || self.is_right_col(idx))
    }

    /// Cell indices making up columns `cols` (contiguous in column-major order)
    pub fn column_span(&self, cols: Range<usize>) -> Range<usize> {
        cols.start * self.height_cells..cols.end * self.height_cells
    }

    /// Total body references currently held
    pub fn occupancy(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// One-line summary for diagnostics
    pub fn info(&self) -> String {
        format!(
            "cell size {}, {} cells, {}x{}",
            self.cell_size,
            self.cells.len(),
            self.width_cells,
            self.height_cells
        )
    }
}

/// Per-cell body counts, highest row first
impl fmt::Display for SpatialGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height_cells).rev() {
            write!(f, "[")?;
            for col in 0..self.width_cells {
                write!(f, " {}", self.cells[row + col * self.height_cells].len())?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}
