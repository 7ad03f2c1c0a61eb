//! Board module - manages the game grid
//!
//! The board is a `width` x `height` grid where each cell is either empty or
//! holds the drawing metadata of the piece that locked there. Storage is a flat
//! row-major vector sized once per session.
//! Coordinates: (x, y) with x growing to the right and y growing downwards;
//! row 0 is the top (spawn) row.
//!
//! The board also owns the session's score and line counter, from which level
//! and gravity speed are derived.

use tracing::{debug, warn};

use crate::pieces::ShapeMatrix;
use crate::scoring::{level_for_lines, speed_for_level};
use crate::store::ScoreStore;
use crate::error::StoreError;
use crate::types::{Block, Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// The game board plus its score counters
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
    score: u32,
    lines_cleared: u32,
}

impl Board {
    /// Create an empty board. Sizes are validated by the configuration layer.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            score: 0,
            lines_cleared: 0,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn cell(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Occupancy query. Out-of-range coordinates count as occupied so that
    /// collision checks can treat walls and floor like locked cells.
    pub fn is_cell_occupied(&self, x: i8, y: i8) -> bool {
        !matches!(self.cell(x, y), Some(None))
    }

    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || y < 0 || x as i16 >= self.width as i16 || y as i16 >= self.height as i16
    }

    /// True iff every occupied cell of `shape` anchored at (x, y) lands on an
    /// in-bounds empty cell.
    pub fn fits(&self, shape: &ShapeMatrix, x: i8, y: i8) -> bool {
        shape
            .cells()
            .all(|(dx, dy)| !self.is_cell_occupied(x + dx, y + dy))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Cells of row `y`, left to right
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = self.width as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Write `shape` anchored at (x, y) into the grid.
    ///
    /// Callers establish [`Board::fits`] first. Locking onto an occupied or
    /// out-of-range cell is a logic error: it panics in debug builds and is
    /// skipped (nothing written) in release builds.
    pub fn lock(&mut self, shape: &ShapeMatrix, x: i8, y: i8, block: Block) -> bool {
        let fits = self.fits(shape, x, y);
        debug_assert!(fits, "lock of '{}' at ({}, {}) overlaps", block.alias, x, y);
        if !fits {
            warn!(alias = %block.alias, x, y, "lock rejected: target cells not free");
            return false;
        }

        for (dx, dy) in shape.cells() {
            self.set(x + dx, y + dy, Some(block));
        }
        true
    }

    /// Remove every full row at once, compacting the rest downwards.
    ///
    /// Rows are scanned bottom to top with a write cursor: a full row is
    /// skipped, any other row is copied down to the cursor. Removing all full
    /// rows in one pass avoids skipping a row that slides into the slot of a
    /// row just cleared. The vacated rows at the top are emptied.
    /// Returns the number of rows cleared.
    pub fn clear_lines(&mut self) -> u32 {
        let width = self.width as usize;
        let mut write_y = self.height as usize;
        let mut cleared = 0u32;

        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        if cleared > 0 {
            self.lines_cleared += cleared;
            debug!(cleared, total = self.lines_cleared, "lines cleared");
        }
        cleared
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn increase_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// Level derived from total lines cleared
    pub fn level(&self) -> u32 {
        level_for_lines(self.lines_cleared)
    }

    /// Gravity speed; never decreases within a session
    pub fn speed(&self) -> u32 {
        speed_for_level(self.level())
    }

    /// Record the score for `label` if it beats the stored best.
    ///
    /// Returns whether this score is a new best.
    pub fn save_score<S: ScoreStore + ?Sized>(
        &self,
        store: &mut S,
        label: &str,
    ) -> Result<bool, StoreError> {
        let best = store.load_best(label)?;
        if self.score <= best {
            return Ok(false);
        }
        store.save_best(label, self.score)?;
        debug!(label, score = self.score, previous = best, "new best score");
        Ok(true)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryScoreStore;
    use crate::types::Rgb;

    const X: Block = Block {
        color: Rgb::new(255, 255, 255),
        alias: 'X',
    };

    fn fill_row(board: &mut Board, y: i8) {
        for x in 0..board.width() as i8 {
            board.set(x, y, Some(X));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        let board = Board::default();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_out_of_range_counts_as_occupied() {
        let board = Board::new(6, 8);
        assert!(!board.is_cell_occupied(0, 0));
        assert!(board.is_cell_occupied(-1, 0));
        assert!(board.is_cell_occupied(6, 0));
        assert!(board.is_cell_occupied(0, 8));
        assert_eq!(board.cell(6, 0), None);
    }

    #[test]
    fn test_clear_lines_compacts_non_adjacent_rows() {
        let mut board = Board::default();
        fill_row(&mut board, 19);
        fill_row(&mut board, 17);
        board.set(3, 18, Some(X));
        board.set(5, 16, Some(X));

        assert_eq!(board.clear_lines(), 2);
        assert_eq!(board.lines_cleared(), 2);

        // Row 18 slid down by one, row 16 by two.
        assert!(board.is_cell_occupied(3, 19));
        assert!(board.is_cell_occupied(5, 18));
        assert_eq!(board.filled(), 2);
        assert!(board.row(0).iter().all(|c| c.is_none()));
        assert!(board.row(1).iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_clear_lines_nothing_full() {
        let mut board = Board::default();
        board.set(0, 19, Some(X));
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board.lines_cleared(), 0);
        assert!(board.is_cell_occupied(0, 19));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "overlaps")]
    fn test_lock_on_occupied_cell_panics_in_debug() {
        let mut board = Board::default();
        board.set(1, 1, Some(X));
        let shape = ShapeMatrix::from_rows(&["##", "##"]).unwrap();
        board.lock(&shape, 0, 0, X);
    }

    #[test]
    fn test_save_score_only_on_new_best() {
        let mut store = MemoryScoreStore::default();
        let mut board = Board::default();

        board.increase_score(100);
        assert!(board.save_score(&mut store, "Default").unwrap());
        assert_eq!(store.load_best("Default").unwrap(), 100);

        // Equal score is not a new best.
        assert!(!board.save_score(&mut store, "Default").unwrap());

        let mut other = Board::default();
        other.increase_score(50);
        assert!(!other.save_score(&mut store, "Default").unwrap());
        assert!(other.save_score(&mut store, "Marathon").unwrap());
    }
}
