//! Read-only view of a session for presentation layers.

use arrayvec::ArrayVec;

use crate::pieces::ShapeMatrix;
use crate::types::{Block, Cell, Orientation, PieceId, MAX_PIECE_DIM};

/// Occupied cells of one piece, in board coordinates
pub type PieceCells = ArrayVec<(i8, i8), { MAX_PIECE_DIM as usize * MAX_PIECE_DIM as usize }>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub piece: PieceId,
    pub orientation: Orientation,
    pub x: i8,
    pub y: i8,
    pub cells: PieceCells,
    pub block: Block,
}

/// A queued or held piece, drawn in its spawn orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSnapshot {
    pub piece: PieceId,
    pub shape: ShapeMatrix,
    pub block: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimersSnapshot {
    pub fall: u32,
    pub lock_remaining: u32,
    pub shift_held: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Locked cells, row-major
    pub board: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Vec<PieceSnapshot>,
    pub hold: Option<PieceSnapshot>,
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Best score stored for this session label
    pub best: u32,
    /// The last save recorded a new best
    pub new_best: bool,
    pub paused: bool,
    pub game_over: bool,
    pub ticks: u64,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    /// Locked cell at (x, y); `None` for empty or out-of-range cells
    pub fn cell(&self, x: u8, y: u8) -> Cell {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.board[y as usize * self.width as usize + x as usize]
    }

    /// Ghost piece cells: the active cells shifted down to the landing row
    pub fn ghost_cells(&self) -> PieceCells {
        match (&self.active, self.ghost_y) {
            (Some(active), Some(ghost_y)) => {
                let dy = ghost_y - active.y;
                active.cells.iter().map(|&(x, y)| (x, y + dy)).collect()
            }
            _ => PieceCells::new(),
        }
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
