//! Playfield - the board, the active piece and the queue feeding it
//!
//! Every intent-level operation lives here: shifting, rotating, falling,
//! hard dropping, holding and placing. The playfield never runs timers; it is
//! driven by [`crate::clock::SimulationClock`].

use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{debug, info};

use crate::board::Board;
use crate::pieces::PieceSet;
use crate::queue::PieceQueue;
use crate::scoring::{drop_points, line_clear_points};
use crate::tetromino::Tetromino;
use crate::types::{LockEvent, PieceId, Shift, Spin};

/// Result of committing the active piece into the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub lines_cleared: u32,
    /// Points awarded for the line clear
    pub points: u32,
    /// The next piece could not spawn: the session is over
    pub top_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The active piece went on hold and another took its place
    Held,
    /// Already held once this piece, or nothing to hold
    Refused,
    /// The replacement piece did not fit at the spawn position
    TopOut,
}

#[derive(Debug, Clone)]
pub struct Playfield<R = SmallRng> {
    board: Board,
    pieces: PieceSet,
    queue: PieceQueue<R>,
    active: Option<Tetromino>,
    last_event: Option<LockEvent>,
}

impl<R: Rng> Playfield<R> {
    /// Assemble a playfield. No piece is active until the first spawn.
    pub fn new(board: Board, pieces: PieceSet, queue: PieceQueue<R>) -> Self {
        Self {
            board,
            pieces,
            queue,
            active: None,
            last_event: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scripted setups (puzzles, tests).
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn pieces(&self) -> &PieceSet {
        &self.pieces
    }

    pub fn queue(&self) -> &PieceQueue<R> {
        &self.queue
    }

    pub fn active(&self) -> Option<&Tetromino> {
        self.active.as_ref()
    }

    /// Spawn the next piece from the queue
    pub fn spawn_next(&mut self) -> bool {
        let piece = self.queue.spawn();
        self.spawn(piece)
    }

    /// Spawn `piece` at the spawn position. Returns false, leaving no active
    /// piece, when it does not fit (top-out).
    pub fn spawn(&mut self, piece: PieceId) -> bool {
        if !self.pieces.contains(piece) {
            debug_assert!(false, "spawn of unknown piece {:?}", piece);
            return false;
        }

        let tetromino = Tetromino::spawn(piece, &self.pieces, self.board.width());
        if !tetromino.fits(&self.board) {
            info!(piece = piece.0, "spawn blocked");
            self.active = None;
            return false;
        }

        debug!(piece = piece.0, x = tetromino.x, y = tetromino.y, "spawn");
        self.active = Some(tetromino);
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(Shift::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(Shift::Right)
    }

    pub fn shift(&mut self, shift: Shift) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.shift(&self.board, shift)
    }

    pub fn rotate(&mut self, spin: Spin) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.rotate(&self.board, &self.pieces, spin)
    }

    /// Whether the active piece rests on the floor or on locked cells
    pub fn is_bottom(&self) -> bool {
        self.active
            .as_ref()
            .map(|piece| piece.is_bottom(&self.board))
            .unwrap_or(false)
    }

    /// Gravity step
    pub fn fall(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.fall(&self.board)
    }

    /// Player-driven single-row drop; pays soft drop points
    pub fn soft_fall(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let moved = active.soft_fall(&self.board);
        if moved {
            self.board.increase_score(drop_points(1, false));
        }
        moved
    }

    /// Drop the active piece to its resting row and lock it immediately.
    pub fn hard_drop(&mut self) -> Placement {
        let Some(active) = self.active.as_mut() else {
            return Placement::default();
        };
        let rows = active.hard_drop(&self.board);
        self.board.increase_score(drop_points(rows, true));
        self.place_tetromino()
    }

    /// Swap the active piece with the hold slot, once per piece.
    pub fn hold(&mut self) -> HoldOutcome {
        let Some(active) = self.active else {
            return HoldOutcome::Refused;
        };
        if active.held_this_turn() {
            return HoldOutcome::Refused;
        }

        let replacement = self.queue.hold(active.piece);
        debug!(held = active.piece.0, replacement = replacement.0, "hold");
        if !self.spawn(replacement) {
            return HoldOutcome::TopOut;
        }
        if let Some(piece) = self.active.as_mut() {
            piece.mark_held();
        }
        HoldOutcome::Held
    }

    /// Lock the active piece, clear lines, score them and spawn the next
    /// piece. `top_out` reports that the next piece did not fit.
    pub fn place_tetromino(&mut self) -> Placement {
        let Some(mut piece) = self.active.take() else {
            return Placement::default();
        };

        let level = self.board.level();
        piece.lock_into(&mut self.board, &self.pieces);

        let lines_cleared = self.board.clear_lines();
        let points = line_clear_points(lines_cleared, level);
        self.board.increase_score(points);

        let top_out = !self.spawn_next();

        debug!(
            piece = piece.piece.0,
            x = piece.x,
            y = piece.y,
            lines_cleared,
            points,
            top_out,
            "placed"
        );

        self.last_event = Some(LockEvent {
            piece: piece.piece,
            alias: self.pieces.style(piece.piece).alias,
            last_action: piece.last_action(),
            x: piece.x,
            y: piece.y,
            lines_cleared,
            line_clear_score: points,
            top_out,
        });

        Placement {
            lines_cleared,
            points,
            top_out,
        }
    }

    /// Row the active piece would land on (ghost piece)
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active.as_ref()?;
        Some(active.y + active.drop_distance(&self.board) as i8)
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Empty board, fresh queue state, first piece spawned.
    pub fn reset(&mut self) -> bool {
        self.board = Board::new(self.board.width(), self.board.height());
        self.queue.reset();
        self.active = None;
        self.last_event = None;
        self.spawn_next()
    }
}
