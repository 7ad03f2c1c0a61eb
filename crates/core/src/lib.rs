//! Core simulation - pure, deterministic, and testable
//!
//! This crate holds every game rule: the board, piece geometry, the preview
//! and hold queue, scoring, and the fixed-timestep clock that drives them. It
//! has no dependency on the terminal, the keyboard or the file system; best
//! scores go through the [`ScoreStore`] trait.
//!
//! - **Deterministic**: the same seed and the same input frames produce the
//!   same game
//! - **Headless**: runs in tests and benches without a terminal
//!
//! # Module Structure
//!
//! - [`board`]: locked cells, line clears, score and level
//! - [`pieces`]: authored shape matrices per piece and orientation
//! - [`tetromino`]: the active piece, collision and rotation kicks
//! - [`queue`]: preview, hold slot and randomizer
//! - [`playfield`]: intent-level operations (move, rotate, drop, hold, place)
//! - [`clock`]: fall timer, lock delay and auto-repeat, stepped once per tick
//! - [`game`]: a session with pause, restart and best-score bookkeeping
//! - [`scoring`]: line clear and drop points, level and speed
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Game, GameConfig};
//! use blockfall_types::{InputFrame, Intent};
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//!
//! game.tick(&InputFrame::press(Intent::MoveRight));
//! game.tick(&InputFrame::press(Intent::RotateCw));
//! let outcome = game.tick(&InputFrame::press(Intent::HardDrop));
//!
//! assert!(outcome.placement.is_some());
//! assert!(game.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! Call [`Game::tick`] 60 times per second. Gravity accumulates `1 + speed`
//! per tick and drops the piece one row every 60; a resting piece locks after
//! 30 ticks unless moved or rotated.

pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod pieces;
pub mod playfield;
pub mod queue;
pub mod scoring;
pub mod snapshot;
pub mod store;
pub mod tetromino;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use clock::{AutoRepeat, FallTimer, LockDelay, SimulationClock, StepOutcome};
pub use config::GameConfig;
pub use error::{ConfigError, StoreError};
pub use game::{Game, TickOutcome};
pub use pieces::{PieceDef, PieceSet, ShapeMatrix};
pub use playfield::{HoldOutcome, Placement, Playfield};
pub use queue::{PieceQueue, Randomizer};
pub use scoring::{drop_points, line_clear_points};
pub use snapshot::{ActiveSnapshot, GameSnapshot, PieceSnapshot, TimersSnapshot};
pub use store::{MemoryScoreStore, ScoreStore};
pub use tetromino::Tetromino;
