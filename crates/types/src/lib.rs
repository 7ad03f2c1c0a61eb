//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the simulation core, the
//! terminal front-end and the input layer alike.
//!
//! # Board Dimensions
//!
//! Default playfield dimensions (configurable per session):
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//!
//! # Timing
//!
//! The simulation runs one step per frame at a fixed rate. All timers are
//! integer tick counters:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICKS_PER_SECOND` | 60 | Fixed simulation rate |
//! | `TICK_MS` | 16 | Frame interval (~60 FPS) |
//! | `FALL_THRESHOLD` | 60 | Fall timer value that triggers one row of gravity |
//! | `BASE_FALL_RATE` | 1 | Fall timer increment per tick (plus speed) |
//! | `SOFT_DROP_RATE` | 5 | Extra increment while soft drop is held (plus speed) |
//! | `SOFT_DROP_AIRBORNE_RATE` | 15 | Further increment while not resting (plus speed) |
//! | `LOCK_DELAY_TICKS` | 30 | Resting ticks before a piece locks |
//! | `DAS_TICKS` | 10 | Held ticks before auto-repeat starts |
//! | `ARR_TICKS` | 2 | Ticks between auto-repeats |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Intent, Orientation, PieceId, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let orientation = Orientation::Up;
//! assert_eq!(orientation.rotate_cw(), Orientation::Right);
//! assert_eq!(orientation.flip(), Orientation::Down);
//!
//! assert_eq!(PieceId::T.index(), 2);
//! assert_eq!(Intent::Rotate180.as_str(), "rotate180");
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const BOARD_WIDTH: u8 = 10;

/// Default board height in cells
pub const BOARD_HEIGHT: u8 = 20;

/// Smallest accepted board side
pub const MIN_BOARD_SIDE: u8 = 4;

/// Largest accepted board side
pub const MAX_BOARD_SIDE: u8 = 64;

/// Largest bounding dimension of a piece shape matrix
pub const MAX_PIECE_DIM: u8 = 4;

/// Fixed simulation rate
pub const TICKS_PER_SECOND: u32 = 60;

/// Frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Fall timer value at which the active piece drops one row
pub const FALL_THRESHOLD: u32 = 60;

/// Fall timer increment per tick, before speed is added
pub const BASE_FALL_RATE: u32 = 1;

/// Extra fall timer increment per tick while soft drop is held
pub const SOFT_DROP_RATE: u32 = 5;

/// Additional soft drop increment while the piece is not resting
pub const SOFT_DROP_AIRBORNE_RATE: u32 = 15;

/// Resting ticks before the piece locks (0.5s)
pub const LOCK_DELAY_TICKS: u32 = 30;

/// Held ticks before horizontal auto-repeat kicks in
pub const DAS_TICKS: u32 = 10;

/// Ticks between horizontal auto-repeats
pub const ARR_TICKS: u32 = 2;

/// Default number of upcoming pieces shown
pub const DEFAULT_PREVIEW_DEPTH: u8 = 5;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Highest speed value; gravity stops accelerating past this
pub const MAX_SPEED: u32 = 29;

/// Line clear scoring (classic rules), indexed by simultaneous line count
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points per row fallen under soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row travelled by a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Identifier into a piece definition table.
///
/// The associated constants name the slots of the standard seven-piece table;
/// custom tables may use any index below their piece count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    pub const I: PieceId = PieceId(0);
    pub const O: PieceId = PieceId(1);
    pub const T: PieceId = PieceId(2);
    pub const S: PieceId = PieceId(3);
    pub const Z: PieceId = PieceId(4);
    pub const J: PieceId = PieceId(5);
    pub const L: PieceId = PieceId(6);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Rotation states (Up = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Up,
    Right,
    Down,
    Left,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Right,
        Orientation::Down,
        Orientation::Left,
    ];

    /// Rotate clockwise
    pub fn rotate_cw(self) -> Self {
        match self {
            Orientation::Up => Orientation::Right,
            Orientation::Right => Orientation::Down,
            Orientation::Down => Orientation::Left,
            Orientation::Left => Orientation::Up,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(self) -> Self {
        match self {
            Orientation::Up => Orientation::Left,
            Orientation::Left => Orientation::Down,
            Orientation::Down => Orientation::Right,
            Orientation::Right => Orientation::Up,
        }
    }

    /// Rotate 180 degrees
    pub fn flip(self) -> Self {
        self.rotate_cw().rotate_cw()
    }

    pub fn index(self) -> usize {
        match self {
            Orientation::Up => 0,
            Orientation::Right => 1,
            Orientation::Down => 2,
            Orientation::Left => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Up => "up",
            Orientation::Right => "right",
            Orientation::Down => "down",
            Orientation::Left => "left",
        }
    }
}

/// Direction of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Cw,
    Ccw,
    Half,
}

impl Spin {
    pub fn apply(self, orientation: Orientation) -> Orientation {
        match self {
            Spin::Cw => orientation.rotate_cw(),
            Spin::Ccw => orientation.rotate_ccw(),
            Spin::Half => orientation.flip(),
        }
    }
}

/// Horizontal shift direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    pub fn dx(self) -> i8 {
        match self {
            Shift::Left => -1,
            Shift::Right => 1,
        }
    }
}

/// Discrete player intents, delivered once per key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    Rotate180,
    SoftDrop,
    HardDrop,
    Hold,
    Pause,
    Restart,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MoveLeft => "moveLeft",
            Intent::MoveRight => "moveRight",
            Intent::RotateCw => "rotateCw",
            Intent::RotateCcw => "rotateCcw",
            Intent::Rotate180 => "rotate180",
            Intent::SoftDrop => "softDrop",
            Intent::HardDrop => "hardDrop",
            Intent::Hold => "hold",
            Intent::Pause => "pause",
            Intent::Restart => "restart",
        }
    }
}

/// Keys currently held down, sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
}

impl HeldKeys {
    /// The held horizontal direction. Both or neither held means none.
    pub fn shift(&self) -> Option<Shift> {
        match (self.left, self.right) {
            (true, false) => Some(Shift::Left),
            (false, true) => Some(Shift::Right),
            _ => None,
        }
    }
}

/// Everything the input layer reports for one simulation tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Edge-triggered intents, applied in order
    pub pressed: ArrayVec<Intent, 16>,
    pub held: HeldKeys,
}

impl InputFrame {
    /// A frame with no input at all
    pub fn idle() -> Self {
        Self::default()
    }

    /// A frame carrying a single key press
    pub fn press(intent: Intent) -> Self {
        let mut frame = Self::default();
        frame.pressed.push(intent);
        frame
    }

    /// Add a pressed intent; extra intents beyond capacity are dropped
    pub fn push(&mut self, intent: Intent) {
        let _ = self.pressed.try_push(intent);
    }

    pub fn with_held(mut self, held: HeldKeys) -> Self {
        self.held = held;
        self
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Drawing metadata of a locked cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub color: Rgb,
    pub alias: char,
}

/// Cell on the board (None = empty)
pub type Cell = Option<Block>;

/// How the piece reached its final position before locking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LastAction {
    Spawn,
    Shift,
    Rotate,
    Fall,
    SoftDrop,
    HardDrop,
}

/// Record of the most recent lock, consumed by observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub piece: PieceId,
    pub alias: char,
    pub last_action: LastAction,
    pub x: i8,
    pub y: i8,
    pub lines_cleared: u32,
    pub line_clear_score: u32,
    pub top_out: bool,
}
