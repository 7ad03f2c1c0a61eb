//! Active piece: position, orientation and every collision query.
//!
//! All movement funnels through [`Board::fits`]; a candidate position or shape
//! is committed only when it fits, otherwise the piece is left untouched.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::pieces::{PieceSet, ShapeMatrix};
use crate::types::{LastAction, Orientation, PieceId, Shift, Spin, MAX_PIECE_DIM};

/// Ordered rotation corrections, tried until one fits.
pub type KickList = ArrayVec<(i8, i8), { 1 + (MAX_PIECE_DIM as usize - 1) + 4 }>;

/// Offsets tried when a rotated shape does not fit in place.
///
/// First in place, then upwards one row at a time up to the rotated shape's
/// occupied height minus one (floor kick), then one and two columns to either
/// side (wall kick). This is an approximation of common rotation systems, not
/// a guideline kick table.
pub fn kick_offsets(rotated: &ShapeMatrix) -> KickList {
    let mut kicks = KickList::new();
    kicks.push((0, 0));
    for up in 1..rotated.height() as i8 {
        kicks.push((0, -up));
    }
    for dx in [-1, 1, -2, 2] {
        kicks.push((dx, 0));
    }
    kicks
}

/// The falling, player-controlled piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub piece: PieceId,
    pub orientation: Orientation,
    /// Top-left corner of the shape matrix in board coordinates
    pub x: i8,
    pub y: i8,
    shape: ShapeMatrix,
    fallen: bool,
    held_this_turn: bool,
    last_action: LastAction,
}

impl Tetromino {
    /// Create a piece at the spawn position: horizontally centered, top row,
    /// spawn orientation.
    pub fn spawn(piece: PieceId, pieces: &PieceSet, board_width: u8) -> Self {
        let dim = pieces.dim(piece);
        Self {
            piece,
            orientation: Orientation::Up,
            x: (board_width / 2) as i8 - (dim / 2) as i8,
            y: 0,
            shape: pieces.shape(piece, Orientation::Up),
            fallen: false,
            held_this_turn: false,
            last_action: LastAction::Spawn,
        }
    }

    pub fn shape(&self) -> &ShapeMatrix {
        &self.shape
    }

    /// Occupied cells in board coordinates
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape.cells().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn fallen(&self) -> bool {
        self.fallen
    }

    pub fn held_this_turn(&self) -> bool {
        self.held_this_turn
    }

    pub(crate) fn mark_held(&mut self) {
        self.held_this_turn = true;
    }

    pub fn last_action(&self) -> LastAction {
        self.last_action
    }

    pub fn fits(&self, board: &Board) -> bool {
        board.fits(&self.shape, self.x, self.y)
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.shift(board, Shift::Left)
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.shift(board, Shift::Right)
    }

    pub fn shift(&mut self, board: &Board, shift: Shift) -> bool {
        self.try_offset(board, shift.dx(), 0, LastAction::Shift)
    }

    fn try_offset(&mut self, board: &Board, dx: i8, dy: i8, action: LastAction) -> bool {
        if self.fallen || !board.fits(&self.shape, self.x + dx, self.y + dy) {
            return false;
        }
        self.x += dx;
        self.y += dy;
        self.last_action = action;
        true
    }

    pub fn rotate_cw(&mut self, board: &Board, pieces: &PieceSet) -> bool {
        self.rotate(board, pieces, Spin::Cw)
    }

    pub fn rotate_ccw(&mut self, board: &Board, pieces: &PieceSet) -> bool {
        self.rotate(board, pieces, Spin::Ccw)
    }

    pub fn rotate_full(&mut self, board: &Board, pieces: &PieceSet) -> bool {
        self.rotate(board, pieces, Spin::Half)
    }

    /// Rotate using the authored matrix for the target orientation, applying
    /// the first kick that fits. Returns false, leaving the piece unchanged,
    /// when none does.
    pub fn rotate(&mut self, board: &Board, pieces: &PieceSet, spin: Spin) -> bool {
        if self.fallen {
            return false;
        }

        let orientation = spin.apply(self.orientation);
        let shape = pieces.shape(self.piece, orientation);

        for (dx, dy) in kick_offsets(&shape) {
            if board.fits(&shape, self.x + dx, self.y + dy) {
                self.orientation = orientation;
                self.shape = shape;
                self.x += dx;
                self.y += dy;
                self.last_action = LastAction::Rotate;
                return true;
            }
        }

        false
    }

    /// Resting on the floor or on locked cells
    pub fn is_bottom(&self, board: &Board) -> bool {
        !board.fits(&self.shape, self.x, self.y + 1)
    }

    /// Drop one row.
    ///
    /// Callers check [`Tetromino::is_bottom`] first and lock instead; falling
    /// into a blocked row panics in debug builds and is ignored in release.
    pub fn fall(&mut self, board: &Board) -> bool {
        let moved = self.try_offset(board, 0, 1, LastAction::Fall);
        debug_assert!(moved || self.fallen, "fall() called on a resting piece");
        moved
    }

    /// Same as [`Tetromino::fall`] but recorded as player-driven
    pub(crate) fn soft_fall(&mut self, board: &Board) -> bool {
        self.try_offset(board, 0, 1, LastAction::SoftDrop)
    }

    /// Rows the piece can fall before resting
    pub fn drop_distance(&self, board: &Board) -> u32 {
        let mut distance = 0i8;
        while board.fits(&self.shape, self.x, self.y + distance + 1) {
            distance += 1;
        }
        distance as u32
    }

    /// Move straight down as far as possible. Returns rows travelled; the
    /// caller locks the piece right away.
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        if self.fallen {
            return 0;
        }
        let distance = self.drop_distance(board);
        self.y += distance as i8;
        self.last_action = LastAction::HardDrop;
        distance
    }

    /// Write the piece into the board and mark it fallen.
    pub fn lock_into(&mut self, board: &mut Board, pieces: &PieceSet) -> bool {
        if self.fallen {
            return false;
        }
        let locked = board.lock(&self.shape, self.x, self.y, pieces.style(self.piece));
        self.fallen = true;
        locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Block, Rgb};

    const X: Block = Block {
        color: Rgb::new(9, 9, 9),
        alias: 'X',
    };

    fn spawn(piece: PieceId) -> (Board, PieceSet, Tetromino) {
        let board = Board::default();
        let pieces = PieceSet::standard();
        let t = Tetromino::spawn(piece, &pieces, board.width());
        (board, pieces, t)
    }

    #[test]
    fn test_spawn_position() {
        let (_, _, i) = spawn(PieceId::I);
        assert_eq!((i.x, i.y), (3, 0));
        let (_, _, t) = spawn(PieceId::T);
        assert_eq!((t.x, t.y), (4, 0));
        let (_, _, o) = spawn(PieceId::O);
        assert_eq!((o.x, o.y), (4, 0));
        assert_eq!(o.orientation, Orientation::Up);
        assert!(!o.fallen());
        assert!(!o.held_this_turn());
    }

    #[test]
    fn test_move_stops_at_wall() {
        let (board, _, mut t) = spawn(PieceId::T);
        let mut moves = 0;
        while t.move_left(&board) {
            moves += 1;
        }
        assert_eq!(moves, 4);
        assert_eq!(t.x, 0);
        assert!(t.fits(&board));
    }

    #[test]
    fn test_shift_follows_direction() {
        let (board, _, mut t) = spawn(PieceId::T);
        assert!(t.shift(&board, Shift::Right));
        assert_eq!(t.x, 5);
        assert!(t.shift(&board, Shift::Left));
        assert!(t.shift(&board, Shift::Left));
        assert_eq!(t.x, 3);
        assert_eq!(t.last_action(), LastAction::Shift);
    }

    #[test]
    fn test_rotation_cycle_returns_to_start() {
        let (board, pieces, mut t) = spawn(PieceId::J);
        let start = t;
        for _ in 0..4 {
            assert!(t.rotate_cw(&board, &pieces));
        }
        assert_eq!(t.orientation, start.orientation);
        assert_eq!(t.shape(), start.shape());

        assert!(t.rotate_full(&board, &pieces));
        assert_eq!(t.orientation, Orientation::Down);
        assert!(t.rotate_ccw(&board, &pieces));
        assert_eq!(t.orientation, Orientation::Right);
    }

    #[test]
    fn test_floor_kick_lifts_piece() {
        let (board, pieces, mut i) = spawn(PieceId::I);
        // Horizontal I on the floor: its row is matrix row 1.
        i.y = board.height() as i8 - 2;
        assert!(i.is_bottom(&board));

        // Vertical I needs three more rows above; it must be lifted.
        assert!(i.rotate_cw(&board, &pieces));
        assert_eq!(i.orientation, Orientation::Right);
        assert!(i.fits(&board));
        assert!(i.y < board.height() as i8 - 2);
    }

    #[test]
    fn test_wall_kick_moves_away_from_wall() {
        let (board, pieces, mut i) = spawn(PieceId::I);
        assert!(i.rotate_cw(&board, &pieces));
        while i.move_right(&board) {}
        // Vertical I hugging the right wall: column 2 of the matrix is at x = 9.
        assert_eq!(i.x, 7);

        assert!(i.rotate_cw(&board, &pieces));
        assert_eq!(i.orientation, Orientation::Down);
        assert!(i.fits(&board));
        assert!(i.cells().all(|(x, _)| x <= 9));
    }

    #[test]
    fn test_blocked_rotation_leaves_piece_unchanged() {
        let (mut board, pieces, mut i) = spawn(PieceId::I);
        // Put the horizontal I into a one-row slot sealed on all sides.
        for x in 0..10 {
            for y in 15..20 {
                if y != 18 {
                    board.set(x, y, Some(X));
                }
            }
        }
        board.set(0, 18, Some(X));
        board.set(1, 18, Some(X));
        i.y = 17;
        assert!(i.fits(&board));

        let before = i;
        assert!(!i.rotate_cw(&board, &pieces));
        assert!(!i.rotate_ccw(&board, &pieces));
        assert!(!i.rotate_full(&board, &pieces));
        assert_eq!(i, before);
    }

    #[test]
    fn test_hard_drop_rests_on_floor() {
        let (board, _, mut o) = spawn(PieceId::O);
        assert_eq!(o.drop_distance(&board), 18);
        assert_eq!(o.hard_drop(&board), 18);
        assert!(o.is_bottom(&board));
        assert_eq!(o.last_action(), LastAction::HardDrop);
    }

    #[test]
    fn test_lock_marks_fallen_and_freezes_piece() {
        let (mut board, pieces, mut o) = spawn(PieceId::O);
        o.hard_drop(&board);
        assert!(o.lock_into(&mut board, &pieces));
        assert!(o.fallen());
        assert_eq!(board.filled(), 4);
        assert_eq!(board.cell(4, 19), Some(Some(pieces.style(PieceId::O))));

        assert!(!o.move_left(&board));
        assert!(!o.rotate_cw(&board, &pieces));
        assert!(!o.lock_into(&mut board, &pieces));
    }

    #[test]
    fn test_kick_list_is_bounded() {
        let pieces = PieceSet::standard();
        let vertical = pieces.shape(PieceId::I, Orientation::Right);
        let kicks = kick_offsets(&vertical);
        assert_eq!(kicks[0], (0, 0));
        assert_eq!(&kicks[1..4], &[(0, -1), (0, -2), (0, -3)]);
        assert_eq!(kicks.len(), 8);

        let flat = pieces.shape(PieceId::I, Orientation::Up);
        assert_eq!(kick_offsets(&flat).len(), 5);
    }
}
