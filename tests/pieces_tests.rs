//! Piece table, movement and rotation tests through the public API

use blockfall::core::tetromino::kick_offsets;
use blockfall::core::{Board, PieceSet, Tetromino};
use blockfall::types::{Block, Orientation, PieceId, Rgb, Spin};

const X: Block = Block {
    color: Rgb::new(9, 9, 9),
    alias: 'X',
};

fn setup(piece: PieceId) -> (Board, PieceSet, Tetromino) {
    let board = Board::default();
    let pieces = PieceSet::standard();
    let t = Tetromino::spawn(piece, &pieces, board.width());
    (board, pieces, t)
}

#[test]
fn test_every_piece_spawns_centered_and_fits() {
    let pieces = PieceSet::standard();
    let board = Board::default();
    for id in pieces.ids() {
        let t = Tetromino::spawn(id, &pieces, board.width());
        assert!(t.fits(&board), "{:?}", id);
        assert_eq!(t.y, 0);
        assert_eq!(t.x, 5 - pieces.dim(id) as i8 / 2);
        assert_eq!(t.orientation, Orientation::Up);
    }
}

#[test]
fn test_spawn_centering_on_odd_width() {
    let pieces = PieceSet::standard();
    let t = Tetromino::spawn(PieceId::T, &pieces, 7);
    assert_eq!(t.x, 2);
}

#[test]
fn test_four_rotations_in_open_space_restore_state() {
    let (board, pieces, _) = setup(PieceId::I);
    for id in pieces.ids() {
        for spin in [Spin::Cw, Spin::Ccw] {
            let mut t = Tetromino::spawn(id, &pieces, board.width());
            t.y = 8;
            let start = t;
            for _ in 0..4 {
                assert!(t.rotate(&board, &pieces, spin));
            }
            assert_eq!((t.x, t.y, t.orientation), (start.x, start.y, start.orientation));
            assert_eq!(t.shape(), start.shape());
        }
    }
}

#[test]
fn test_o_piece_rotates_without_moving() {
    let (board, pieces, mut o) = setup(PieceId::O);
    let before = o.cells().collect::<Vec<_>>();
    assert!(o.rotate_cw(&board, &pieces));
    assert_eq!(o.orientation, Orientation::Right);
    assert_eq!(o.cells().collect::<Vec<_>>(), before);
}

#[test]
fn test_cw_then_ccw_is_identity_in_open_space() {
    let (board, pieces, mut t) = setup(PieceId::S);
    t.y = 5;
    let start = t;
    assert!(t.rotate_cw(&board, &pieces));
    assert!(t.rotate_ccw(&board, &pieces));
    assert_eq!(t.cells().collect::<Vec<_>>(), start.cells().collect::<Vec<_>>());
}

#[test]
fn test_move_blocked_by_locked_cells() {
    let (mut board, _, mut t) = setup(PieceId::O);
    // O occupies columns 4 and 5 on rows 0 and 1.
    board.set(3, 1, Some(X));
    assert!(!t.move_left(&board));
    assert_eq!(t.x, 4);
    assert!(t.move_right(&board));
    assert_eq!(t.x, 5);
}

#[test]
fn test_kicks_are_tried_in_order() {
    let pieces = PieceSet::standard();
    let t_up = pieces.shape(PieceId::T, Orientation::Right);
    let kicks = kick_offsets(&t_up);
    assert_eq!(
        kicks.as_slice(),
        &[(0, 0), (0, -1), (0, -2), (-1, 0), (1, 0), (-2, 0), (2, 0)]
    );
}

#[test]
fn test_wall_kick_off_left_wall() {
    let (board, pieces, mut t) = setup(PieceId::T);
    // Right-pointing T leaves matrix column 0 empty, so it can hang one
    // column past the left wall.
    assert!(t.rotate_cw(&board, &pieces));
    t.y = 8;
    while t.move_left(&board) {}
    assert_eq!(t.x, -1);

    // Back to Up needs column -1: floor kicks cannot help, (+1, 0) does.
    assert!(t.rotate_ccw(&board, &pieces));
    assert_eq!(t.orientation, Orientation::Up);
    assert_eq!((t.x, t.y), (0, 8));
}

#[test]
fn test_i_kicked_off_right_wall() {
    let (board, pieces, mut i) = setup(PieceId::I);
    assert!(i.rotate_ccw(&board, &pieces));
    assert_eq!(i.orientation, Orientation::Left);
    i.y = 6;
    while i.move_right(&board) {}
    // Vertical I in matrix column 1, hugging column 9.
    assert_eq!(i.x, 8);

    // Flat I needs columns x..x+3 = 8..11: the wall kick pushes it left.
    assert!(i.rotate_ccw(&board, &pieces));
    assert_eq!(i.orientation, Orientation::Down);
    assert!(i.fits(&board));
    assert!(i.cells().all(|(x, _)| (0..10).contains(&x)));
    assert!(i.x < 8);
}

#[test]
fn test_hard_drop_distance_over_stack() {
    let (mut board, _, mut t) = setup(PieceId::T);
    board.set(5, 10, Some(X));
    // T's stem row is matrix row 1, centre column 5 sits over the block.
    let distance = t.hard_drop(&board);
    assert_eq!(distance, 8);
    assert!(t.is_bottom(&board));
    assert!(t.fits(&board));
}
