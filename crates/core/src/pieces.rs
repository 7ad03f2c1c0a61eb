//! Pieces module - piece definition table
//!
//! Every piece has four authored shape matrices, one per orientation. Rotation
//! looks the next matrix up instead of transposing, which keeps asymmetric and
//! off-center pieces (I, S, Z) where players expect them.
//!
//! Matrices are square, at most 4x4, stored as a 16-bit mask
//! (bit `row * 4 + col`).

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{Block, Orientation, PieceId, Rgb, MAX_PIECE_DIM};

/// Offset of a single cell relative to the matrix's top-left corner
pub type CellOffset = (i8, i8);

/// N×N occupancy grid of a piece in one orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    dim: u8,
    bits: u16,
}

impl ShapeMatrix {
    /// Parse a matrix from text rows, `#`/`X` occupied, `.`/space empty.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, String> {
        let dim = rows.len();
        if dim == 0 || dim > MAX_PIECE_DIM as usize {
            return Err(format!("matrix must have 1..={} rows, got {}", MAX_PIECE_DIM, dim));
        }

        let mut bits = 0u16;
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != dim {
                return Err(format!("row {} is not {} cells wide", row, dim));
            }
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '#' | 'X' | 'x' => bits |= 1 << (row * 4 + col),
                    '.' | ' ' => {}
                    other => return Err(format!("unexpected character {:?}", other)),
                }
            }
        }

        if bits == 0 {
            return Err("matrix has no occupied cells".to_string());
        }

        Ok(Self {
            dim: dim as u8,
            bits,
        })
    }

    /// Bounding dimension N
    pub fn dim(&self) -> u8 {
        self.dim
    }

    pub fn is_set(&self, col: u8, row: u8) -> bool {
        col < self.dim && row < self.dim && self.bits & (1 << (row * 4 + col)) != 0
    }

    /// Occupied cells as (dx, dy) offsets, row-major
    pub fn cells(&self) -> impl Iterator<Item = CellOffset> + '_ {
        let dim = self.dim;
        (0..dim).flat_map(move |row| {
            (0..dim)
                .filter(move |&col| self.is_set(col, row))
                .map(move |col| (col as i8, row as i8))
        })
    }

    /// Number of occupied cells
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Rows spanned by occupied cells
    pub fn height(&self) -> u8 {
        let mut top = None;
        let mut bottom = 0;
        for (_, dy) in self.cells() {
            top.get_or_insert(dy);
            bottom = dy;
        }
        top.map(|t| (bottom - t + 1) as u8).unwrap_or(0)
    }
}

/// Serialized form of one piece, as found in configuration files
#[derive(Debug, Clone, Deserialize)]
pub struct PieceDef {
    pub alias: char,
    pub color: Rgb,
    /// Matrices for up, right, down, left
    pub orientations: [Vec<String>; 4],
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PieceEntry {
    block: Block,
    shapes: [ShapeMatrix; 4],
}

/// Piece definition table: {piece × orientation} → shape, plus drawing style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSet {
    pieces: Vec<PieceEntry>,
}

impl PieceSet {
    /// Build a table from serialized definitions.
    pub fn from_defs(defs: &[PieceDef]) -> Result<Self, ConfigError> {
        if defs.is_empty() {
            return Err(ConfigError::EmptyPieceTable);
        }
        if defs.len() > u8::MAX as usize {
            return Err(ConfigError::TooManyPieces(defs.len()));
        }

        let mut pieces = Vec::with_capacity(defs.len());
        for def in defs {
            let mut shapes = [ShapeMatrix { dim: 0, bits: 0 }; 4];
            for orientation in Orientation::ALL {
                let rows = &def.orientations[orientation.index()];
                let shape =
                    ShapeMatrix::from_rows(rows).map_err(|reason| ConfigError::MalformedShape {
                        alias: def.alias,
                        orientation,
                        reason,
                    })?;
                shapes[orientation.index()] = shape;
            }

            if let Some(o) = Orientation::ALL
                .into_iter()
                .find(|o| shapes[o.index()].dim() != shapes[0].dim())
            {
                return Err(ConfigError::MalformedShape {
                    alias: def.alias,
                    orientation: o,
                    reason: "all orientations must share one bounding dimension".to_string(),
                });
            }

            pieces.push(PieceEntry {
                block: Block {
                    color: def.color,
                    alias: def.alias,
                },
                shapes,
            });
        }

        Ok(Self { pieces })
    }

    /// The standard seven tetrominoes.
    pub fn standard() -> Self {
        let entry = |alias, color, shapes: [[&str; 4]; 4]| PieceEntry {
            block: Block { color, alias },
            shapes: shapes.map(|rows| {
                let dim = rows.iter().filter(|r| !r.is_empty()).count();
                ShapeMatrix::from_rows(&rows[..dim]).unwrap_or(ShapeMatrix { dim: 0, bits: 0 })
            }),
        };

        Self {
            pieces: vec![
                entry(
                    'I',
                    Rgb::new(80, 220, 220),
                    [
                        ["....", "####", "....", "...."],
                        ["..#.", "..#.", "..#.", "..#."],
                        ["....", "....", "####", "...."],
                        [".#..", ".#..", ".#..", ".#.."],
                    ],
                ),
                entry(
                    'O',
                    Rgb::new(240, 220, 80),
                    [["##", "##", "", ""]; 4],
                ),
                entry(
                    'T',
                    Rgb::new(200, 120, 220),
                    [
                        [".#.", "###", "...", ""],
                        [".#.", ".##", ".#.", ""],
                        ["...", "###", ".#.", ""],
                        [".#.", "##.", ".#.", ""],
                    ],
                ),
                entry(
                    'S',
                    Rgb::new(100, 220, 120),
                    [
                        [".##", "##.", "...", ""],
                        [".#.", ".##", "..#", ""],
                        ["...", ".##", "##.", ""],
                        ["#..", "##.", ".#.", ""],
                    ],
                ),
                entry(
                    'Z',
                    Rgb::new(220, 80, 80),
                    [
                        ["##.", ".##", "...", ""],
                        ["..#", ".##", ".#.", ""],
                        ["...", "##.", ".##", ""],
                        [".#.", "##.", "#..", ""],
                    ],
                ),
                entry(
                    'J',
                    Rgb::new(80, 120, 220),
                    [
                        ["#..", "###", "...", ""],
                        [".##", ".#.", ".#.", ""],
                        ["...", "###", "..#", ""],
                        [".#.", ".#.", "##.", ""],
                    ],
                ),
                entry(
                    'L',
                    Rgb::new(255, 165, 0),
                    [
                        ["..#", "###", "...", ""],
                        [".#.", ".#.", ".##", ""],
                        ["...", "###", "#..", ""],
                        ["##.", ".#.", ".#.", ""],
                    ],
                ),
            ],
        }
    }

    /// Number of pieces in the table (never zero)
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// All identifiers in table order
    pub fn ids(&self) -> impl Iterator<Item = PieceId> {
        (0..self.pieces.len() as u8).map(PieceId)
    }

    pub fn contains(&self, id: PieceId) -> bool {
        id.index() < self.pieces.len()
    }

    /// Shape of `id` in `orientation`.
    ///
    /// Ids come from the queue, which only produces ids below [`Self::len`].
    pub fn shape(&self, id: PieceId, orientation: Orientation) -> ShapeMatrix {
        self.pieces[id.index()].shapes[orientation.index()]
    }

    /// Color and alias written into locked cells
    pub fn style(&self, id: PieceId) -> Block {
        self.pieces[id.index()].block
    }

    /// Bounding dimension shared by all orientations of `id`
    pub fn dim(&self, id: PieceId) -> u8 {
        self.pieces[id.index()].shapes[0].dim()
    }
}

impl Default for PieceSet {
    fn default() -> Self {
        Self::standard()
    }
}
