//! Queue module - preview sequence, hold slot and piece randomizer
//!
//! The preview always holds `depth` upcoming pieces: every draw pops the front
//! and appends one freshly randomized id. The random source is owned by the
//! queue and seedable, so a seed fully determines the piece sequence.
//!
//! Two randomizers are available:
//! - `Uniform`: every draw picks uniformly from the whole table. Long droughts
//!   and repeats are possible.
//! - `Bag`: draws walk a shuffled permutation of the table, reshuffled once
//!   exhausted (the classic "7-bag" for the standard table).

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::types::PieceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Randomizer {
    #[default]
    Uniform,
    Bag,
}

/// Upcoming pieces plus the hold slot
#[derive(Debug, Clone)]
pub struct PieceQueue<R = SmallRng> {
    preview: VecDeque<PieceId>,
    depth: usize,
    held: Option<PieceId>,
    piece_count: u8,
    randomizer: Randomizer,
    /// Remaining ids of the current bag (drawn from the back)
    bag: Vec<PieceId>,
    rng: R,
}

impl PieceQueue<SmallRng> {
    /// Create a queue whose sequence is fully determined by `seed`
    pub fn seeded(piece_count: usize, depth: usize, randomizer: Randomizer, seed: u64) -> Self {
        Self::with_rng(piece_count, depth, randomizer, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PieceQueue<R> {
    /// Create a queue drawing from `piece_count` ids with an explicit RNG.
    ///
    /// `piece_count` comes from a validated piece table and is never zero.
    pub fn with_rng(piece_count: usize, depth: usize, randomizer: Randomizer, rng: R) -> Self {
        debug_assert!(piece_count > 0 && piece_count <= u8::MAX as usize);
        let mut queue = Self {
            preview: VecDeque::with_capacity(depth + 1),
            depth,
            held: None,
            piece_count: piece_count as u8,
            randomizer,
            bag: Vec::with_capacity(piece_count),
            rng,
        };
        for _ in 0..depth {
            let id = queue.next_random();
            queue.preview.push_back(id);
        }
        queue
    }

    fn next_random(&mut self) -> PieceId {
        match self.randomizer {
            Randomizer::Uniform => PieceId(self.rng.gen_range(0..self.piece_count)),
            Randomizer::Bag => {
                if self.bag.is_empty() {
                    self.bag.extend((0..self.piece_count).map(PieceId));
                    self.bag.shuffle(&mut self.rng);
                }
                match self.bag.pop() {
                    Some(id) => id,
                    None => PieceId(0),
                }
            }
        }
    }

    /// Next piece to play. Keeps the preview length constant.
    pub fn spawn(&mut self) -> PieceId {
        let fresh = self.next_random();
        if self.depth == 0 {
            return fresh;
        }
        self.preview.push_back(fresh);
        self.preview.pop_front().unwrap_or(fresh)
    }

    /// Put `current` on hold and return the piece to play instead.
    ///
    /// With an empty slot the replacement comes from [`PieceQueue::spawn`];
    /// otherwise the previously held piece is swapped out and the preview is
    /// left untouched. The once-per-piece rule is enforced by the caller.
    pub fn hold(&mut self, current: PieceId) -> PieceId {
        match self.held.replace(current) {
            Some(previous) => previous,
            None => self.spawn(),
        }
    }

    /// Forget the hold slot and bag, and draw a fresh preview from the
    /// continuing random stream.
    pub fn reset(&mut self) {
        self.held = None;
        self.bag.clear();
        self.preview.clear();
        for _ in 0..self.depth {
            let id = self.next_random();
            self.preview.push_back(id);
        }
    }

    pub fn held(&self) -> Option<PieceId> {
        self.held
    }

    /// Upcoming pieces, next first
    pub fn preview(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.preview.iter().copied()
    }

    /// Peek at the next piece without removing it; `None` with a zero-depth
    /// preview.
    pub fn peek(&self) -> Option<PieceId> {
        self.preview.front().copied()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }
}
