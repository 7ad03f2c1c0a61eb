//! Game session - playfield, clock and session flags
//!
//! A [`Game`] is what a front-end drives: build it from a [`GameConfig`], call
//! [`Game::tick`] once per frame with that frame's [`InputFrame`], and draw
//! [`Game::snapshot`]. Pause and restart are handled here; everything else is
//! forwarded to the [`SimulationClock`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::board::Board;
use crate::clock::SimulationClock;
use crate::config::GameConfig;
use crate::error::{ConfigError, StoreError};
use crate::playfield::{Placement, Playfield};
use crate::queue::PieceQueue;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, PieceSnapshot, TimersSnapshot};
use crate::store::ScoreStore;
use crate::types::{InputFrame, Intent, LockEvent, Orientation, PieceId};

/// Seed used when the configuration does not name one
pub const DEFAULT_SEED: u64 = 1;

/// What one call to [`Game::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub placement: Option<Placement>,
    pub lock_event: Option<LockEvent>,
    pub rows_fallen: u32,
    /// The session ended during this tick
    pub game_over: bool,
    pub restarted: bool,
}

#[derive(Debug, Clone)]
pub struct Game<R = SmallRng> {
    field: Playfield<R>,
    clock: SimulationClock,
    config: GameConfig,
    paused: bool,
    game_over: bool,
    best: u32,
    new_best: bool,
    last_event: Option<LockEvent>,
}

impl Game<SmallRng> {
    /// Validate `config` and start a session seeded from it.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = SmallRng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let pieces = config.piece_set()?;
        let queue = PieceQueue::with_rng(
            pieces.len(),
            config.preview_depth as usize,
            config.randomizer,
            rng,
        );
        let board = Board::new(config.width, config.height);
        let mut field = Playfield::new(board, pieces, queue);
        let started = field.spawn_next();

        info!(
            width = config.width,
            height = config.height,
            pieces = field.pieces().len(),
            label = %config.session_label,
            "session started"
        );

        Ok(Self {
            field,
            clock: SimulationClock::from_config(&config),
            config,
            paused: false,
            game_over: !started,
            best: 0,
            new_best: false,
            last_event: None,
        })
    }

    /// Advance the session by one frame.
    pub fn tick(&mut self, input: &InputFrame) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for &intent in &input.pressed {
            match intent {
                Intent::Restart => {
                    self.restart();
                    outcome.restarted = true;
                    return outcome;
                }
                Intent::Pause if !self.game_over => {
                    self.paused = !self.paused;
                    info!(paused = self.paused, "pause toggled");
                }
                _ => {}
            }
        }

        if self.paused || self.game_over {
            return outcome;
        }

        let step = self.clock.step(&mut self.field, input);
        outcome.placement = step.placement;
        outcome.rows_fallen = step.rows_fallen;

        if let Some(event) = self.field.take_last_event() {
            self.last_event = Some(event);
            outcome.lock_event = Some(event);
        }

        if step.game_over {
            self.game_over = true;
            outcome.game_over = true;
            info!(
                score = self.score(),
                lines = self.lines(),
                level = self.level(),
                "game over"
            );
        }

        outcome
    }

    /// Start over with an empty board. The piece sequence continues from the
    /// same random stream.
    pub fn restart(&mut self) {
        let started = self.field.reset();
        self.clock = SimulationClock::from_config(&self.config);
        self.paused = false;
        self.game_over = !started;
        self.new_best = false;
        self.last_event = None;
        info!(label = %self.config.session_label, "session restarted");
    }

    /// Read the stored best score for this session's label.
    pub fn load_best<S: ScoreStore + ?Sized>(&mut self, store: &S) -> Result<u32, StoreError> {
        self.best = store.load_best(&self.config.session_label)?;
        Ok(self.best)
    }

    /// Persist the current score if it beats the stored best.
    pub fn save_score<S: ScoreStore + ?Sized>(&mut self, store: &mut S) -> Result<bool, StoreError> {
        let new_best = self
            .field
            .board()
            .save_score(store, &self.config.session_label)?;
        if new_best {
            self.best = self.score();
            self.new_best = true;
        }
        Ok(new_best)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let board = self.field.board();
        let pieces = self.field.pieces();
        let queue = self.field.queue();
        let piece_snapshot = |piece: PieceId| PieceSnapshot {
            piece,
            shape: pieces.shape(piece, Orientation::Up),
            block: pieces.style(piece),
        };

        let active = self.field.active().map(|t| ActiveSnapshot {
            piece: t.piece,
            orientation: t.orientation,
            x: t.x,
            y: t.y,
            cells: t.cells().collect(),
            block: pieces.style(t.piece),
        });

        GameSnapshot {
            width: board.width(),
            height: board.height(),
            board: board.cells().to_vec(),
            active,
            ghost_y: self.field.ghost_y(),
            next: queue.preview().map(piece_snapshot).collect(),
            hold: queue.held().map(piece_snapshot),
            can_hold: self
                .field
                .active()
                .map(|t| !t.held_this_turn())
                .unwrap_or(false),
            score: board.score(),
            level: board.level(),
            lines: board.lines_cleared(),
            best: self.best,
            new_best: self.new_best,
            paused: self.paused,
            game_over: self.game_over,
            ticks: self.clock.ticks(),
            timers: TimersSnapshot {
                fall: self.clock.fall().value(),
                lock_remaining: self.clock.lock().remaining(),
                shift_held: self.clock.auto_repeat().held(),
            },
        }
    }

    pub fn playfield(&self) -> &Playfield<R> {
        &self.field
    }

    /// Direct playfield access for scripted setups
    pub fn playfield_mut(&mut self) -> &mut Playfield<R> {
        &mut self.field
    }

    pub fn board(&self) -> &Board {
        self.field.board()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.field.board().score()
    }

    pub fn level(&self) -> u32 {
        self.field.board().level()
    }

    pub fn lines(&self) -> u32 {
        self.field.board().lines_cleared()
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn last_event(&self) -> Option<&LockEvent> {
        self.last_event.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryScoreStore;
    use crate::types::{Block, Rgb};

    fn game() -> Game {
        Game::new(GameConfig {
            seed: Some(12345),
            ..GameConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_game_has_active_piece() {
        let game = game();
        let snap = game.snapshot();
        assert!(snap.active.is_some());
        assert_eq!(snap.next.len(), 5);
        assert!(snap.hold.is_none());
        assert!(snap.can_hold);
        assert!(snap.playable());
        assert_eq!(snap.board.len(), 200);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            width: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new(config),
            Err(ConfigError::BoardSize { .. })
        ));
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut game = game();
        game.tick(&InputFrame::press(Intent::Pause));
        assert!(game.paused());

        let before = game.snapshot();
        for _ in 0..200 {
            game.tick(&InputFrame::press(Intent::HardDrop));
        }
        assert_eq!(game.snapshot().board, before.board);
        assert_eq!(game.score(), 0);

        game.tick(&InputFrame::press(Intent::Pause));
        assert!(!game.paused());
    }

    #[test]
    fn test_hard_drops_until_game_over_then_restart() {
        let mut game = game();
        let mut ended = false;
        for _ in 0..500 {
            if game.tick(&InputFrame::press(Intent::HardDrop)).game_over {
                ended = true;
                break;
            }
        }
        assert!(ended);
        assert!(game.game_over());
        assert!(game.last_event().map(|e| e.top_out).unwrap_or(false));

        // Ticks after game over are inert.
        let score = game.score();
        game.tick(&InputFrame::press(Intent::HardDrop));
        assert_eq!(game.score(), score);

        let outcome = game.tick(&InputFrame::press(Intent::Restart));
        assert!(outcome.restarted);
        assert!(!game.game_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.board().filled(), 0);
    }

    #[test]
    fn test_best_score_round_trip() {
        let mut store = MemoryScoreStore::default();
        let mut game = game();
        assert_eq!(game.load_best(&store).unwrap(), 0);

        game.tick(&InputFrame::press(Intent::HardDrop));
        assert!(game.score() > 0);
        assert!(game.save_score(&mut store).unwrap());
        assert!(game.snapshot().new_best);
        assert_eq!(store.load_best("Default").unwrap(), game.score());

        // Equal score is not a new best.
        assert!(!game.save_score(&mut store).unwrap());
    }

    #[test]
    fn test_lock_event_surfaces_in_outcome() {
        let mut game = game();
        let piece = game.playfield().active().unwrap().piece;
        let outcome = game.tick(&InputFrame::press(Intent::HardDrop));
        let event = outcome.lock_event.unwrap();
        assert_eq!(event.piece, piece);
        assert_eq!(game.last_event(), Some(&event));
    }

    #[test]
    fn test_snapshot_ghost_sits_on_stack() {
        let mut game = game();
        let block = Block {
            color: Rgb::new(1, 1, 1),
            alias: 'X',
        };
        for x in 0..10 {
            if x != 0 {
                game.playfield_mut().board_mut().set(x, 19, Some(block));
            }
        }
        let snap = game.snapshot();
        let ghost = snap.ghost_cells();
        assert_eq!(ghost.len(), 4);
        assert!(ghost.iter().all(|&(x, y)| snap.cell(x as u8, y as u8).is_none()));
        assert!(ghost.iter().all(|&(_, y)| y <= 18));
    }
}
