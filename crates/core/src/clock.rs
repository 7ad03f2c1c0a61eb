//! Simulation clock - the fixed-timestep driver
//!
//! One call to [`SimulationClock::step`] is one tick (1/60 s). Each tick runs,
//! in order:
//!
//! 1. pressed intents (moves, rotations, hold, soft drop, hard drop);
//! 2. auto-repeat for a held left/right key;
//! 3. the fall timer (gravity, accelerated by a held soft drop);
//! 4. the lock delay, which locks a resting piece once it runs out.
//!
//! All timers are plain tick counters owned by the clock. The playfield never
//! looks at them.

use rand::Rng;

use crate::config::GameConfig;
use crate::playfield::{HoldOutcome, Placement, Playfield};
use crate::types::{
    InputFrame, Intent, Shift, Spin, BASE_FALL_RATE, SOFT_DROP_AIRBORNE_RATE, SOFT_DROP_RATE,
};

/// Gravity accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallTimer {
    value: u32,
    threshold: u32,
}

impl FallTimer {
    pub fn new(threshold: u32) -> Self {
        Self {
            value: 0,
            threshold: threshold.max(1),
        }
    }

    /// Accumulate one tick. Returns true once the threshold is reached; the
    /// caller applies gravity and calls [`FallTimer::reset`].
    pub fn advance(&mut self, speed: u32, soft_drop: bool, resting: bool) -> bool {
        let mut step = BASE_FALL_RATE + speed;
        if soft_drop {
            step += SOFT_DROP_RATE + speed;
            if !resting {
                step += SOFT_DROP_AIRBORNE_RATE + speed;
            }
        }
        self.value = self.value.saturating_add(step);
        self.value >= self.threshold
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Countdown that runs while the piece rests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockDelay {
    remaining: u32,
    delay: u32,
    resets: u32,
    reset_limit: Option<u32>,
    /// Set by a granted reset; the next `advance` is skipped
    fresh: bool,
}

impl LockDelay {
    pub fn new(delay: u32, reset_limit: Option<u32>) -> Self {
        let delay = delay.max(1);
        Self {
            remaining: delay,
            delay,
            resets: 0,
            reset_limit,
            fresh: false,
        }
    }

    /// Count one resting tick. Returns true when the piece must lock.
    ///
    /// The tick that granted a reset is not counted, so every reset buys the
    /// full delay.
    pub fn advance(&mut self) -> bool {
        if std::mem::take(&mut self.fresh) {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    /// Refill after a successful move or rotation on the ground. Returns
    /// false once the per-piece reset limit is spent.
    pub fn reset(&mut self) -> bool {
        if let Some(limit) = self.reset_limit {
            if self.resets >= limit {
                return false;
            }
        }
        self.resets += 1;
        self.remaining = self.delay;
        self.fresh = true;
        true
    }

    /// Refill while airborne; does not count against the reset limit.
    pub fn refill(&mut self) {
        self.remaining = self.delay;
        self.fresh = false;
    }

    /// Full refill for a new piece
    pub fn restart(&mut self) {
        self.remaining = self.delay;
        self.resets = 0;
        self.fresh = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }
}

/// Delayed auto shift for a held horizontal key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoRepeat {
    direction: Option<Shift>,
    held: u32,
    delay: u32,
    interval: u32,
}

impl AutoRepeat {
    pub fn new(delay: u32, interval: u32) -> Self {
        Self {
            direction: None,
            held: 0,
            delay,
            interval: interval.max(1),
        }
    }

    /// Count one tick of `held`. Returns the direction to shift this tick.
    ///
    /// The first repeat fires once the key has been held for more than
    /// `delay` ticks, then every `interval` ticks. Releasing or switching
    /// direction starts over.
    pub fn advance(&mut self, held: Option<Shift>) -> Option<Shift> {
        if held != self.direction {
            self.direction = held;
            self.held = 0;
        }
        let direction = self.direction?;

        self.held = self.held.saturating_add(1);
        if self.held > self.delay && (self.held - self.delay) % self.interval == 0 {
            Some(direction)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.direction = None;
        self.held = 0;
    }

    pub fn held(&self) -> u32 {
        self.held
    }
}

/// What a single tick did to the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Set when the active piece locked this tick
    pub placement: Option<Placement>,
    /// Rows travelled by gravity or soft drop
    pub rows_fallen: u32,
    pub game_over: bool,
}

/// Owner of every per-session timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationClock {
    fall: FallTimer,
    lock: LockDelay,
    shift: AutoRepeat,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(fall: FallTimer, lock: LockDelay, shift: AutoRepeat) -> Self {
        Self {
            fall,
            lock,
            shift,
            ticks: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            FallTimer::new(config.fall_threshold),
            LockDelay::new(config.lock_delay_ticks, config.lock_reset_limit),
            AutoRepeat::new(config.das_ticks, config.arr_ticks),
        )
    }

    pub fn fall(&self) -> &FallTimer {
        &self.fall
    }

    pub fn lock(&self) -> &LockDelay {
        &self.lock
    }

    pub fn auto_repeat(&self) -> &AutoRepeat {
        &self.shift
    }

    /// Ticks stepped since the clock was created
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the playfield by one tick.
    ///
    /// `Pause` and `Restart` are session-level intents and are ignored here.
    pub fn step<R: Rng>(&mut self, field: &mut Playfield<R>, input: &InputFrame) -> StepOutcome {
        self.ticks += 1;
        let mut outcome = StepOutcome::default();
        if field.active().is_none() {
            outcome.game_over = true;
            return outcome;
        }

        for &intent in &input.pressed {
            match intent {
                Intent::MoveLeft => {
                    self.guarded(field, |f| f.move_left());
                }
                Intent::MoveRight => {
                    self.guarded(field, |f| f.move_right());
                }
                Intent::RotateCw => {
                    self.guarded(field, |f| f.rotate(Spin::Cw));
                }
                Intent::RotateCcw => {
                    self.guarded(field, |f| f.rotate(Spin::Ccw));
                }
                Intent::Rotate180 => {
                    self.guarded(field, |f| f.rotate(Spin::Half));
                }
                Intent::SoftDrop => {
                    if field.soft_fall() {
                        outcome.rows_fallen += 1;
                    }
                }
                Intent::HardDrop => {
                    let placement = field.hard_drop();
                    self.restart_piece();
                    outcome.placement = Some(placement);
                    outcome.game_over = placement.top_out;
                    return outcome;
                }
                Intent::Hold => match field.hold() {
                    HoldOutcome::Held => self.restart_piece(),
                    HoldOutcome::Refused => {}
                    HoldOutcome::TopOut => {
                        outcome.game_over = true;
                        return outcome;
                    }
                },
                Intent::Pause | Intent::Restart => {}
            }
        }

        if let Some(shift) = self.shift.advance(input.held.shift()) {
            self.guarded(field, |f| f.shift(shift));
        }

        let resting = field.is_bottom();
        if self
            .fall
            .advance(field.board().speed(), input.held.soft_drop, resting)
        {
            if !resting {
                let moved = if input.held.soft_drop {
                    field.soft_fall()
                } else {
                    field.fall()
                };
                if moved {
                    outcome.rows_fallen += 1;
                }
            }
            self.fall.reset();
        }

        if field.is_bottom() {
            if self.lock.advance() {
                let placement = field.place_tetromino();
                self.restart_piece();
                outcome.placement = Some(placement);
                outcome.game_over = placement.top_out;
            }
        } else {
            self.lock.refill();
        }

        outcome
    }

    /// Run a move or rotation; a successful one touching the ground, before
    /// or after, refills the lock delay.
    fn guarded<R, F>(&mut self, field: &mut Playfield<R>, op: F) -> bool
    where
        R: Rng,
        F: FnOnce(&mut Playfield<R>) -> bool,
    {
        let was_resting = field.is_bottom();
        let moved = op(field);
        if moved && (was_resting || field.is_bottom()) {
            self.lock.reset();
        }
        moved
    }

    fn restart_piece(&mut self) {
        self.fall.reset();
        self.lock.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::pieces::PieceSet;
    use crate::queue::{PieceQueue, Randomizer};
    use crate::types::{HeldKeys, PieceId, FALL_THRESHOLD, LOCK_DELAY_TICKS};

    fn clock() -> SimulationClock {
        SimulationClock::from_config(&GameConfig::default())
    }

    fn field_with(piece: PieceId) -> Playfield {
        let pieces = PieceSet::standard();
        let queue = PieceQueue::seeded(pieces.len(), 5, Randomizer::Uniform, 3);
        let mut field = Playfield::new(Board::default(), pieces, queue);
        assert!(field.spawn(piece));
        field
    }

    #[test]
    fn test_fall_timer_rates() {
        let mut timer = FallTimer::new(FALL_THRESHOLD);
        for _ in 0..59 {
            assert!(!timer.advance(0, false, false));
        }
        assert!(timer.advance(0, false, false));
        timer.reset();

        // Soft drop in the air: 1 + 5 + 15 per tick at speed 0.
        assert!(!timer.advance(0, true, false));
        assert!(!timer.advance(0, true, false));
        assert!(timer.advance(0, true, false));
        timer.reset();

        // Speed is added to every component.
        assert!(!timer.advance(2, true, true));
        assert_eq!(timer.value(), 3 + 7);
    }

    #[test]
    fn test_lock_delay_reset_limit() {
        let mut lock = LockDelay::new(3, Some(1));
        assert!(!lock.advance());
        assert!(lock.reset());
        assert_eq!(lock.remaining(), 3);
        assert!(!lock.reset());

        // The reset tick itself is not counted.
        assert!(!lock.advance());
        assert_eq!(lock.remaining(), 3);
        assert!(!lock.advance());
        assert!(!lock.advance());
        assert!(lock.advance());

        lock.restart();
        assert_eq!(lock.resets(), 0);
        assert!(lock.reset());
    }

    #[test]
    fn test_auto_repeat_cadence() {
        let mut repeat = AutoRepeat::new(10, 2);
        let fired: Vec<u32> = (1..=18)
            .filter(|_| repeat.advance(Some(Shift::Left)).is_some())
            .collect();
        assert_eq!(fired, vec![12, 14, 16, 18]);

        // Switching direction starts over.
        assert_eq!(repeat.advance(Some(Shift::Right)), None);
        assert_eq!(repeat.held(), 1);
        assert_eq!(repeat.advance(None), None);
        assert_eq!(repeat.held(), 0);
    }

    #[test]
    fn test_gravity_drops_one_row_per_threshold() {
        let mut clock = clock();
        let mut field = field_with(PieceId::T);
        let idle = InputFrame::idle();

        for _ in 0..59 {
            assert_eq!(clock.step(&mut field, &idle).rows_fallen, 0);
        }
        assert_eq!(clock.step(&mut field, &idle).rows_fallen, 1);
        assert_eq!(field.active().unwrap().y, 1);
        assert_eq!(field.board().score(), 0);
    }

    #[test]
    fn test_soft_drop_held_scores_per_row() {
        let mut clock = clock();
        let mut field = field_with(PieceId::T);
        let frame = InputFrame::idle().with_held(HeldKeys {
            soft_drop: true,
            ..HeldKeys::default()
        });

        let rows: u32 = (0..30).map(|_| clock.step(&mut field, &frame).rows_fallen).sum();
        assert_eq!(rows, 10);
        assert_eq!(field.board().score(), 10);
    }

    #[test]
    fn test_hard_drop_locks_immediately() {
        let mut clock = clock();
        let mut field = field_with(PieceId::O);
        let outcome = clock.step(&mut field, &InputFrame::press(Intent::HardDrop));

        let placement = outcome.placement.unwrap();
        assert!(!placement.top_out);
        assert_eq!(field.board().filled(), 4);
        assert_eq!(field.board().score(), 36);
    }

    #[test]
    fn test_resting_piece_locks_after_delay() {
        let mut clock = clock();
        let mut field = field_with(PieceId::O);
        let mut probe = *field.active().unwrap();
        probe.hard_drop(field.board());
        // Put the piece on the floor without scoring it.
        while field.active().unwrap().y < probe.y {
            field.fall();
        }
        assert!(field.is_bottom());

        let idle = InputFrame::idle();
        for _ in 0..LOCK_DELAY_TICKS - 1 {
            assert!(clock.step(&mut field, &idle).placement.is_none());
        }
        assert!(clock.step(&mut field, &idle).placement.is_some());
        assert_eq!(field.board().filled(), 4);
    }

    #[test]
    fn test_move_on_ground_resets_lock_delay() {
        let mut clock = clock();
        let mut field = field_with(PieceId::O);
        while !field.is_bottom() {
            field.fall();
        }

        let idle = InputFrame::idle();
        for _ in 0..LOCK_DELAY_TICKS - 1 {
            clock.step(&mut field, &idle);
        }
        assert_eq!(clock.lock().remaining(), 1);

        let outcome = clock.step(&mut field, &InputFrame::press(Intent::MoveLeft));
        assert!(outcome.placement.is_none());
        assert_eq!(clock.lock().remaining(), LOCK_DELAY_TICKS);

        // A reset buys the whole delay.
        for _ in 0..LOCK_DELAY_TICKS - 1 {
            assert!(clock.step(&mut field, &idle).placement.is_none());
        }
        assert!(clock.step(&mut field, &idle).placement.is_some());
    }

    #[test]
    fn test_reset_limit_locks_a_sliding_piece() {
        let config = GameConfig {
            lock_reset_limit: Some(2),
            ..GameConfig::default()
        };
        let mut clock = SimulationClock::from_config(&config);
        let mut field = field_with(PieceId::O);
        while !field.is_bottom() {
            field.fall();
        }

        let mut locked_at = None;
        for tick in 0..100 {
            let intent = if tick % 2 == 0 {
                Intent::MoveLeft
            } else {
                Intent::MoveRight
            };
            if clock.step(&mut field, &InputFrame::press(intent)).placement.is_some() {
                locked_at = Some(tick);
                break;
            }
        }

        // Two granted resets, then the delay runs out despite the sliding.
        assert_eq!(locked_at, Some(LOCK_DELAY_TICKS + 1));
        assert_eq!(field.board().filled(), 4);
    }

    #[test]
    fn test_unlimited_resets_keep_a_sliding_piece_alive() {
        let mut clock = clock();
        let mut field = field_with(PieceId::O);
        while !field.is_bottom() {
            field.fall();
        }

        for tick in 0..200 {
            let intent = if tick % 2 == 0 {
                Intent::MoveLeft
            } else {
                Intent::MoveRight
            };
            assert!(clock.step(&mut field, &InputFrame::press(intent)).placement.is_none());
        }
        assert!(clock.lock().resets() >= 200);
    }

    #[test]
    fn test_held_key_auto_repeats() {
        let mut clock = clock();
        let mut field = field_with(PieceId::O);
        let start = field.active().unwrap().x;
        let frame = InputFrame::idle().with_held(HeldKeys {
            right: true,
            ..HeldKeys::default()
        });

        for _ in 0..12 {
            clock.step(&mut field, &frame);
        }
        assert_eq!(field.active().unwrap().x, start + 1);
        for _ in 0..2 {
            clock.step(&mut field, &frame);
        }
        assert_eq!(field.active().unwrap().x, start + 2);
    }
}
