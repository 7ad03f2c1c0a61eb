//! Held-key tracking for terminal environments.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, KeyEventKind};
use tracing::trace;

use crate::map::map_key;
use crate::types::{HeldKeys, InputFrame, Intent, Shift};

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers auto-repeat.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

/// Turns raw key events into per-tick input frames.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    horizontal: Option<Shift>,
    soft_drop: bool,
    last_key_time: Instant,
    key_release_timeout: Duration,
    pending: InputFrame,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            horizontal: None,
            soft_drop: false,
            last_key_time: Instant::now(),
            key_release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
            pending: InputFrame::idle(),
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn key_release_timeout(&self) -> Duration {
        self.key_release_timeout
    }

    /// Feed one terminal key event. Returns the intent it queued, if any.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Intent> {
        let intent = map_key(key)?;
        match key.kind {
            KeyEventKind::Release => {
                self.release(intent);
                None
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let fresh = self.press(intent);
                // Terminal auto-repeat of a held key is not a new press; the
                // core repeats held keys itself.
                if !fresh {
                    return None;
                }
                trace!(intent = intent.as_str(), "key pressed");
                self.pending.push(intent);
                Some(intent)
            }
        }
    }

    /// Mark a key down. Returns false when it was already held.
    fn press(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::MoveLeft | Intent::MoveRight => {
                self.last_key_time = Instant::now();
                let shift = if intent == Intent::MoveLeft {
                    Shift::Left
                } else {
                    Shift::Right
                };
                if self.horizontal == Some(shift) {
                    false
                } else {
                    self.horizontal = Some(shift);
                    true
                }
            }
            Intent::SoftDrop => {
                self.last_key_time = Instant::now();
                if self.soft_drop {
                    false
                } else {
                    self.soft_drop = true;
                    true
                }
            }
            _ => true,
        }
    }

    fn release(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft if self.horizontal == Some(Shift::Left) => self.horizontal = None,
            Intent::MoveRight if self.horizontal == Some(Shift::Right) => self.horizontal = None,
            Intent::SoftDrop => self.soft_drop = false,
            _ => {}
        }
    }

    /// Keys currently held, after applying the release timeout.
    pub fn held(&mut self) -> HeldKeys {
        // Auto-release when terminal does not emit release events.
        if self.last_key_time.elapsed() > self.key_release_timeout {
            self.horizontal = None;
            self.soft_drop = false;
        }
        HeldKeys {
            left: self.horizontal == Some(Shift::Left),
            right: self.horizontal == Some(Shift::Right),
            soft_drop: self.soft_drop,
        }
    }

    /// Drain the intents pressed since the last call into a frame for the
    /// next tick.
    pub fn take_frame(&mut self) -> InputFrame {
        let held = self.held();
        std::mem::take(&mut self.pending).with_held(held)
    }

    pub fn reset(&mut self) {
        self.horizontal = None;
        self.soft_drop = false;
        self.last_key_time = Instant::now();
        self.pending = InputFrame::idle();
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}
