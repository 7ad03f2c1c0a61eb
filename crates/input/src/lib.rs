//! Terminal input module.
//!
//! Maps `crossterm` key events to [`crate::types::Intent`]s and tracks which
//! keys are held, producing one [`crate::types::InputFrame`] per tick.
//! Auto-repeat timing lives in the core clock, not here.
//!
//! Works on terminals without key-release events: a held key is released
//! after a short timeout with no further events for it.

pub mod map;
pub mod tracker;

pub use blockfall_types as types;

pub use map::{map_key, should_quit};
pub use tracker::KeyTracker;
