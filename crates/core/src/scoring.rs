//! Scoring module - classic scoring, level and gravity speed
//!
//! - Line clears pay `LINE_SCORES[lines] * (level + 1)`. The table grows faster
//!   than linearly, so clearing several rows at once beats clearing them one
//!   by one.
//! - Soft drop pays per row fallen under soft drop, hard drop per row travelled.
//! - Level goes up every `LINES_PER_LEVEL` lines; speed follows level up to
//!   `MAX_SPEED`.

use crate::types::{
    HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, MAX_SPEED, SOFT_DROP_POINTS,
};

/// Calculate line clear score
/// lines: number of lines cleared at once
/// level: level in effect when the piece locked (0-based)
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    let base = match LINE_SCORES.get(lines as usize) {
        Some(&points) => points,
        // Taller custom pieces can clear more than four rows.
        None => LINE_SCORES[4].saturating_mul(lines - 3),
    };
    base.saturating_mul(level.saturating_add(1))
}

/// Calculate drop score
/// soft drop: SOFT_DROP_POINTS per row
/// hard drop: HARD_DROP_POINTS per row
pub fn drop_points(rows: u32, hard: bool) -> u32 {
    if hard {
        rows.saturating_mul(HARD_DROP_POINTS)
    } else {
        rows.saturating_mul(SOFT_DROP_POINTS)
    }
}

/// Level increases every LINES_PER_LEVEL lines cleared
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Gravity speed added to the fall timer each tick
pub fn speed_for_level(level: u32) -> u32 {
    level.min(MAX_SPEED)
}
