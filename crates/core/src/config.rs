//! Session configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the classic 10x20 game. Validation happens once, before the first
//! tick; the simulation itself never sees an invalid value.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::pieces::{PieceDef, PieceSet};
use crate::queue::Randomizer;
use crate::types::{
    ARR_TICKS, BOARD_HEIGHT, BOARD_WIDTH, DAS_TICKS, DEFAULT_PREVIEW_DEPTH, FALL_THRESHOLD,
    LOCK_DELAY_TICKS, MAX_BOARD_SIDE, MIN_BOARD_SIDE,
};

/// Label used for best-score bookkeeping when none is configured
pub const DEFAULT_SESSION_LABEL: &str = "Default";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    /// Number of upcoming pieces kept in the preview (may be 0)
    pub preview_depth: u8,
    /// Random seed; a fixed default is used when absent
    pub seed: Option<u64>,
    pub randomizer: Randomizer,
    pub das_ticks: u32,
    pub arr_ticks: u32,
    pub lock_delay_ticks: u32,
    /// Ground move/rotate resets allowed per piece; unlimited when absent
    pub lock_reset_limit: Option<u32>,
    pub fall_threshold: u32,
    pub session_label: String,
    /// Replaces the standard piece table when present
    pub pieces: Option<Vec<PieceDef>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            preview_depth: DEFAULT_PREVIEW_DEPTH,
            seed: None,
            randomizer: Randomizer::default(),
            das_ticks: DAS_TICKS,
            arr_ticks: ARR_TICKS,
            lock_delay_ticks: LOCK_DELAY_TICKS,
            lock_reset_limit: None,
            fall_threshold: FALL_THRESHOLD,
            session_label: DEFAULT_SESSION_LABEL.to_string(),
            pieces: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;
        if !side.contains(&self.width) || !side.contains(&self.height) {
            return Err(ConfigError::BoardSize {
                width: self.width,
                height: self.height,
                min: MIN_BOARD_SIDE,
                max: MAX_BOARD_SIDE,
            });
        }
        if self.arr_ticks == 0 {
            return Err(ConfigError::ZeroTiming("arr_ticks"));
        }
        if self.lock_delay_ticks == 0 {
            return Err(ConfigError::ZeroTiming("lock_delay_ticks"));
        }
        if self.fall_threshold == 0 {
            return Err(ConfigError::ZeroTiming("fall_threshold"));
        }
        self.piece_set().map(|_| ())
    }

    /// The piece table this session plays with
    pub fn piece_set(&self) -> Result<PieceSet, ConfigError> {
        match &self.pieces {
            Some(defs) => PieceSet::from_defs(defs),
            None => Ok(PieceSet::standard()),
        }
    }
}
