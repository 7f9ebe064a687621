use serde::{Deserialize, Serialize};

use crate::lesson_engine::error::EngineResult;

/// Session tuning knobs. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// New words per cycle in standard mode.
    pub cycle_size: usize,
    /// Cycle size used by random mode; large enough to hold a whole lesson.
    pub random_mode_cycle_size: usize,
    /// Options on synthesized choice questions (correct answer included).
    pub choice_option_count: usize,
    /// Options offered on a learner's dialogue turn (correct line included).
    pub dialogue_option_count: usize,
    /// `Some(seed)` makes every random choice reproducible.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            cycle_size: 4,
            random_mode_cycle_size: 1000,
            choice_option_count: 4,
            dialogue_option_count: 3,
            rng_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        SessionConfig { rng_seed: Some(seed), ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
