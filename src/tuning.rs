//! Data-driven game balance
//!
//! Every tuned constant of the simulation lives here so a session can be
//! replayed or rebalanced without touching code. Persisted as JSON: a file on
//! native, LocalStorage on the web.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration rejected before the first tick
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("lane count must be at least 1")]
    ZeroLanes,
    #[error("lane count {0} is even; lanes are centred on the player so the count must be odd")]
    EvenLaneCount(u32),
    #[error("target word must contain at least one letter")]
    EmptyTargetWord,
    #[error("max lives must be at least 1")]
    ZeroLives,
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    InvalidProbability { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("initial frontier {frontier} is already past the spawn distance {spawn_distance}")]
    FrontierBeyondSpawn { frontier: f32, spawn_distance: f32 },
    #[error("double jump impulse {double} must be smaller than jump impulse {single}")]
    DoubleJumpTooStrong { single: f32, double: f32 },
    #[error("invalid tuning json: {0}")]
    Parse(String),
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track ===
    pub lane_count: u32,
    pub lane_width: f32,
    pub base_speed: f32,
    /// Fraction of `base_speed` added per newly collected letter
    pub speed_step_fraction: f32,

    // === Spawning ===
    pub spawn_distance: f32,
    pub remove_distance: f32,
    pub initial_frontier: f32,
    pub spawn_gap: f32,
    pub spawn_gap_speed_factor: f32,
    pub obstacle_chance: f32,
    pub first_letter_distance: f32,
    pub letter_drop_interval: f32,

    // === Letters & scoring ===
    pub target_word: Vec<char>,
    /// Display colour per letter (cycled if shorter than the word)
    pub letter_colors: Vec<String>,
    pub gem_value: u64,
    pub victory_bonus: u64,
    pub max_lives: u8,

    // === Collision ===
    pub obstacle_height: f32,
    pub obstacle_clearance_margin: f32,
    pub obstacle_depth_window: f32,
    pub pickup_depth_window: f32,
    pub obstacle_hit_window: f32,
    pub pickup_hit_window: f32,
    pub letter_height: f32,
    pub gem_height: f32,

    // === Player ===
    pub jump_impulse: f32,
    pub double_jump_impulse: f32,
    pub gravity: f32,
    pub lane_follow_rate: f32,
    pub spin_rate: f32,
    pub invincibility_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: LANE_COUNT,
            lane_width: LANE_WIDTH,
            base_speed: RUN_SPEED_BASE,
            speed_step_fraction: SPEED_STEP_FRACTION,

            spawn_distance: SPAWN_DISTANCE,
            remove_distance: REMOVE_DISTANCE,
            initial_frontier: INITIAL_FRONTIER,
            spawn_gap: SPAWN_GAP,
            spawn_gap_speed_factor: SPAWN_GAP_SPEED_FACTOR,
            obstacle_chance: OBSTACLE_CHANCE,
            first_letter_distance: FIRST_LETTER_DISTANCE,
            letter_drop_interval: LETTER_DROP_INTERVAL,

            target_word: TARGET_WORD.to_vec(),
            letter_colors: LETTER_COLORS.iter().map(|c| c.to_string()).collect(),
            gem_value: GEM_VALUE,
            victory_bonus: VICTORY_BONUS,
            max_lives: MAX_LIVES,

            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_clearance_margin: OBSTACLE_CLEARANCE_MARGIN,
            obstacle_depth_window: OBSTACLE_DEPTH_WINDOW,
            pickup_depth_window: PICKUP_DEPTH_WINDOW,
            obstacle_hit_window: OBSTACLE_HIT_WINDOW,
            pickup_hit_window: PICKUP_HIT_WINDOW,
            letter_height: LETTER_HEIGHT,
            gem_height: GEM_HEIGHT,

            jump_impulse: JUMP_IMPULSE,
            double_jump_impulse: DOUBLE_JUMP_IMPULSE,
            gravity: GRAVITY,
            lane_follow_rate: LANE_FOLLOW_RATE,
            spin_rate: SPIN_RATE,
            invincibility_secs: INVINCIBILITY_SECS,
        }
    }
}

impl Tuning {
    /// Check startup preconditions; called once before the first tick
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_count == 0 {
            return Err(TuningError::ZeroLanes);
        }
        if self.lane_count % 2 == 0 {
            return Err(TuningError::EvenLaneCount(self.lane_count));
        }
        if self.target_word.is_empty() {
            return Err(TuningError::EmptyTargetWord);
        }
        if self.max_lives == 0 {
            return Err(TuningError::ZeroLives);
        }
        if !(0.0..=1.0).contains(&self.obstacle_chance) {
            return Err(TuningError::InvalidProbability {
                name: "obstacle_chance",
                value: self.obstacle_chance,
            });
        }

        let positives = [
            ("lane_width", self.lane_width),
            ("base_speed", self.base_speed),
            ("spawn_distance", self.spawn_distance),
            ("remove_distance", self.remove_distance),
            ("spawn_gap", self.spawn_gap),
            ("letter_drop_interval", self.letter_drop_interval),
            ("obstacle_depth_window", self.obstacle_depth_window),
            ("pickup_depth_window", self.pickup_depth_window),
            ("obstacle_hit_window", self.obstacle_hit_window),
            ("pickup_hit_window", self.pickup_hit_window),
            ("jump_impulse", self.jump_impulse),
            ("double_jump_impulse", self.double_jump_impulse),
            ("gravity", self.gravity),
            ("lane_follow_rate", self.lane_follow_rate),
        ];
        for (name, value) in positives {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { name, value });
            }
        }

        // Speed only ever grows, so depth never decreases
        let non_negatives = [
            ("speed_step_fraction", self.speed_step_fraction),
            ("spawn_gap_speed_factor", self.spawn_gap_speed_factor),
            ("first_letter_distance", self.first_letter_distance),
            ("invincibility_secs", self.invincibility_secs),
        ];
        for (name, value) in non_negatives {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { name, value });
            }
        }

        // An empty track must be able to place its first spawn
        if !(self.initial_frontier > -self.spawn_distance) {
            return Err(TuningError::FrontierBeyondSpawn {
                frontier: self.initial_frontier,
                spawn_distance: self.spawn_distance,
            });
        }
        if self.double_jump_impulse >= self.jump_impulse {
            return Err(TuningError::DoubleJumpTooStrong {
                single: self.jump_impulse,
                double: self.double_jump_impulse,
            });
        }
        Ok(())
    }

    /// Height the player must reach to clear an obstacle
    pub fn obstacle_clearance(&self) -> f32 {
        self.obstacle_height - self.obstacle_clearance_margin
    }

    /// Speed added for each newly collected letter
    pub fn speed_step(&self) -> f32 {
        self.base_speed * self.speed_step_fraction
    }

    /// Display colour for a letter index
    pub fn letter_color(&self, index: usize) -> Option<&str> {
        if self.letter_colors.is_empty() {
            return None;
        }
        Some(self.letter_colors[index % self.letter_colors.len()].as_str())
    }

    /// Parse and validate tuning JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "lane_runner_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Ok(storage) = crate::persistence::local_storage()
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from LocalStorage");
                    return tuning;
                }
                Err(e) => log::warn!("Ignoring stored tuning: {}", e),
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Load tuning from a JSON file, falling back to defaults (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }
}
