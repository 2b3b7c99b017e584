//! Lane Runner - An endless-runner arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, spawning, collisions, game state)
//! - `platform`: Frame clock, input intents and browser bindings
//! - `persistence`: Session recording and the daily play marker
//! - `tuning`: Data-driven game balance
//! - `highscores`: Local top-10 leaderboard

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the frame clock
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Track layout
    pub const LANE_COUNT: u32 = 3;
    pub const LANE_WIDTH: f32 = 2.4;
    /// Player sits on this depth plane; entities scroll through it
    pub const PLAYER_DEPTH: f32 = 0.0;

    /// Scroll speed (units per second) at session start
    pub const RUN_SPEED_BASE: f32 = 32.0;
    /// Each new letter adds this fraction of the base speed
    pub const SPEED_STEP_FRACTION: f32 = 0.40;

    /// Spawning keeps the frontier at least this far ahead
    pub const SPAWN_DISTANCE: f32 = 150.0;
    /// Entities past this depth are dropped
    pub const REMOVE_DISTANCE: f32 = 30.0;
    /// Frontier assumed when the track is empty
    pub const INITIAL_FRONTIER: f32 = -10.0;
    /// Gap between spawns = SPAWN_GAP + speed * SPAWN_GAP_SPEED_FACTOR
    pub const SPAWN_GAP: f32 = 16.0;
    pub const SPAWN_GAP_SPEED_FACTOR: f32 = 0.12;
    /// Probability that a non-letter spawn is an obstacle
    pub const OBSTACLE_CHANCE: f32 = 0.45;

    /// Letters
    pub const TARGET_WORD: [char; 4] = ['B', 'E', 'T', 'R'];
    pub const LETTER_COLORS: [&str; 4] = ["#00ffff", "#ff0033", "#00ffff", "#ff0033"];
    pub const FIRST_LETTER_DISTANCE: f32 = 100.0;
    pub const LETTER_DROP_INTERVAL: f32 = 380.0;

    /// Scoring
    pub const GEM_VALUE: u64 = 500;
    pub const VICTORY_BONUS: u64 = 5000;
    pub const MAX_LIVES: u8 = 7;

    /// Entity geometry
    pub const OBSTACLE_HEIGHT: f32 = 1.7;
    /// Player must be at least this far below the obstacle top to be hit
    pub const OBSTACLE_CLEARANCE_MARGIN: f32 = 0.25;
    pub const LETTER_HEIGHT: f32 = 1.2;
    pub const GEM_HEIGHT: f32 = 1.4;

    /// Collision windows (depth is the full window width, centred on the player)
    pub const OBSTACLE_DEPTH_WINDOW: f32 = 1.2;
    pub const PICKUP_DEPTH_WINDOW: f32 = 2.5;
    pub const OBSTACLE_HIT_WINDOW: f32 = 0.6;
    pub const PICKUP_HIT_WINDOW: f32 = 1.4;

    /// Player kinematics
    pub const JUMP_IMPULSE: f32 = 18.0;
    pub const DOUBLE_JUMP_IMPULSE: f32 = 16.0;
    pub const GRAVITY: f32 = 50.0;
    pub const LANE_FOLLOW_RATE: f32 = 20.0;
    pub const SPIN_RATE: f32 = 15.0;
    pub const INVINCIBILITY_SECS: f32 = 1.5;
}

/// Highest lane index for a lane count (lanes span `-max..=max`)
#[inline]
pub fn max_lane(lane_count: u32) -> i32 {
    (lane_count / 2) as i32
}

/// World x-position of a lane centre
#[inline]
pub fn lane_to_x(lane: i32, lane_width: f32) -> f32 {
    lane as f32 * lane_width
}

/// Move `current` toward `target` by the frame-rate independent factor `dt * rate`
#[inline]
pub fn exp_approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = (rate * dt).clamp(0.0, 1.0);
    current + (target - current) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_lane() {
        assert_eq!(max_lane(1), 0);
        assert_eq!(max_lane(3), 1);
        assert_eq!(max_lane(5), 2);
    }

    #[test]
    fn test_exp_approach_converges() {
        let mut x = 0.0;
        for _ in 0..15 {
            x = exp_approach(x, 2.4, consts::LANE_FOLLOW_RATE, consts::SIM_DT);
        }
        assert!((x - 2.4).abs() < 0.01);
    }

    #[test]
    fn test_exp_approach_never_overshoots() {
        // A huge delta snaps instead of overshooting
        let x = exp_approach(0.0, 2.4, consts::LANE_FOLLOW_RATE, 1.0);
        assert_eq!(x, 2.4);
    }
}
