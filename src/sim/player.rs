//! Player kinematics
//!
//! Lane changes, jump/double-jump arbitration, gravity and the invincibility
//! window. Pure step functions over owned state; nothing here touches score
//! or lives.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_DEPTH;
use crate::tuning::Tuning;
use crate::{exp_approach, lane_to_x, max_lane};

/// Result of a jump intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Launched from the ground
    Single,
    /// Second impulse while airborne
    Double,
}

/// The runner avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Target lane, `-max_lane..=max_lane`
    pub lane: i32,
    /// World position (x drifts toward the lane, z is fixed)
    pub pos: Vec3,
    pub vertical_velocity: f32,
    /// 0 on the ground, 1 after the first jump, 2 after a double jump
    pub jumps_performed: u8,
    /// Flip rotation accumulated during a double jump (radians)
    pub spin: f32,
    /// Simulation time at which invincibility ends
    pub invincible_until: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: 0,
            pos: Vec3::new(0.0, 0.0, PLAYER_DEPTH),
            vertical_velocity: 0.0,
            jumps_performed: 0,
            spin: 0.0,
            invincible_until: 0.0,
        }
    }
}

impl Player {
    pub fn is_grounded(&self) -> bool {
        self.jumps_performed == 0
    }

    /// Shift one lane left, clamped to the track
    pub fn move_left(&mut self, lane_count: u32) {
        self.set_lane(self.lane - 1, lane_count);
    }

    /// Shift one lane right, clamped to the track
    pub fn move_right(&mut self, lane_count: u32) {
        self.set_lane(self.lane + 1, lane_count);
    }

    /// Set the target lane, clamping out-of-range values
    pub fn set_lane(&mut self, lane: i32, lane_count: u32) {
        let max = max_lane(lane_count);
        self.lane = lane.clamp(-max, max);
    }

    /// Handle a jump intent. Returns `None` when no jumps are left.
    pub fn jump(&mut self, max_jumps: u8, tuning: &Tuning) -> Option<JumpKind> {
        if self.is_grounded() {
            self.jumps_performed = 1;
            self.vertical_velocity = tuning.jump_impulse;
            Some(JumpKind::Single)
        } else if self.jumps_performed < max_jumps {
            self.jumps_performed += 1;
            self.vertical_velocity = tuning.double_jump_impulse;
            self.spin = 0.0;
            Some(JumpKind::Double)
        } else {
            None
        }
    }

    /// Advance lateral drift and vertical motion by `dt`
    pub fn step(&mut self, dt: f32, tuning: &Tuning) {
        let target_x = lane_to_x(self.lane, tuning.lane_width);
        self.pos.x = exp_approach(self.pos.x, target_x, tuning.lane_follow_rate, dt);

        if self.is_grounded() {
            return;
        }

        self.pos.y += self.vertical_velocity * dt;
        self.vertical_velocity -= tuning.gravity * dt;

        if self.pos.y <= 0.0 && self.vertical_velocity <= 0.0 {
            self.land();
            return;
        }

        if self.jumps_performed >= 2 {
            self.spin -= dt * tuning.spin_rate;
        }
    }

    fn land(&mut self) {
        self.pos.y = 0.0;
        self.vertical_velocity = 0.0;
        self.jumps_performed = 0;
        self.spin = 0.0;
    }

    /// Start the invincibility window at `now`
    pub fn grant_invincibility(&mut self, now: f32, duration: f32) {
        self.invincible_until = now + duration;
    }

    /// Whether damage should be ignored at `now` (also drives flicker)
    pub fn is_invincible(&self, now: f32) -> bool {
        now < self.invincible_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    #[test]
    fn test_move_left_at_minimum_is_clamped() {
        let mut player = Player::default();
        player.move_left(3);
        assert_eq!(player.lane, -1);
        player.move_left(3);
        assert_eq!(player.lane, -1);
    }

    #[test]
    fn test_set_lane_clamps() {
        let mut player = Player::default();
        player.set_lane(7, 5);
        assert_eq!(player.lane, 2);
        player.set_lane(-7, 1);
        assert_eq!(player.lane, 0);
    }

    #[test]
    fn test_lateral_drift_converges() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.move_right(3);
        player.step(SIM_DT, &tuning);
        // Smoothed, not snapped
        assert!(player.pos.x > 0.0 && player.pos.x < tuning.lane_width);
        for _ in 0..20 {
            player.step(SIM_DT, &tuning);
        }
        assert!((player.pos.x - tuning.lane_width).abs() < 0.01);
    }

    #[test]
    fn test_single_jump_and_land() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        assert_eq!(player.jump(1, &tuning), Some(JumpKind::Single));
        assert_eq!(player.vertical_velocity, tuning.jump_impulse);
        // No second jump without the upgrade
        assert_eq!(player.jump(1, &tuning), None);

        let mut peak: f32 = 0.0;
        let mut frames = 0;
        while !player.is_grounded() && frames < 600 {
            player.step(SIM_DT, &tuning);
            peak = peak.max(player.pos.y);
            frames += 1;
        }
        assert!(player.is_grounded());
        assert_eq!(player.pos.y, 0.0);
        assert_eq!(player.vertical_velocity, 0.0);
        // v^2 / 2g = 3.24
        assert!(peak > 3.0 && peak < 3.6, "peak {}", peak);
        // Roughly 2v/g = 0.72s
        assert!(frames > 35 && frames < 50, "frames {}", frames);
    }

    #[test]
    fn test_double_jump_spins() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.jump(2, &tuning);
        for _ in 0..10 {
            player.step(SIM_DT, &tuning);
        }
        assert_eq!(player.spin, 0.0);

        assert_eq!(player.jump(2, &tuning), Some(JumpKind::Double));
        assert_eq!(player.jumps_performed, 2);
        assert_eq!(player.vertical_velocity, tuning.double_jump_impulse);
        assert_eq!(player.jump(2, &tuning), None);

        player.step(SIM_DT, &tuning);
        assert!(player.spin < 0.0);

        while !player.is_grounded() {
            player.step(SIM_DT, &tuning);
        }
        assert_eq!(player.jumps_performed, 0);
        assert_eq!(player.spin, 0.0);
    }

    #[test]
    fn test_jumps_reset_only_on_landing() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.jump(1, &tuning);
        player.step(SIM_DT, &tuning);
        // Ascending, still airborne
        assert_eq!(player.jumps_performed, 1);
        assert!(player.pos.y > 0.0);
    }

    #[test]
    fn test_invincibility_window() {
        let mut player = Player::default();
        assert!(!player.is_invincible(0.0));
        player.grant_invincibility(2.0, 1.5);
        assert!(player.is_invincible(2.0));
        assert!(player.is_invincible(3.4));
        assert!(!player.is_invincible(3.5));
    }

    proptest! {
        #[test]
        fn lane_stays_on_track(
            moves in proptest::collection::vec(any::<bool>(), 0..64),
            half in 0u32..4,
        ) {
            let lane_count = half * 2 + 1;
            let max = max_lane(lane_count);
            let mut player = Player::default();
            for right in moves {
                if right {
                    player.move_right(lane_count);
                } else {
                    player.move_left(lane_count);
                }
                prop_assert!(player.lane >= -max && player.lane <= max);
            }
        }
    }
}
