//! Procedural spawn scheduling
//!
//! Keeps the track filled up to `spawn_distance` ahead of the player, one
//! entity per frame. Letters drop on a fixed distance cadence so the word can
//! always be finished; everything else is a weighted coin flip.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ledger::{EntityKind, Ledger};
use crate::tuning::Tuning;
use crate::{lane_to_x, max_lane};

/// Random decisions the scheduler needs. Seeded in play, scripted in tests.
pub trait SpawnRng {
    /// Uniform lane in `-max_lane..=max_lane`
    fn pick_lane(&mut self, max_lane: i32) -> i32;
    /// Uniform choice from a non-empty slice of missing letter indices
    fn pick_letter(&mut self, missing: &[usize]) -> usize;
    /// Uniform roll in `[0, 1)`
    fn roll(&mut self) -> f32;
}

impl SpawnRng for Pcg32 {
    fn pick_lane(&mut self, max_lane: i32) -> i32 {
        self.random_range(-max_lane..=max_lane)
    }

    fn pick_letter(&mut self, missing: &[usize]) -> usize {
        missing[self.random_range(0..missing.len())]
    }

    fn roll(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// A decided spawn, before it enters the ledger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub kind: EntityKind,
    pub lane: i32,
    pub depth: f32,
    pub letter_index: Option<usize>,
}

/// Distance bookkeeping for the letter cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Total distance scrolled this session
    pub distance_traveled: f32,
    /// Distance at which the next letter may drop
    pub next_letter_distance: f32,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            distance_traveled: 0.0,
            next_letter_distance: tuning.first_letter_distance,
        }
    }

    /// Record scrolled distance
    pub fn travel(&mut self, distance: f32) {
        self.distance_traveled += distance;
    }

    /// Spacing between consecutive spawns at `speed`
    pub fn spawn_gap(speed: f32, tuning: &Tuning) -> f32 {
        tuning.spawn_gap + speed * tuning.spawn_gap_speed_factor
    }

    /// Decide what (if anything) spawns this frame
    pub fn plan(
        &mut self,
        frontier: Option<f32>,
        speed: f32,
        missing: &[usize],
        rng: &mut impl SpawnRng,
        tuning: &Tuning,
    ) -> Option<SpawnPlan> {
        let frontier = frontier.unwrap_or(tuning.initial_frontier);
        if frontier <= -tuning.spawn_distance {
            return None;
        }

        let lane = rng.pick_lane(max_lane(tuning.lane_count));
        let depth = frontier - Self::spawn_gap(speed, tuning);

        if self.distance_traveled >= self.next_letter_distance && !missing.is_empty() {
            let index = rng.pick_letter(missing);
            self.next_letter_distance += tuning.letter_drop_interval;
            return Some(SpawnPlan {
                kind: EntityKind::Letter,
                lane,
                depth,
                letter_index: Some(index),
            });
        }

        let kind = if rng.roll() < tuning.obstacle_chance {
            EntityKind::Obstacle
        } else {
            EntityKind::Collectible
        };
        Some(SpawnPlan {
            kind,
            lane,
            depth,
            letter_index: None,
        })
    }

    /// Plan a spawn and place it in the ledger, returning the new id
    pub fn spawn(
        &mut self,
        ledger: &mut Ledger,
        speed: f32,
        missing: &[usize],
        rng: &mut impl SpawnRng,
        tuning: &Tuning,
    ) -> Option<u32> {
        let plan = self.plan(ledger.frontier(), speed, missing, rng, tuning)?;
        let height = match plan.kind {
            EntityKind::Obstacle => tuning.obstacle_height / 2.0,
            EntityKind::Collectible => tuning.gem_height,
            EntityKind::Letter => tuning.letter_height,
        };
        let pos = Vec3::new(lane_to_x(plan.lane, tuning.lane_width), height, plan.depth);
        let id = ledger.spawn(plan.kind, pos, plan.letter_index);
        log::debug!(
            "Spawned {:?} #{} in lane {} at depth {:.1}",
            plan.kind,
            id,
            plan.lane,
            plan.depth
        );
        Some(id)
    }
}
