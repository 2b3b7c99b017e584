//! Frame tick
//!
//! Advances one session by one step in a fixed order: intents, player
//! kinematics, ledger advance, collision resolution, state machine, spawning.

use serde::{Deserialize, Serialize};

use super::collision;
use super::ledger::EntityKind;
use super::world::{GameEvent, World};
use crate::max_lane;

/// Normalized player intent (keyboard and touch map onto these)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    /// Jump, or double jump while airborne
    Jump,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents sampled since the previous tick, in arrival order
    pub intents: Vec<Intent>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the world by one step of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Menu and terminal states freeze the world
    if !world.state.is_playing() {
        return events;
    }

    let autopilot_intents;
    let intents = if input.idle_mode {
        autopilot_intents = autopilot(world);
        &autopilot_intents
    } else {
        &input.intents
    };
    for &intent in intents {
        if let Some(event) = world.handle_intent(intent) {
            events.push(event);
        }
    }

    world.time_ticks += 1;
    world.clock += dt;

    world.player.step(dt, &world.tuning);

    let distance = world.state.speed * dt;
    world.ledger.advance(distance, world.tuning.remove_distance);
    world.spawner.travel(distance);

    for event in collision::resolve(&mut world.ledger, world.player.pos, &world.tuning) {
        world.apply_event(event, &mut events);
    }

    if world.state.is_playing() {
        world.spawn_step();
    }

    events
}

/// How far ahead (in seconds of travel) the autopilot looks
const AUTOPILOT_HORIZON_SECS: f32 = 1.2;
/// Obstacles closer than this (seconds) make a lane unsafe
const AUTOPILOT_DANGER_SECS: f32 = 0.45;
/// Jump when an unavoidable obstacle is this close (seconds)
const AUTOPILOT_JUMP_SECS: f32 = 0.3;

/// Demo-mode driver: dodge obstacles, chase pickups, jump what can't be dodged
pub fn autopilot(world: &World) -> Vec<Intent> {
    let speed = world.state.speed.max(1.0);
    let max = max_lane(world.state.lane_count);
    let player = &world.player;
    let lane_width = world.tuning.lane_width;

    // Per-lane score: pickups ahead are good, close obstacles are not
    let lanes = (2 * max + 1) as usize;
    let mut score = vec![0.0f32; lanes];
    let mut blocked = vec![false; lanes];
    let mut nearest_obstacle = vec![f32::INFINITY; lanes];

    for entity in world.ledger.entities().iter().filter(|e| e.active) {
        // Seconds until the entity reaches the player plane
        let eta = (player.pos.z - entity.pos.z) / speed;
        if !(-0.05..=AUTOPILOT_HORIZON_SECS).contains(&eta) {
            continue;
        }
        let lane = (entity.pos.x / lane_width).round() as i32;
        if lane < -max || lane > max {
            continue;
        }
        let slot = (lane + max) as usize;
        let urgency = 1.0 - eta / AUTOPILOT_HORIZON_SECS;

        match entity.kind {
            EntityKind::Obstacle => {
                nearest_obstacle[slot] = nearest_obstacle[slot].min(eta);
                if eta < AUTOPILOT_DANGER_SECS {
                    blocked[slot] = true;
                }
                score[slot] -= 2.0 * urgency;
            }
            EntityKind::Collectible => score[slot] += urgency,
            EntityKind::Letter => score[slot] += 3.0 * urgency,
        }
    }

    let current = player.lane.clamp(-max, max);
    let current_slot = (current + max) as usize;

    // Only lanes reachable without crossing a blocked one
    let mut best = current;
    let mut best_score = if blocked[current_slot] {
        f32::NEG_INFINITY
    } else {
        score[current_slot]
    };
    for direction in [-1, 1] {
        let mut lane = current + direction;
        let mut steps = 1.0;
        while lane >= -max && lane <= max {
            let slot = (lane + max) as usize;
            if blocked[slot] {
                break;
            }
            // Prefer staying put on ties
            let candidate = score[slot] - 0.1 * steps;
            if candidate > best_score {
                best_score = candidate;
                best = lane;
            }
            lane += direction;
            steps += 1.0;
        }
    }

    let mut intents = Vec::new();
    if best < current {
        intents.push(Intent::MoveLeft);
    } else if best > current {
        intents.push(Intent::MoveRight);
    } else if player.is_grounded() && nearest_obstacle[current_slot] < AUTOPILOT_JUMP_SECS {
        intents.push(Intent::Jump);
    }
    intents
}
