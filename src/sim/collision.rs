//! Collision detection for lane entities
//!
//! An entity touches the player when it crossed the player's depth plane this
//! frame (so nothing tunnels through at high speed) or sits inside a depth
//! window around it, and is laterally within a hit window. Obstacles use
//! tight windows; pickups are forgiving.

use glam::Vec3;

use super::ledger::{Entity, EntityKind, Ledger};
use crate::tuning::Tuning;

/// Outcome of resolving an entity against the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Obstacle hit
    Damage { entity: u32 },
    /// Logo gem collected
    CollectGem { entity: u32, value: u64 },
    /// Target letter collected
    CollectLetter { entity: u32, index: usize },
}

/// Whether the entity passed through `player_depth` between frames
#[inline]
pub fn crossed_plane(prev_depth: f32, depth: f32, player_depth: f32) -> bool {
    prev_depth <= player_depth && player_depth <= depth
}

/// Whether the entity is inside the depth window centred on the player
#[inline]
pub fn in_depth_zone(depth: f32, player_depth: f32, window: f32) -> bool {
    (depth - player_depth).abs() < window / 2.0
}

impl SimEvent {
    /// Entity the event resolved
    pub fn entity(self) -> u32 {
        match self {
            SimEvent::Damage { entity }
            | SimEvent::CollectGem { entity, .. }
            | SimEvent::CollectLetter { entity, .. } => entity,
        }
    }
}

/// Depth and lateral windows for an entity kind
fn windows(kind: EntityKind, tuning: &Tuning) -> (f32, f32) {
    if kind.is_pickup() {
        (tuning.pickup_depth_window, tuning.pickup_hit_window)
    } else {
        (tuning.obstacle_depth_window, tuning.obstacle_hit_window)
    }
}

/// Test one active entity against the player position
pub fn check_entity(entity: &Entity, player: Vec3, tuning: &Tuning) -> Option<SimEvent> {
    if !entity.active {
        return None;
    }

    let (depth_window, hit_window) = windows(entity.kind, tuning);
    let touching = crossed_plane(entity.prev_depth, entity.pos.z, player.z)
        || in_depth_zone(entity.pos.z, player.z, depth_window);
    if !touching || (entity.pos.x - player.x).abs() >= hit_window {
        return None;
    }

    match entity.kind {
        EntityKind::Obstacle => {
            // High enough and the obstacle passes underneath
            let hit = player.y < tuning.obstacle_clearance();
            hit.then_some(SimEvent::Damage { entity: entity.id })
        }
        EntityKind::Collectible => Some(SimEvent::CollectGem {
            entity: entity.id,
            value: tuning.gem_value,
        }),
        EntityKind::Letter => entity.letter_index.map(|index| SimEvent::CollectLetter {
            entity: entity.id,
            index,
        }),
    }
}

/// Resolve every active entity against the player, deactivating the ones
/// that were hit or collected. Events come back in spawn order.
pub fn resolve(ledger: &mut Ledger, player: Vec3, tuning: &Tuning) -> Vec<SimEvent> {
    let events: Vec<SimEvent> = ledger
        .entities()
        .iter()
        .filter_map(|entity| check_entity(entity, player, tuning))
        .collect();
    for event in &events {
        ledger.deactivate(event.entity());
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_DEPTH;

    fn player_at(x: f32, y: f32) -> Vec3 {
        Vec3::new(x, y, PLAYER_DEPTH)
    }

    fn ledger_with(kind: EntityKind, x: f32, prev: f32, depth: f32) -> (Ledger, u32) {
        let mut ledger = Ledger::new();
        let letter = (kind == EntityKind::Letter).then_some(2);
        let id = ledger.spawn(kind, Vec3::new(x, 1.0, prev), letter);
        ledger.advance(depth - prev, 30.0);
        (ledger, id)
    }

    #[test]
    fn test_crossed_plane() {
        assert!(crossed_plane(-0.5, 0.5, 0.0));
        assert!(crossed_plane(0.0, 0.3, 0.0));
        assert!(!crossed_plane(0.1, 0.6, 0.0));
        assert!(!crossed_plane(-1.0, -0.1, 0.0));
    }

    #[test]
    fn test_in_depth_zone() {
        assert!(in_depth_zone(0.55, 0.0, 1.2));
        assert!(!in_depth_zone(0.6, 0.0, 1.2));
        assert!(in_depth_zone(-1.2, 0.0, 2.5));
    }

    #[test]
    fn test_obstacle_hit_in_lane() {
        let tuning = Tuning::default();
        let (mut ledger, id) = ledger_with(EntityKind::Obstacle, 0.0, -0.4, 0.2);
        let events = resolve(&mut ledger, player_at(0.1, 0.0), &tuning);
        assert_eq!(events, vec![SimEvent::Damage { entity: id }]);
        assert!(!ledger.get(id).unwrap().active);

        // Never counted twice
        assert!(resolve(&mut ledger, player_at(0.1, 0.0), &tuning).is_empty());
    }

    #[test]
    fn test_obstacle_cleared_by_jump() {
        let tuning = Tuning::default();
        let (mut ledger, id) = ledger_with(EntityKind::Obstacle, 0.0, -0.3, 0.3);
        let events = resolve(&mut ledger, player_at(0.0, tuning.obstacle_clearance()), &tuning);
        assert!(events.is_empty());
        assert!(ledger.get(id).unwrap().active);

        // Just below the clearance still hits
        let events = resolve(&mut ledger, player_at(0.0, 1.44), &tuning);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_obstacle_adjacent_lane_misses() {
        let tuning = Tuning::default();
        let (mut ledger, _) = ledger_with(EntityKind::Obstacle, 2.4, -0.3, 0.3);
        assert!(resolve(&mut ledger, player_at(0.0, 0.0), &tuning).is_empty());
        // Drifting between lanes: 0.7 away is outside the strict window
        assert!(resolve(&mut ledger, player_at(1.7, 0.0), &tuning).is_empty());
        assert_eq!(resolve(&mut ledger, player_at(1.9, 0.0), &tuning).len(), 1);
    }

    #[test]
    fn test_fast_entity_cannot_tunnel() {
        let tuning = Tuning::default();
        // Jumped from -3 to +3 in one frame: outside the zone both times
        let (mut ledger, id) = ledger_with(EntityKind::Obstacle, 0.0, -3.0, 3.0);
        assert_eq!(
            resolve(&mut ledger, player_at(0.0, 0.0), &tuning),
            vec![SimEvent::Damage { entity: id }]
        );
    }

    #[test]
    fn test_pickups_are_forgiving() {
        let tuning = Tuning::default();
        // 1.0 ahead and 1.2 to the side: misses an obstacle, catches a gem
        let (mut obstacles, _) = ledger_with(EntityKind::Obstacle, 1.2, -1.5, -1.0);
        assert!(resolve(&mut obstacles, player_at(0.0, 0.0), &tuning).is_empty());

        let (mut gems, id) = ledger_with(EntityKind::Collectible, 1.2, -1.5, -1.0);
        assert_eq!(
            resolve(&mut gems, player_at(0.0, 3.0), &tuning),
            vec![SimEvent::CollectGem {
                entity: id,
                value: 500
            }]
        );
    }

    #[test]
    fn test_letter_collect_carries_index() {
        let tuning = Tuning::default();
        let (mut ledger, id) = ledger_with(EntityKind::Letter, 0.0, -0.2, 0.4);
        assert_eq!(
            resolve(&mut ledger, player_at(0.0, 2.0), &tuning),
            vec![SimEvent::CollectLetter { entity: id, index: 2 }]
        );
    }

    #[test]
    fn test_resolve_deactivates_only_hit_entities() {
        let tuning = Tuning::default();
        let mut ledger = Ledger::new();
        let near = ledger.spawn(EntityKind::Collectible, Vec3::new(0.0, 1.4, -0.3), None);
        let far = ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.85, -40.0), None);
        ledger.advance(0.5, 30.0);

        let events = resolve(&mut ledger, player_at(0.0, 0.0), &tuning);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity(), near);
        assert!(!ledger.get(near).unwrap().active);
        assert!(ledger.get(far).unwrap().active);
    }

    #[test]
    fn test_passed_entities_are_ignored() {
        let tuning = Tuning::default();
        let (mut ledger, _) = ledger_with(EntityKind::Collectible, 0.0, 2.0, 2.5);
        assert!(resolve(&mut ledger, player_at(0.0, 0.0), &tuning).is_empty());
    }
}
