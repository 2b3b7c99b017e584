//! Entity ledger
//!
//! The authoritative list of live track entities. Entities scroll toward
//! positive depth; the player sits on the `PLAYER_DEPTH` plane.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Costs a life unless jumped over
    Obstacle,
    /// Logo gem, worth points
    Collectible,
    /// One letter of the target word
    Letter,
}

impl EntityKind {
    pub fn is_pickup(self) -> bool {
        !matches!(self, EntityKind::Obstacle)
    }
}

/// A track entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// (lane x, height, depth)
    pub pos: Vec3,
    /// Depth at the start of the current frame
    pub prev_depth: f32,
    /// Cleared once hit or collected
    pub active: bool,
    /// Index into the target word (letters only)
    pub letter_index: Option<usize>,
}

impl Entity {
    #[inline]
    pub fn depth(&self) -> f32 {
        self.pos.z
    }
}

/// Owns all entities and hands out ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// Sorted by id (spawn order)
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an entity at `pos`, returning its id
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec3, letter_index: Option<usize>) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            kind,
            pos,
            prev_depth: pos.z,
            active: true,
            letter_index,
        });
        id
    }

    /// Scroll every entity by `distance`, then drop entities that were
    /// resolved last frame or passed `remove_distance`.
    pub fn advance(&mut self, distance: f32, remove_distance: f32) {
        for entity in &mut self.entities {
            entity.prev_depth = entity.pos.z;
            entity.pos.z += distance;
        }
        self.entities.retain(|e| e.active && e.pos.z < remove_distance);
    }

    /// Minimum depth among live entities (the spawn frontier)
    pub fn frontier(&self) -> Option<f32> {
        self.entities
            .iter()
            .map(Entity::depth)
            .reduce(f32::min)
    }

    /// Mark an entity resolved; it is dropped on the next advance
    pub fn deactivate(&mut self, id: u32) -> bool {
        match self.entities.iter_mut().find(|e| e.id == id) {
            Some(entity) if entity.active => {
                entity.active = false;
                true
            }
            _ => false,
        }
    }

    /// Read-only view, in spawn order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Drop every entity (session reset); ids keep increasing
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let mut ledger = Ledger::new();
        let a = ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.85, -20.0), None);
        let b = ledger.spawn(EntityKind::Letter, Vec3::new(2.4, 1.2, -40.0), Some(2));
        assert_ne!(a, b);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(b).and_then(|e| e.letter_index), Some(2));
        assert_eq!(ledger.get(a).map(|e| e.prev_depth), Some(-20.0));
    }

    #[test]
    fn test_advance_records_previous_depth() {
        let mut ledger = Ledger::new();
        let id = ledger.spawn(EntityKind::Collectible, Vec3::new(0.0, 1.4, -10.0), None);
        ledger.advance(4.0, 30.0);
        let entity = ledger.get(id).unwrap();
        assert_eq!(entity.prev_depth, -10.0);
        assert_eq!(entity.depth(), -6.0);
    }

    #[test]
    fn test_advance_removes_past_threshold() {
        let mut ledger = Ledger::new();
        ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.85, 28.0), None);
        let keep = ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.85, 20.0), None);
        ledger.advance(3.0, 30.0);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.get(keep).is_some());
    }

    #[test]
    fn test_resolved_entity_survives_one_frame() {
        let mut ledger = Ledger::new();
        let id = ledger.spawn(EntityKind::Collectible, Vec3::new(0.0, 1.4, 0.0), None);
        assert!(ledger.deactivate(id));
        // Second resolution is refused
        assert!(!ledger.deactivate(id));
        assert!(ledger.get(id).is_some());
        ledger.advance(0.5, 30.0);
        assert!(ledger.get(id).is_none());
    }

    #[test]
    fn test_frontier_is_minimum_depth() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.frontier(), None);
        ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.0, -30.0), None);
        ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.0, -90.0), None);
        ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.0, -50.0), None);
        assert_eq!(ledger.frontier(), Some(-90.0));
    }

    proptest! {
        #[test]
        fn depth_advances_by_exact_step(
            depths in proptest::collection::vec(-150.0f32..0.0, 1..16),
            speed in 1.0f32..120.0,
            dt in 0.001f32..0.1,
        ) {
            let mut ledger = Ledger::new();
            for &z in &depths {
                ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.0, z), None);
            }
            let step = speed * dt;
            ledger.advance(step, 1000.0);
            prop_assert_eq!(ledger.len(), depths.len());
            for entity in ledger.entities() {
                prop_assert!(entity.depth() > entity.prev_depth);
                prop_assert_eq!(entity.depth(), entity.prev_depth + step);
            }
        }
    }
}
