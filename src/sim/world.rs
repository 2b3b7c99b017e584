//! Session aggregate
//!
//! Bundles the state machine, player, ledger, spawner and seeded RNG of one
//! play session, applies resolver events in order, and produces read-only
//! snapshots for rendering.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::SimEvent;
use super::ledger::{EntityKind, Ledger};
use super::player::{JumpKind, Player};
use super::spawn::Spawner;
use super::state::{DamageOutcome, GameState, GameStatus, LetterOutcome};
use super::tick::Intent;
use crate::persistence::SessionRecord;
use crate::tuning::{Tuning, TuningError};

/// Things that happened this tick, for audio and HUD feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { double: bool },
    Damaged { lives: u8 },
    GemCollected { value: u64 },
    LetterCollected { index: usize },
    GameOver,
    Victory,
}

/// Entity as seen by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec3,
    /// Letter glyph (letters only)
    pub glyph: Option<char>,
    /// Display colour (letters only)
    pub color: Option<String>,
}

/// Player pose as seen by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPose {
    pub pos: Vec3,
    pub lane: i32,
    pub spin: f32,
    pub jumping: bool,
    /// Drives the damage flicker
    pub invincible: bool,
}

/// Read-only per-frame view of the whole session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub score: u64,
    pub lives: u8,
    pub max_lives: u8,
    pub speed: f32,
    pub distance: f32,
    pub collected_letters: Vec<usize>,
    pub target_word: Vec<char>,
    pub entities: Vec<EntityView>,
    pub player: PlayerPose,
}

/// One play session
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub state: GameState,
    pub player: Player,
    pub ledger: Ledger,
    pub spawner: Spawner,
    /// Simulated seconds since the session started
    pub clock: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
}

impl World {
    /// Create a world on the menu. Rejects malformed tuning up front.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            seed,
            state: GameState::new(&tuning),
            player: Player::default(),
            ledger: Ledger::new(),
            spawner: Spawner::new(&tuning),
            clock: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        })
    }

    /// Start a fresh session from the menu (or a finished one)
    pub fn start_game(&mut self) -> bool {
        let started = self.state.start_game();
        if started {
            self.reset_track();
        }
        started
    }

    /// Replay after GameOver/Victory
    pub fn restart_game(&mut self) -> bool {
        let restarted = self.state.restart_game();
        if restarted {
            self.reset_track();
        }
        restarted
    }

    pub fn return_to_menu(&mut self) {
        self.state.return_to_menu();
        self.reset_track();
    }

    /// Clear entities, player and distance before the next tick
    fn reset_track(&mut self) {
        self.ledger.clear();
        self.spawner = Spawner::new(&self.tuning);
        self.player = Player::default();
        self.clock = 0.0;
        self.time_ticks = 0;
    }

    /// Spawn at most one entity behind the frontier
    pub fn spawn_step(&mut self) -> Option<u32> {
        let missing = self.state.missing_letters();
        self.spawner.spawn(
            &mut self.ledger,
            self.state.speed,
            &missing,
            &mut self.rng,
            &self.tuning,
        )
    }

    /// Apply one input intent. Ignored unless playing.
    pub fn handle_intent(&mut self, intent: Intent) -> Option<GameEvent> {
        if !self.state.is_playing() {
            return None;
        }
        let lane_count = self.state.lane_count;
        match intent {
            Intent::MoveLeft => {
                self.player.move_left(lane_count);
                None
            }
            Intent::MoveRight => {
                self.player.move_right(lane_count);
                None
            }
            Intent::Jump => {
                let max_jumps = self.state.upgrades.max_jumps();
                self.player
                    .jump(max_jumps, &self.tuning)
                    .map(|kind| GameEvent::Jumped {
                        double: kind == JumpKind::Double,
                    })
            }
        }
    }

    /// Feed one resolver event into the state machine
    pub fn apply_event(&mut self, event: SimEvent, out: &mut Vec<GameEvent>) {
        match event {
            SimEvent::Damage { .. } => {
                let invincible = self.player.is_invincible(self.clock);
                match self.state.take_damage(invincible) {
                    DamageOutcome::Ignored => {}
                    DamageOutcome::Hurt { lives } => {
                        self.player
                            .grant_invincibility(self.clock, self.tuning.invincibility_secs);
                        out.push(GameEvent::Damaged { lives });
                    }
                    DamageOutcome::Died => {
                        out.push(GameEvent::Damaged { lives: 0 });
                        out.push(GameEvent::GameOver);
                    }
                }
            }
            SimEvent::CollectGem { value, .. } => {
                if self.state.collect_gem(value) {
                    out.push(GameEvent::GemCollected { value });
                }
            }
            SimEvent::CollectLetter { index, .. } => match self.state.collect_letter(index) {
                LetterOutcome::Collected => out.push(GameEvent::LetterCollected { index }),
                LetterOutcome::Completed => {
                    out.push(GameEvent::LetterCollected { index });
                    out.push(GameEvent::Victory);
                }
                LetterOutcome::Duplicate | LetterOutcome::Ignored => {}
            },
        }
    }

    /// Final numbers for the session recorder, once the session has ended
    pub fn session_record(&self) -> Option<SessionRecord> {
        if !self.state.status.is_terminal() {
            return None;
        }
        let collected_letters = self
            .tuning
            .target_word
            .iter()
            .enumerate()
            .filter(|(i, _)| self.state.collected_letters.contains(i))
            .map(|(_, c)| *c)
            .collect();
        Some(SessionRecord {
            score: self.state.score,
            distance: self.spawner.distance_traveled,
            elapsed_secs: self.clock,
            collected_letters,
            completed: self.state.status == GameStatus::Victory,
            seed: self.seed,
        })
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        let entities = self
            .ledger
            .entities()
            .iter()
            .filter(|e| e.active)
            .map(|e| EntityView {
                id: e.id,
                kind: e.kind,
                pos: e.pos,
                glyph: e
                    .letter_index
                    .and_then(|i| self.tuning.target_word.get(i).copied()),
                color: e
                    .letter_index
                    .and_then(|i| self.tuning.letter_color(i))
                    .map(str::to_string),
            })
            .collect();

        Snapshot {
            status: self.state.status,
            score: self.state.score,
            lives: self.state.lives,
            max_lives: self.state.max_lives,
            speed: self.state.speed,
            distance: self.spawner.distance_traveled,
            collected_letters: self.state.collected_letters.iter().copied().collect(),
            target_word: self.tuning.target_word.clone(),
            entities,
            player: PlayerPose {
                pos: self.player.pos,
                lane: self.player.lane,
                spin: self.player.spin,
                jumping: !self.player.is_grounded(),
                invincible: self.player.is_invincible(self.clock),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Upgrades;

    fn playing_world() -> World {
        let mut world = World::new(42, Tuning::default()).unwrap();
        assert!(world.start_game());
        world
    }

    #[test]
    fn test_new_rejects_bad_tuning() {
        let tuning = Tuning {
            lane_count: 0,
            ..Default::default()
        };
        assert_eq!(World::new(1, tuning).err(), Some(TuningError::ZeroLanes));
    }

    #[test]
    fn test_new_rejects_reversing_or_empty_track() {
        let reversing = Tuning {
            speed_step_fraction: -0.6,
            ..Default::default()
        };
        assert!(matches!(
            World::new(1, reversing),
            Err(TuningError::Negative { name: "speed_step_fraction", .. })
        ));

        let starved = Tuning {
            initial_frontier: -200.0,
            ..Default::default()
        };
        assert!(matches!(
            World::new(1, starved),
            Err(TuningError::FrontierBeyondSpawn { .. })
        ));
    }

    #[test]
    fn test_intents_ignored_on_menu() {
        let mut world = World::new(1, Tuning::default()).unwrap();
        assert_eq!(world.handle_intent(Intent::Jump), None);
        world.handle_intent(Intent::MoveLeft);
        assert_eq!(world.player.lane, 0);
        assert!(world.player.is_grounded());
    }

    #[test]
    fn test_double_jump_requires_upgrade() {
        let mut world = playing_world();
        assert_eq!(
            world.handle_intent(Intent::Jump),
            Some(GameEvent::Jumped { double: false })
        );
        assert_eq!(world.handle_intent(Intent::Jump), None);

        world.state.set_upgrades(Upgrades {
            has_double_jump: true,
            ..Default::default()
        });
        assert_eq!(
            world.handle_intent(Intent::Jump),
            Some(GameEvent::Jumped { double: true })
        );
    }

    #[test]
    fn test_damage_inside_invincibility_window_counts_once() {
        let mut world = playing_world();
        let mut events = Vec::new();
        world.apply_event(SimEvent::Damage { entity: 1 }, &mut events);
        assert_eq!(world.state.lives, 6);
        assert!(world.player.is_invincible(world.clock));

        world.clock += 1.0;
        world.apply_event(SimEvent::Damage { entity: 2 }, &mut events);
        assert_eq!(world.state.lives, 6);
        assert_eq!(events, vec![GameEvent::Damaged { lives: 6 }]);

        // Window over
        world.clock += 0.6;
        world.apply_event(SimEvent::Damage { entity: 3 }, &mut events);
        assert_eq!(world.state.lives, 5);
    }

    #[test]
    fn test_gem_event() {
        let mut world = playing_world();
        let mut events = Vec::new();
        world.apply_event(SimEvent::CollectGem { entity: 1, value: 500 }, &mut events);
        assert_eq!(world.state.score, 500);
        assert_eq!(events, vec![GameEvent::GemCollected { value: 500 }]);
    }

    #[test]
    fn test_letters_to_victory_record() {
        let mut world = playing_world();
        assert!(world.session_record().is_none());

        let mut events = Vec::new();
        for index in [3, 1, 0, 2] {
            world.apply_event(SimEvent::CollectLetter { entity: 1, index }, &mut events);
        }
        assert_eq!(events.last(), Some(&GameEvent::Victory));
        assert_eq!(world.state.status, GameStatus::Victory);

        let record = world.session_record().unwrap();
        assert!(record.completed);
        assert_eq!(record.score, 5000);
        assert_eq!(record.collected_letters, vec!['B', 'E', 'T', 'R']);
        assert_eq!(record.seed, 42);
    }

    #[test]
    fn test_restart_clears_track() {
        let mut world = playing_world();
        world.ledger.spawn(EntityKind::Obstacle, Vec3::new(0.0, 0.85, -20.0), None);
        world.player.set_lane(1, 3);
        world.spawner.travel(250.0);

        // Restart refused while playing
        assert!(!world.restart_game());
        assert_eq!(world.ledger.len(), 1);

        let mut events = Vec::new();
        for _ in 0..7 {
            world.clock += 2.0;
            world.apply_event(SimEvent::Damage { entity: 1 }, &mut events);
        }
        assert_eq!(world.state.status, GameStatus::GameOver);
        assert_eq!(events.last(), Some(&GameEvent::GameOver));

        assert!(world.restart_game());
        assert!(world.ledger.is_empty());
        assert_eq!(world.player.lane, 0);
        assert_eq!(world.spawner.distance_traveled, 0.0);
        assert_eq!(world.state.lives, 7);
    }

    #[test]
    fn test_snapshot_shows_letters() {
        let mut world = playing_world();
        world
            .ledger
            .spawn(EntityKind::Letter, Vec3::new(0.0, 1.2, -30.0), Some(1));
        let hidden = world
            .ledger
            .spawn(EntityKind::Collectible, Vec3::new(0.0, 1.4, -40.0), None);
        world.ledger.deactivate(hidden);

        let snapshot = world.snapshot();
        assert_eq!(snapshot.entities.len(), 1);
        assert_eq!(snapshot.entities[0].glyph, Some('E'));
        assert_eq!(snapshot.entities[0].color.as_deref(), Some("#ff0033"));
        assert_eq!(snapshot.status, GameStatus::Playing);
        assert!(!snapshot.player.invincible);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"Letter\""));
    }
}
