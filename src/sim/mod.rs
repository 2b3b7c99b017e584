//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Fixed per-tick order: kinematics, ledger, collision, state, spawn
//! - No rendering or platform dependencies

pub mod collision;
pub mod ledger;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{SimEvent, check_entity, crossed_plane, in_depth_zone, resolve};
pub use ledger::{Entity, EntityKind, Ledger};
pub use player::{JumpKind, Player};
pub use spawn::{SpawnPlan, SpawnRng, Spawner};
pub use state::{DamageOutcome, GameState, GameStatus, LetterOutcome, Upgrades};
pub use tick::{Intent, TickInput, autopilot, tick};
pub use world::{EntityView, GameEvent, PlayerPose, Snapshot, World};
