//! Session state machine
//!
//! Owns status, score, lives, speed and the collected-letter set. This is the
//! only place those values change; the rest of the simulation reports what
//! happened through [`SimEvent`](super::collision::SimEvent)s.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting on the menu
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Ran out of lives
    GameOver,
    /// Collected the whole target word
    Victory,
}

impl GameStatus {
    /// GameOver and Victory freeze the world until a restart
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Victory)
    }
}

/// Abilities held across restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Upgrades {
    /// Allows one extra jump while airborne
    pub has_double_jump: bool,
    /// Ignores all damage
    pub immortality_active: bool,
}

impl Upgrades {
    pub fn max_jumps(&self) -> u8 {
        if self.has_double_jump { 2 } else { 1 }
    }
}

/// What a letter pickup did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterOutcome {
    /// Not playing, or index outside the target word
    Ignored,
    /// Already held
    Duplicate,
    Collected,
    /// Last missing letter; the session is won
    Completed,
}

/// What a damage event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Not playing, invincible or immortal
    Ignored,
    /// Lost a life, still alive
    Hurt { lives: u8 },
    /// Lost the last life
    Died,
}

/// Complete session state (serializable for snapshots)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub score: u64,
    pub lives: u8,
    pub max_lives: u8,
    /// Current scroll speed (units per second)
    pub speed: f32,
    /// Indices into the target word collected this session
    pub collected_letters: BTreeSet<usize>,
    pub lane_count: u32,
    /// Set once a session has been started today
    pub played_today: bool,
    pub upgrades: Upgrades,
    /// Balance values the state machine applies
    base_speed: f32,
    speed_step: f32,
    word_len: usize,
    victory_bonus: u64,
}

impl GameState {
    /// Create a state sitting on the menu
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            status: GameStatus::Menu,
            score: 0,
            lives: tuning.max_lives,
            max_lives: tuning.max_lives,
            speed: 0.0,
            collected_letters: BTreeSet::new(),
            lane_count: tuning.lane_count,
            played_today: false,
            upgrades: Upgrades::default(),
            base_speed: tuning.base_speed,
            speed_step: tuning.speed_step(),
            word_len: tuning.target_word.len(),
            victory_bonus: tuning.victory_bonus,
        }
    }

    fn reset_session(&mut self) {
        self.status = GameStatus::Playing;
        self.score = 0;
        self.lives = self.max_lives;
        self.speed = self.base_speed;
        self.collected_letters.clear();
    }

    /// Begin a fresh session. Ignored while already playing.
    pub fn start_game(&mut self) -> bool {
        if self.status == GameStatus::Playing {
            return false;
        }
        self.reset_session();
        self.played_today = true;
        self.upgrades = Upgrades::default();
        log::info!("Session started (lives {}, speed {})", self.lives, self.speed);
        true
    }

    /// Play again after GameOver/Victory. Double jump carries over;
    /// immortality lasts one session.
    pub fn restart_game(&mut self) -> bool {
        if !self.status.is_terminal() {
            return false;
        }
        self.reset_session();
        self.upgrades.immortality_active = false;
        log::info!("Session restarted");
        true
    }

    /// Leave the session for the menu
    pub fn return_to_menu(&mut self) {
        self.status = GameStatus::Menu;
        self.score = 0;
        self.lives = self.max_lives;
        self.speed = 0.0;
        self.collected_letters.clear();
    }

    pub fn set_upgrades(&mut self, upgrades: Upgrades) {
        self.upgrades = upgrades;
    }

    /// Apply one hit. `invincible` is the player's current invincibility window.
    pub fn take_damage(&mut self, invincible: bool) -> DamageOutcome {
        if self.status != GameStatus::Playing || invincible || self.upgrades.immortality_active {
            return DamageOutcome::Ignored;
        }

        if self.lives > 1 {
            self.lives -= 1;
            DamageOutcome::Hurt { lives: self.lives }
        } else {
            self.lives = 0;
            self.status = GameStatus::GameOver;
            self.speed = 0.0;
            log::info!("Game over (score {})", self.score);
            DamageOutcome::Died
        }
    }

    /// Add a gem's value to the score
    pub fn collect_gem(&mut self, value: u64) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.score += value;
        true
    }

    /// Collect the letter at `index` of the target word
    pub fn collect_letter(&mut self, index: usize) -> LetterOutcome {
        if self.status != GameStatus::Playing || index >= self.word_len {
            return LetterOutcome::Ignored;
        }
        if !self.collected_letters.insert(index) {
            return LetterOutcome::Duplicate;
        }

        self.speed += self.speed_step;

        if self.collected_letters.len() == self.word_len {
            self.status = GameStatus::Victory;
            self.speed = 0.0;
            self.score += self.victory_bonus;
            log::info!("Victory (score {})", self.score);
            return LetterOutcome::Completed;
        }
        LetterOutcome::Collected
    }

    /// Target-word indices not collected yet, ascending
    pub fn missing_letters(&self) -> Vec<usize> {
        (0..self.word_len)
            .filter(|i| !self.collected_letters.contains(i))
            .collect()
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }
}
