//! Input mapping
//!
//! Key and touch presses become intents immediately but are only handed to
//! the simulation at the next tick boundary.

use std::collections::VecDeque;

use crate::sim::Intent;

/// Map a `KeyboardEvent.key` value to an intent
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Intent::MoveLeft),
        "ArrowRight" | "d" | "D" => Some(Intent::MoveRight),
        "ArrowUp" | "w" | "W" | " " => Some(Intent::Jump),
        _ => None,
    }
}

/// Map an on-screen touch button id to an intent
pub fn intent_for_touch(button: &str) -> Option<Intent> {
    match button {
        "left" => Some(Intent::MoveLeft),
        "right" => Some(Intent::MoveRight),
        "jump" => Some(Intent::Jump),
        _ => None,
    }
}

/// Buffered, edge-triggered intents
#[derive(Debug, Clone, Default)]
pub struct IntentQueue {
    pending: VecDeque<Intent>,
    /// Keys currently held, so auto-repeat does not re-trigger
    held: Vec<String>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Returns true if an intent was queued.
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(intent) = intent_for_key(key) else {
            return false;
        };
        if self.held.iter().any(|k| k == key) {
            return false;
        }
        self.held.push(key.to_string());
        self.pending.push_back(intent);
        true
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.retain(|k| k != key);
    }

    /// Touch buttons have no hold state; every tap counts
    pub fn touch(&mut self, button: &str) -> bool {
        match intent_for_touch(button) {
            Some(intent) => {
                self.pending.push_back(intent);
                true
            }
            None => false,
        }
    }

    /// Take everything queued since the last tick, in arrival order
    pub fn drain(&mut self) -> Vec<Intent> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget queued intents and held keys (focus loss, session reset)
    pub fn clear(&mut self) {
        self.pending.clear();
        self.held.clear();
    }
}
