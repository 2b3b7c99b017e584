//! Browser bindings
//!
//! The page owns the canvas and the `requestAnimationFrame` loop; it feeds
//! key/touch events and frame deltas in and reads JSON snapshots back.

use wasm_bindgen::prelude::*;

use super::{FrameClock, IntentQueue};
use crate::consts::SIM_DT;
use crate::highscores::{HighScores, now_ms};
use crate::persistence::{
    DailyMarker, LocalStorageMarker, LocalStorageSink, submit_session, today_key,
};
use crate::sim::{GameEvent, TickInput, Upgrades, World, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already initialised by an earlier module instance
        return;
    }
    log::info!("Lane Runner (web) loaded");
}

/// One game instance driven by the page
#[wasm_bindgen]
pub struct WebRunner {
    world: World,
    clock: FrameClock,
    queue: IntentQueue,
    idle_mode: bool,
    sink: LocalStorageSink,
    marker: LocalStorageMarker,
    scores: HighScores,
    /// Terminal session already handed to the sink
    recorded: bool,
    events: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebRunner {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> Result<WebRunner, JsValue> {
        let mut world = World::new(seed as u64, Tuning::load())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let marker = LocalStorageMarker;
        world.state.played_today = marker.played_today(today_key());
        Ok(Self {
            world,
            clock: FrameClock::new(),
            queue: IntentQueue::new(),
            idle_mode: false,
            sink: LocalStorageSink,
            marker,
            scores: HighScores::load(),
            recorded: false,
            events: Vec::new(),
        })
    }

    pub fn start(&mut self) -> bool {
        let started = self.world.start_game();
        if started {
            self.begin_session();
        }
        started
    }

    pub fn restart(&mut self) -> bool {
        let restarted = self.world.restart_game();
        if restarted {
            self.begin_session();
        }
        restarted
    }

    pub fn menu(&mut self) {
        self.world.return_to_menu();
        self.world.state.played_today = self.marker.played_today(today_key());
        self.queue.clear();
        self.clock.reset();
    }

    fn begin_session(&mut self) {
        self.recorded = false;
        self.queue.clear();
        self.clock.reset();
        if let Err(err) = self.marker.mark_played(today_key()) {
            log::warn!("Could not write daily marker: {}", err);
        }
        log::info!("Session started (seed {})", self.world.seed);
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.queue.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) {
        self.queue.key_up(key);
    }

    pub fn touch(&mut self, button: &str) -> bool {
        self.queue.touch(button)
    }

    /// Demo mode: the autopilot plays
    pub fn set_idle(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    pub fn set_upgrades(&mut self, double_jump: bool, immortality: bool) {
        self.world.state.set_upgrades(Upgrades {
            has_double_jump: double_jump,
            immortality_active: immortality,
        });
    }

    pub fn played_today(&self) -> bool {
        self.world.state.played_today
    }

    pub fn top_score(&self) -> f64 {
        self.scores.top_score().unwrap_or(0) as f64
    }

    /// Run as many fixed steps as the frame delta (seconds) covers
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.events.clear();
        let steps = self.clock.advance(frame_dt);
        if steps == 0 {
            return 0;
        }

        // Queued intents land on the first step only
        let mut input = TickInput {
            intents: self.queue.drain(),
            idle_mode: self.idle_mode,
        };
        for _ in 0..steps {
            let events = tick(&mut self.world, &input, SIM_DT);
            self.events.extend(events);
            input.intents.clear();
        }

        if !self.recorded && let Some(record) = self.world.session_record() {
            self.recorded = true;
            submit_session(&mut self.sink, &record);
            if let Some(rank) = self.scores.add_session(&record, now_ms()) {
                log::info!("New high score, rank {}", rank);
                if let Err(err) = self.scores.save() {
                    log::warn!("Could not save high scores: {}", err);
                }
            }
        }
        steps
    }

    /// Fraction of a fixed step carried into the next frame, for interpolation
    pub fn interpolation(&self) -> f32 {
        self.clock.leftover() / SIM_DT
    }

    /// Render state for the current frame
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.world.snapshot()).unwrap_or_default()
    }

    /// Events produced by the last `advance` call
    pub fn events_json(&self) -> String {
        serde_json::to_string(&self.events).unwrap_or_default()
    }

    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(&self.scores).unwrap_or_default()
    }
}
