//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (fixed-step frame clock)
//! - Input events (keys and touch buttons to intents)
//! - Browser bindings (wasm32 only)

pub mod input;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{IntentQueue, intent_for_key, intent_for_touch};
pub use time::FrameClock;
