//! Session persistence
//!
//! Features:
//! - Session records appended to a sink (JSON lines file, LocalStorage, memory)
//! - Daily "played today" marker
//! - Failures are logged and never reach the simulation

pub mod daily;
pub mod session;

use thiserror::Error;

pub use daily::{DailyMarker, FileMarker, MemoryMarker, today_key};
pub use session::{JsonLinesSink, MemorySink, SessionRecord, SessionSink, submit_session};

#[cfg(target_arch = "wasm32")]
pub use daily::LocalStorageMarker;
#[cfg(target_arch = "wasm32")]
pub use session::LocalStorageSink;

/// Anything that can go wrong talking to storage
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed stored data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(&'static str),
}

/// Browser LocalStorage, if the page has one
#[cfg(target_arch = "wasm32")]
pub(crate) fn local_storage() -> Result<web_sys::Storage, PersistError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(PersistError::Unavailable("localStorage"))
}
