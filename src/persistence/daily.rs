//! "Played today" marker
//!
//! Days are counted as whole days since the Unix epoch. Native uses UTC;
//! the browser shifts by the local timezone so the day rolls over at the
//! player's midnight.

use std::path::PathBuf;

use super::PersistError;

const SECS_PER_DAY: u64 = 86_400;

/// Records the last day a session was started
pub trait DailyMarker {
    fn played_today(&self, today: u64) -> bool;
    fn mark_played(&mut self, today: u64) -> Result<(), PersistError>;
}

/// Current day number
#[cfg(not(target_arch = "wasm32"))]
pub fn today_key() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() / SECS_PER_DAY)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn today_key() -> u64 {
    let now = js_sys::Date::new_0();
    let offset_ms = now.get_timezone_offset() * 60_000.0;
    let local_ms = now.get_time() - offset_ms;
    (local_ms / (SECS_PER_DAY as f64 * 1000.0)).floor().max(0.0) as u64
}

/// Day number stored as text in a file
#[derive(Debug, Clone)]
pub struct FileMarker {
    path: PathBuf,
}

impl FileMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn last_played(&self) -> Option<u64> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        text.trim().parse().ok()
    }
}

impl DailyMarker for FileMarker {
    fn played_today(&self, today: u64) -> bool {
        self.last_played() == Some(today)
    }

    fn mark_played(&mut self, today: u64) -> Result<(), PersistError> {
        std::fs::write(&self.path, today.to_string())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMarker {
    last: Option<u64>,
}

impl DailyMarker for MemoryMarker {
    fn played_today(&self, today: u64) -> bool {
        self.last == Some(today)
    }

    fn mark_played(&mut self, today: u64) -> Result<(), PersistError> {
        self.last = Some(today);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageMarker;

#[cfg(target_arch = "wasm32")]
impl LocalStorageMarker {
    const STORAGE_KEY: &'static str = "lane_runner_last_played";
}

#[cfg(target_arch = "wasm32")]
impl DailyMarker for LocalStorageMarker {
    fn played_today(&self, today: u64) -> bool {
        let Ok(storage) = super::local_storage() else {
            return false;
        };
        matches!(
            storage.get_item(Self::STORAGE_KEY),
            Ok(Some(day)) if day.trim().parse::<u64>().ok() == Some(today)
        )
    }

    fn mark_played(&mut self, today: u64) -> Result<(), PersistError> {
        super::local_storage()?
            .set_item(Self::STORAGE_KEY, &today.to_string())
            .map_err(|_| PersistError::Unavailable("localStorage write rejected"))
    }
}
