//! Finished-session records and where they go

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::PersistError;

/// Outcome of one finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub score: u64,
    pub distance: f32,
    /// Simulated seconds the session lasted
    #[serde(default)]
    pub elapsed_secs: f32,
    /// Collected glyphs in target-word order
    pub collected_letters: Vec<char>,
    /// Whole word collected
    pub completed: bool,
    pub seed: u64,
}

/// Destination for finished sessions
pub trait SessionSink {
    fn submit(&mut self, record: &SessionRecord) -> Result<(), PersistError>;
}

/// Hand a record to a sink. Failures are logged, never propagated.
pub fn submit_session(sink: &mut dyn SessionSink, record: &SessionRecord) -> bool {
    match sink.submit(record) {
        Ok(()) => {
            log::info!(
                "Session recorded: score {} distance {:.0} letters {:?}",
                record.score,
                record.distance,
                record.collected_letters
            );
            true
        }
        Err(err) => {
            log::warn!("Failed to record session: {}", err);
            false
        }
    }
}

/// Appends one JSON object per line to a file
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every record, skipping blank lines
    pub fn read_all(&self) -> Result<Vec<SessionRecord>, PersistError> {
        let file = std::fs::File::open(&self.path)?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl SessionSink for JsonLinesSink {
    fn submit(&mut self, record: &SessionRecord) -> Result<(), PersistError> {
        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// Keeps records in process
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<SessionRecord>,
}

impl SessionSink for MemorySink {
    fn submit(&mut self, record: &SessionRecord) -> Result<(), PersistError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// JSON array of records under one LocalStorage key
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageSink;

#[cfg(target_arch = "wasm32")]
impl LocalStorageSink {
    const STORAGE_KEY: &'static str = "lane_runner_sessions";
    /// Oldest records are dropped past this
    const MAX_RECORDS: usize = 50;
}

#[cfg(target_arch = "wasm32")]
impl SessionSink for LocalStorageSink {
    fn submit(&mut self, record: &SessionRecord) -> Result<(), PersistError> {
        let storage = super::local_storage()?;
        let mut records: Vec<SessionRecord> = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            _ => Vec::new(),
        };
        records.push(record.clone());
        if records.len() > Self::MAX_RECORDS {
            let excess = records.len() - Self::MAX_RECORDS;
            records.drain(..excess);
        }
        let json = serde_json::to_string(&records)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| PersistError::Unavailable("localStorage write rejected"))
    }
}
