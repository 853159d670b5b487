#![warn(missing_docs)]
//! Test surfaces for headless runs: JSONL event stream, run reports and
//! JSON snapshots.

mod snapshot;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use wildlands_core::SimTick;

pub use snapshot::*;

/// Primary event record captured by headless tests.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form payload.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self { file, written: 0 })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Events written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

/// End-of-run summary of a headless simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier.
    pub name: String,
    /// When the report was produced (RFC 3339).
    pub timestamp: String,
    /// Frames simulated.
    pub frames: u64,
    /// Day reached.
    pub day: u32,
    /// Times the player died.
    pub deaths: u32,
    /// Live entity counts at the end of the run.
    pub counts: EntityCounts,
}

/// Entity totals at one moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    /// Resource nodes.
    pub resources: usize,
    /// Enemies.
    pub enemies: usize,
    /// Animals.
    pub animals: usize,
    /// Placed buildings.
    pub buildings: usize,
    /// Items on the ground.
    pub dropped_items: usize,
}

impl RunReport {
    /// Start a report stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            frames: 0,
            day: 1,
            deaths: 0,
            counts: EntityCounts::default(),
        }
    }

    /// Write the report as pretty JSON, creating parent dirs if needed.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))
    }

    /// Read a report written by [`RunReport::write_to`].
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read report {}", path.display()))?;
        serde_json::from_str(&text).context("Failed to parse run report")
    }
}
