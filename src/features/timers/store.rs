//! Flat-file persistence for pending timers.
//!
//! One JSON document holds the whole registry. Load and save are whole-file
//! operations with plain overwrite semantics; there is exactly one writer. A
//! missing or corrupt file degrades to an empty registry instead of an error,
//! so a bad store never keeps the bot from starting.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{Context, Result};
use log::warn;
use std::path::{Path, PathBuf};

use crate::features::timers::record::Registry;

pub struct TimerStore {
    path: PathBuf,
}

impl TimerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TimerStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry from disk. A missing file is a normal first start;
    /// an unreadable or corrupt file is logged and yields an empty registry.
    pub fn load(&self) -> Registry {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Registry::new(),
            Err(e) => {
                warn!(
                    "Failed to read timer store {}: {e} - starting empty",
                    self.path.display()
                );
                return Registry::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(
                    "Timer store {} is corrupt: {e} - starting empty",
                    self.path.display()
                );
                Registry::new()
            }
        }
    }

    /// Overwrite the store file with the full registry contents.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let json = serde_json::to_string_pretty(registry)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write timer store {}", self.path.display()))?;
        Ok(())
    }
}
