use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredFlags {
    block_enabled: bool,
    scroll_limit_enabled: bool,
    web_block_enabled: bool,
    /// Unix millis of the most recent corrective action.
    last_intervention_ms: i64,
}

impl Default for StoredFlags {
    fn default() -> Self {
        Self {
            block_enabled: false,
            scroll_limit_enabled: false,
            web_block_enabled: false,
            last_intervention_ms: 0,
        }
    }
}

/// Persisted configuration flags. The settings UI writes the toggles; the
/// engine reads them on every dispatch and writes only the intervention
/// timestamp.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<StoredFlags>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            StoredFlags::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn block_enabled(&self) -> bool {
        self.data.read().unwrap().block_enabled
    }

    pub fn scroll_limit_enabled(&self) -> bool {
        self.data.read().unwrap().scroll_limit_enabled
    }

    pub fn web_block_enabled(&self) -> bool {
        self.data.read().unwrap().web_block_enabled
    }

    pub fn last_intervention_ms(&self) -> i64 {
        self.data.read().unwrap().last_intervention_ms
    }

    pub fn set_block_enabled(&self, enabled: bool) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.block_enabled = enabled;
        self.persist(&guard)
    }

    pub fn set_scroll_limit_enabled(&self, enabled: bool) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.scroll_limit_enabled = enabled;
        self.persist(&guard)
    }

    pub fn set_web_block_enabled(&self, enabled: bool) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.web_block_enabled = enabled;
        self.persist(&guard)
    }

    pub fn set_last_intervention_ms(&self, timestamp_ms: i64) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.last_intervention_ms = timestamp_ms;
        self.persist(&guard)
    }

    /// Re-read the file, dropping any unsaved in-memory state.
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: StoredFlags = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &StoredFlags) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
