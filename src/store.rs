//! Bundle persistence
//!
//! The engine itself never touches the filesystem; callers hand the finished
//! bundle to a `BundleSink`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

use crate::bundle::AnalyticsBundle;
use crate::error::{EngineError, Result};
use crate::period::Period;

pub trait BundleSink {
    /// Store `bundle` under its target month, replacing any earlier one.
    /// Returns where it went.
    fn persist(&self, bundle: &AnalyticsBundle) -> Result<PathBuf>;
}

/// One pretty-printed JSON file per target month: `<dir>/bundle_YYYY-MM.json`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn path_for(&self, period: Period) -> PathBuf {
        self.dir.join(file_name(period))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

pub fn file_name(period: Period) -> String {
    format!("bundle_{}.json", period.key())
}

impl BundleSink for DirectorySink {
    fn persist(&self, bundle: &AnalyticsBundle) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(bundle.target_period);
        let json = serde_json::to_string_pretty(bundle)?;
        std::fs::write(&path, json)?;
        info!("Wrote bundle for {} to {:?}", bundle.target_period.key(), path);
        Ok(path)
    }
}

/// Keeps serialized bundles in memory, keyed by target month
#[derive(Debug, Default)]
pub struct MemorySink {
    bundles: Mutex<BTreeMap<Period, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, period: Period) -> Option<String> {
        self.bundles
            .lock()
            .ok()
            .and_then(|bundles| bundles.get(&period).cloned())
    }

    pub fn len(&self) -> usize {
        self.bundles.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BundleSink for MemorySink {
    fn persist(&self, bundle: &AnalyticsBundle) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(bundle)?;
        self.bundles
            .lock()
            .map_err(|e| EngineError::Sink(e.to_string()))?
            .insert(bundle.target_period, json);
        Ok(PathBuf::from(file_name(bundle.target_period)))
    }
}
