use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Destination for coordination results.
///
/// The coordinator only ever writes; nothing in the core reads back what a
/// sink persisted.
pub trait ResultSink: Send + Sync {
    /// Persist a serialized result and return its location
    fn write(&self, filename: &str, value: &serde_json::Value) -> Result<PathBuf>;
}

/// Writes results as pretty-printed JSON files under a single directory.
pub struct JsonFileSink {
    results_dir: PathBuf,
}

impl JsonFileSink {
    /// Create the sink, ensuring the results directory exists
    pub fn new(results_dir: impl Into<PathBuf>) -> Result<Self> {
        let results_dir = results_dir.into();
        fs::create_dir_all(&results_dir).with_context(|| {
            format!("Failed to create results dir: {}", results_dir.display())
        })?;
        Ok(Self { results_dir })
    }
}

impl ResultSink for JsonFileSink {
    fn write(&self, filename: &str, value: &serde_json::Value) -> Result<PathBuf> {
        let path = self.results_dir.join(filename);
        let content =
            serde_json::to_string_pretty(value).context("Failed to serialize results")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write results: {}", path.display()))?;
        Ok(path)
    }
}

/// In-memory sink, keeps every write for later inspection.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(String, serde_json::Value)>>,
}

#[allow(dead_code)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far
    pub fn writes(&self) -> Vec<(String, serde_json::Value)> {
        self.writes.lock().expect("sink lock poisoned").clone()
    }
}

impl ResultSink for MemorySink {
    fn write(&self, filename: &str, value: &serde_json::Value) -> Result<PathBuf> {
        self.writes
            .lock()
            .expect("sink lock poisoned")
            .push((filename.to_string(), value.clone()));
        Ok(PathBuf::from(filename))
    }
}
