//! Persistence hooks for the record list.

use crate::models::Record;
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Loads the record list at startup and saves it after every mutation.
pub trait Persistence {
    fn load(&self) -> Result<Vec<Record>>;
    fn save(&self, records: &[Record]) -> Result<()>;
}

/// Stores one JSON document per scope key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Persist directly to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist to `<dir>/<scope>.json`.
    pub fn scoped(dir: impl AsRef<Path>, scope: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{scope}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            tracing::info!("No record file at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read record file: {}", self.path.display()))?;

        let records: Vec<Record> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse record file: {}", self.path.display()))?;

        tracing::info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;

        let contents =
            serde_json::to_string_pretty(records).context("Failed to serialize records")?;

        // Write next to the target so the rename stays on one filesystem.
        let mut file = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        file.write_all(contents.as_bytes())
            .context("Failed to write records")?;
        file.persist(&self.path)
            .with_context(|| format!("Failed to replace record file: {}", self.path.display()))?;

        tracing::debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Keeps the last saved list in memory.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    records: RefCell<Vec<Record>>,
    saves: RefCell<usize>,
}

impl MemoryPersistence {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RefCell::new(records),
            saves: RefCell::new(0),
        }
    }

    /// Snapshot of the last saved list.
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    /// Number of saves performed so far.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Vec<Record>> {
        Ok(self.records.borrow().clone())
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        *self.records.borrow_mut() = records.to_vec();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

impl<P: Persistence + ?Sized> Persistence for std::rc::Rc<P> {
    fn load(&self) -> Result<Vec<Record>> {
        (**self).load()
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        (**self).save(records)
    }
}
