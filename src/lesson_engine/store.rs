//! External collaborators behind traits: where resume state lives and where
//! completion records go.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::lesson_engine::{
    error::EngineResult,
    models::{CompletionRecord, ResumeRecord},
};

/// Durable storage for the single resume record.
pub trait ResumeStore {
    fn load(&self) -> EngineResult<Option<ResumeRecord>>;
    fn save(&mut self, record: &ResumeRecord) -> EngineResult<()>;
    fn clear(&mut self) -> EngineResult<()>;
}

/// Receives one completion record per finished session.
pub trait ProgressSink {
    fn submit(&mut self, record: &CompletionRecord) -> EngineResult<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(&CompletionRecord) -> EngineResult<()>,
{
    fn submit(&mut self, record: &CompletionRecord) -> EngineResult<()> {
        self(record)
    }
}

// ---------------------------------------------------------------------------
// In-process implementations
// ---------------------------------------------------------------------------

/// Keeps the record in memory. Clones share the same slot, so a caller can
/// hand one clone to a session and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<ResumeRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: ResumeRecord) -> Self {
        MemoryStore { slot: Rc::new(RefCell::new(Some(record))) }
    }

    pub fn snapshot(&self) -> Option<ResumeRecord> {
        self.slot.borrow().clone()
    }
}

impl ResumeStore for MemoryStore {
    fn load(&self) -> EngineResult<Option<ResumeRecord>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&mut self, record: &ResumeRecord) -> EngineResult<()> {
        *self.slot.borrow_mut() = Some(record.clone());
        Ok(())
    }

    fn clear(&mut self) -> EngineResult<()> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// Collects completion records. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Rc<RefCell<Vec<CompletionRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CompletionRecord> {
        self.records.borrow().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn submit(&mut self, record: &CompletionRecord) -> EngineResult<()> {
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One JSON file holding the resume record. A missing file means no record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResumeStore for JsonFileStore {
    fn load(&self) -> EngineResult<Option<ResumeRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&mut self, record: &ResumeRecord) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }

    fn clear(&mut self) -> EngineResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
