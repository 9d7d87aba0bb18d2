//! I/O boundary traits for testability
//!
//! The topic document is read once at startup and rewritten in full after
//! every mutation. These traits abstract where it lives, allowing the
//! controller to be tested with an in-memory store.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::domain::TopicDocument;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::xml::{parse_document, render_document};

/// Backing store for the topic document.
pub trait TopicStore: Send + Sync {
    /// Read the whole document.
    fn load(&self) -> InfraResult<TopicDocument>;

    /// Replace the whole document.
    ///
    /// Must be atomic: afterwards the store holds either the new document or
    /// the previous one, never a mix.
    fn save(&self, document: &TopicDocument) -> InfraResult<()>;

    /// Human readable location, for messages.
    fn location(&self) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// XML file on disk.
#[derive(Debug, Clone)]
pub struct XmlTopicStore {
    path: PathBuf,
}

impl XmlTopicStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn target_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl TopicStore for XmlTopicStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> InfraResult<TopicDocument> {
        let xml = std::fs::read_to_string(&self.path).map_err(|e| {
            InfraError::io(format!("read topic document {}", self.path.display()), e)
        })?;
        let document = parse_document(&xml, &self.path)?;
        debug!("loaded {} top-level topics", document.topics.len());
        Ok(document)
    }

    /// Writes to a temp file in the target directory, syncs it and renames it
    /// over the target.
    #[instrument(level = "debug", skip(self, document), fields(path = %self.path.display()))]
    fn save(&self, document: &TopicDocument) -> InfraResult<()> {
        let xml = render_document(document, &self.path)?;
        let dir = self.target_dir();

        std::fs::create_dir_all(dir)
            .map_err(|e| InfraError::io(format!("create directory {}", dir.display()), e))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| InfraError::io(format!("create temp file in {}", dir.display()), e))?;
        tmp.write_all(xml.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| InfraError::io(format!("write {}", tmp.path().display()), e))?;
        tmp.persist(&self.path).map_err(|e| {
            InfraError::io(format!("replace {}", self.path.display()), e.error)
        })?;

        debug!("saved {} bytes", xml.len());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Document held in memory.
///
/// Counts successful saves and can be switched into a failing mode, which is
/// what the write-through tests are built on.
#[derive(Debug, Default)]
pub struct MemoryTopicStore {
    document: Mutex<TopicDocument>,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryTopicStore {
    pub fn new(document: TopicDocument) -> Self {
        Self {
            document: Mutex::new(document),
            ..Self::default()
        }
    }

    /// Make every following `save` fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Currently stored document.
    pub fn document(&self) -> TopicDocument {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TopicStore for MemoryTopicStore {
    fn load(&self) -> InfraResult<TopicDocument> {
        Ok(self.document())
    }

    fn save(&self, document: &TopicDocument) -> InfraResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(InfraError::io(
                "write in-memory topic document",
                io::Error::new(io::ErrorKind::Other, "store is read-only"),
            ));
        }
        *self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = document.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
