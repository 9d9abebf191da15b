use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::debug;

/// Named document collections kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Users,
    CheckIns,
    SuggestionRules,
    Resources,
}

impl Collection {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Users,
            Self::CheckIns,
            Self::SuggestionRules,
            Self::Resources,
        ]
    }

    /// Store key, also the file stem used by [`JsonFileStore`].
    pub const fn key(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::CheckIns => "checkins",
            Self::SuggestionRules => "suggestions",
            Self::Resources => "resources",
        }
    }
}

/// Whole-document load/save access to the backing store.
///
/// Each call is atomic on its own; a read-modify-write sequence spanning two
/// calls is not, and concurrent writers of one collection race last-writer-wins.
pub trait DocumentStore: Send + Sync {
    fn load(&self, collection: Collection) -> Result<Value, StoreError>;
    fn save(&self, collection: Collection, document: Value) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {collection} collection: {source}")]
    Read {
        collection: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {collection} collection: {source}")]
    Write {
        collection: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{collection} collection is malformed: {source}")]
    Malformed {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

fn empty_document() -> Value {
    Value::Object(Map::new())
}

/// Process-local store used by tests and throwaway demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<Collection, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, collection: Collection, document: Value) -> Self {
        if let Ok(mut guard) = self.documents.lock() {
            guard.insert(collection, document);
        }
        self
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, collection: Collection) -> Result<Value, StoreError> {
        let guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(guard
            .get(&collection)
            .cloned()
            .unwrap_or_else(empty_document))
    }

    fn save(&self, collection: Collection, document: Value) -> Result<(), StoreError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        guard.insert(collection, document);
        Ok(())
    }
}

/// One pretty-printed `<key>.json` file per collection under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, collection: Collection) -> PathBuf {
        self.root.join(format!("{}.json", collection.key()))
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self, collection: Collection) -> Result<Value, StoreError> {
        let path = self.path_for(collection);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "collection file missing; treating as empty");
                return Ok(empty_document());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    collection: collection.key(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            collection: collection.key(),
            source,
        })
    }

    fn save(&self, collection: Collection, document: Value) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            collection: collection.key(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(write_error)?;
        let rendered =
            serde_json::to_string_pretty(&document).map_err(|source| StoreError::Malformed {
                collection: collection.key(),
                source,
            })?;

        // Readers only ever see the old or the new file.
        let path = self.path_for(collection);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, rendered).map_err(write_error)?;
        fs::rename(&staging, &path).map_err(write_error)?;
        debug!(path = %path.display(), "collection saved");
        Ok(())
    }
}
