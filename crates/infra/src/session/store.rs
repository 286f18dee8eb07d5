//! Session token stores
//!
//! Adapters for the [`SessionStore`] port. The port is infallible by
//! contract, so the file-backed store logs I/O problems and keeps
//! serving from memory instead of surfacing them.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use caresync_core::SessionStore;
use tracing::warn;

/// In-memory store; state lives for the process only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.values.write().unwrap().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.write().unwrap().remove(key);
    }
}

/// JSON-file-backed store
///
/// The whole map is rewritten on every mutation; session state is a
/// handful of tokens, never bulk data.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileSessionStore {
    /// Open a store at `path`, loading any previously persisted state.
    ///
    /// A missing file is a fresh session; an unreadable or corrupt file
    /// is logged and treated the same way.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = RwLock::new(load_values(&path));
        Self { path, values }
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let serialized = match serde_json::to_string_pretty(values) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(error = %err, "failed to serialize session state");
                return;
            }
        };

        if let Err(err) = fs::write(&self.path, serialized) {
            warn!(path = %self.path.display(), error = %err, "failed to persist session state");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        let mut values = self.values.write().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.write().unwrap();
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }
}

fn load_values(path: &Path) -> HashMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return HashMap::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read session file");
            return HashMap::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "session file is not valid JSON; starting with an empty session"
            );
            HashMap::new()
        }
    }
}
