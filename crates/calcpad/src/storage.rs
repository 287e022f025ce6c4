//! Persistent key-value storage
//!
//! The engine keeps three string values under fixed keys. Where they live is
//! up to the host: [`MemoryStore`] for tests, [`FileStore`] for the CLI, and
//! `localStorage` in the browser build.

use std::collections::HashMap;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::collections::BTreeMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Key holding the memory register
pub const MEMORY_KEY: &str = "calculatorMemory";
/// Key holding the history JSON array
pub const HISTORY_KEY: &str = "calculatorHistory";
/// Key holding the theme name
pub const THEME_KEY: &str = "calculatorTheme";

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// File being accessed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not a JSON object of strings
    #[error("storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The store cannot be reached at all
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create an I/O error for a path
    #[must_use]
    pub fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// String → string store the engine persists into
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON document on disk
///
/// Every `set` rewrites the whole document through a temp file in the same
/// directory followed by a rename, so a crash never leaves a torn file.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Opens the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no state file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(StorageError::io(path.display(), e)),
        };
        Ok(Self { path, values })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored key/value pairs, sorted by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn flush(&self) -> StorageResult<()> {
        use std::io::Write;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent.display(), e))?;

        let json = serde_json::to_string_pretty(&self.values)?;
        let io_err = |e: std::io::Error| StorageError::io(self.path.display(), e);

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keys() {
        assert_eq!(MEMORY_KEY, "calculatorMemory");
        assert_eq!(HISTORY_KEY, "calculatorHistory");
        assert_eq!(THEME_KEY, "calculatorTheme");
    }

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(THEME_KEY), None);
        store.set(THEME_KEY, "light").unwrap();
        assert_eq!(store.get(THEME_KEY), Some("light".to_string()));
        store.set(THEME_KEY, "dark").unwrap();
        assert_eq!(store.get(THEME_KEY), Some("dark".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_with_value() {
        let store = MemoryStore::new().with_value(MEMORY_KEY, "42");
        assert_eq!(store.get(MEMORY_KEY), Some("42".to_string()));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(store.get(MEMORY_KEY), None);
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set(MEMORY_KEY, "12.5").unwrap();
        store.set(THEME_KEY, "light").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(MEMORY_KEY), Some("12.5".to_string()));
        assert_eq!(reopened.get(THEME_KEY), Some("light".to_string()));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set(THEME_KEY, "dark").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_store_rejects_malformed_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn test_file_store_empty_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "").unwrap();
        assert!(FileStore::open(&path).is_ok());
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Unavailable("no window".into());
        assert_eq!(err.to_string(), "storage unavailable: no window");

        let err = StorageError::io(
            "/tmp/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/x"));
    }
}
