//! JSON file store backend.
//!
//! All keys live in a single JSON object on disk. Every write replaces the
//! whole file atomically (temp file in the same directory, fsync, rename),
//! so a batch commit either lands completely or leaves the previous file
//! untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::warn;

use crate::{PersistenceStore, Result};

/// Durable key/value store backed by one JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries if the file is
    /// present. A file that fails to parse is set aside as `<path>.corrupt`
    /// and the store starts empty; the ledger layer rebuilds from defaults.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    let backup = path.with_extension("json.corrupt");
                    warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "Store file unreadable, setting it aside and starting empty"
                    );
                    fs::rename(&path, &backup)?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Write the current entries to disk atomically (temp file + rename).
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let encoded = serde_json::to_string_pretty(&self.entries)?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(encoded.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl PersistenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn set_many(&mut self, entries: &[(String, String)]) -> Result<()> {
        for (key, value) in entries {
            self.entries.insert(key.clone(), value.clone());
        }
        self.persist()
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("ledger.json")
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(store_path(&dir)).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = FileStore::open(path.clone()).unwrap();
        store.set("total", "3").unwrap();
        store
            .set_many(&[
                ("valid".to_string(), "2".to_string()),
                ("dup".to_string(), "1".to_string()),
            ])
            .unwrap();
        drop(store);

        let reopened = FileStore::open(path).unwrap();
        assert_eq!(reopened.get("total").unwrap().as_deref(), Some("3"));
        assert_eq!(reopened.get("valid").unwrap().as_deref(), Some("2"));
        assert_eq!(reopened.get("dup").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = FileStore::open(path.clone()).unwrap();
        store.set("total", "3").unwrap();
        store.clear().unwrap();
        drop(store);

        let reopened = FileStore::open(path).unwrap();
        assert_eq!(reopened.get("total").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_set_aside() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(path.clone()).unwrap();
        assert_eq!(store.get("total").unwrap(), None);
        assert!(path.with_extension("json.corrupt").exists());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = FileStore::open(path.clone()).unwrap();
        store.set("total", "1").unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
