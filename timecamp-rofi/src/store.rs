//! The state directory shared by the scheduler and every CLI invocation.
//!
//! Files are replaced with write-temp-then-rename, so a concurrent reader sees either the old or
//! the new content, never a torn write.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::{CampError, Result};

pub const TASKS_FILE: &str = "tasks.json";
pub const ENTRIES_FILE: &str = "entries.json";
pub const ACTIVE_FILE: &str = "active.json";
pub const STATUS_FILE: &str = "status.json";

/// Why a persisted record could not be read.
#[derive(Debug)]
pub enum ReadError {
    Missing,
    Malformed(String),
}

impl ReadError {
    pub fn into_cache_miss(self, file: &'static str) -> CampError {
        let reason = match self {
            ReadError::Missing => "file does not exist".to_string(),
            ReadError::Malformed(reason) => reason,
        };
        CampError::CacheMiss { file, reason }
    }
}

#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            CampError::storage(format!(
                "Failed to create directory {}: {}",
                self.root.display(),
                e
            ))
        })
    }

    pub fn read_json<T: DeserializeOwned>(&self, file: &str) -> std::result::Result<T, ReadError> {
        let path = self.path(file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ReadError::Missing),
            Err(e) => return Err(ReadError::Malformed(e.to_string())),
        };

        serde_json::from_str(&raw).map_err(|e| ReadError::Malformed(e.to_string()))
    }

    /// Pretty-print `value` and atomically replace `file` with it.
    pub fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| CampError::storage(format!("Failed to serialize {}: {}", file, e)))?;
        self.ensure_exists()?;
        atomic_write(&self.path(file), &json)
    }

    /// Remove `file`. Returns `false` when it was already gone.
    pub fn remove(&self, file: &str) -> Result<bool> {
        match fs::remove_file(self.path(file)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CampError::storage(format!(
                "Failed to remove {}: {}",
                file, e
            ))),
        }
    }
}

fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| CampError::storage("File path has no parent directory"))?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .map_err(|e| CampError::storage(format!("Failed to create temporary file: {}", e)))?;

    temp_file
        .write_all(content.as_bytes())
        .and_then(|_| temp_file.as_file().sync_all())
        .map_err(|e| CampError::storage(format!("Failed to write temporary file: {}", e)))?;

    temp_file.persist(path).map_err(|e| {
        CampError::storage(format!("Failed to persist {}: {}", path.display(), e.error))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
    }

    #[test]
    fn write_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let store = StateDir::new(dir.path());

        store.write_json("r.json", &Record { name: "old".into() }).unwrap();
        store.write_json("r.json", &Record { name: "new".into() }).unwrap();

        let record: Record = store.read_json("r.json").unwrap();
        assert_eq!(record.name, "new");

        // No temp files left behind next to the record.
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = StateDir::new(dir.path().join("nested").join("timecamp"));

        store.write_json("r.json", &Record { name: "x".into() }).unwrap();
        assert!(store.path("r.json").exists());
    }

    #[test]
    fn distinguishes_missing_from_malformed() {
        let dir = TempDir::new().unwrap();
        let store = StateDir::new(dir.path());
        fs::write(store.path("bad.json"), "{not json").unwrap();

        assert!(matches!(
            store.read_json::<Record>("absent.json"),
            Err(ReadError::Missing)
        ));
        assert!(matches!(
            store.read_json::<Record>("bad.json"),
            Err(ReadError::Malformed(_))
        ));
    }

    #[test]
    fn remove_reports_whether_file_existed() {
        let dir = TempDir::new().unwrap();
        let store = StateDir::new(dir.path());
        store.write_json("r.json", &Record { name: "x".into() }).unwrap();

        assert!(store.remove("r.json").unwrap());
        assert!(!store.remove("r.json").unwrap());
    }
}
