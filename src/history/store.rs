//! File-backed history store
//!
//! The file holds a JSON array of `{"date", "duration"}` records. Writes go to
//! a temporary file next to the target which is then renamed over it, so a
//! failed write leaves the previous contents in place.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::HistoryError;
use super::HistoryEntry;

/// Append-only log of finished cycles
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file
    file_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries in insertion order.
    ///
    /// A missing file is created holding an empty list. A file that does not
    /// parse is reported as [`HistoryError::Corrupt`] and left untouched.
    pub fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let _guard = self.lock();
        self.load_locked()
    }

    /// Like [`load`](Self::load) but a corrupt file reads as empty
    pub fn load_or_empty(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        match self.load() {
            Err(HistoryError::Corrupt { path, source }) => {
                warn!("Ignoring unreadable history at {}: {}", path.display(), source);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Append one entry and persist the full list.
    ///
    /// If the existing file is corrupt it is moved aside first so its contents
    /// are never overwritten.
    pub fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.lock();
        let mut entries = match self.load_locked() {
            Ok(entries) => entries,
            Err(HistoryError::Corrupt { source, .. }) => {
                let quarantined = self.quarantine()?;
                warn!(
                    "History was corrupt ({}); moved to {} and starting a new log",
                    source,
                    quarantined.display()
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        entries.push(entry);
        self.write_locked(&entries)?;
        debug!("History now holds {} entries", entries.len());
        Ok(())
    }

    /// Truncate the history to an empty list. Irreversible.
    pub fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.lock();
        self.write_locked(&[])?;
        info!("History cleared at {}", self.path.display());
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock carries no broken state
        self.file_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load_locked(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No history at {}, creating an empty one", self.path.display());
                self.write_locked(&[])?;
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(HistoryError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| HistoryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_locked(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let io_err = |source: io::Error| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_err)?;

        let mut bytes = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
        entries.serialize(&mut serializer)?;

        // The temp file is removed on drop unless persisted
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn quarantine(&self) -> Result<PathBuf, HistoryError> {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "history.json".to_string());

        let mut suffix = 1;
        let mut target = self.path.with_file_name(format!("{}.corrupt-{}", file_name, suffix));
        while target.exists() {
            suffix += 1;
            target = self.path.with_file_name(format!("{}.corrupt-{}", file_name, suffix));
        }

        fs::rename(&self.path, &target).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("db").join("history.json"))
    }

    fn entry(n: u32) -> HistoryEntry {
        HistoryEntry::new(format!("2024-03-01 09:{:02}:00", n), "25:00")
    }

    #[test]
    fn load_creates_missing_file_as_empty_list() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn append_then_load_returns_entry_last() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.append(entry(1)).unwrap();
        let last = HistoryEntry::new("2024-03-01 10:00:00", "00:00");
        store.append(last.clone()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], entry(1));
        assert_eq!(loaded.last(), Some(&last));
    }

    #[test]
    fn file_uses_original_layout() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(HistoryEntry::new("2024-03-01 09:30:00", "25:00")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            raw,
            "[\n    {\n        \"date\": \"2024-03-01 09:30:00\",\n        \"duration\": \"25:00\"\n    }\n]"
        );
    }

    #[test]
    fn clear_empties_any_prior_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for n in 0..5 {
            store.append(entry(n)).unwrap();
        }

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn clear_recovers_a_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_content_is_reported_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        for raw in [
            "{ not json",
            r#"{"date": "2024-03-01 09:30:00", "duration": "25:00"}"#,
            r#"[{"date": "2024-03-01 09:30:00"}]"#,
            r#"[{"date": "2024-03-01", "duration": "25:00", "extra": 1}]"#,
            r#"[{"date": 5, "duration": "25:00"}]"#,
        ] {
            fs::write(store.path(), raw).unwrap();
            assert!(
                matches!(store.load(), Err(HistoryError::Corrupt { .. })),
                "expected corruption for {raw}"
            );
            assert!(store.load_or_empty().unwrap().is_empty());
            // Reading never rewrites a corrupt file
            assert_eq!(fs::read_to_string(store.path()).unwrap(), raw);
        }
    }

    #[test]
    fn failed_write_leaves_target_and_directory_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        // A directory at the target path makes the final rename fail
        let blocker = store.path().join("keep.txt");
        fs::create_dir_all(store.path()).unwrap();
        fs::write(&blocker, "previous bytes").unwrap();

        assert!(matches!(store.clear(), Err(HistoryError::Io { .. })));
        assert!(matches!(store.append(entry(1)), Err(HistoryError::Io { .. })));

        assert_eq!(fs::read_to_string(&blocker).unwrap(), "previous bytes");
        let leftovers: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("history.json")]);
    }

    #[test]
    fn append_quarantines_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "garbage").unwrap();

        store.append(entry(7)).unwrap();

        assert_eq!(store.load().unwrap(), vec![entry(7)]);
        let quarantined = store.path().with_file_name("history.json.corrupt-1");
        assert_eq!(fs::read_to_string(quarantined).unwrap(), "garbage");
    }
}
