use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// String-keyed persistent storage. Reads and writes are single-key and synchronous.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Key/value store kept as a flat JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store, and so is
    /// one whose contents are not a JSON object. Non-string scalars are kept as
    /// their JSON text.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => parse_entries(&path, &contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        log::debug!("Opened store {} with {} keys", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value);
        write_atomically(&self.path, &serde_json::to_string_pretty(&entries)?)?;
        // Memory only moves once the file on disk has.
        self.entries = entries;
        Ok(())
    }
}

fn parse_entries(path: &Path, contents: &str) -> HashMap<String, String> {
    let object = match serde_json::from_str::<serde_json::Value>(contents) {
        Ok(serde_json::Value::Object(object)) => object,
        Ok(_) => {
            log::warn!("Store {} is not a JSON object, starting empty", path.display());
            return HashMap::new();
        }
        Err(err) => {
            log::warn!("Store {} is unreadable ({}), starting empty", path.display(), err);
            return HashMap::new();
        }
    };

    object
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(text) => Some((key, text)),
            serde_json::Value::Number(number) => Some((key, number.to_string())),
            serde_json::Value::Bool(flag) => Some((key, flag.to_string())),
            other => {
                log::warn!("Dropping non-scalar value {} under key {:?}", other, key);
                None
            }
        })
        .collect()
}

/// Writes into a temp file beside `path` and renames it over `path`, so readers
/// see either the old contents or the new ones.
fn write_atomically(path: &Path, contents: &str) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Typed view over the one high-score slot. Owns the string <-> integer boundary.
#[derive(Debug)]
pub struct HighScoreStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> HighScoreStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Absent or malformed values read as 0.
    pub fn get(&self) -> u32 {
        match self.store.get(&self.key) {
            None => 0,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "Ignoring malformed high score {:?} under key {:?}",
                    raw,
                    self.key
                );
                0
            }),
        }
    }

    /// Failed writes are logged and dropped; the session carries on.
    pub fn set(&mut self, score: u32) {
        if let Err(err) = self.store.set(&self.key, score.to_string()) {
            log::warn!("Could not persist high score {}: {}", score, err);
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_high_score_reads_as_zero() {
        let scores = HighScoreStore::new(MemoryStore::new(), "quizHighScore");
        assert_eq!(scores.get(), 0);
    }

    #[test]
    fn malformed_high_score_reads_as_zero() {
        for raw in ["", "abc", "-3", "2.5", "NaN"] {
            let mut store = MemoryStore::new();
            store.set("quizHighScore", raw.to_string()).expect("set");
            let scores = HighScoreStore::new(store, "quizHighScore");
            assert_eq!(scores.get(), 0, "raw value {:?}", raw);
        }
    }

    #[test]
    fn high_score_is_stored_as_decimal_string() {
        let mut scores = HighScoreStore::new(MemoryStore::new(), "quizHighScore");
        scores.set(7);
        assert_eq!(scores.get(), 7);
        assert_eq!(
            scores.store().get("quizHighScore").as_deref(),
            Some("7")
        );
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("scores.json");

        let mut store = JsonFileStore::open(&path).expect("open missing");
        assert_eq!(store.get("quizHighScore"), None);
        store.set("quizHighScore", "3".to_string()).expect("set");
        drop(store);

        let reopened = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("quizHighScore").as_deref(), Some("3"));
    }

    #[test]
    fn file_store_treats_non_object_json_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores.json");
        fs::write(&path, "[1, 2, 3]").expect("write");
        let store = JsonFileStore::open(&path).expect("open");
        assert_eq!(store.get("quizHighScore"), None);
    }

    #[test]
    fn truncated_file_opens_empty_and_is_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores.json");
        fs::write(&path, r#"{"quizHighScore": "1"#).expect("write");

        let store = JsonFileStore::open(&path).expect("open truncated");
        let mut scores = HighScoreStore::new(store, "quizHighScore");
        assert_eq!(scores.get(), 0);

        scores.set(4);
        let reopened = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("quizHighScore").as_deref(), Some("4"));
    }

    #[test]
    fn numeric_value_in_file_reads_as_high_score() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores.json");
        fs::write(&path, r#"{"quizHighScore": 3, "theme": ["dark"]}"#).expect("write");

        let store = JsonFileStore::open(&path).expect("open");
        assert_eq!(store.get("theme"), None);
        let scores = HighScoreStore::new(store, "quizHighScore");
        assert_eq!(scores.get(), 3);
    }

    #[test]
    fn failed_write_leaves_memory_in_step_with_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let parent = dir.path().join("profile");
        let path = parent.join("scores.json");

        let mut store = JsonFileStore::open(&path).expect("open missing");
        store.set("quizHighScore", "2".to_string()).expect("first write");
        fs::remove_dir_all(&parent).expect("remove parent");
        fs::write(&parent, "not a directory").expect("block parent");

        assert!(store.set("quizHighScore", "9".to_string()).is_err());
        assert_eq!(store.get("quizHighScore").as_deref(), Some("2"));

        let mut scores = HighScoreStore::new(store, "quizHighScore");
        scores.set(5);
        assert_eq!(scores.get(), 2);
    }

    #[test]
    fn write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores.json");
        let mut store = JsonFileStore::open(&path).expect("open");
        store.set("quizHighScore", "1".to_string()).expect("set");
        store.set("quizHighScore", "2".to_string()).expect("set");

        let names: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("scores.json")]);
    }
}
