//! User favorites and the key-value store they persist to.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::StoreError;
use crate::models::StationId;

/// Key the favorites list is stored under
pub const FAVORITES_KEY: &str = "evcharge-favorites";

/// A string key-value store, the shape of a browser's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key under a data directory.
///
/// Writes go to `{key}.json.tmp` first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let mut file = File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &path)
        };
        write().map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })
    }
}

/// Favorite station ids, kept in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<StationId>);

impl Favorites {
    /// Duplicates are dropped, first occurrence wins.
    pub fn from_ids(ids: impl IntoIterator<Item = StationId>) -> Self {
        let mut out = Vec::new();
        for id in ids {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Favorites(out)
    }

    pub fn contains(&self, id: StationId) -> bool {
        self.0.contains(&id)
    }

    /// Remove `id` if present, append it otherwise.
    pub fn toggle(&self, id: StationId) -> Favorites {
        if self.contains(id) {
            Favorites(self.0.iter().copied().filter(|f| *f != id).collect())
        } else {
            let mut ids = self.0.clone();
            ids.push(id);
            Favorites(ids)
        }
    }

    pub fn ids(&self) -> &[StationId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read the persisted favorites, falling back to `default` when nothing is
/// stored or the stored value cannot be read.
pub fn load_favorites(store: &impl KeyValueStore, default: Favorites) -> Favorites {
    let raw = match store.get(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(err) => {
            tracing::warn!("Error loading favorites: {}", err);
            return default;
        }
    };
    match serde_json::from_str::<Vec<StationId>>(&raw) {
        Ok(ids) => {
            let favorites = Favorites::from_ids(ids);
            tracing::debug!("Restored {} favorites", favorites.len());
            favorites
        }
        Err(err) => {
            tracing::warn!("Error loading favorites, discarding stored value: {}", err);
            default
        }
    }
}

pub fn save_favorites(
    store: &mut impl KeyValueStore,
    favorites: &Favorites,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(favorites.ids()).map_err(StoreError::Encode)?;
    store.set(FAVORITES_KEY, &json)
}
