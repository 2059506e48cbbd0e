//! Locally persisted favorite characters.
//!
//! # Design
//! The favorites list is one JSON array of ids stored under a single key of a
//! host-provided [`KeyValueStore`]. `FavoritesStore::toggle` takes `&mut self`,
//! so toggles on one store are serialized by the borrow checker: each call
//! computes the new list, persists it, and only then swaps it into memory. A
//! failed write leaves both the stored and the in-memory list untouched.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::error::CatalogError;
use crate::types::EntityId;

/// String key-value persistence supplied by the host.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CatalogError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CatalogError>;
}

/// Volatile store, used by hosts without persistence and by tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CatalogError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CatalogError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under a directory. Writes go to a synced temp file that
/// is then renamed over the target, so a crash never leaves a truncated value
/// behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CatalogError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CatalogError::Storage(e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CatalogError> {
        fs::create_dir_all(&self.dir).map_err(|e| CatalogError::Storage(e.to_string()))?;
        let target = self.path_for(key);
        let tmp = target.with_extension("json.tmp");
        let storage = |e: std::io::Error| CatalogError::Storage(e.to_string());
        {
            let mut file = File::create(&tmp).map_err(storage)?;
            file.write_all(value.as_bytes()).map_err(storage)?;
            file.sync_all().map_err(storage)?;
        }
        fs::rename(&tmp, &target).map_err(storage)
    }
}

/// Ordered, duplicate-free list of favorite character ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FavoritesSet {
    ids: Vec<EntityId>,
}

impl FavoritesSet {
    pub fn from_ids(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let mut set = Self::default();
        for id in ids {
            if id > 0 && !set.contains(id) {
                set.ids.push(id);
            }
        }
        set
    }

    /// Decode a stored value. Anything that is not a JSON array yields the
    /// empty set; entries without a usable id are dropped. Older builds stored
    /// whole character objects, so `{"id": n, ...}` entries are accepted too.
    pub fn from_stored(raw: &str) -> Self {
        let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(raw) else {
            return Self::default();
        };
        Self::from_ids(entries.iter().filter_map(entry_id))
    }

    pub fn to_stored(&self) -> String {
        Value::from(self.ids.clone()).to_string()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Remove `id` if present, otherwise append it. Id 0 is never a valid
    /// entity, so toggling it leaves the set unchanged.
    pub fn toggled(&self, id: EntityId) -> Self {
        let mut next = self.clone();
        if id == 0 {
            return next;
        }
        if let Some(pos) = next.ids.iter().position(|&x| x == id) {
            next.ids.remove(pos);
        } else {
            next.ids.push(id);
        }
        next
    }
}

fn entry_id(entry: &Value) -> Option<EntityId> {
    let raw = match entry {
        Value::Object(fields) => fields.get("id")?,
        other => other,
    };
    raw.as_u64()
        .and_then(|id| EntityId::try_from(id).ok())
        .filter(|id| *id > 0)
}

/// Favorites bound to a store and key.
#[derive(Debug)]
pub struct FavoritesStore<S> {
    store: S,
    key: String,
    set: FavoritesSet,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Bind to `key` and load the persisted list.
    pub fn open(store: S, key: &str) -> Self {
        let mut favorites = Self {
            store,
            key: key.to_string(),
            set: FavoritesSet::default(),
        };
        favorites.load();
        favorites
    }

    /// Re-read the persisted list. Never fails: an absent, unreadable or
    /// malformed value loads as the empty set.
    pub fn load(&mut self) -> &FavoritesSet {
        self.set = match self.store.get(&self.key) {
            Ok(Some(raw)) => FavoritesSet::from_stored(&raw),
            Ok(None) => FavoritesSet::default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "favorites unreadable, starting empty");
                FavoritesSet::default()
            }
        };
        &self.set
    }

    /// Flip membership of `id` and persist the whole list before updating
    /// memory. On a storage error nothing changes.
    pub fn toggle(&mut self, id: EntityId) -> Result<&FavoritesSet, CatalogError> {
        let next = self.set.toggled(id);
        if let Err(e) = self.store.set(&self.key, &next.to_stored()) {
            tracing::warn!(id, error = %e, "favorite toggle not persisted");
            return Err(e);
        }
        tracing::debug!(id, favorite = next.contains(id), "favorite toggled");
        self.set = next;
        Ok(&self.set)
    }

    pub fn is_favorite(&self, id: EntityId) -> bool {
        self.set.contains(id)
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.set
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
