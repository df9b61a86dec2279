use crate::error::StoreError;
use crate::profile::Profile;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StoreKey {
    Search,
    FilterGender,
    SelectedUser,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Search => "search",
            StoreKey::FilterGender => "filterGender",
            StoreKey::SelectedUser => "selectedUser",
        }
    }
}

/// Flat string-keyed persistence that survives restarts.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: StoreKey) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: StoreKey, value: &str) -> anyhow::Result<()>;
}

#[derive(Clone, Debug)]
pub struct SledStore {
    pub db: sled::Db,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(SledStore { db })
    }
}

#[async_trait]
impl Store for SledStore {
    async fn get(&self, key: StoreKey) -> anyhow::Result<Option<String>> {
        let value = match self.db.get(key.as_str()).map_err(StoreError::from)? {
            Some(v) => v,
            None => return Ok(None),
        };

        let value = String::from_utf8(value.to_vec())
            .map_err(|_| StoreError::NotUtf8(key.as_str().to_string()))?;
        Ok(Some(value))
    }

    async fn set(&self, key: StoreKey, value: &str) -> anyhow::Result<()> {
        self.db
            .insert(key.as_str(), value.as_bytes())
            .map_err(StoreError::from)?;
        self.db.flush_async().await.map_err(StoreError::from)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: StoreKey, value: &str) -> Self {
        self.lock().insert(key, value.to_string());
        self
    }

    pub fn snapshot(&self, key: StoreKey) -> Option<String> {
        self.lock().get(&key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StoreKey, String>> {
        // A poisoned map is still a usable map.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: StoreKey) -> anyhow::Result<Option<String>> {
        Ok(self.snapshot(key))
    }

    async fn set(&self, key: StoreKey, value: &str) -> anyhow::Result<()> {
        self.lock().insert(key, value.to_string());
        Ok(())
    }
}

/// The slice of session state that is carried across restarts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Restored {
    pub search: String,
    pub filter_gender: String,
    pub selected: Option<Profile>,
}

impl Restored {
    /// Never fails: missing keys, unreadable keys and malformed JSON all fall
    /// back to their defaults.
    pub async fn load(store: &dyn Store) -> Self {
        let search = read_or_default(store, StoreKey::Search).await;
        let filter_gender = read_or_default(store, StoreKey::FilterGender).await;
        let selected = decode_selected(&read_or_default(store, StoreKey::SelectedUser).await);

        Restored {
            search,
            filter_gender,
            selected,
        }
    }
}

pub fn encode_selected(selected: Option<&Profile>) -> String {
    // Serializing plain strings into JSON cannot fail.
    serde_json::to_string(&selected).unwrap_or_else(|_| "null".to_string())
}

fn decode_selected(raw: &str) -> Option<Profile> {
    if raw.is_empty() {
        return None;
    }

    match serde_json::from_str::<Option<Profile>>(raw) {
        Ok(selected) => selected,
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", StoreKey::SelectedUser.as_str(), e);
            None
        }
    }
}

async fn read_or_default(store: &dyn Store, key: StoreKey) -> String {
    match store.get(key).await {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Could not read {} from store: {:#}", key.as_str(), e);
            String::new()
        }
    }
}
