//! Key/value persistence seam for the controller.
//!
//! The controller never talks to SQLite directly. It writes through a
//! [`PreferenceStore`], which the application backs with the
//! `PreferenceManager` and tests back with [`MemoryStore`].

use std::collections::HashMap;

/// Persisted preference keys.
pub mod keys {
    pub const FAVORITES: &str = "favoriteChannels";
    pub const RECENTS: &str = "recentlyWatched";
    pub const LAST_CHANNEL: &str = "lastChannelId";
    pub const LAST_VIEW: &str = "lastView";
    pub const THEME_COLOR: &str = "themeColor";
    pub const THEME_SHADOW: &str = "themeShadow";
    pub const DARK_MODE: &str = "darkMode";
    pub const APP_VERSION: &str = "appVersion";
}

/// Synchronous key/value store written after every controller mutation.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    /// Remove the key entirely. Distinct from storing an empty value.
    fn remove(&mut self, key: &str);
}

/// In-memory store, used in tests and as a fallback when the database is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Read a JSON array of ids. Missing or malformed values read as empty.
pub fn read_id_list(store: &impl PreferenceStore, key: &str) -> Vec<String> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed stored id list");
            Vec::new()
        }
    }
}

/// Store ids as a JSON array.
pub fn write_id_list(store: &mut impl PreferenceStore, key: &str, ids: &[String]) {
    match serde_json::to_string(ids) {
        Ok(json) => store.set(key, &json),
        Err(e) => tracing::warn!(key, error = %e, "Failed to serialize id list"),
    }
}
