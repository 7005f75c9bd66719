//! Preference manager that merges config.toml defaults with DB overrides.
//!
//! Config values serve as defaults; DB values (user_preferences table)
//! override them. Writes never touch the config file. They update memory
//! immediately and are queued until [`PreferenceManager::flush`] runs, which
//! the UI loop does after every handled event.
use std::collections::HashMap;

use anyhow::{Context as _, Result};

use crate::cinema::{keys, PreferenceStore, Surface};
use crate::config::Config;
use crate::storage::Database;
use crate::theme::{Accent, ThemeVariant};

/// Prefix for keybinding override keys (`keybind.quit`, ...).
const KEYBIND_PREFIX: &str = "keybind.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl PendingWrite {
    fn key(&self) -> &str {
        match self {
            PendingWrite::Set { key, .. } | PendingWrite::Remove { key } => key,
        }
    }
}

// ============================================================================
// PreferenceManager
// ============================================================================

/// Merged preference store: config.toml defaults + DB overrides.
#[derive(Debug, Default)]
pub struct PreferenceManager {
    prefs: HashMap<String, String>,
    pending: Vec<PendingWrite>,
}

impl PreferenceManager {
    /// Load preferences by merging config defaults with DB overrides.
    pub async fn load(config: &Config, db: &Database) -> Result<Self> {
        let mut prefs = Self::flatten_config(config);

        let db_prefs = db
            .get_preferences_by_prefix("")
            .await
            .context("Failed to read stored preferences")?;
        for (key, value) in db_prefs {
            prefs.insert(key, value);
        }

        Ok(Self {
            prefs,
            pending: Vec::new(),
        })
    }

    /// Config-only fallback for when the DB cannot be read.
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefs: Self::flatten_config(config),
            pending: Vec::new(),
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.prefs.get(key).map(String::as_str)
    }

    /// Number of writes waiting for [`flush`](Self::flush).
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Write queued changes to the DB, in order.
    ///
    /// The queue holds at most one write per key; a newer write to the same
    /// key replaces the older one.
    ///
    /// On failure the failed write and everything after it stay queued, so a
    /// later flush retries them.
    pub async fn flush(&mut self, db: &Database) -> Result<usize> {
        let mut queue = std::mem::take(&mut self.pending).into_iter();
        let mut written = 0;

        while let Some(write) = queue.next() {
            let result = match &write {
                PendingWrite::Set { key, value } => db.set_preference(key, value).await,
                PendingWrite::Remove { key } => db.remove_preference(key).await,
            };
            if let Err(e) = result {
                self.pending = std::iter::once(write).chain(queue).collect();
                return Err(e.context("Failed to save preferences"));
            }
            written += 1;
        }

        if written > 0 {
            tracing::debug!(written, "Flushed preferences");
        }
        Ok(written)
    }

    // ========================================================================
    // Type-safe Accessors
    // ========================================================================

    pub fn theme_variant(&self) -> ThemeVariant {
        self.value(keys::DARK_MODE)
            .and_then(ThemeVariant::from_dark_mode)
            .unwrap_or(ThemeVariant::Dark)
    }

    /// Accent color pair, `(themeColor, themeShadow)`.
    ///
    /// Both halves must be present; a lone color falls back to the default swatch.
    pub fn accent(&self) -> (String, String) {
        match (self.value(keys::THEME_COLOR), self.value(keys::THEME_SHADOW)) {
            (Some(color), Some(shadow)) => (color.to_string(), shadow.to_string()),
            _ => {
                let accent = Accent::default();
                (accent.color.to_string(), accent.shadow.to_string())
            }
        }
    }

    /// Sidebar tab restored at startup.
    pub fn last_view(&self) -> Surface {
        self.value(keys::LAST_VIEW)
            .and_then(Surface::parse_tab)
            .unwrap_or(Surface::Grid)
    }

    /// Version string seen by the previous session, if any.
    pub fn app_version(&self) -> Option<&str> {
        self.value(keys::APP_VERSION)
    }

    /// Keybinding overrides keyed by action name.
    pub fn keybinding_overrides(&self) -> HashMap<String, String> {
        self.prefs
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(KEYBIND_PREFIX)
                    .map(|action| (action.to_string(), v.clone()))
            })
            .collect()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn flatten_config(config: &Config) -> HashMap<String, String> {
        let mut map = HashMap::new();

        match ThemeVariant::from_str_name(&config.theme) {
            Some(variant) => {
                map.insert(keys::DARK_MODE.to_string(), variant.dark_mode_flag().to_string());
            }
            None => tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark"),
        }

        match Accent::by_name(&config.accent) {
            Some(accent) => {
                map.insert(keys::THEME_COLOR.to_string(), accent.color.to_string());
                map.insert(keys::THEME_SHADOW.to_string(), accent.shadow.to_string());
            }
            None => tracing::warn!(accent = %config.accent, "Unknown accent in config, using default"),
        }

        for (action, key_str) in &config.keybindings {
            map.insert(format!("{}{}", KEYBIND_PREFIX, action), key_str.clone());
        }

        map
    }
}

impl PreferenceStore for PreferenceManager {
    fn get(&self, key: &str) -> Option<String> {
        self.prefs.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.prefs.insert(key.to_string(), value.to_string());
        self.pending.retain(|w| w.key() != key);
        self.pending.push(PendingWrite::Set {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    fn remove(&mut self, key: &str) {
        self.prefs.remove(key);
        self.pending.retain(|w| w.key() != key);
        self.pending.push(PendingWrite::Remove {
            key: key.to_string(),
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_load_defaults_from_config() {
        let db = test_db().await;
        let pm = PreferenceManager::load(&Config::default(), &db).await.unwrap();

        assert_eq!(pm.theme_variant(), ThemeVariant::Dark);
        assert_eq!(pm.accent().0, Accent::default().color);
        assert_eq!(pm.last_view(), Surface::Grid);
        assert_eq!(pm.app_version(), None);
    }

    #[tokio::test]
    async fn test_db_overrides_config() {
        let db = test_db().await;
        db.set_preference(keys::DARK_MODE, "disabled").await.unwrap();
        db.set_preference(keys::LAST_VIEW, "list").await.unwrap();

        let pm = PreferenceManager::load(&Config::default(), &db).await.unwrap();
        assert_eq!(pm.theme_variant(), ThemeVariant::Light);
        assert_eq!(pm.last_view(), Surface::List);
    }

    #[tokio::test]
    async fn test_set_is_queued_until_flush() {
        let db = test_db().await;
        let mut pm = PreferenceManager::load(&Config::default(), &db).await.unwrap();

        pm.set(keys::LAST_CHANNEL, "alpha");
        assert_eq!(pm.value(keys::LAST_CHANNEL), Some("alpha"));
        assert_eq!(db.get_preference(keys::LAST_CHANNEL).await.unwrap(), None);

        assert_eq!(pm.flush(&db).await.unwrap(), 1);
        assert_eq!(pm.pending_writes(), 0);
        assert_eq!(
            db.get_preference(keys::LAST_CHANNEL).await.unwrap().as_deref(),
            Some("alpha")
        );
    }

    #[tokio::test]
    async fn test_remove_deletes_row() {
        let db = test_db().await;
        db.set_preference(keys::FAVORITES, r#"["a"]"#).await.unwrap();
        let mut pm = PreferenceManager::load(&Config::default(), &db).await.unwrap();

        pm.remove(keys::FAVORITES);
        assert_eq!(PreferenceStore::get(&pm, keys::FAVORITES), None);
        pm.flush(&db).await.unwrap();
        assert_eq!(db.get_preference(keys::FAVORITES).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_repeated_writes_collapse() {
        let db = test_db().await;
        let mut pm = PreferenceManager::from_config(&Config::default());

        pm.set(keys::FAVORITES, r#"["a"]"#);
        pm.remove(keys::FAVORITES);
        pm.set(keys::FAVORITES, r#"["b"]"#);
        pm.set(keys::LAST_CHANNEL, "b");
        assert_eq!(pm.pending_writes(), 2);
        assert_eq!(pm.flush(&db).await.unwrap(), 2);
        assert_eq!(
            db.get_preference(keys::FAVORITES).await.unwrap().as_deref(),
            Some(r#"["b"]"#)
        );

        db.set_preference(keys::RECENTS, r#"["b"]"#).await.unwrap();
        pm.set(keys::RECENTS, r#"["c"]"#);
        pm.remove(keys::RECENTS);
        assert_eq!(pm.flush(&db).await.unwrap(), 1);
        assert_eq!(db.get_preference(keys::RECENTS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flush_failure_keeps_queue() {
        let db = test_db().await;
        let mut pm = PreferenceManager::from_config(&Config::default());
        pm.set(keys::LAST_VIEW, "list");

        db.pool.close().await;
        assert!(pm.flush(&db).await.is_err());
        assert_eq!(pm.pending_writes(), 1);

        // Retried writes do not pile up behind a failing DB
        for _ in 0..50 {
            pm.set(keys::LAST_VIEW, "grid");
        }
        assert_eq!(pm.pending_writes(), 1);
    }

    #[tokio::test]
    async fn test_config_keybindings_flattened() {
        let db = test_db().await;
        let mut config = Config::default();
        config
            .keybindings
            .insert("quit".to_string(), "Ctrl+q".to_string());
        db.set_preference("keybind.toggle_favorite", "s")
            .await
            .unwrap();

        let pm = PreferenceManager::load(&config, &db).await.unwrap();
        let overrides = pm.keybinding_overrides();
        assert_eq!(overrides.get("quit").map(String::as_str), Some("Ctrl+q"));
        assert_eq!(
            overrides.get("toggle_favorite").map(String::as_str),
            Some("s")
        );
    }

    #[tokio::test]
    async fn test_config_theme_and_accent() {
        let mut config = Config::default();
        config.theme = "light".to_string();
        config.accent = "green".to_string();

        let pm = PreferenceManager::from_config(&config);
        assert_eq!(pm.theme_variant(), ThemeVariant::Light);
        assert_eq!(pm.accent(), ("#2ecc71".to_string(), "#1e8449".to_string()));
    }

    #[tokio::test]
    async fn test_lone_theme_color_ignored() {
        let db = test_db().await;
        let mut config = Config::default();
        config.accent = "nope".to_string();
        db.set_preference(keys::THEME_COLOR, "#123456").await.unwrap();

        let pm = PreferenceManager::load(&config, &db).await.unwrap();
        assert_eq!(pm.accent().0, Accent::default().color);
    }
}
