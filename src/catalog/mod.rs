//! Channel catalog: the immutable list of streamable channels.
//!
//! The catalog is loaded exactly once per session (see [`loader`]) and never
//! mutated afterwards. Everything else in the application refers to channels
//! by their string id.
//!
//! # Submodules
//!
//! - [`loader`] - Fetch from an HTTP(S) URL or read from a local file

mod loader;

pub use loader::{load, parse_catalog, CatalogError, CatalogSource};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ============================================================================
// Channel
// ============================================================================

/// A single streamable channel as described by the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Opaque identifier, unique within the catalog.
    #[serde(deserialize_with = "de_channel_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Event / subtitle text (e.g. the match currently being broadcast).
    #[serde(default)]
    pub event: String,
    /// Stream reference handed to the player surface.
    pub src: String,
}

/// Catalog documents in the wild carry ids as either strings or integers.
fn de_channel_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

// ============================================================================
// ChannelCatalog
// ============================================================================

/// Ordered, immutable channel list with an id index.
#[derive(Debug, Clone, Default)]
pub struct ChannelCatalog {
    channels: Vec<Channel>,
    index: HashMap<String, usize>,
}

impl ChannelCatalog {
    /// Build a catalog, keeping source order.
    ///
    /// Duplicate ids keep their first occurrence; later records are dropped
    /// so that every id resolves to exactly one channel.
    pub fn from_channels(records: Vec<Channel>) -> Self {
        let mut channels = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for channel in records {
            if index.contains_key(&channel.id) {
                tracing::warn!(id = %channel.id, name = %channel.name, "Duplicate channel id in catalog, ignoring");
                continue;
            }
            index.insert(channel.id.clone(), channels.len());
            channels.push(channel);
        }

        Self { channels, index }
    }

    /// Look up a channel by id.
    pub fn get(&self, id: &str) -> Option<&Channel> {
        self.index.get(id).map(|&i| &self.channels[i])
    }

    /// Catalog position of a channel id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Channel> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
