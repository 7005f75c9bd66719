//! Bounded most-recent-first watch history.

/// Maximum number of remembered channels.
pub const RECENTS_LIMIT: usize = 5;

/// Most-recent-first list of watched channel ids. No duplicates, at most
/// [`RECENTS_LIMIT`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecencyList {
    ids: Vec<String>,
}

impl RecencyList {
    /// Build from persisted ids. Repeats and overflow from a hand-edited or
    /// older store are dropped, keeping the front of the list.
    pub fn from_ids(ids: Vec<String>) -> Self {
        let mut out: Vec<String> = Vec::with_capacity(RECENTS_LIMIT);
        for id in ids {
            if out.len() == RECENTS_LIMIT {
                break;
            }
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Self { ids: out }
    }

    /// Move `id` to the front, evicting the oldest entry past the limit.
    pub fn record(&mut self, id: &str) {
        self.ids.retain(|r| r != id);
        self.ids.insert(0, id.to_string());
        self.ids.truncate(RECENTS_LIMIT);
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Frozen copy of a list row, taken when the recents panel is rebuilt.
///
/// Marker flags are copied too, so a favorite toggled afterwards shows in the
/// main views but not here until the next watch is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry {
    pub id: String,
    pub name: String,
    pub badge: bool,
    pub event: String,
    pub favorited: bool,
    pub active: bool,
}
