//! Query x category visibility.

use super::favorites::FavoriteSet;
use super::projection::{Entry, Surface};

/// Maximum accepted query length, in characters.
pub const MAX_QUERY_LENGTH: usize = 128;

/// Coarse visibility predicate layered under the text query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    All,
    Favorites,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Favorites => "favorites",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Favorites => "Favorites",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Category::All => Category::Favorites,
            Category::Favorites => Category::All,
        }
    }
}

/// Transient filter inputs. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    pub category: Category,
}

impl FilterState {
    /// Raw query as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.chars().take(MAX_QUERY_LENGTH).collect();
    }

    /// Lowercased, trimmed form used for matching.
    pub fn needle(&self) -> String {
        self.query.trim().to_lowercase()
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || self.category != Category::All
    }
}

/// Case-insensitive substring match against whichever text fields the entry has.
pub fn matches_text(entry: &Entry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if entry.name().to_lowercase().contains(needle) {
        return true;
    }
    entry
        .event
        .as_deref()
        .is_some_and(|e| e.to_lowercase().contains(needle))
}

pub fn matches_category(id: &str, category: Category, favorites: &FavoriteSet) -> bool {
    match category {
        Category::All => true,
        Category::Favorites => favorites.contains(id),
    }
}

/// Visible iff both the text and the category predicate pass.
pub fn is_visible(entry: &Entry, needle: &str, category: Category, favorites: &FavoriteSet) -> bool {
    matches_text(entry, needle) && matches_category(&entry.id, category, favorites)
}

/// Summary of one visibility pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    visible: [usize; 3],
    total: usize,
}

impl FilterReport {
    pub(crate) fn new(visible: [usize; 3], total: usize) -> Self {
        Self { visible, total }
    }

    pub fn visible(&self, surface: Surface) -> usize {
        self.visible[surface.slot()]
    }

    /// Entries per surface.
    pub fn total(&self) -> usize {
        self.total
    }

    /// True exactly when no entry on any surface is visible.
    pub fn no_results(&self) -> bool {
        self.visible.iter().all(|&n| n == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_entry(id: &str, name: &str, event: &str) -> Entry {
        Entry {
            id: id.into(),
            index: 0,
            name: name.into(),
            badge: true,
            event: Some(event.into()),
        }
    }

    fn grid_entry(id: &str, name: &str) -> Entry {
        Entry {
            id: id.into(),
            index: 0,
            name: name.into(),
            badge: true,
            event: None,
        }
    }

    #[test]
    fn test_empty_needle_matches() {
        assert!(matches_text(&grid_entry("a", "Alpha"), ""));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let mut state = FilterState::default();
        state.set_query("  ALP ");
        assert!(matches_text(&grid_entry("a", "Alpha"), &state.needle()));
    }

    #[test]
    fn test_event_only_on_list_rows() {
        assert!(matches_text(&list_entry("a", "Alpha", "Derby"), "derby"));
        assert!(!matches_text(&grid_entry("a", "Alpha"), "derby"));
    }

    #[test]
    fn test_badge_text_not_searchable() {
        assert!(!matches_text(&grid_entry("a", "Alpha"), "live"));
    }

    #[test]
    fn test_badge_like_name_matches_on_every_surface() {
        let lobby = Entry {
            id: "bbc".into(),
            index: 0,
            name: "BBC LIVE".into(),
            badge: false,
            event: None,
        };
        assert!(matches_text(&lobby, "bbc live"));
        assert!(matches_text(&grid_entry("bbc", "BBC LIVE"), "bbc live"));
        assert!(matches_text(&list_entry("bbc", "BBC LIVE", ""), "bbc live"));
    }

    #[test]
    fn test_favorites_category() {
        let favorites = FavoriteSet::from_ids(vec!["a".into()]);
        assert!(is_visible(&grid_entry("a", "Alpha"), "", Category::Favorites, &favorites));
        assert!(!is_visible(&grid_entry("b", "Beta"), "", Category::Favorites, &favorites));
        assert!(is_visible(&grid_entry("b", "Beta"), "", Category::All, &favorites));
    }

    #[test]
    fn test_query_length_capped() {
        let mut state = FilterState::default();
        state.set_query(&"x".repeat(MAX_QUERY_LENGTH + 10));
        assert_eq!(state.query().chars().count(), MAX_QUERY_LENGTH);
    }

    #[test]
    fn test_no_results() {
        assert!(FilterReport::new([0, 0, 0], 3).no_results());
        assert!(!FilterReport::new([0, 0, 1], 3).no_results());
    }
}
