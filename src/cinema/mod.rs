//! Channel state projection and filter engine.
//!
//! [`Cinema`] is the single owner and mutator of everything the channel
//! picker shows: which channel is active, which are favorited, what the
//! filter hides, and what was watched recently. All three surfaces render
//! from one marker table keyed by catalog index, so markers for the same id
//! can never disagree between surfaces.
//!
//! Every mutation is written through the [`PreferenceStore`] before the
//! operation returns.
//!
//! # Submodules
//!
//! - [`projection`] - Static lobby/grid/list renderings
//! - [`selection`] - Active channel and display metadata
//! - [`recency`] - Bounded watch history
//! - [`favorites`] - Ordered favorite set
//! - [`filter`] - Query and category predicates
//! - [`confirm`] - Confirmation capability for destructive actions
//! - [`persist`] - Key/value store seam

pub mod confirm;
pub mod favorites;
pub mod filter;
pub mod persist;
pub mod projection;
pub mod recency;
pub mod selection;

pub use confirm::{ConfirmIntent, ConfirmPrompt, Confirmed, Deferred};
pub use favorites::FavoriteSet;
pub use filter::{Category, FilterReport, FilterState};
pub use persist::{keys, MemoryStore, PreferenceStore};
pub use projection::{Entry, Projection, Surface, LIVE_BADGE};
pub use recency::{RecencyList, RecentEntry, RECENTS_LIMIT};
pub use selection::ActiveChannel;

use crate::catalog::ChannelCatalog;
use selection::SelectionState;

// ============================================================================
// Notices
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
}

/// User-facing message produced by a controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }
}

/// Result of [`Cinema::toggle_favorite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added,
    Removed,
    /// Removal was not confirmed. Nothing changed.
    Declined,
    /// Id is not in the catalog. Nothing changed.
    Unknown,
}

// ============================================================================
// Marker table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Markers {
    favorited: bool,
    active: bool,
    visible: [bool; 3],
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            favorited: false,
            active: false,
            visible: [true; 3],
        }
    }
}

/// An entry joined with its current markers, ready to render.
#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a> {
    pub entry: &'a Entry,
    pub favorited: bool,
    pub active: bool,
    pub visible: bool,
}

// ============================================================================
// Cinema
// ============================================================================

/// Controller owning catalog-derived state and the user's preferences.
pub struct Cinema<S: PreferenceStore> {
    catalog: ChannelCatalog,
    projection: Projection,
    markers: Vec<Markers>,
    favorites: FavoriteSet,
    recents: RecencyList,
    recents_snapshot: Vec<RecentEntry>,
    selection: SelectionState,
    filter: FilterState,
    report: FilterReport,
    store: S,
    notices: Vec<Notice>,
}

impl<S: PreferenceStore> Cinema<S> {
    /// Build the projection and restore favorites and recents from `store`.
    pub fn new(catalog: ChannelCatalog, store: S) -> Self {
        let mut cinema = Self {
            catalog: ChannelCatalog::default(),
            projection: Projection::default(),
            markers: Vec::new(),
            favorites: FavoriteSet::default(),
            recents: RecencyList::default(),
            recents_snapshot: Vec::new(),
            selection: SelectionState::default(),
            filter: FilterState::default(),
            report: FilterReport::default(),
            store,
            notices: Vec::new(),
        };
        cinema.load_catalog(catalog);
        cinema
    }

    /// Replace the catalog and rebuild everything derived from it.
    ///
    /// Favorites and recents are re-read from the store; the active channel
    /// is cleared. The filter query and category survive.
    pub fn load_catalog(&mut self, catalog: ChannelCatalog) {
        self.projection = Projection::build(&catalog);
        self.markers = vec![Markers::default(); catalog.len()];
        self.catalog = catalog;
        self.favorites = FavoriteSet::from_ids(persist::read_id_list(&self.store, keys::FAVORITES));
        self.recents = RecencyList::from_ids(persist::read_id_list(&self.store, keys::RECENTS));
        self.selection = SelectionState::default();

        self.apply_favorite_markers();
        self.apply_filter();
        self.rebuild_recents_snapshot();

        tracing::debug!(
            channels = self.catalog.len(),
            favorites = self.favorites.len(),
            recents = self.recents.len(),
            "Cinema state restored"
        );
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Make `id` the active channel, as picked from `origin`.
    ///
    /// Unknown ids are ignored and return `None`. Re-selecting the active id
    /// is not suppressed: the caller should restart the player load.
    pub fn select(&mut self, id: &str, origin: Surface) -> Option<&ActiveChannel> {
        let index = self.catalog.position(id)?;
        let stream = self.catalog.channels()[index].src.clone();

        // Lobby entries carry no metadata worth showing; read the grid rendering instead.
        let metadata_surface = match origin {
            Surface::Lobby => Surface::Grid,
            other => other,
        };
        let rendering = self.projection.entry(metadata_surface, index)?;

        for (i, m) in self.markers.iter_mut().enumerate() {
            m.active = i == index;
        }
        self.selection.activate(&stream, rendering);

        self.store.set(keys::LAST_CHANNEL, id);
        self.record_watch(id);

        tracing::info!(id, origin = origin.as_str(), "Channel selected");
        self.selection.active()
    }

    pub fn active(&self) -> Option<&ActiveChannel> {
        self.selection.active()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.marker(id).is_some_and(|m| m.active)
    }

    /// Id persisted by the previous session's last selection.
    pub fn last_channel_id(&self) -> Option<String> {
        self.store
            .get(keys::LAST_CHANNEL)
            .filter(|id| self.catalog.contains(id))
    }

    // ========================================================================
    // Recents
    // ========================================================================

    /// Move `id` to the front of the watch history and re-snapshot the recents panel.
    pub fn record_watch(&mut self, id: &str) {
        self.recents.record(id);
        persist::write_id_list(&mut self.store, keys::RECENTS, self.recents.ids());
        self.rebuild_recents_snapshot();
    }

    pub fn recents(&self) -> &[String] {
        self.recents.ids()
    }

    /// Recents panel contents as of the last recorded watch. Empty means hidden.
    pub fn recents_snapshot(&self) -> &[RecentEntry] {
        &self.recents_snapshot
    }

    fn rebuild_recents_snapshot(&mut self) {
        let snapshot = self
            .recents
            .ids()
            .iter()
            .filter_map(|id| {
                let index = self.catalog.position(id)?;
                let row = self.projection.entry(Surface::List, index)?;
                let markers = self.markers[index];
                Some(RecentEntry {
                    id: row.id.clone(),
                    name: row.name.clone(),
                    badge: row.badge,
                    event: row.event.clone().unwrap_or_default(),
                    favorited: markers.favorited,
                    active: markers.active,
                })
            })
            .collect();
        self.recents_snapshot = snapshot;
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Add `id` to favorites, or remove it if `confirm` agrees.
    pub fn toggle_favorite(&mut self, id: &str, confirm: &mut impl ConfirmIntent) -> FavoriteOutcome {
        let Some(channel) = self.catalog.get(id) else {
            return FavoriteOutcome::Unknown;
        };
        let name = channel.name.clone();

        let outcome = if self.favorites.contains(id) {
            let prompt = ConfirmPrompt::RemoveFavorite {
                id: id.to_string(),
                name: name.clone(),
            };
            if !confirm.confirm(&prompt) {
                return FavoriteOutcome::Declined;
            }
            self.favorites.remove(id);
            self.notices
                .push(Notice::warning(format!("'{}' removed from favorites", name)));
            FavoriteOutcome::Removed
        } else {
            self.favorites.insert(id);
            self.notices
                .push(Notice::info(format!("'{}' added to favorites", name)));
            FavoriteOutcome::Added
        };

        persist::write_id_list(&mut self.store, keys::FAVORITES, self.favorites.ids());
        self.apply_favorite_markers();
        self.apply_filter();

        tracing::info!(id, ?outcome, favorites = self.favorites.len(), "Favorite toggled");
        outcome
    }

    /// Empty the favorite set after confirmation. Returns whether it was cleared.
    pub fn clear_favorites(&mut self, confirm: &mut impl ConfirmIntent) -> bool {
        let prompt = ConfirmPrompt::ClearFavorites {
            count: self.favorites.len(),
        };
        if !confirm.confirm(&prompt) {
            return false;
        }

        self.favorites.clear();
        self.store.remove(keys::FAVORITES);
        self.apply_favorite_markers();
        self.apply_filter();
        self.notices.push(Notice::warning("All favorites cleared"));

        tracing::info!("Favorites cleared");
        true
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.marker(id).is_some_and(|m| m.favorited)
    }

    fn apply_favorite_markers(&mut self) {
        for (channel, markers) in self.catalog.iter().zip(self.markers.iter_mut()) {
            markers.favorited = self.favorites.contains(&channel.id);
        }
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    pub fn set_query(&mut self, query: &str) -> FilterReport {
        self.filter.set_query(query);
        self.apply_filter()
    }

    pub fn set_category(&mut self, category: Category) -> FilterReport {
        self.filter.category = category;
        self.apply_filter()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn report(&self) -> FilterReport {
        self.report
    }

    /// Recompute visibility of every entry on every surface.
    pub fn apply_filter(&mut self) -> FilterReport {
        let needle = self.filter.needle();
        let category = self.filter.category;
        let mut visible = [0usize; 3];

        for surface in Surface::ALL {
            let slot = surface.slot();
            for entry in self.projection.entries(surface) {
                let shown = filter::is_visible(entry, &needle, category, &self.favorites);
                self.markers[entry.index].visible[slot] = shown;
                if shown {
                    visible[slot] += 1;
                }
            }
        }

        self.report = FilterReport::new(visible, self.projection.len());
        self.report
    }

    // ========================================================================
    // Render adapters
    // ========================================================================

    /// Every entry of `surface` joined with its markers, hidden ones included.
    pub fn entries(&self, surface: Surface) -> impl Iterator<Item = EntryView<'_>> + '_ {
        let slot = surface.slot();
        self.projection
            .entries(surface)
            .iter()
            .map(move |entry| {
                let m = self.markers[entry.index];
                EntryView {
                    entry,
                    favorited: m.favorited,
                    active: m.active,
                    visible: m.visible[slot],
                }
            })
    }

    /// Entries currently passing the filter, in catalog order.
    pub fn visible_entries(&self, surface: Surface) -> Vec<EntryView<'_>> {
        self.entries(surface).filter(|v| v.visible).collect()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn catalog(&self) -> &ChannelCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store access for preferences the controller does not own (theme, view, version).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Drain notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn marker(&self, id: &str) -> Option<&Markers> {
        self.catalog.position(id).map(|i| &self.markers[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Channel;
    use pretty_assertions::assert_eq;

    fn channel(id: &str, name: &str, event: &str) -> Channel {
        Channel {
            id: id.into(),
            name: name.into(),
            event: event.into(),
            src: format!("https://streams.example.com/{}", id),
        }
    }

    fn cinema() -> Cinema<MemoryStore> {
        let catalog = ChannelCatalog::from_channels(vec![
            channel("alpha", "Alpha", "Cup final"),
            channel("beta", "Beta", "League derby"),
            channel("gamma", "Gamma", "Highlights"),
        ]);
        Cinema::new(catalog, MemoryStore::new())
    }

    fn yes(_: &ConfirmPrompt) -> bool {
        true
    }

    fn no(_: &ConfirmPrompt) -> bool {
        false
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let mut c = cinema();
        assert!(c.select("nope", Surface::Grid).is_none());
        assert!(c.active().is_none());
        assert!(c.recents().is_empty());
        assert!(c.store().get(keys::LAST_CHANNEL).is_none());
    }

    #[test]
    fn test_select_sets_stream_and_persists() {
        let mut c = cinema();
        let active = c.select("beta", Surface::List).unwrap().clone();
        assert_eq!(active.stream, "https://streams.example.com/beta");
        assert_eq!(active.name, "Beta");
        assert_eq!(active.event, "League derby");
        assert_eq!(c.store().get(keys::LAST_CHANNEL).as_deref(), Some("beta"));
        assert_eq!(c.store().get(keys::RECENTS).as_deref(), Some(r#"["beta"]"#));
    }

    #[test]
    fn test_lobby_pick_keeps_previous_event() {
        let mut c = cinema();
        c.select("alpha", Surface::List);
        let active = c.select("gamma", Surface::Lobby).unwrap();
        assert_eq!(active.name, "Gamma");
        assert_eq!(active.event, "Cup final");
    }

    #[test]
    fn test_exactly_one_active_across_surfaces() {
        let mut c = cinema();
        c.select("alpha", Surface::Grid);
        c.select("beta", Surface::List);
        c.select("beta", Surface::List);
        for surface in Surface::ALL {
            let active: Vec<&str> = c
                .entries(surface)
                .filter(|v| v.active)
                .map(|v| v.entry.id.as_str())
                .collect();
            assert_eq!(active, vec!["beta"]);
        }
    }

    #[test]
    fn test_toggle_adds_without_confirmation() {
        let mut c = cinema();
        let outcome = c.toggle_favorite("alpha", &mut no);
        assert_eq!(outcome, FavoriteOutcome::Added);
        assert!(c.is_favorite("alpha"));
        assert_eq!(c.take_notices(), vec![Notice::info("'Alpha' added to favorites")]);
    }

    #[test]
    fn test_declined_removal_leaves_state() {
        let mut c = cinema();
        c.toggle_favorite("alpha", &mut yes);
        c.take_notices();
        let outcome = c.toggle_favorite("alpha", &mut no);
        assert_eq!(outcome, FavoriteOutcome::Declined);
        assert!(c.is_favorite("alpha"));
        assert!(c.take_notices().is_empty());
        assert_eq!(c.store().get(keys::FAVORITES).as_deref(), Some(r#"["alpha"]"#));
    }

    #[test]
    fn test_confirmed_removal() {
        let mut c = cinema();
        c.toggle_favorite("alpha", &mut yes);
        let outcome = c.toggle_favorite("alpha", &mut yes);
        assert_eq!(outcome, FavoriteOutcome::Removed);
        assert!(!c.is_favorite("alpha"));
        assert_eq!(c.store().get(keys::FAVORITES).as_deref(), Some("[]"));
    }

    #[test]
    fn test_toggle_unknown() {
        let mut c = cinema();
        assert_eq!(c.toggle_favorite("zzz", &mut yes), FavoriteOutcome::Unknown);
        assert!(c.store().get(keys::FAVORITES).is_none());
    }

    #[test]
    fn test_favorite_marker_on_every_surface() {
        let mut c = cinema();
        c.toggle_favorite("gamma", &mut yes);
        for surface in Surface::ALL {
            for view in c.entries(surface) {
                assert_eq!(view.favorited, view.entry.id == "gamma");
            }
        }
    }

    #[test]
    fn test_clear_removes_key() {
        let mut c = cinema();
        c.toggle_favorite("alpha", &mut yes);
        c.toggle_favorite("beta", &mut yes);
        assert!(c.clear_favorites(&mut yes));
        assert!(c.favorites().is_empty());
        assert!(!c.store().contains(keys::FAVORITES));
        assert!(c.entries(Surface::List).all(|v| !v.favorited));
    }

    #[test]
    fn test_clear_declined() {
        let mut c = cinema();
        c.toggle_favorite("alpha", &mut yes);
        assert!(!c.clear_favorites(&mut no));
        assert!(c.is_favorite("alpha"));
    }

    #[test]
    fn test_favorites_category_follows_toggle() {
        let mut c = cinema();
        let report = c.set_category(Category::Favorites);
        assert!(report.no_results());

        c.toggle_favorite("beta", &mut yes);
        let visible: Vec<&str> = c
            .visible_entries(Surface::Grid)
            .iter()
            .map(|v| v.entry.id.as_str())
            .collect();
        assert_eq!(visible, vec!["beta"]);
    }

    #[test]
    fn test_event_query_hides_grid_but_not_list() {
        let mut c = cinema();
        let report = c.set_query("derby");
        assert_eq!(report.visible(Surface::Grid), 0);
        assert_eq!(report.visible(Surface::List), 1);
        assert!(!report.no_results());
    }

    #[test]
    fn test_filter_idempotent() {
        let mut c = cinema();
        c.set_query("a");
        let first = c.apply_filter();
        let second = c.apply_filter();
        assert_eq!(first, second);
    }

    #[test]
    fn test_recents_snapshot_is_stale_until_next_watch() {
        let mut c = cinema();
        c.select("alpha", Surface::List);
        c.toggle_favorite("alpha", &mut yes);
        assert!(c.is_favorite("alpha"));
        assert!(!c.recents_snapshot()[0].favorited);

        c.select("beta", Surface::List);
        let alpha = c
            .recents_snapshot()
            .iter()
            .find(|r| r.id == "alpha")
            .unwrap();
        assert!(alpha.favorited);
    }

    #[test]
    fn test_restore_from_store() {
        let mut store = MemoryStore::new();
        store.set(keys::FAVORITES, r#"["gamma","ghost"]"#);
        store.set(keys::RECENTS, r#"["beta","ghost","alpha"]"#);
        store.set(keys::LAST_CHANNEL, "beta");

        let catalog = ChannelCatalog::from_channels(vec![
            channel("alpha", "Alpha", ""),
            channel("beta", "Beta", ""),
            channel("gamma", "Gamma", ""),
        ]);
        let c = Cinema::new(catalog, store);

        assert!(c.is_favorite("gamma"));
        assert_eq!(c.favorites().len(), 2);
        assert_eq!(c.recents(), &["beta", "ghost", "alpha"]);
        let snapshot: Vec<&str> = c.recents_snapshot().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(snapshot, vec!["beta", "alpha"]);
        assert_eq!(c.last_channel_id().as_deref(), Some("beta"));
    }

    #[test]
    fn test_load_catalog_after_empty_start() {
        let mut store = MemoryStore::new();
        store.set(keys::FAVORITES, r#"["beta"]"#);
        let mut c = Cinema::new(ChannelCatalog::default(), store);
        assert!(c.entries(Surface::Grid).next().is_none());
        assert!(c.select("beta", Surface::Grid).is_none());

        c.load_catalog(ChannelCatalog::from_channels(vec![
            channel("alpha", "Alpha", ""),
            channel("beta", "Beta", ""),
        ]));
        assert!(c.is_favorite("beta"));
        assert_eq!(c.report().visible(Surface::Lobby), 2);
        assert!(c.select("beta", Surface::Grid).is_some());
    }
}
