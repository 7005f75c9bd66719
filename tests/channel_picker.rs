//! Integration tests for the channel picker state: favorites, recents,
//! filtering and selection working together through the `Cinema` controller.
//!
//! Each test builds its own catalog and an in-memory preference store.

use cinema::catalog::{Channel, ChannelCatalog};
use cinema::cinema::{
    keys, Category, Cinema, ConfirmPrompt, Confirmed, MemoryStore, PreferenceStore, Surface,
    RECENTS_LIMIT,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn channel(id: &str, name: &str, event: &str) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        event: event.to_string(),
        src: format!("https://streams.example.com/{id}.m3u8"),
    }
}

fn greek() -> ChannelCatalog {
    ChannelCatalog::from_channels(vec![
        channel("alpha", "alpha", ""),
        channel("beta", "beta", ""),
        channel("gamma", "gamma", ""),
        channel("delta", "delta", ""),
    ])
}

fn numbered(n: usize) -> ChannelCatalog {
    ChannelCatalog::from_channels(
        (0..n)
            .map(|i| channel(&format!("ch{i}"), &format!("Channel {i}"), &format!("Match {i}")))
            .collect(),
    )
}

fn visible_ids(cinema: &Cinema<MemoryStore>, surface: Surface) -> Vec<String> {
    cinema
        .visible_entries(surface)
        .iter()
        .map(|v| v.entry.id.clone())
        .collect()
}

// ============================================================================
// Favorites and Markers
// ============================================================================

#[test]
fn test_favorite_marker_on_every_surface() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.toggle_favorite("gamma", &mut Confirmed);

    for surface in Surface::ALL {
        for view in cinema.entries(surface) {
            assert_eq!(view.favorited, view.entry.id == "gamma", "{surface:?}");
        }
    }
}

#[test]
fn test_favorites_only_category() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.toggle_favorite("delta", &mut Confirmed);
    cinema.toggle_favorite("alpha", &mut Confirmed);

    let report = cinema.set_category(Category::Favorites);
    assert_eq!(report.visible(Surface::Grid), 2);
    // Catalog order, not insertion order
    assert_eq!(visible_ids(&cinema, Surface::List), vec!["alpha", "delta"]);
}

#[test]
fn test_query_ignores_favorites() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.toggle_favorite("alpha", &mut Confirmed);

    cinema.set_query("et");
    for surface in Surface::ALL {
        assert_eq!(visible_ids(&cinema, surface), vec!["beta"]);
    }
}

#[test]
fn test_names_ending_in_live_match_on_every_surface() {
    let catalog = ChannelCatalog::from_channels(vec![
        channel("bbc", "BBC LIVE", ""),
        channel("alive", "ALIVE", ""),
        channel("sky", "Sky", ""),
    ]);
    let mut cinema = Cinema::new(catalog, MemoryStore::new());

    cinema.set_query("bbc live");
    for surface in Surface::ALL {
        assert_eq!(visible_ids(&cinema, surface), vec!["bbc"], "{surface:?}");
    }

    cinema.set_query("alive");
    for surface in Surface::ALL {
        assert_eq!(visible_ids(&cinema, surface), vec!["alive"], "{surface:?}");
    }

    let active = cinema.select("bbc", Surface::Lobby).unwrap();
    assert_eq!(active.name, "BBC LIVE");
}

#[test]
fn test_empty_query_all_shows_everything() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.set_query("zzz");
    let report = cinema.set_query("");
    for surface in Surface::ALL {
        assert_eq!(report.visible(surface), report.total());
    }
    assert!(!report.no_results());
}

#[test]
fn test_clear_all_removes_persisted_key() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.toggle_favorite("alpha", &mut Confirmed);
    assert!(cinema.store().contains(keys::FAVORITES));

    assert!(cinema.clear_favorites(&mut Confirmed));
    assert!(!cinema.store().contains(keys::FAVORITES));
    assert!(cinema.favorites().is_empty());
}

#[test]
fn test_declined_removal_keeps_favorite() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.toggle_favorite("beta", &mut Confirmed);

    let mut asked = Vec::new();
    cinema.toggle_favorite("beta", &mut |prompt: &ConfirmPrompt| {
        asked.push(prompt.message());
        false
    });

    assert!(cinema.is_favorite("beta"));
    assert_eq!(asked, vec!["Remove 'beta' from favorites?".to_string()]);
}

// ============================================================================
// Recents
// ============================================================================

#[test]
fn test_rewatch_moves_to_front() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.select("alpha", Surface::Grid);
    cinema.select("beta", Surface::Grid);
    cinema.select("alpha", Surface::List);
    assert_eq!(cinema.recents(), &["alpha", "beta"]);
    assert_eq!(
        cinema.store().get(keys::RECENTS).as_deref(),
        Some(r#"["alpha","beta"]"#)
    );
}

#[test]
fn test_recents_snapshot_is_stale_until_next_watch() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.select("gamma", Surface::Lobby);
    cinema.toggle_favorite("gamma", &mut Confirmed);

    // The main views update at once; the recents panel waits for the next watch
    assert!(cinema.is_favorite("gamma"));
    assert!(!cinema.recents_snapshot()[0].favorited);

    cinema.select("alpha", Surface::Grid);
    let gamma = cinema
        .recents_snapshot()
        .iter()
        .find(|r| r.id == "gamma")
        .unwrap();
    assert!(gamma.favorited);
}

#[test]
fn test_stale_ids_survive_reload_but_render_nothing() {
    let mut store = MemoryStore::new();
    store.set(keys::FAVORITES, r#"["gone","beta"]"#);
    store.set(keys::RECENTS, r#"["gone","alpha"]"#);

    let cinema = Cinema::new(greek(), store);
    assert!(cinema.favorites().contains("gone"));
    assert_eq!(cinema.recents(), &["gone", "alpha"]);
    let snapshot: Vec<_> = cinema.recents_snapshot().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(snapshot, vec!["alpha"]);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_lobby_pick_reads_grid_metadata() {
    let catalog = ChannelCatalog::from_channels(vec![channel("one", "One TV", "Final")]);
    let mut cinema = Cinema::new(catalog, MemoryStore::new());

    let active = cinema.select("one", Surface::Lobby).unwrap();
    assert_eq!(active.name, "One TV");
    assert_eq!(active.stream, "https://streams.example.com/one.m3u8");
    assert_eq!(cinema.store().get(keys::LAST_CHANNEL).as_deref(), Some("one"));
}

#[test]
fn test_unknown_selection_changes_nothing() {
    let mut cinema = Cinema::new(greek(), MemoryStore::new());
    cinema.select("beta", Surface::Grid);
    assert!(cinema.select("omega", Surface::Grid).is_none());
    assert!(cinema.is_active("beta"));
    assert_eq!(cinema.recents(), &["beta"]);
}

// ============================================================================
// Properties
// ============================================================================

fn surface_strategy() -> impl Strategy<Value = Surface> {
    prop_oneof![Just(Surface::Lobby), Just(Surface::Grid), Just(Surface::List)]
}

proptest! {
    #[test]
    fn prop_recents_bounded_unique_mru(picks in prop::collection::vec((0usize..12, surface_strategy()), 0..40)) {
        let mut cinema = Cinema::new(numbered(12), MemoryStore::new());
        let mut expected: Vec<String> = Vec::new();

        for (i, surface) in &picks {
            let id = format!("ch{i}");
            cinema.select(&id, *surface);
            expected.retain(|e| *e != id);
            expected.insert(0, id);
            expected.truncate(RECENTS_LIMIT);
        }

        let recents = cinema.recents();
        prop_assert!(recents.len() <= RECENTS_LIMIT);
        let mut dedup = recents.to_vec();
        dedup.sort();
        dedup.dedup();
        prop_assert_eq!(dedup.len(), recents.len());
        prop_assert_eq!(recents, expected.as_slice());
    }

    #[test]
    fn prop_exactly_one_active(picks in prop::collection::vec((0usize..8, surface_strategy()), 1..20)) {
        let mut cinema = Cinema::new(numbered(8), MemoryStore::new());
        for (i, surface) in &picks {
            cinema.select(&format!("ch{i}"), *surface);
        }

        let last = format!("ch{}", picks.last().unwrap().0);
        for surface in Surface::ALL {
            let active: Vec<_> = cinema.entries(surface).filter(|v| v.active).collect();
            prop_assert_eq!(active.len(), 1);
            prop_assert_eq!(&active[0].entry.id, &last);
        }
    }

    #[test]
    fn prop_filter_respects_favorites_and_query(
        favorites in prop::collection::btree_set(0usize..10, 0..10),
        query in "[a-z0-9 ]{0,6}",
        favorites_only in any::<bool>(),
    ) {
        let mut cinema = Cinema::new(numbered(10), MemoryStore::new());
        for i in &favorites {
            cinema.toggle_favorite(&format!("ch{i}"), &mut Confirmed);
        }
        cinema.set_query(&query);
        let category = if favorites_only { Category::Favorites } else { Category::All };
        let report = cinema.set_category(category);

        let needle = query.trim().to_lowercase();
        for surface in Surface::ALL {
            let mut shown = 0;
            for view in cinema.entries(surface) {
                let index: usize = view.entry.id[2..].parse().unwrap();
                let text_hit = needle.is_empty()
                    || format!("channel {index}").contains(&needle)
                    || (surface == Surface::List && format!("match {index}").contains(&needle));
                let category_hit = !favorites_only || favorites.contains(&index);
                prop_assert_eq!(view.visible, text_hit && category_hit, "{:?} {}", surface, view.entry.id);
                shown += usize::from(view.visible);
            }
            prop_assert_eq!(report.visible(surface), shown);
        }
    }
}
