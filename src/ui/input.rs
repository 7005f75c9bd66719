//! Input handling for the TUI.
//!
//! Keys are routed to the topmost thing on screen: help overlay, then the
//! confirmation prompt, then the what's-new overlay, then the context menu,
//! then the search field, and finally the current view.

use crate::app::{App, AppEvent, CatalogState, ContextMenuItem, Focus, View, CONTEXT_MENU_ITEMS};
use crate::cinema::Surface;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Map the current focus panel to a keybinding context for context-specific lookups.
fn focus_to_context(focus: Focus) -> KbContext {
    match focus {
        Focus::Channels => KbContext::Channels,
        Focus::Recents => KbContext::Recents,
    }
}

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.pending_confirm.is_some() {
        return Ok(handle_confirm_input(app, code));
    }

    if app.show_whats_new {
        return Ok(handle_whats_new_input(app, code));
    }

    if app.context_menu.is_some() {
        return Ok(handle_context_menu_input(app, code, event_tx));
    }

    if app.search_mode {
        return Ok(handle_search_input(app, code, modifiers));
    }

    match app.view {
        View::Lobby => handle_lobby_input(app, code, modifiers, event_tx),
        View::Theater => handle_theater_input(app, code, modifiers, event_tx),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// y/Enter accepts, n/Esc declines. Other keys are swallowed.
fn handle_confirm_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.resolve_confirm(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.resolve_confirm(false),
        _ => {}
    }
    Action::Continue
}

fn handle_whats_new_input(app: &mut App, code: KeyCode) -> Action {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('w') | KeyCode::Char(' ')
    ) {
        app.dismiss_whats_new();
    }
    Action::Continue
}

fn handle_context_menu_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Take ownership; put it back unless an item was chosen or the menu dismissed.
    let Some(mut menu) = app.context_menu.take() else {
        return Action::Continue;
    };

    match code {
        KeyCode::Char('k') | KeyCode::Up => {
            menu.selected = menu.selected.saturating_sub(1);
            app.context_menu = Some(menu);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            menu.selected = (menu.selected + 1).min(CONTEXT_MENU_ITEMS.len() - 1);
            app.context_menu = Some(menu);
        }
        KeyCode::Enter => match CONTEXT_MENU_ITEMS.get(menu.selected) {
            Some(ContextMenuItem::Play) => {
                app.play_channel(&menu.channel_id, menu.origin, event_tx);
            }
            Some(ContextMenuItem::ToggleFavorite) => {
                app.toggle_favorite(&menu.channel_id);
            }
            Some(ContextMenuItem::CopyLink) => {
                let stream = app.cinema.catalog().get(&menu.channel_id).map(|c| c.src.clone());
                if let Some(stream) = stream {
                    app.copy_stream(&stream, "Stream link copied");
                }
            }
            None => {}
        },
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('o') => {}
        _ => app.context_menu = Some(menu),
    }
    Action::Continue
}

fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app.keybindings.action_for_key(code, modifiers, KbContext::Search) {
        Some(KbAction::ExitSearch) => app.exit_search(true),
        Some(KbAction::CommitSearch) => app.exit_search(false),
        _ => match code {
            KeyCode::Backspace => app.search_pop(),
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.search_clear(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => app.search_push(c),
            _ => {}
        },
    }
    Action::Continue
}

/// Actions available everywhere outside overlays and the search field.
///
/// Returns `None` when the action was handled.
fn handle_common_action(app: &mut App, action: KbAction) -> Option<KbAction> {
    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::NavLeft => app.nav_left(),
        KbAction::NavRight => app.nav_right(),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::ShowWhatsNew => app.show_whats_new = true,
        KbAction::ToggleDarkMode => {
            let name = app.toggle_dark_mode();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::CycleAccent => {
            let name = app.cycle_accent();
            app.set_status(format!("Accent: {}", name));
        }
        other => return Some(other),
    }
    None
}

fn handle_lobby_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let Some(action) = app.keybindings.action_for_key(code, modifiers, KbContext::Lobby) else {
        return Ok(Action::Continue);
    };
    let Some(action) = handle_common_action(app, action) else {
        return Ok(Action::Continue);
    };

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::Select => {
            if !app.lobby_ready() {
                tracing::debug!("Lobby pick ignored, lobby not ready");
                return Ok(Action::Continue);
            }
            if let Some(id) = app.selected_channel_id() {
                app.play_channel(&id, Surface::Lobby, event_tx);
            }
        }
        KbAction::Reload => {
            if matches!(app.catalog_state, CatalogState::Failed(_)) {
                app.spawn_catalog_load(event_tx);
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_theater_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let context = focus_to_context(app.focus);
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Ok(Action::Continue);
    };
    let Some(action) = handle_common_action(app, action) else {
        return Ok(Action::Continue);
    };

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::Select => {
            if let Some(id) = app.selected_channel_id() {
                let origin = app.selection_origin();
                app.play_channel(&id, origin, event_tx);
            }
        }
        KbAction::Back => {
            if app.theater_mode {
                app.toggle_theater();
            } else if app.cinema.filter().is_active() {
                app.exit_search(true);
            }
        }
        KbAction::CycleFocus => app.cycle_focus(),
        KbAction::SwitchView => app.switch_surface(),
        KbAction::ToggleFavorite => {
            if let Some(id) = app.selected_channel_id() {
                app.toggle_favorite(&id);
            }
        }
        KbAction::ClearFavorites => app.request_clear_favorites(),
        KbAction::EnterSearch => {
            if app.theater_mode {
                app.toggle_theater();
            }
            app.focus = Focus::Channels;
            app.enter_search();
        }
        KbAction::ToggleCategory => {
            let category = app.toggle_category();
            app.set_status(format!("Showing {}", category.label().to_lowercase()));
        }
        KbAction::ContextMenu => app.open_context_menu(),
        KbAction::CopyStream => app.copy_current_stream(),
        KbAction::ToggleMute => {
            app.toggle_mute();
            let msg = if app.is_muted() {
                "Muted".to_string()
            } else {
                format!("Volume {}%", app.volume)
            };
            app.set_status(msg);
        }
        KbAction::VolumeUp => {
            app.volume_up();
            app.set_status(format!("Volume {}% (next stream)", app.volume));
        }
        KbAction::VolumeDown => {
            app.volume_down();
            app.set_status(format!("Volume {}% (next stream)", app.volume));
        }
        KbAction::ToggleTheater => app.toggle_theater(),
        KbAction::Reload => app.reload_active(event_tx),
        _ => {}
    }
    Ok(Action::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PlayerState;
    use crate::catalog::{CatalogSource, Channel, ChannelCatalog};
    use crate::cinema::ConfirmPrompt;
    use crate::config::Config;
    use crate::preferences::PreferenceManager;
    use crate::storage::Database;
    use tokio::time::{self, Duration};

    async fn theater_app() -> (App, mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
        let db = Database::open(":memory:").await.unwrap();
        let config = Config {
            player_command: Some("cinema-test-player-missing".to_string()),
            ..Config::default()
        };
        let prefs = PreferenceManager::from_config(&config);
        let source = CatalogSource::parse("channels.json").unwrap();
        let mut app = App::new(db, &config, prefs, source).unwrap();
        app.catalog_loaded(ChannelCatalog::from_channels(
            ["alpha", "beta", "gamma"]
                .iter()
                .map(|id| Channel {
                    id: id.to_string(),
                    name: id.to_uppercase(),
                    event: format!("{} event", id),
                    src: format!("https://streams.example.com/{}", id),
                })
                .collect(),
        ));
        app.show_whats_new = false;
        app.view = View::Theater;
        let (tx, rx) = mpsc::channel(8);
        (app, tx, rx)
    }

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut app, tx, _rx) = theater_app().await;
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_search_typing_does_not_trigger_actions() {
        let (mut app, tx, _rx) = theater_app().await;
        press(&mut app, &tx, KeyCode::Char('/'));
        assert!(app.search_mode);

        for c in "beta".chars() {
            assert!(matches!(press(&mut app, &tx, KeyCode::Char(c)), Action::Continue));
        }
        assert_eq!(app.cinema.filter().query(), "beta");
        assert_eq!(app.cinema.report().visible(Surface::Grid), 1);

        press(&mut app, &tx, KeyCode::Enter);
        assert!(!app.search_mode);
        assert_eq!(app.cinema.filter().query(), "beta");

        press(&mut app, &tx, KeyCode::Char('/'));
        press(&mut app, &tx, KeyCode::Esc);
        assert!(app.cinema.filter().query().is_empty());
    }

    #[tokio::test]
    async fn test_favorite_key_and_confirm_overlay() {
        let (mut app, tx, _rx) = theater_app().await;
        press(&mut app, &tx, KeyCode::Char('f'));
        assert!(app.cinema.is_favorite("alpha"));

        press(&mut app, &tx, KeyCode::Char('f'));
        assert!(matches!(
            app.pending_confirm,
            Some(ConfirmPrompt::RemoveFavorite { .. })
        ));
        // Keys other than y/n are swallowed by the prompt
        press(&mut app, &tx, KeyCode::Char('j'));
        assert_eq!(app.channel_cursor, 0);

        press(&mut app, &tx, KeyCode::Char('n'));
        assert!(app.cinema.is_favorite("alpha"));

        press(&mut app, &tx, KeyCode::Char('f'));
        press(&mut app, &tx, KeyCode::Char('y'));
        assert!(!app.cinema.is_favorite("alpha"));
    }

    #[tokio::test]
    async fn test_shift_x_clears_favorites() {
        let (mut app, tx, _rx) = theater_app().await;
        app.toggle_favorite("beta");
        handle_input(&mut app, KeyCode::Char('X'), KeyModifiers::SHIFT, &tx).unwrap();
        assert!(matches!(
            app.pending_confirm,
            Some(ConfirmPrompt::ClearFavorites { count: 1 })
        ));
        press(&mut app, &tx, KeyCode::Enter);
        assert!(app.cinema.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_context_menu_play() {
        let (mut app, tx, _rx) = theater_app().await;
        app.surface = Surface::List;
        press(&mut app, &tx, KeyCode::Char('j'));
        press(&mut app, &tx, KeyCode::Char('o'));
        let menu = app.context_menu.clone().unwrap();
        assert_eq!(menu.channel_id, "beta");

        press(&mut app, &tx, KeyCode::Enter);
        assert!(app.context_menu.is_none());
        assert!(app.cinema.is_active("beta"));
        assert_eq!(app.cinema.active().unwrap().event, "beta event");
    }

    #[tokio::test]
    async fn test_context_menu_favorite_asks_before_removing() {
        let (mut app, tx, _rx) = theater_app().await;
        app.toggle_favorite("alpha");

        press(&mut app, &tx, KeyCode::Char('o'));
        press(&mut app, &tx, KeyCode::Down);
        press(&mut app, &tx, KeyCode::Enter);
        assert!(app.pending_confirm.is_some());
        assert!(app.cinema.is_favorite("alpha"));
    }

    #[tokio::test]
    async fn test_lobby_pick_waits_for_ready() {
        let (mut app, tx, _rx) = theater_app().await;
        app.view = View::Lobby;
        time::pause();
        app.lobby_started = tokio::time::Instant::now();

        press(&mut app, &tx, KeyCode::Enter);
        assert_eq!(app.view, View::Lobby);

        time::advance(Duration::from_secs(4)).await;
        press(&mut app, &tx, KeyCode::Enter);
        assert_eq!(app.view, View::Theater);
        assert!(app.cinema.is_active("alpha"));
        // The test player binary does not exist
        assert!(matches!(app.player_state, PlayerState::Failed(_)));
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let (mut app, tx, _rx) = theater_app().await;
        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Continue));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_tab_needs_recents() {
        let (mut app, tx, _rx) = theater_app().await;
        press(&mut app, &tx, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Channels);

        press(&mut app, &tx, KeyCode::Enter);
        press(&mut app, &tx, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Recents);
        assert_eq!(app.selected_channel_id().as_deref(), Some("alpha"));
    }
}
