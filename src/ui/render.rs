//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state, and draws the modal overlays on top.

use crate::app::{App, View, CONTEXT_MENU_ITEMS};
use crate::cinema::ConfirmPrompt;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{help, lobby, sidebar, status, theater, whatsnew};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Share of the width given to the sidebar.
const SIDEBAR_PERCENT: u16 = 45;

/// Main render dispatch function.
///
/// Routes to the appropriate view renderer based on current application state.
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.view {
        View::Lobby => render_lobby(f, app),
        View::Theater => render_theater(f, app),
    }

    if app.show_help {
        help::render(f, app);
    }

    if app.show_whats_new {
        whatsnew::render(f, app);
    }

    if let Some(ref prompt) = app.pending_confirm {
        render_confirm_overlay(f, app, prompt);
    }

    if app.context_menu.is_some() {
        render_context_menu_overlay(f, app);
    }
}

fn render_lobby(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    lobby::render(f, app, chunks[0]);
    status::render(f, app, chunks[1]);
}

/// Header, player and sidebar. Header and status bar drop out while idle.
fn render_theater(f: &mut Frame, app: &mut App) {
    let chrome = app.chrome_visible();
    app.chrome_shown = chrome;
    let bar = if chrome { 1 } else { 0 };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(bar),
            Constraint::Min(0),
            Constraint::Length(bar),
        ])
        .split(f.area());

    if chrome {
        theater::render_header(f, app, rows[0]);
    }

    if app.theater_mode {
        theater::render_player(f, app, rows[1]);
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - SIDEBAR_PERCENT),
                Constraint::Percentage(SIDEBAR_PERCENT),
            ])
            .split(rows[1]);

        theater::render_player(f, app, columns[0]);
        sidebar::render(f, app, columns[1]);
    }

    if chrome {
        status::render(f, app, rows[2]);
    }
}

/// Centered box of at most `width` x `height`, or `None` when too cramped.
fn overlay_rect(area: Rect, width: u16, height: u16) -> Option<Rect> {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);
    (overlay.width >= 20 && overlay.height >= 5).then_some(overlay)
}

/// Render a confirmation dialog overlay centered on screen.
fn render_confirm_overlay(f: &mut Frame, app: &App, prompt: &ConfirmPrompt) {
    let Some(overlay) = overlay_rect(f.area(), 50, 7) else {
        return;
    };

    let text = format!("{}\n\n(y) Confirm  (n/Esc) Cancel", prompt.message());

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("overlay_border"))
                .title(Span::styled(" Confirm ", app.style("overlay_title"))),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(app.style("channel_normal"));

    f.render_widget(paragraph, overlay);
}

/// Render the channel context menu centered on screen.
fn render_context_menu_overlay(f: &mut Frame, app: &App) {
    let Some(menu) = &app.context_menu else {
        return;
    };

    let favorited = app.cinema.is_favorite(&menu.channel_id);
    let items: String = CONTEXT_MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == menu.selected {
                format!("> {}", item.label(favorited))
            } else {
                format!("  {}", item.label(favorited))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    let text = format!("{}\n\n(Enter) Select  (Esc) Cancel", items);

    let content_lines = text.lines().count() as u16 + 2;
    let Some(overlay) = overlay_rect(f.area(), 40, content_lines) else {
        return;
    };

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("overlay_border"))
                .title(Span::styled(
                    format!(" {} ", menu.channel_name),
                    app.style("overlay_title"),
                )),
        )
        .style(app.style("channel_normal"));

    f.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{CatalogState, Focus};
    use crate::catalog::{CatalogSource, Channel, ChannelCatalog};
    use crate::cinema::Surface;
    use crate::config::Config;
    use crate::preferences::PreferenceManager;
    use crate::storage::Database;
    use ratatui::{backend::TestBackend, Terminal};

    async fn theater_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let config = Config::default();
        let prefs = PreferenceManager::from_config(&config);
        let source = CatalogSource::parse("channels.json").unwrap();
        let mut app = App::new(db, &config, prefs, source).unwrap();
        let channels = (0..10)
            .map(|i| Channel {
                id: format!("ch{}", i),
                name: format!("Channel {}", i),
                event: format!("Event {}", i),
                src: format!("https://streams.example.com/{}", i),
            })
            .collect();
        app.catalog_loaded(ChannelCatalog::from_channels(channels));
        app.view = View::Theater;
        app.focus = Focus::Channels;
        app.show_whats_new = false;
        app
    }

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_grid_columns_follow_width() {
        let mut app = theater_app().await;
        app.surface = Surface::Grid;
        draw(&mut app, 120, 30);
        let wide = app.grid_columns;
        draw(&mut app, 70, 30);
        assert!(wide > app.grid_columns);
        assert!(app.grid_columns >= 1);
    }

    #[tokio::test]
    async fn test_no_results_message() {
        let mut app = theater_app().await;
        app.surface = Surface::List;
        app.cinema.set_query("zzz");
        let screen = draw(&mut app, 100, 30);
        assert!(screen.contains("No channels match"));
    }

    #[tokio::test]
    async fn test_lobby_error_panel() {
        let mut app = theater_app().await;
        app.view = View::Lobby;
        app.catalog_state = CatalogState::Failed("HTTP error: status 500".into());
        let screen = draw(&mut app, 100, 30);
        assert!(screen.contains("Could not load the channel list"));
        assert!(screen.contains("status 500"));
    }

    #[tokio::test]
    async fn test_tiny_terminal_does_not_panic() {
        let mut app = theater_app().await;
        let screen = draw(&mut app, 10, 2);
        assert!(screen.contains("Too small"));
    }

    #[tokio::test]
    async fn test_confirm_prompt_drawn() {
        let mut app = theater_app().await;
        app.pending_confirm = Some(ConfirmPrompt::ClearFavorites { count: 2 });
        let screen = draw(&mut app, 100, 30);
        assert!(screen.contains("Clear all 2 favorites?"));
    }
}
