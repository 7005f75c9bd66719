//! Startup lobby: title, staged loader and the plain channel list.

use crate::app::{App, CatalogState, LobbyStage};
use crate::cinema::Surface;
use crate::keybindings::{Action, Context};
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Braille spinner shared with the player loader.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "C I N E M A",
        app.style("lobby_title").add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM).border_style(app.style("panel_border")));
    f.render_widget(title, chunks[0]);

    match &app.catalog_state {
        CatalogState::Failed(error) => render_error(f, app, error, chunks[1].union(chunks[2])),
        _ => {
            render_loader(f, app, chunks[1]);
            render_channels(f, app, chunks[2]);
        }
    }
}

fn render_loader(f: &mut Frame, app: &App, area: Rect) {
    let stage = app.lobby_stage();
    let text = if app.lobby_ready() {
        let hint = app
            .keybindings
            .key_hint(Action::Select, Context::Lobby)
            .unwrap_or_else(|| "Enter".to_string());
        format!("Ready. Pick a channel and press {}", hint)
    } else if stage == LobbyStage::Ready {
        // Staged sequence finished but the catalog is still on its way
        format!("{} Waiting for channel list...", SPINNER[app.spinner_frame % SPINNER.len()])
    } else {
        format!("{} {}", SPINNER[app.spinner_frame % SPINNER.len()], stage.label())
    };

    let loader = Paragraph::new(Line::from(Span::styled(text, app.style("lobby_loader"))))
        .alignment(Alignment::Center);
    f.render_widget(loader, area);
}

fn render_error(f: &mut Frame, app: &App, error: &str, area: Rect) {
    let retry = app
        .keybindings
        .key_hint(Action::Reload, Context::Lobby)
        .unwrap_or_else(|| "r".to_string());

    let text = vec![
        Line::from(Span::styled(
            "Could not load the channel list",
            app.style("lobby_error").add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(error.to_string(), app.style("lobby_error"))),
        Line::from(""),
        Line::from(format!("Press {} to try again, q to quit", retry)),
    ];

    let panel = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("lobby_error"))
                .title(" Error "),
        );
    f.render_widget(panel, area);
}

fn render_channels(f: &mut Frame, app: &App, area: Rect) {
    if area.height < 3 {
        return;
    }

    let ready = app.lobby_ready();
    let width = area.width.saturating_sub(4) as usize;
    let entries = app.cinema.visible_entries(Surface::Lobby);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|view| {
            let marker = if view.active { "▶ " } else { "  " };
            let name = truncate_to_width(view.entry.name(), width.saturating_sub(2));
            let style = if view.active {
                app.style("channel_active")
            } else {
                app.style("channel_normal")
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, app.style("channel_active")),
                Span::styled(name, style),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if ready {
                app.style("panel_border_focused")
            } else {
                app.style("panel_border")
            })
            .title(format!(" Channels ({}) ", entries.len())),
    );
    // No cursor until the picker is enabled
    if ready {
        list = list.highlight_style(app.style("channel_cursor"));
    }

    let mut state = ListState::default();
    if ready && !entries.is_empty() {
        state.select(Some(app.lobby_cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}
