//! Player area and its header.

use crate::app::{App, PlayerState};
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::lobby::SPINNER;

/// Channel name and event text above the player.
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    if area.height < 1 {
        return;
    }
    let line = match app.cinema.active() {
        Some(active) => {
            let mut spans = vec![Span::styled(
                active.name.clone(),
                app.style("player_label").add_modifier(Modifier::BOLD),
            )];
            if !active.event.is_empty() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(active.event.clone(), app.style("player_event")));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled("No channel selected", app.style("player_event"))),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Player state, volume and launcher.
pub fn render_player(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 10 || area.height < 4 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(if app.theater_mode { " Theater " } else { " Player " });
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let name = app
        .cinema
        .active()
        .map(|a| a.name.as_str())
        .unwrap_or_default();

    let body: Vec<Line> = match &app.player_state {
        PlayerState::Idle if app.cinema.active().is_none() => vec![Line::from(Span::styled(
            "Pick a channel from the sidebar",
            app.style("player_event"),
        ))],
        PlayerState::Idle => vec![
            Line::from(Span::styled(
                format!("{} is not playing", name),
                app.style("player_label"),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Press {} to start it again", hint(app, Action::Reload)),
                app.style("player_event"),
            )),
        ],
        PlayerState::Loading => vec![Line::from(Span::styled(
            format!("{} Loading {}...", SPINNER[app.spinner_frame % SPINNER.len()], name),
            app.style("player_loader"),
        ))],
        PlayerState::Playing => vec![
            Line::from(Span::styled(
                format!("▶ {}", name),
                app.style("player_label").add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Playing in {}", app.player.launcher_name()),
                app.style("player_event"),
            )),
        ],
        PlayerState::Failed(error) => vec![
            Line::from(Span::styled(
                format!("Could not play {}", name),
                app.style("notice_warning").add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(error.clone(), app.style("player_event"))),
            Line::from(""),
            Line::from(Span::styled(
                format!("Press {} to retry", hint(app, Action::Reload)),
                app.style("player_event"),
            )),
        ],
    };

    // Vertically center the message
    let top = chunks[0].height.saturating_sub(body.len() as u16) / 2;
    let body_area = Rect {
        y: chunks[0].y + top,
        height: chunks[0].height.saturating_sub(top),
        ..chunks[0]
    };
    f.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        body_area,
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(volume_label(app), app.style("player_event"))))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn hint(app: &App, action: Action) -> String {
    app.keybindings
        .key_hint(action, Context::Channels)
        .unwrap_or_else(|| "?".to_string())
}

/// "Muted" or "Vol 70%".
pub(super) fn volume_label(app: &App) -> String {
    if app.is_muted() {
        "Muted".to_string()
    } else {
        format!("Vol {}%", app.volume)
    }
}
