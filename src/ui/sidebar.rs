//! Channel sidebar: tabs, search field, grid or list, recents panel.

use crate::app::{App, Focus};
use crate::cinema::{Category, EntryView, Surface, LIVE_BADGE};
use crate::util::{display_width, pad_to_width, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Width of one grid cell including its right gap.
pub(super) const GRID_CELL_WIDTH: u16 = 24;

/// Upper bound for the recents panel height, borders included.
const RECENTS_MAX_HEIGHT: u16 = 9;

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 10 || area.height < 6 {
        return;
    }

    let recents = app.recents().len();
    // Hidden while nobody has watched anything
    let recents_height = if recents == 0 {
        0
    } else {
        (recents as u16 * 2 + 2).min(RECENTS_MAX_HEIGHT).min(area.height / 2)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(recents_height),
        ])
        .split(area);

    render_tabs(f, app, chunks[0]);
    render_search(f, app, chunks[1]);

    let report = app.cinema.report();
    if report.no_results() {
        render_no_results(f, app, chunks[2]);
    } else {
        match app.surface {
            Surface::Grid => render_grid(f, app, chunks[2]),
            _ => render_list(f, app, chunks[2]),
        }
    }

    if recents_height > 0 {
        render_recents(f, app, chunks[3]);
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let tab = |label: &'static str, on: bool| {
        let style = if on {
            app.style("tab_active")
        } else {
            app.style("tab_inactive")
        };
        Span::styled(format!(" {} ", label), style)
    };

    let category = app.cinema.filter().category;
    let line = Line::from(vec![
        tab("Grid", app.surface == Surface::Grid),
        tab("List", app.surface == Surface::List),
        Span::raw("  "),
        tab(Category::All.label(), category == Category::All),
        tab(Category::Favorites.label(), category == Category::Favorites),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let query = app.cinema.filter().query();
    let line = if app.search_mode {
        Line::from(vec![
            Span::styled("/ ", app.style("search_input")),
            Span::styled(format!("{}_", app.search_input), app.style("search_input")),
        ])
    } else if !query.is_empty() {
        Line::from(vec![
            Span::styled("/ ", app.style("tab_inactive")),
            Span::styled(query.to_string(), app.style("search_input")),
            Span::styled("  (Esc clears)", app.style("tab_inactive")),
        ])
    } else {
        Line::from(Span::styled("/ search channels", app.style("tab_inactive")))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_no_results(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.cinema.filter().category {
        Category::Favorites if app.cinema.favorites().is_empty() => "No favorite channels yet",
        _ => "No channels match",
    };
    let panel = Paragraph::new(text)
        .style(app.style("no_results"))
        .alignment(Alignment::Center)
        .block(channel_block(app, " Channels (0) "));
    f.render_widget(panel, area);
}

fn channel_block<'a>(app: &App, title: impl Into<Line<'a>>) -> Block<'a> {
    let focused = app.focus == Focus::Channels;
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            app.style("panel_border_focused")
        } else {
            app.style("panel_border")
        })
        .title(title)
}

/// Leading markers: active arrow and favorite star.
fn markers<'a>(app: &App, view: &EntryView<'_>) -> Vec<Span<'a>> {
    vec![
        if view.active {
            Span::styled("▶", app.style("channel_active"))
        } else {
            Span::raw(" ")
        },
        if view.favorited {
            Span::styled("★", app.style("channel_favorite"))
        } else {
            Span::raw(" ")
        },
        Span::raw(" "),
    ]
}

fn name_style(app: &App, view: &EntryView<'_>, under_cursor: bool) -> Style {
    if under_cursor {
        app.style("channel_cursor")
    } else if view.active {
        app.style("channel_active").add_modifier(Modifier::BOLD)
    } else {
        app.style("channel_normal")
    }
}

fn render_grid(f: &mut Frame, app: &mut App, area: Rect) {
    let inner_width = area.width.saturating_sub(2);
    let columns = (inner_width / GRID_CELL_WIDTH).max(1) as usize;
    app.grid_columns = columns;

    let app: &App = app;
    let entries = app.cinema.visible_entries(Surface::Grid);
    let focused = app.focus == Focus::Channels;
    let cursor = app.channel_cursor;

    let visible_rows = area.height.saturating_sub(2) as usize;
    let cursor_row = cursor / columns;
    let first_row = (cursor_row + 1).saturating_sub(visible_rows);

    let badge_width = display_width(LIVE_BADGE) + 1;
    let name_width = (GRID_CELL_WIDTH as usize).saturating_sub(3 + badge_width + 1);

    let lines: Vec<Line> = entries
        .chunks(columns)
        .skip(first_row)
        .take(visible_rows)
        .enumerate()
        .map(|(row, cells)| {
            let mut spans = Vec::with_capacity(cells.len() * 5);
            for (col, view) in cells.iter().enumerate() {
                let idx = (first_row + row) * columns + col;
                spans.extend(markers(app, view));
                spans.push(Span::styled(
                    pad_to_width(view.entry.name(), name_width),
                    name_style(app, view, focused && idx == cursor),
                ));
                if view.entry.has_badge() {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(LIVE_BADGE, app.style("live_badge")));
                } else {
                    spans.push(Span::raw(" ".repeat(badge_width)));
                }
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    let title = format!(" Channels ({}) ", entries.len());
    f.render_widget(Paragraph::new(lines).block(channel_block(app, title)), area);
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    let entries = app.cinema.visible_entries(Surface::List);
    let width = area.width.saturating_sub(2) as usize;
    let name_width = width.saturating_sub(3 + display_width(LIVE_BADGE) + 1);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|view| {
            let mut heading = markers(app, view);
            heading.push(Span::styled(
                truncate_to_width(view.entry.name(), name_width).into_owned(),
                name_style(app, view, false),
            ));
            if view.entry.has_badge() {
                heading.push(Span::raw(" "));
                heading.push(Span::styled(LIVE_BADGE, app.style("live_badge")));
            }

            let event = view.entry.event.as_deref().unwrap_or_default();
            let event_line = Line::from(Span::styled(
                format!("   {}", truncate_to_width(event, width.saturating_sub(3))),
                app.style("channel_event"),
            ));
            ListItem::new(vec![Line::from(heading), event_line])
        })
        .collect();

    let list = List::new(items)
        .block(channel_block(app, format!(" Channels ({}) ", entries.len())))
        .highlight_style(app.style("channel_cursor"));

    let mut state = ListState::default();
    if app.focus == Focus::Channels && !entries.is_empty() {
        state.select(Some(app.channel_cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_recents(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Recents;
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .recents()
        .iter()
        .map(|recent| {
            let mut heading = vec![
                if recent.active {
                    Span::styled("▶", app.style("channel_active"))
                } else {
                    Span::raw(" ")
                },
                if recent.favorited {
                    Span::styled("★", app.style("channel_favorite"))
                } else {
                    Span::raw(" ")
                },
                Span::raw(" "),
            ];
            heading.push(Span::styled(
                truncate_to_width(&recent.name, width.saturating_sub(4 + display_width(LIVE_BADGE)))
                    .into_owned(),
                app.style("channel_normal"),
            ));
            if recent.badge {
                heading.push(Span::raw(" "));
                heading.push(Span::styled(LIVE_BADGE, app.style("live_badge")));
            }
            let event = Line::from(Span::styled(
                format!("   {}", truncate_to_width(&recent.event, width.saturating_sub(3))),
                app.style("channel_event"),
            ));
            ListItem::new(vec![Line::from(heading), event])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if focused {
                    app.style("panel_border_focused")
                } else {
                    app.style("panel_border")
                })
                .title(" Recently watched "),
        )
        .highlight_style(app.style("channel_cursor"));

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.recents_cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}
