//! What's new overlay, shown once per version.

use crate::app::{App, APP_VERSION};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::help::centered_rect;

/// Highlights of the current release.
const RELEASE_NOTES: &[&str] = &[
    "Favorites: press f on a channel, c to show only favorites",
    "Recently watched panel under the channel list (Tab to focus)",
    "Grid and list tabs (v); your choice is remembered",
    "Search channels by name or event with /",
    "Context menu (o): play, favorite or copy the stream link",
    "Dark mode (d) and accent colors (a)",
    "Theater mode (t) hides the sidebar",
];

pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 60, f.area());
    if overlay.width < 24 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let mut lines: Vec<Line> = Vec::with_capacity(RELEASE_NOTES.len() + 2);
    for note in RELEASE_NOTES {
        lines.push(Line::from(vec![
            Span::styled(" • ", app.style("channel_favorite")),
            Span::styled(*note, app.style("channel_normal")),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press Enter or Esc to continue",
        app.style("channel_event"),
    )));

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("overlay_border"))
            .title(Span::styled(
                format!(" What's new in {} ", APP_VERSION),
                app.style("overlay_title"),
            )),
    );
    f.render_widget(panel, overlay);
}
