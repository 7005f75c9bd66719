use crate::app::{App, View};
use crate::cinema::NoticeKind;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

use super::theater::volume_label;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Notices win over key hints
    if let Some((notice, _)) = &app.status_message {
        let role = match notice.kind {
            NoticeKind::Info => "notice_info",
            NoticeKind::Success => "notice_success",
            NoticeKind::Warning => "notice_warning",
        };
        let line = Line::from(Span::styled(notice.message.as_str(), app.style(role)));
        f.render_widget(Paragraph::new(line).style(app.style("status_bar")), area);
        return;
    }

    let text: Cow<'_, str> = match app.view {
        View::Lobby => Cow::Borrowed("[j/k]move [Enter]watch [?]help [q]uit"),
        View::Theater if app.search_mode => {
            Cow::Borrowed("Type to filter | ESC clear | ENTER keep | Ctrl+u erase")
        }
        View::Theater => Cow::Owned(format!(
            "[/]search [f]avorite [c]ategory [v]iew [o]menu [y]copy [m]ute [t]heater [?]help [q]uit | {}",
            volume_label(app)
        )),
    };

    f.render_widget(Paragraph::new(text).style(app.style("status_bar")), area);
}
