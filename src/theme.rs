//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant`
//! picks the dark or light base palette (persisted as `darkMode`), and an
//! [`Accent`] swatch (persisted as `themeColor` + `themeShadow`) tints the
//! highlight roles on top of it.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Parse the persisted `darkMode` flag.
    pub fn from_dark_mode(flag: &str) -> Option<Self> {
        match flag {
            "enabled" => Some(Self::Dark),
            "disabled" => Some(Self::Light),
            _ => None,
        }
    }

    /// Value stored under `darkMode`.
    pub fn dark_mode_flag(self) -> &'static str {
        match self {
            Self::Dark => "enabled",
            Self::Light => "disabled",
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Accent swatches
// ============================================================================

/// A highlight color with its darker shadow, both as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accent {
    pub name: &'static str,
    pub color: &'static str,
    pub shadow: &'static str,
}

/// Selectable accent swatches. The first one is the default.
pub const ACCENTS: [Accent; 5] = [
    Accent {
        name: "red",
        color: "#e50914",
        shadow: "#b20710",
    },
    Accent {
        name: "blue",
        color: "#1e90ff",
        shadow: "#1565c0",
    },
    Accent {
        name: "green",
        color: "#2ecc71",
        shadow: "#1e8449",
    },
    Accent {
        name: "purple",
        color: "#9b59b6",
        shadow: "#6c3483",
    },
    Accent {
        name: "orange",
        color: "#ff9f1c",
        shadow: "#c76f00",
    },
];

impl Accent {
    pub fn by_name(name: &str) -> Option<Accent> {
        ACCENTS
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .copied()
    }

    /// Find the swatch matching a persisted `themeColor`.
    pub fn by_color(color: &str) -> Option<Accent> {
        ACCENTS
            .iter()
            .find(|a| a.color.eq_ignore_ascii_case(color))
            .copied()
    }

    /// Swatch after this one, wrapping around.
    pub fn next(self) -> Accent {
        let pos = ACCENTS.iter().position(|a| *a == self).unwrap_or(0);
        ACCENTS[(pos + 1) % ACCENTS.len()]
    }
}

impl Default for Accent {
    fn default() -> Self {
        ACCENTS[0]
    }
}

/// Parse `#rrggbb` into an RGB color.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role resolved to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Channel entries --
    pub channel_normal: Style,
    pub channel_cursor: Style,
    pub channel_active: Style,
    pub channel_favorite: Style,
    pub channel_event: Style,
    pub live_badge: Style,

    // -- Sidebar chrome --
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub search_input: Style,
    pub no_results: Style,

    // -- Lobby --
    pub lobby_title: Style,
    pub lobby_loader: Style,
    pub lobby_error: Style,

    // -- Player pane --
    pub player_label: Style,
    pub player_event: Style,
    pub player_loader: Style,

    // -- Notices --
    pub notice_info: Style,
    pub notice_success: Style,
    pub notice_warning: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub overlay_border: Style,
    pub overlay_title: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            channel_normal: Style::default(),
            channel_cursor: Style::default().bg(Color::DarkGray).fg(Color::White),
            channel_active: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            channel_favorite: Style::default().fg(Color::Yellow),
            channel_event: Style::default().fg(Color::Gray),
            live_badge: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),

            tab_active: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            search_input: Style::default().fg(Color::White),
            no_results: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            lobby_title: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            lobby_loader: Style::default().fg(Color::Gray),
            lobby_error: Style::default().fg(Color::Red),

            player_label: Style::default().add_modifier(Modifier::BOLD),
            player_event: Style::default().fg(Color::Gray),
            player_loader: Style::default().fg(Color::Yellow),

            notice_info: Style::default().fg(Color::Cyan),
            notice_success: Style::default().fg(Color::Green),
            notice_warning: Style::default().fg(Color::Yellow),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Red),
            overlay_border: Style::default().fg(Color::Yellow),
            overlay_title: Style::default().add_modifier(Modifier::BOLD),
        }
    }

    fn light() -> Self {
        Self {
            channel_normal: Style::default().fg(Color::Black),
            channel_cursor: Style::default().bg(Color::Blue).fg(Color::White),
            channel_active: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            channel_favorite: Style::default().fg(Color::Magenta),
            channel_event: Style::default().fg(Color::DarkGray),
            live_badge: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),

            tab_active: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            search_input: Style::default().fg(Color::Black),
            no_results: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            lobby_title: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            lobby_loader: Style::default().fg(Color::DarkGray),
            lobby_error: Style::default().fg(Color::Red),

            player_label: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            player_event: Style::default().fg(Color::DarkGray),
            player_loader: Style::default().fg(Color::Magenta),

            notice_info: Style::default().fg(Color::Blue),
            notice_success: Style::default().fg(Color::Green),
            notice_warning: Style::default().fg(Color::Magenta),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Red),
            overlay_border: Style::default().fg(Color::Magenta),
            overlay_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Tint the highlight roles with an accent color pair.
    ///
    /// Colors that fail to parse leave the base palette untouched.
    pub fn with_accent(mut self, color: &str, shadow: &str) -> Self {
        if let Some(c) = parse_hex_color(color) {
            self.channel_active = self.channel_active.fg(c);
            self.tab_active = self.tab_active.fg(c);
            self.lobby_title = self.lobby_title.fg(c);
            self.panel_border_focused = self.panel_border_focused.fg(c);
        }
        if let Some(s) = parse_hex_color(shadow) {
            self.live_badge = self.live_badge.bg(s);
        }
        self
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup used by the renderers.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_NAMES: [&str; 24] = [
    "channel_normal",
    "channel_cursor",
    "channel_active",
    "channel_favorite",
    "channel_event",
    "live_badge",
    "tab_active",
    "tab_inactive",
    "search_input",
    "no_results",
    "lobby_title",
    "lobby_loader",
    "lobby_error",
    "player_label",
    "player_event",
    "player_loader",
    "notice_info",
    "notice_success",
    "notice_warning",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "overlay_border",
    "overlay_title",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 24] = [
            p.channel_normal,
            p.channel_cursor,
            p.channel_active,
            p.channel_favorite,
            p.channel_event,
            p.live_badge,
            p.tab_active,
            p.tab_inactive,
            p.search_input,
            p.no_results,
            p.lobby_title,
            p.lobby_loader,
            p.lobby_error,
            p.player_label,
            p.player_event,
            p.player_loader,
            p.notice_info,
            p.notice_success,
            p.notice_warning,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.overlay_border,
            p.overlay_title,
        ];

        let map = ROLE_NAMES
            .iter()
            .copied()
            .zip(styles.iter().copied())
            .collect();
        Self { map }
    }

    /// Resolve a role name. Unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
