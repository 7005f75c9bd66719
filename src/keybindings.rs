//! Keybinding registry: maps actions to key events, with config overrides.
//!
//! Bindings are looked up per context first and fall back to `Global`, so
//! the same key can mean different things in the lobby, the channel panel
//! and the search field.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NavLeft,
    NavRight,
    Select,
    Back,
    CycleFocus,
    SwitchView,
    ToggleFavorite,
    ClearFavorites,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    ToggleCategory,
    ContextMenu,
    CopyStream,
    ToggleMute,
    VolumeUp,
    VolumeDown,
    ToggleTheater,
    ToggleDarkMode,
    CycleAccent,
    Reload,
    ShowWhatsNew,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Move down",
            Self::NavUp => "Move up",
            Self::NavLeft => "Move left (grid)",
            Self::NavRight => "Move right (grid)",
            Self::Select => "Play channel",
            Self::Back => "Dismiss / back",
            Self::CycleFocus => "Switch between channels and recents",
            Self::SwitchView => "Switch grid / list view",
            Self::ToggleFavorite => "Toggle favorite",
            Self::ClearFavorites => "Clear all favorites",
            Self::EnterSearch => "Search channels",
            Self::ExitSearch => "Clear search",
            Self::CommitSearch => "Keep search and return",
            Self::ToggleCategory => "Toggle all / favorites filter",
            Self::ContextMenu => "Channel menu",
            Self::CopyStream => "Copy current stream link",
            Self::ToggleMute => "Mute / unmute",
            Self::VolumeUp => "Volume up",
            Self::VolumeDown => "Volume down",
            Self::ToggleTheater => "Theater mode",
            Self::ToggleDarkMode => "Toggle dark mode",
            Self::CycleAccent => "Cycle accent color",
            Self::Reload => "Reload stream / retry catalog",
            Self::ShowWhatsNew => "Show what's new",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Lobby,
    Channels,
    Recents,
    Search,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Lobby => "Lobby",
            Self::Channels => "Channels",
            Self::Recents => "Recents",
            Self::Search => "Search",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Terminals disagree on whether `X` arrives with SHIFT set. The case
    /// of the char already carries it, so drop the flag for char keys.
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) => Self::new(self.code, self.modifiers - KeyModifiers::SHIFT),
            _ => self,
        }
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Accepts single chars (`q`, `/`), named keys (`Enter`, `Esc`, `Tab`,
/// arrows, `Backspace`, `Space`), `Ctrl+<char>` and `F1`..`F12`.
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Context-aware keybinding table with config overrides.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Insertion-ordered, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        let key = key.normalized();
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;

        // === Global ===
        let global = [
            (KeySpec::ch('q'), Quit),
            (KeySpec::ch('j'), NavDown),
            (KeySpec::plain(KeyCode::Down), NavDown),
            (KeySpec::ch('k'), NavUp),
            (KeySpec::plain(KeyCode::Up), NavUp),
            (KeySpec::plain(KeyCode::Enter), Select),
            (KeySpec::plain(KeyCode::Esc), Back),
            (KeySpec::ch('r'), Reload),
            (KeySpec::ch('d'), ToggleDarkMode),
            (KeySpec::ch('a'), CycleAccent),
            (KeySpec::ch('w'), ShowWhatsNew),
            (KeySpec::ch('?'), ShowHelp),
        ];
        for (key, action) in global {
            self.bind(Context::Global, key, action);
        }

        // === Channel panel (theater view) ===
        let channels = [
            (KeySpec::ch('h'), NavLeft),
            (KeySpec::plain(KeyCode::Left), NavLeft),
            (KeySpec::ch('l'), NavRight),
            (KeySpec::plain(KeyCode::Right), NavRight),
            (KeySpec::plain(KeyCode::Tab), CycleFocus),
            (KeySpec::ch('v'), SwitchView),
            (KeySpec::ch('f'), ToggleFavorite),
            (KeySpec::ch('X'), ClearFavorites),
            (KeySpec::ch('/'), EnterSearch),
            (KeySpec::ch('c'), ToggleCategory),
            (KeySpec::ch('o'), ContextMenu),
            (KeySpec::ch('y'), CopyStream),
            (KeySpec::ch('m'), ToggleMute),
            (KeySpec::ch('+'), VolumeUp),
            (KeySpec::ch('='), VolumeUp),
            (KeySpec::ch('-'), VolumeDown),
            (KeySpec::ch('t'), ToggleTheater),
        ];
        for (key, action) in channels {
            self.bind(Context::Channels, key, action);
        }

        // === Recents panel ===
        let recents = [
            (KeySpec::plain(KeyCode::Tab), CycleFocus),
            (KeySpec::ch('y'), CopyStream),
            (KeySpec::ch('m'), ToggleMute),
            (KeySpec::ch('+'), VolumeUp),
            (KeySpec::ch('-'), VolumeDown),
            (KeySpec::ch('t'), ToggleTheater),
        ];
        for (key, action) in recents {
            self.bind(Context::Recents, key, action);
        }

        // === Search field ===
        self.bind(Context::Search, KeySpec::plain(KeyCode::Esc), ExitSearch);
        self.bind(Context::Search, KeySpec::plain(KeyCode::Enter), CommitSearch);
    }

    /// Apply user overrides (action name -> key string).
    ///
    /// The new key replaces every default key of that action, in every
    /// context the action was bound in. Returns warnings for unknown action
    /// names and unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first, then `Global`.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers).normalized();

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        // Search captures text; only its own bindings apply there.
        if context != Context::Global && context != Context::Search {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// First key bound to `action` in `context` (or Global), for hints.
    pub fn key_hint(&self, action: Action, context: Context) -> Option<String> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *a == action && (*c == context || *c == Context::Global))
            .map(|(_, key, _)| format_key(key))
    }

    /// All bindings as (context, key display, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    let action = match name.to_lowercase().replace('-', "_").as_str() {
        "quit" => Action::Quit,
        "nav_down" | "down" => Action::NavDown,
        "nav_up" | "up" => Action::NavUp,
        "nav_left" | "left" => Action::NavLeft,
        "nav_right" | "right" => Action::NavRight,
        "select" | "play" => Action::Select,
        "back" => Action::Back,
        "cycle_focus" | "focus" => Action::CycleFocus,
        "switch_view" | "view" => Action::SwitchView,
        "toggle_favorite" | "favorite" => Action::ToggleFavorite,
        "clear_favorites" => Action::ClearFavorites,
        "enter_search" | "search" => Action::EnterSearch,
        "exit_search" => Action::ExitSearch,
        "commit_search" => Action::CommitSearch,
        "toggle_category" | "category" => Action::ToggleCategory,
        "context_menu" | "menu" => Action::ContextMenu,
        "copy_stream" | "copy" => Action::CopyStream,
        "toggle_mute" | "mute" => Action::ToggleMute,
        "volume_up" => Action::VolumeUp,
        "volume_down" => Action::VolumeDown,
        "toggle_theater" | "theater" => Action::ToggleTheater,
        "toggle_dark_mode" | "dark_mode" => Action::ToggleDarkMode,
        "cycle_accent" | "accent" => Action::CycleAccent,
        "reload" | "retry" => Action::Reload,
        "show_whats_new" | "whats_new" => Action::ShowWhatsNew,
        "show_help" | "help" => Action::ShowHelp,
        _ => return None,
    };
    Some(action)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_keys_reach_channels() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Channels),
            Some(Action::Quit)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Down, KeyModifiers::NONE, Context::Lobby),
            Some(Action::NavDown)
        );
    }

    #[test]
    fn test_channel_keys_not_in_lobby() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('f'), KeyModifiers::NONE, Context::Channels),
            Some(Action::ToggleFavorite)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('f'), KeyModifiers::NONE, Context::Lobby),
            None
        );
    }

    #[test]
    fn test_search_context_is_isolated() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Search),
            Some(Action::ExitSearch)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::Search),
            Some(Action::CommitSearch)
        );
        // Typing 'q' into the search box must not quit
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Search),
            None
        );
    }

    #[test]
    fn test_shifted_char_matches() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('X'), KeyModifiers::SHIFT, Context::Channels),
            Some(Action::ClearFavorites)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('X'), KeyModifiers::NONE, Context::Channels),
            Some(Action::ClearFavorites)
        );
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("quit".to_string(), "Ctrl+q".to_string())]);

        assert!(reg.apply_overrides(&overrides).is_empty());
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_override_keeps_all_contexts() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("copy".to_string(), "Y".to_string())]);
        assert!(reg.apply_overrides(&overrides).is_empty());

        for ctx in [Context::Channels, Context::Recents] {
            assert_eq!(
                reg.action_for_key(KeyCode::Char('Y'), KeyModifiers::SHIFT, ctx),
                Some(Action::CopyStream)
            );
            assert_eq!(
                reg.action_for_key(KeyCode::Char('y'), KeyModifiers::NONE, ctx),
                None
            );
        }
    }

    #[test]
    fn test_apply_overrides_warnings() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([
            ("nonexistent_action".to_string(), "q".to_string()),
            ("mute".to_string(), "Ctrl+Alt+Shift+M".to_string()),
        ]);

        let mut warnings = reg.apply_overrides(&overrides);
        warnings.sort();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Cannot parse key"));
        assert!(warnings[1].contains("Unknown action"));
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(parse_key_string("Enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("space"), Some(KeySpec::ch(' ')));
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("/"), Some(KeySpec::ch('/')));
        assert_eq!(parse_key_string("ab"), None);
        assert_eq!(parse_key_string("F"), Some(KeySpec::ch('F')));
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::ch('q')), "q");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::ch(' ')), "Space");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::F(5))), "F5");
    }

    #[test]
    fn test_key_hint() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.key_hint(Action::Reload, Context::Lobby).as_deref(),
            Some("r")
        );
        assert_eq!(
            reg.key_hint(Action::ToggleFavorite, Context::Channels).as_deref(),
            Some("f")
        );
    }
}
