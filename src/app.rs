use crate::catalog::{self, CatalogError, CatalogSource, ChannelCatalog};
use crate::cinema::{
    keys, Category, Cinema, ConfirmPrompt, Confirmed, Deferred, FavoriteOutcome, Notice,
    NoticeKind, PreferenceStore, RecentEntry, Surface,
};
use crate::config::Config;
use crate::keybindings::KeybindingRegistry;
use crate::player::PlayerSurface;
use crate::preferences::PreferenceManager;
use crate::storage::Database;
use crate::theme::{Accent, StyleMap, ThemeVariant};
use anyhow::Result;
use ratatui::style::Style;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Version recorded under `appVersion`; a change shows the what's-new overlay.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long a notice stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Volume change per key press, in percent.
pub const VOLUME_STEP: u8 = 10;

// ============================================================================
// Views and Focus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Startup screen with the staged loader and the lobby channel list.
    Lobby,
    /// Player area plus the channel sidebar.
    Theater,
}

/// Which sidebar panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Channels,
    Recents,
}

// ============================================================================
// Lobby
// ============================================================================

/// Staged loader text shown while the lobby warms up.
///
/// Channel choice stays disabled until `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LobbyStage {
    Initializing,
    LoadingComponents,
    Connecting,
    Ready,
}

impl LobbyStage {
    pub fn at(elapsed: Duration) -> Self {
        match elapsed.as_millis() {
            0..=1499 => Self::Initializing,
            1500..=2499 => Self::LoadingComponents,
            2500..=3499 => Self::Connecting,
            _ => Self::Ready,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Initializing => "Initializing...",
            Self::LoadingComponents => "Loading components...",
            Self::Connecting => "Connecting...",
            Self::Ready => "Ready",
        }
    }
}

/// Catalog fetch progress. A failure halts the lobby until a manual retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    Loading,
    Failed(String),
    Ready,
}

/// What the player area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    /// Launch in flight; the loader stays up until the launcher reports back.
    Loading,
    Playing,
    Failed(String),
}

// ============================================================================
// Context Menu State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuItem {
    Play,
    ToggleFavorite,
    CopyLink,
}

pub const CONTEXT_MENU_ITEMS: [ContextMenuItem; 3] = [
    ContextMenuItem::Play,
    ContextMenuItem::ToggleFavorite,
    ContextMenuItem::CopyLink,
];

impl ContextMenuItem {
    pub fn label(self, favorited: bool) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::ToggleFavorite if favorited => "Remove from favorites",
            Self::ToggleFavorite => "Add to favorites",
            Self::CopyLink => "Copy stream link",
        }
    }
}

/// Popup menu for one channel of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuState {
    pub channel_id: String,
    pub channel_name: String,
    /// Surface the menu was opened on, used as the selection origin for Play.
    pub origin: Surface,
    pub selected: usize,
}

// ============================================================================
// Background Events
// ============================================================================

/// Events from background tasks
pub enum AppEvent {
    CatalogLoaded {
        generation: u64,
        result: Result<ChannelCatalog, CatalogError>,
    },
    /// The launcher reported success; dismiss the loader.
    PlayerLoaded { generation: u64 },
    PlayerFailed { generation: u64, error: String },
    /// A player that had loaded has since exited.
    PlayerExited { generation: u64, code: Option<i32> },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub db: Database,
    pub http_client: reqwest::Client,

    /// Channel state and preferences. Preferences live in the controller's
    /// store so every mutation lands in one place.
    pub cinema: Cinema<PreferenceManager>,

    // Catalog
    pub catalog_source: CatalogSource,
    pub catalog_state: CatalogState,
    /// Incremented per load so a superseded fetch result is dropped.
    pub catalog_generation: u64,
    pub catalog_handle: Option<JoinHandle<()>>,
    /// The last preference flush failed and the warning was shown.
    pub save_failed: bool,

    // Player
    pub player: PlayerSurface,
    pub player_state: PlayerState,
    pub player_generation: u64,
    /// 0-100. Zero means muted.
    pub volume: u8,
    /// Volume restored by unmute.
    pub volume_before_mute: u8,
    /// Sidebar hidden.
    pub theater_mode: bool,

    // Theme
    pub theme_variant: ThemeVariant,
    pub accent: Accent,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // UI State
    pub view: View,
    pub focus: Focus,
    /// Sidebar tab (grid or list).
    pub surface: Surface,
    pub lobby_started: Instant,
    pub lobby_cursor: usize,
    /// Index into the visible entries of `surface`.
    pub channel_cursor: usize,
    pub recents_cursor: usize,
    /// Columns of the channel grid at the last render.
    pub grid_columns: usize,

    // Search
    pub search_mode: bool,
    pub search_input: String,

    /// Last key press, for hiding the header and status bar when idle.
    pub last_input_time: Instant,
    /// `None` disables idle hiding.
    pub idle_hide_after: Option<Duration>,
    /// Chrome visibility at the last render, to redraw when it flips.
    pub chrome_shown: bool,

    pub status_message: Option<(Notice, Instant)>,

    pub show_whats_new: bool,
    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// Pending yes/no question. Input is routed to the confirmation handler while set.
    pub pending_confirm: Option<ConfirmPrompt>,
    pub context_menu: Option<ContextMenuState>,

    /// Frame counter for the loader animations.
    pub spinner_frame: usize,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        db: Database,
        config: &Config,
        prefs: PreferenceManager,
        catalog_source: CatalogSource,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("cinema/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&prefs.keybinding_overrides()) {
            tracing::warn!("{}", warning);
        }

        let theme_variant = prefs.theme_variant();
        let (color, shadow) = prefs.accent();
        let accent = Accent::by_color(&color).unwrap_or_default();
        let theme = StyleMap::from_palette(&theme_variant.palette().with_accent(&color, &shadow));
        let surface = prefs.last_view();
        let show_whats_new = prefs.app_version() != Some(APP_VERSION);

        let mut cinema = Cinema::new(ChannelCatalog::default(), prefs);
        if show_whats_new {
            // Recorded as soon as the notice is shown, not when dismissed.
            cinema.store_mut().set(keys::APP_VERSION, APP_VERSION);
        }

        Ok(Self {
            db,
            http_client,
            cinema,
            catalog_source,
            catalog_state: CatalogState::Loading,
            catalog_generation: 0,
            catalog_handle: None,
            save_failed: false,
            player: PlayerSurface::new(config.player_command.clone()),
            player_state: PlayerState::Idle,
            player_generation: 0,
            volume: 100,
            volume_before_mute: 100,
            theater_mode: false,
            theme_variant,
            accent,
            theme,
            keybindings,
            view: View::Lobby,
            focus: Focus::Channels,
            surface,
            lobby_started: Instant::now(),
            lobby_cursor: 0,
            channel_cursor: 0,
            recents_cursor: 0,
            grid_columns: 1,
            search_mode: false,
            search_input: String::new(),
            last_input_time: Instant::now(),
            idle_hide_after: (config.idle_hide_secs > 0)
                .then(|| Duration::from_secs(config.idle_hide_secs)),
            chrome_shown: true,
            status_message: None,
            show_whats_new,
            show_help: false,
            help_scroll_offset: 0,
            pending_confirm: None,
            context_menu: None,
            spinner_frame: 0,
            needs_redraw: true,
        })
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    fn rebuild_theme(&mut self) {
        let palette = self
            .theme_variant
            .palette()
            .with_accent(self.accent.color, self.accent.shadow);
        self.theme = StyleMap::from_palette(&palette);
        self.needs_redraw = true;
    }

    /// Flip dark mode and persist `darkMode`. Returns the new variant's name.
    pub fn toggle_dark_mode(&mut self) -> &'static str {
        self.theme_variant = self.theme_variant.next();
        self.cinema
            .store_mut()
            .set(keys::DARK_MODE, self.theme_variant.dark_mode_flag());
        self.rebuild_theme();
        self.theme_variant.name()
    }

    /// Move to the next accent swatch and persist `themeColor`/`themeShadow`.
    pub fn cycle_accent(&mut self) -> &'static str {
        self.accent = self.accent.next();
        let store = self.cinema.store_mut();
        store.set(keys::THEME_COLOR, self.accent.color);
        store.set(keys::THEME_SHADOW, self.accent.shadow);
        self.rebuild_theme();
        self.accent.name
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetch the catalog in the background. Any earlier fetch is abandoned.
    pub fn spawn_catalog_load(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        if let Some(handle) = self.catalog_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous catalog load");
        }

        self.catalog_generation = self.catalog_generation.wrapping_add(1);
        let generation = self.catalog_generation;
        self.catalog_state = CatalogState::Loading;
        self.lobby_started = Instant::now();

        let client = self.http_client.clone();
        let source = self.catalog_source.clone();
        let tx = event_tx.clone();

        tracing::info!(source = %source, generation, "Loading channel catalog");

        self.catalog_handle = Some(tokio::spawn(async move {
            let result = catalog::load(&client, &source).await;
            if let Err(e) = tx.send(AppEvent::CatalogLoaded { generation, result }).await {
                tracing::warn!(error = %e, event = "CatalogLoaded", "Channel send failed (receiver dropped)");
            }
        }));
    }

    /// Install a freshly loaded catalog and place the lobby cursor on the
    /// previous session's channel.
    pub fn catalog_loaded(&mut self, catalog: ChannelCatalog) {
        self.cinema.load_catalog(catalog);
        self.catalog_state = CatalogState::Ready;

        self.lobby_cursor = self
            .cinema
            .last_channel_id()
            .and_then(|id| self.visible_position(Surface::Lobby, &id))
            .unwrap_or(0);
        self.clamp_selections();
    }

    pub fn lobby_stage(&self) -> LobbyStage {
        LobbyStage::at(self.lobby_started.elapsed())
    }

    /// The lobby accepts a channel pick.
    pub fn lobby_ready(&self) -> bool {
        self.catalog_state == CatalogState::Ready && self.lobby_stage() == LobbyStage::Ready
    }

    // ========================================================================
    // Selection and Navigation
    // ========================================================================

    fn visible_position(&self, surface: Surface, id: &str) -> Option<usize> {
        self.cinema
            .entries(surface)
            .filter(|v| v.visible)
            .position(|v| v.entry.id == id)
    }

    fn visible_count(&self, surface: Surface) -> usize {
        self.cinema.report().visible(surface)
    }

    /// Id of the channel under the cursor of the focused panel.
    pub fn selected_channel_id(&self) -> Option<String> {
        match (self.view, self.focus) {
            (View::Lobby, _) => self.visible_id_at(Surface::Lobby, self.lobby_cursor),
            (View::Theater, Focus::Channels) => self.visible_id_at(self.surface, self.channel_cursor),
            (View::Theater, Focus::Recents) => self
                .cinema
                .recents_snapshot()
                .get(self.recents_cursor)
                .map(|r| r.id.clone()),
        }
    }

    fn visible_id_at(&self, surface: Surface, cursor: usize) -> Option<String> {
        self.cinema
            .entries(surface)
            .filter(|v| v.visible)
            .nth(cursor)
            .map(|v| v.entry.id.clone())
    }

    /// Surface a pick from the focused panel originates from.
    pub fn selection_origin(&self) -> Surface {
        match (self.view, self.focus) {
            (View::Lobby, _) => Surface::Lobby,
            // Recents rows are list renderings.
            (View::Theater, Focus::Recents) => Surface::List,
            (View::Theater, Focus::Channels) => self.surface,
        }
    }

    pub fn recents(&self) -> &[RecentEntry] {
        self.cinema.recents_snapshot()
    }

    fn cursor_mut(&mut self) -> (&mut usize, usize) {
        match (self.view, self.focus) {
            (View::Lobby, _) => {
                let len = self.visible_count(Surface::Lobby);
                (&mut self.lobby_cursor, len)
            }
            (View::Theater, Focus::Channels) => {
                let len = self.visible_count(self.surface);
                (&mut self.channel_cursor, len)
            }
            (View::Theater, Focus::Recents) => {
                let len = self.cinema.recents_snapshot().len();
                (&mut self.recents_cursor, len)
            }
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = self.cursor_mut();
        if len == 0 {
            *cursor = 0;
            return;
        }
        let target = cursor.saturating_add_signed(delta);
        // Grid moves that would leave the grid stay put instead of clamping to a corner.
        if delta.unsigned_abs() > 1 && (target >= len || (delta < 0 && *cursor < delta.unsigned_abs())) {
            return;
        }
        *cursor = target.min(len - 1);
    }

    fn row_step(&self) -> isize {
        let on_grid = self.view == View::Theater
            && self.focus == Focus::Channels
            && self.surface == Surface::Grid;
        if on_grid {
            self.grid_columns.max(1) as isize
        } else {
            1
        }
    }

    pub fn nav_down(&mut self) {
        let step = self.row_step();
        self.move_cursor(step);
    }

    pub fn nav_up(&mut self) {
        let step = self.row_step();
        self.move_cursor(-step);
    }

    /// Horizontal moves only apply to the grid.
    pub fn nav_left(&mut self) {
        if self.row_step() > 1 {
            self.move_cursor(-1);
        }
    }

    pub fn nav_right(&mut self) {
        if self.row_step() > 1 {
            self.move_cursor(1);
        }
    }

    /// Keep every cursor inside its (possibly filtered) list.
    pub fn clamp_selections(&mut self) {
        let lobby = self.visible_count(Surface::Lobby);
        let channels = self.visible_count(self.surface);
        let recents = self.cinema.recents_snapshot().len();

        self.lobby_cursor = self.lobby_cursor.min(lobby.saturating_sub(1));
        self.channel_cursor = self.channel_cursor.min(channels.saturating_sub(1));
        self.recents_cursor = self.recents_cursor.min(recents.saturating_sub(1));
        if recents == 0 && self.focus == Focus::Recents {
            self.focus = Focus::Channels;
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Channels if !self.cinema.recents_snapshot().is_empty() => Focus::Recents,
            _ => Focus::Channels,
        };
    }

    /// Switch the sidebar between grid and list and persist `lastView`.
    pub fn switch_surface(&mut self) {
        let current = self.selected_channel_id();
        self.surface = match self.surface {
            Surface::Grid => Surface::List,
            _ => Surface::Grid,
        };
        self.cinema.store_mut().set(keys::LAST_VIEW, self.surface.as_str());

        if let Some(pos) = current.and_then(|id| self.visible_position(self.surface, &id)) {
            self.channel_cursor = pos;
        }
        self.clamp_selections();
    }

    /// Make `id` active and hand its stream to the player.
    pub fn play_channel(&mut self, id: &str, origin: Surface, event_tx: &mpsc::Sender<AppEvent>) {
        let Some(active) = self.cinema.select(id, origin) else {
            tracing::debug!(id, "Ignoring pick of unknown channel");
            return;
        };
        let stream = active.stream.clone();
        let name = active.name.clone();

        self.view = View::Theater;
        self.player_generation = self.player_generation.wrapping_add(1);
        self.player_state = PlayerState::Loading;

        let tx = event_tx.clone();
        if let Err(e) = self
            .player
            .launch(&stream, self.volume, self.player_generation, tx)
        {
            tracing::warn!(id, error = %e, "Player launch failed");
            self.player_state = PlayerState::Failed(e.to_string());
            self.push_notice(Notice::warning(format!("Cannot play '{}': {}", name, e)));
        }

        self.drain_cinema_notices();
        self.clamp_selections();
    }

    /// Re-trigger the load of the active channel.
    pub fn reload_active(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        match self.cinema.active().map(|a| a.id.clone()) {
            Some(id) => self.play_channel(&id, Surface::Grid, event_tx),
            None => self.push_notice(Notice::warning("No active stream to reload")),
        }
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Toggle a favorite. Removal asks for confirmation through the y/n overlay.
    pub fn toggle_favorite(&mut self, id: &str) {
        let mut deferred = Deferred::default();
        let outcome = self.cinema.toggle_favorite(id, &mut deferred);
        if outcome == FavoriteOutcome::Declined {
            self.pending_confirm = deferred.prompt;
        }
        self.after_favorites_change();
    }

    pub fn request_clear_favorites(&mut self) {
        if self.cinema.favorites().is_empty() {
            self.push_notice(Notice::info("No favorites to clear"));
            return;
        }
        let mut deferred = Deferred::default();
        self.cinema.clear_favorites(&mut deferred);
        self.pending_confirm = deferred.prompt;
    }

    /// Answer the pending confirmation.
    pub fn resolve_confirm(&mut self, accepted: bool) {
        let Some(prompt) = self.pending_confirm.take() else {
            return;
        };
        if !accepted {
            tracing::debug!(?prompt, "Confirmation declined");
            return;
        }

        match &prompt {
            ConfirmPrompt::RemoveFavorite { id, .. } => {
                self.cinema.toggle_favorite(id, &mut Confirmed);
            }
            ConfirmPrompt::ClearFavorites { .. } => {
                self.cinema.clear_favorites(&mut Confirmed);
            }
        }
        self.after_favorites_change();
    }

    fn after_favorites_change(&mut self) {
        self.drain_cinema_notices();
        self.clamp_selections();
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.search_input = self.cinema.filter().query().to_string();
    }

    pub fn search_push(&mut self, c: char) {
        self.search_input.push(c);
        self.apply_search();
    }

    pub fn search_pop(&mut self) {
        self.search_input.pop();
        self.apply_search();
    }

    /// Empty the field but stay in search mode.
    pub fn search_clear(&mut self) {
        self.search_input.clear();
        self.apply_search();
    }

    /// Leave search mode. `clear` also empties the query.
    pub fn exit_search(&mut self, clear: bool) {
        self.search_mode = false;
        if clear {
            self.search_input.clear();
            self.apply_search();
        }
    }

    fn apply_search(&mut self) {
        self.cinema.set_query(&self.search_input);
        // The controller caps the query; keep the field in sync.
        if self.search_input != self.cinema.filter().query() {
            self.search_input = self.cinema.filter().query().to_string();
        }
        self.channel_cursor = 0;
        self.clamp_selections();
    }

    pub fn toggle_category(&mut self) -> Category {
        let next = self.cinema.filter().category.toggled();
        self.cinema.set_category(next);
        self.channel_cursor = 0;
        self.clamp_selections();
        next
    }

    // ========================================================================
    // Context Menu
    // ========================================================================

    pub fn open_context_menu(&mut self) {
        if self.view != View::Theater || self.focus != Focus::Channels {
            return;
        }
        let Some(id) = self.selected_channel_id() else {
            return;
        };
        let Some(channel) = self.cinema.catalog().get(&id) else {
            return;
        };
        self.context_menu = Some(ContextMenuState {
            channel_name: channel.name.clone(),
            channel_id: id,
            origin: self.surface,
            selected: 0,
        });
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    /// Copy the active channel's stream link.
    pub fn copy_current_stream(&mut self) {
        match self.cinema.active().map(|a| a.stream.clone()) {
            Some(stream) => self.copy_stream(&stream, "Current stream link copied"),
            None => self.push_notice(Notice::warning("No active stream to copy")),
        }
    }

    pub fn copy_stream(&mut self, stream: &str, success: &str) {
        match copy_to_clipboard(stream) {
            Ok(()) => self.push_notice(Notice::success(success)),
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard write failed");
                self.push_notice(Notice::warning(format!("Could not copy: {}", e)));
            }
        }
    }

    // ========================================================================
    // Player Chrome
    // ========================================================================

    pub fn is_muted(&self) -> bool {
        self.volume == 0
    }

    pub fn toggle_mute(&mut self) {
        if self.is_muted() {
            self.volume = self.volume_before_mute.max(VOLUME_STEP);
        } else {
            self.volume_before_mute = self.volume;
            self.volume = 0;
        }
    }

    pub fn volume_up(&mut self) {
        self.volume = self.volume.saturating_add(VOLUME_STEP).min(100);
    }

    pub fn volume_down(&mut self) {
        self.volume = self.volume.saturating_sub(VOLUME_STEP);
    }

    pub fn toggle_theater(&mut self) {
        self.theater_mode = !self.theater_mode;
        if self.theater_mode {
            self.search_mode = false;
        }
    }

    /// Header and status bar are shown. They hide after a stretch without
    /// input while a stream is on screen.
    pub fn chrome_visible(&self) -> bool {
        let Some(after) = self.idle_hide_after else {
            return true;
        };
        if self.view == View::Lobby || self.has_overlay() || self.search_mode {
            return true;
        }
        self.last_input_time.elapsed() < after
    }

    pub fn has_overlay(&self) -> bool {
        self.show_help
            || self.show_whats_new
            || self.pending_confirm.is_some()
            || self.context_menu.is_some()
    }

    pub fn dismiss_whats_new(&mut self) {
        self.show_whats_new = false;
    }

    // ========================================================================
    // Status and Persistence
    // ========================================================================

    /// Set an info status message (expires after [`NOTICE_TTL`]).
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.push_notice(Notice::info(msg));
    }

    pub fn push_notice(&mut self, notice: Notice) {
        if notice.kind == NoticeKind::Warning {
            tracing::debug!(message = %notice.message, "Warning notice");
        }
        self.status_message = Some((notice, Instant::now()));
        self.needs_redraw = true;
    }

    /// Move controller notices to the status bar. The newest one wins.
    pub fn drain_cinema_notices(&mut self) {
        if let Some(notice) = self.cinema.take_notices().pop() {
            self.push_notice(notice);
        }
    }

    /// Clear status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= NOTICE_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Write queued preference changes. Failures keep the queue for the
    /// next attempt. The warning is shown once per run of failures.
    pub async fn flush_preferences(&mut self) {
        if self.cinema.store().pending_writes() == 0 {
            return;
        }
        match self.cinema.store_mut().flush(&self.db).await {
            Ok(_) => self.save_failed = false,
            Err(e) if self.save_failed => {
                tracing::debug!(error = %e, "Preferences still not saved");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist preferences");
                self.save_failed = true;
                self.push_notice(Notice::warning("Could not save preferences"));
            }
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_string()))
}

// ============================================================================
// Resource Cleanup
// ============================================================================

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.catalog_handle.take() {
            handle.abort();
            tracing::debug!("Aborted catalog load task on App drop");
        }
        self.player.stop();
    }
}
