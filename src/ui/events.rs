//! Application event handling.
//!
//! Background tasks (catalog fetch, player launches) report here. Every
//! event carries the generation it was started with; events from a
//! superseded load are dropped.

use crate::app::{App, AppEvent, CatalogState, PlayerState};
use crate::cinema::Notice;

/// Apply one background event to the application state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CatalogLoaded { generation, result } => {
            if generation != app.catalog_generation {
                tracing::debug!(generation, current = app.catalog_generation, "Dropping stale catalog result");
                return;
            }
            app.catalog_handle = None;

            match result {
                Ok(catalog) => {
                    tracing::info!(channels = catalog.len(), "Channel catalog loaded");
                    if catalog.is_empty() {
                        app.push_notice(Notice::warning("The channel list is empty"));
                    }
                    app.catalog_loaded(catalog);
                }
                Err(e) => {
                    tracing::error!(error = %e, source = %app.catalog_source, "Could not load channel catalog");
                    app.catalog_state = CatalogState::Failed(e.to_string());
                }
            }
        }

        AppEvent::PlayerLoaded { generation } => {
            if generation != app.player_generation {
                return;
            }
            app.player_state = PlayerState::Playing;
        }

        AppEvent::PlayerFailed { generation, error } => {
            if generation != app.player_generation {
                return;
            }
            tracing::warn!(error = %error, "Player failed to load stream");
            app.push_notice(Notice::warning(format!("Playback failed: {}", error)));
            app.player_state = PlayerState::Failed(error);
        }

        AppEvent::PlayerExited { generation, code } => {
            if generation != app.player_generation {
                return;
            }
            tracing::info!(?code, "Player exited");
            app.player_state = PlayerState::Idle;
            app.set_status("Player closed");
        }
    }
}
