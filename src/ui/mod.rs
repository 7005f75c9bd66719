//! Terminal User Interface module.
//!
//! This module provides the TUI for the channel picker, including:
//! - Main event loop (`run`)
//! - Input handling for the lobby, the theater view and the search field
//! - Rendering for the lobby, sidebar and player area
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch and modal overlays
//! - `lobby` - Startup lobby with staged loader
//! - `sidebar` - Channel grid/list, search field and recents panel
//! - `theater` - Header and player area
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay
//! - `whatsnew` - Release notes overlay

mod events;
mod help;
mod input;
mod lobby;
mod loop_runner;
mod render;
mod sidebar;
mod status;
mod theater;
mod whatsnew;

// Re-export the public API
pub use loop_runner::{run, Action};
