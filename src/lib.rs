//! cinema: a terminal live-stream picker.
//!
//! Loads a channel catalog once, lets the user pick a stream from a lobby or
//! a sidebar grid/list, hands it to an external player and keeps favorites,
//! recently watched channels and UI preferences in a local SQLite database.

pub mod app;
pub mod catalog;
pub mod cinema;
pub mod config;
pub mod keybindings;
pub mod player;
pub mod preferences;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
