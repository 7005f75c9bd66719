//! Small helpers shared by the catalog loader, the player and the UI.
//!
//! - **Stream links**: scheme checks before anything is launched or copied
//! - **Text**: control-character stripping and width-aware truncation

mod text;
mod url_validator;

pub use text::{display_width, pad_to_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_stream_url, StreamUrlError};
