//! SQLite-backed preference storage.

mod preferences;
mod schema;
mod types;

pub use schema::Database;
pub use types::DatabaseError;
