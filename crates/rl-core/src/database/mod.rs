//! Referer database: definition schema, validation, and domain lookup

pub mod loader;
pub mod schema;

pub use loader::{CorruptDatabaseError, RefererDatabase};
pub use schema::{RawDefinition, RawSource};
