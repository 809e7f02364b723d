//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the entity is writable

pub mod analytics;
pub mod event;
pub mod feedback;
pub mod profile;
