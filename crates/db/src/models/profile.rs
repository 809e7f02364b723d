//! Profile model, mirrored from identity-provider token claims.

use gather_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Claims-derived fields written on every authenticated write.
#[derive(Debug, Clone)]
pub struct UpsertProfile {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
}
