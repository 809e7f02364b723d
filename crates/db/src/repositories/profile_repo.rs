//! Repository for the `profiles` table.

use gather_core::types::UserId;
use sqlx::{PgExecutor, PgPool};

use crate::models::profile::{Profile, UpsertProfile};

const COLUMNS: &str = "id, email, full_name, role, created_at, updated_at";

/// Provides upsert and lookup for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert the profile or refresh its claim-derived fields.
    ///
    /// Absent claims never erase stored values.
    pub async fn upsert<'e>(
        executor: impl PgExecutor<'e>,
        input: &UpsertProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, email, full_name)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET
                email = COALESCE(EXCLUDED.email, profiles.email),
                full_name = COALESCE(EXCLUDED.full_name, profiles.full_name)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.id)
            .bind(&input.email)
            .bind(&input.full_name)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
