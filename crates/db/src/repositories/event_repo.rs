//! Repository for the `events` table.

use gather_core::event::{EventStatus, DEFAULT_TARGET_AUDIENCE};
use gather_core::search::ilike_pattern;
use gather_core::types::{DbId, UserId};
use sqlx::{PgExecutor, PgPool};

use crate::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, event_type, location, start_date, end_date, \
    max_attendees, status, target_audience, image_url, created_by, created_at, updated_at";

/// Provides CRUD and lifecycle operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event owned by `created_by`, returning the created row.
    ///
    /// Status defaults to draft and target audience to "general".
    pub async fn create(
        pool: &PgPool,
        created_by: UserId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (title, description, event_type, location, start_date, end_date,
                                 max_attendees, status, target_audience, image_url, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let status = input.status.unwrap_or(EventStatus::Draft);
        let audience = input
            .target_audience
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_TARGET_AUDIENCE);
        sqlx::query_as::<_, Event>(&query)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(input.location.trim())
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.max_attendees)
            .bind(status.as_str())
            .bind(audience)
            .bind(&input.image_url)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock the event row for the rest of the caller's transaction.
    ///
    /// `FOR NO KEY UPDATE` serialises aggregate refreshes of one event without
    /// blocking feedback inserts, whose foreign-key check only takes a key
    /// share lock.
    pub async fn lock_for_refresh<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 FOR NO KEY UPDATE");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List events matching `filter`, newest start date first. Drafts are
    /// included only when they belong to `filter.viewer`.
    pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR event_type = $2)
               AND ($3::TEXT IS NULL
                    OR title ILIKE $3
                    OR description ILIKE $3
                    OR location ILIKE $3)
               AND (status <> 'draft' OR created_by = $6)
             ORDER BY start_date DESC
             LIMIT $4 OFFSET $5"
        );
        let pattern = filter.search.as_deref().and_then(ilike_pattern);
        sqlx::query_as::<_, Event>(&query)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(&filter.event_type)
            .bind(pattern)
            .bind(filter.limit())
            .bind(filter.offset())
            .bind(filter.viewer)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_owner(pool: &PgPool, owner: UserId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE created_by = $1")
            .bind(owner)
            .fetch_one(pool)
            .await
    }

    /// Whether `user_id` owns `event_id`. Missing events are not owned.
    pub async fn is_owner(
        pool: &PgPool,
        user_id: UserId,
        event_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1 AND created_by = $2)")
            .bind(event_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_type = COALESCE($4, event_type),
                location = COALESCE($5, location),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                max_attendees = COALESCE($8, max_attendees),
                target_audience = COALESCE($9, target_audience),
                image_url = COALESCE($10, image_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(input.location.as_deref().map(str::trim))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.max_attendees)
            .bind(&input.target_audience)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Set the lifecycle status. Callers validate the transition first.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: EventStatus,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("UPDATE events SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete an event and, by cascade, its feedback and analytics row.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
