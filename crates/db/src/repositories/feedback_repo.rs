//! Repository for the `feedback` table.

use gather_core::feedback::NewFeedbackRecord;
use gather_core::types::{DbId, UserId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::feedback::{Feedback, FeedbackEntry};

const COLUMNS: &str = "id, event_id, user_id, name, is_anonymous, submission_id, category, \
    rating, comment, sentiment, created_at, updated_at";

/// Feedback columns qualified with the `f` alias, plus the joined listing
/// fields.
const ENTRY_COLUMNS: &str = "f.id, f.event_id, f.user_id, f.name, f.is_anonymous, \
    f.submission_id, f.category, f.rating, f.comment, f.sentiment, f.created_at, f.updated_at, \
    e.title AS event_title, p.full_name AS respondent_full_name";

/// Provides insert and listing operations for feedback rows.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert every row of one submission inside a single transaction.
    ///
    /// Any failure rolls back the whole batch.
    pub async fn insert_submission(
        pool: &PgPool,
        records: &[NewFeedbackRecord],
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let results = Self::insert_rows(&mut *tx, records).await?;
        tx.commit().await?;
        Ok(results)
    }

    /// Insert rows on a connection the caller controls, usually an open
    /// transaction.
    ///
    /// Rows are inserted in input order, so `seq` follows the input and all
    /// rows share the transaction's `NOW()` timestamp.
    pub async fn insert_rows(
        conn: &mut PgConnection,
        records: &[NewFeedbackRecord],
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let mut results = Vec::with_capacity(records.len());

        let query = format!(
            "INSERT INTO feedback (event_id, user_id, name, is_anonymous, submission_id,
                                   category, rating, comment, sentiment)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );

        for record in records {
            let row = sqlx::query_as::<_, Feedback>(&query)
                .bind(record.event_id)
                .bind(record.user_id)
                .bind(&record.name)
                .bind(record.is_anonymous)
                .bind(record.submission_id)
                .bind(record.category.as_str())
                .bind(record.rating)
                .bind(&record.comment)
                .bind(record.sentiment.as_str())
                .fetch_one(&mut *conn)
                .await?;
            results.push(row);
        }

        Ok(results)
    }

    /// All rows of one event in insertion order.
    pub async fn list_for_event<'e>(
        executor: impl PgExecutor<'e>,
        event_id: DbId,
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback WHERE event_id = $1 ORDER BY created_at, seq"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(event_id)
            .fetch_all(executor)
            .await
    }

    pub async fn count_for_event(pool: &PgPool, event_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(pool)
            .await
    }

    /// Rows of one event with listing fields, newest submission first and
    /// insertion order within a submission.
    pub async fn list_entries_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<FeedbackEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS}
             FROM feedback f
             JOIN events e ON e.id = f.event_id
             LEFT JOIN profiles p ON p.id = f.user_id
             WHERE f.event_id = $1
             ORDER BY f.created_at DESC, f.seq"
        );
        sqlx::query_as::<_, FeedbackEntry>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Rows across every event owned by `owner`, ordered like
    /// [`Self::list_entries_by_event`].
    ///
    /// `limit` caps rows, not submissions; callers group afterwards.
    pub async fn list_entries_by_owner(
        pool: &PgPool,
        owner: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<FeedbackEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS}
             FROM feedback f
             JOIN events e ON e.id = f.event_id
             LEFT JOIN profiles p ON p.id = f.user_id
             WHERE e.created_by = $1
             ORDER BY f.created_at DESC, f.seq
             LIMIT $2"
        );
        sqlx::query_as::<_, FeedbackEntry>(&query)
            .bind(owner)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
