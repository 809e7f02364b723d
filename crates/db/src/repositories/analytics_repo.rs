//! Repository for the `feedback_analytics` cache table.

use gather_core::analytics::EventAnalytics;
use gather_core::types::{DbId, UserId};
use sqlx::{PgExecutor, PgPool};

use crate::models::analytics::FeedbackAnalytics;

const COLUMNS: &str = "event_id, event_title, total_feedback, avg_rating, positive_count, \
    neutral_count, negative_count, last_feedback_at, feedback_rows, refreshed_at";

/// Provides upsert and lookup for per-event aggregates.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Replace the cached aggregates of one event, computed from
    /// `feedback_rows` stored rows.
    pub async fn upsert<'e>(
        executor: impl PgExecutor<'e>,
        summary: &EventAnalytics,
        feedback_rows: i64,
    ) -> Result<FeedbackAnalytics, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback_analytics (event_id, event_title, total_feedback, avg_rating,
                 positive_count, neutral_count, negative_count, last_feedback_at, feedback_rows,
                 refreshed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
             ON CONFLICT (event_id) DO UPDATE SET
                event_title = EXCLUDED.event_title,
                total_feedback = EXCLUDED.total_feedback,
                avg_rating = EXCLUDED.avg_rating,
                positive_count = EXCLUDED.positive_count,
                neutral_count = EXCLUDED.neutral_count,
                negative_count = EXCLUDED.negative_count,
                last_feedback_at = EXCLUDED.last_feedback_at,
                feedback_rows = EXCLUDED.feedback_rows,
                refreshed_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedbackAnalytics>(&query)
            .bind(summary.event_id)
            .bind(&summary.event_title)
            .bind(summary.total_feedback)
            .bind(summary.avg_rating)
            .bind(summary.positive_count)
            .bind(summary.neutral_count)
            .bind(summary.negative_count)
            .bind(summary.last_feedback_at)
            .bind(feedback_rows)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Option<FeedbackAnalytics>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback_analytics WHERE event_id = $1");
        sqlx::query_as::<_, FeedbackAnalytics>(&query)
            .bind(event_id)
            .fetch_optional(pool)
            .await
    }

    /// Cached aggregates for every event owned by `owner`.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner: UserId,
    ) -> Result<Vec<FeedbackAnalytics>, sqlx::Error> {
        sqlx::query_as::<_, FeedbackAnalytics>(
            "SELECT a.event_id, a.event_title, a.total_feedback, a.avg_rating, a.positive_count,
                    a.neutral_count, a.negative_count, a.last_feedback_at, a.feedback_rows,
                    a.refreshed_at
             FROM feedback_analytics a
             JOIN events e ON e.id = a.event_id
             WHERE e.created_by = $1
             ORDER BY a.last_feedback_at DESC NULLS LAST",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
    }

    /// Owned events whose cached row no longer matches the live feedback
    /// row count. Events with no feedback and no cached row are not stale.
    pub async fn stale_event_ids_for_owner(
        pool: &PgPool,
        owner: UserId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT e.id
             FROM events e
             LEFT JOIN feedback_analytics a ON a.event_id = e.id
             WHERE e.created_by = $1
               AND COALESCE(a.feedback_rows, 0)
                   <> (SELECT COUNT(*) FROM feedback f WHERE f.event_id = e.id)",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
    }
}
