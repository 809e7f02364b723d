//! Per-event feedback aggregate cache.

use gather_core::analytics::EventAnalytics;
use gather_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `feedback_analytics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackAnalytics {
    pub event_id: DbId,
    pub event_title: String,
    pub total_feedback: i64,
    pub avg_rating: Option<f64>,
    pub positive_count: i64,
    pub neutral_count: i64,
    pub negative_count: i64,
    pub last_feedback_at: Option<Timestamp>,
    /// Rows the aggregates were computed from.
    pub feedback_rows: i64,
    pub refreshed_at: Timestamp,
}

impl From<FeedbackAnalytics> for EventAnalytics {
    fn from(row: FeedbackAnalytics) -> Self {
        EventAnalytics {
            event_id: row.event_id,
            event_title: row.event_title,
            total_feedback: row.total_feedback,
            avg_rating: row.avg_rating,
            positive_count: row.positive_count,
            neutral_count: row.neutral_count,
            negative_count: row.negative_count,
            last_feedback_at: row.last_feedback_at,
        }
    }
}
