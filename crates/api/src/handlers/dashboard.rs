//! Handler for the organizer dashboard.

use axum::extract::State;
use axum::Json;
use gather_core::analytics::{dashboard_total, mean_of_averages, top_rated, EventAnalytics};
use gather_db::refresh_stale_for_owner;
use gather_db::repositories::{AnalyticsRepo, EventRepo, FeedbackRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::feedback::{submission_page, SubmissionView};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const TOP_EVENTS: usize = 5;
const RECENT_SUBMISSIONS: usize = 5;
/// Rows fetched to build the recent list; a submission spans at most five.
const RECENT_ROW_WINDOW: i64 = 50;

/// Totals across every event the caller owns.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_events: i64,
    /// Unique submissions, not rows.
    pub total_feedback: i64,
    /// Mean of per-event average ratings.
    pub average_rating: Option<f64>,
    pub top_events: Vec<EventAnalytics>,
    pub recent_submissions: Vec<SubmissionView>,
}

/// GET /api/v1/dashboard
///
/// Stale aggregate rows are recomputed before the totals are read.
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let total_events = EventRepo::count_by_owner(&state.pool, user.user_id).await?;
    refresh_stale_for_owner(&state.pool, user.user_id).await?;

    let analytics: Vec<EventAnalytics> = AnalyticsRepo::list_by_owner(&state.pool, user.user_id)
        .await?
        .into_iter()
        .map(EventAnalytics::from)
        .collect();

    let entries =
        FeedbackRepo::list_entries_by_owner(&state.pool, user.user_id, Some(RECENT_ROW_WINDOW))
            .await?;

    let summary = DashboardSummary {
        total_events,
        total_feedback: dashboard_total(&analytics),
        average_rating: mean_of_averages(&analytics),
        recent_submissions: submission_page(entries, 0, RECENT_SUBMISSIONS),
        top_events: top_rated(analytics, TOP_EVENTS),
    };
    Ok(Json(DataResponse { data: summary }))
}
