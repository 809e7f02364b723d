//! Handlers for feedback submission and organizer feedback views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gather_core::access::{authorize_feedback_read, submit_feedback, SubmissionRequest};
use gather_core::error::CoreError;
use gather_core::grouping::{group, respondent_label, SubmissionGroup};
use gather_core::types::DbId;
use gather_db::current_event_analytics;
use gather_db::models::analytics::FeedbackAnalytics;
use gather_db::models::feedback::{Feedback, FeedbackEntry};
use gather_db::repositories::FeedbackRepo;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Rows written by one submission.
#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub submission_id: Option<Uuid>,
    pub items: Vec<Feedback>,
}

/// One logical submission as shown to the organizer.
#[derive(Debug, Serialize)]
pub struct SubmissionView {
    /// Display name: "Anonymous", profile name, given name, "Guest" or "User".
    pub respondent: String,
    pub event_title: String,
    #[serde(flatten)]
    pub group: SubmissionGroup<FeedbackEntry>,
}

impl From<SubmissionGroup<FeedbackEntry>> for SubmissionView {
    fn from(group: SubmissionGroup<FeedbackEntry>) -> Self {
        let first = group.items.first();
        let profile_name = first.and_then(|e| e.respondent_full_name.as_deref());
        let respondent = respondent_label(&group, profile_name);
        let event_title = first.map(|e| e.event_title.clone()).unwrap_or_default();
        SubmissionView {
            respondent,
            event_title,
            group,
        }
    }
}

/// Group rows into submissions and cut one page of them.
pub(crate) fn submission_page(
    entries: Vec<FeedbackEntry>,
    offset: usize,
    limit: usize,
) -> Vec<SubmissionView> {
    group(entries)
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(SubmissionView::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/public/events/{id}/feedback
///
/// Open to guests. A missing, draft or cancelled event answers
/// "Event not available". A signed-in respondent's profile is written in the
/// same transaction as the rows, after validation.
pub async fn submit(
    State(state): State<AppState>,
    caller: OptionalAuthUser,
    Path(event_id): Path<DbId>,
    Json(input): Json<SubmissionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionReceipt>>)> {
    let mut gateway = state.feedback_gateway();
    if let Some(user) = &caller.0 {
        gateway = gateway.with_respondent(user.profile_claims());
    }

    let items = submit_feedback(
        &gateway,
        event_id,
        caller.user_id(),
        &input,
        &state.config.feedback,
    )
    .await
    .map_err(|e| AppError::from(e).on_public_route())?;

    let receipt = SubmissionReceipt {
        submission_id: items.first().and_then(|f| f.submission_id),
        items,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/events/{id}/feedback
///
/// Grouped submissions for one event, newest first. Owner only; anyone
/// else gets 404.
pub async fn list_for_event(
    State(state): State<AppState>,
    caller: OptionalAuthUser,
    Path(event_id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<SubmissionView>>>> {
    authorize_feedback_read(&state.feedback_gateway(), caller.user_id(), event_id).await?;

    let entries = FeedbackRepo::list_entries_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse {
        data: submission_page(entries, page.offset(), page.limit()),
    }))
}

/// GET /api/v1/feedback
///
/// Grouped submissions across every event the caller owns.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<SubmissionView>>>> {
    let entries = FeedbackRepo::list_entries_by_owner(&state.pool, user.user_id, None).await?;
    Ok(Json(DataResponse {
        data: submission_page(entries, page.offset(), page.limit()),
    }))
}

/// GET /api/v1/events/{id}/analytics
///
/// Cached aggregates, recomputed on demand when the cache is missing or stale.
pub async fn analytics(
    State(state): State<AppState>,
    caller: OptionalAuthUser,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<FeedbackAnalytics>>> {
    authorize_feedback_read(&state.feedback_gateway(), caller.user_id(), event_id).await?;

    let row = current_event_analytics(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;
    Ok(Json(DataResponse { data: row }))
}
