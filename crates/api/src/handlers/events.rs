//! Handlers for the `/events` resource and the public event page.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gather_core::access::{accepts_public_feedback, can_manage_event};
use gather_core::error::CoreError;
use gather_core::event::{validate_transition, EventStatus};
use gather_core::types::DbId;
use gather_db::models::event::{
    CreateEvent, Event, EventFilter, EventStatusChange, PublicEvent, UpdateEvent,
};
use gather_db::repositories::EventRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

fn event_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Event", id })
}

/// Load an event the caller owns. Missing events are 404, foreign ones 403.
async fn load_managed(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Event> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| event_not_found(id))?;
    if !can_manage_event(Some(user.user_id), event.created_by) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event owner can manage this event".into(),
        )));
    }
    Ok(event)
}

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    input.check()?;
    user.sync_profile(&state.pool).await?;

    let event = EventRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = %user.user_id, event_id = %event.id, "Event created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/events
///
/// Drafts are only listed for their owner.
pub async fn list(
    State(state): State<AppState>,
    caller: OptionalAuthUser,
    Query(mut filter): Query<EventFilter>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    filter.viewer = caller.user_id();
    let events = EventRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    caller: OptionalAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| event_not_found(id))?;

    let is_draft = event.lifecycle_status()? == EventStatus::Draft;
    if is_draft && !can_manage_event(caller.user_id(), event.created_by) {
        return Err(event_not_found(id));
    }
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<DataResponse<Event>>> {
    let current = load_managed(&state, id, &user).await?;
    input.check(&current)?;

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| event_not_found(id))?;
    tracing::info!(user_id = %user.user_id, event_id = %id, "Event updated");

    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
///
/// Cascades to the event's feedback and analytics.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_managed(&state, id, &user).await?;

    if EventRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = %user.user_id, event_id = %id, "Event deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(event_not_found(id))
    }
}

/// POST /api/v1/events/{id}/status
///
/// Applies a lifecycle transition. Re-applying the current status is a no-op.
pub async fn change_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<EventStatusChange>,
) -> AppResult<Json<DataResponse<Event>>> {
    let current = load_managed(&state, id, &user).await?;
    let next =
        validate_transition(&current.status, input.status.as_str()).map_err(CoreError::Conflict)?;

    if current.status == next.as_str() {
        return Ok(Json(DataResponse { data: current }));
    }

    let event = EventRepo::update_status(&state.pool, id, next)
        .await?
        .ok_or_else(|| event_not_found(id))?;
    tracing::info!(
        user_id = %user.user_id,
        event_id = %id,
        from = %current.status,
        to = %next,
        "Event status changed",
    );

    Ok(Json(DataResponse { data: event }))
}

/// GET /api/v1/public/events/{id}
///
/// Event details for the feedback page. Anything not open for feedback is
/// reported as unavailable.
pub async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicEvent>>> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::EventUnavailable)?;
    if !accepts_public_feedback(event.lifecycle_status()?) {
        return Err(AppError::EventUnavailable);
    }
    Ok(Json(DataResponse {
        data: PublicEvent::from(event),
    }))
}
