//! Route definitions for the `/events` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{events, feedback};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/status       -> change_status
/// GET    /{id}/feedback     -> list_for_event
/// GET    /{id}/analytics    -> analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list).post(events::create))
        .route(
            "/{id}",
            get(events::get_by_id)
                .put(events::update)
                .delete(events::delete),
        )
        .route("/{id}/status", post(events::change_status))
        .route("/{id}/feedback", get(feedback::list_for_event))
        .route("/{id}/analytics", get(feedback::analytics))
}
