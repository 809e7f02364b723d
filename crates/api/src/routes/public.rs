//! Unauthenticated routes backing the attendee feedback page.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{events, feedback};
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET    /events/{id}            -> get_public
/// POST   /events/{id}/feedback   -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/{id}", get(events::get_public))
        .route("/events/{id}/feedback", post(feedback::submit))
}
