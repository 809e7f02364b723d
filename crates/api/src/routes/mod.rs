pub mod events;
pub mod health;
pub mod public;

use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, feedback, profile};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                          event CRUD, lifecycle, feedback views
/// /public/events/{id}              public event page
/// /public/events/{id}/feedback     feedback submission
/// /feedback                        grouped feedback across owned events
/// /dashboard                       organizer totals
/// /me                              caller profile
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/public", public::router())
        .route("/feedback", get(feedback::list_mine))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/me", get(profile::me))
}
