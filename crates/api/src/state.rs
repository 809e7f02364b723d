use std::sync::Arc;

use gather_db::PgFeedbackGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gather_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Feedback gateway over the shared pool.
    pub fn feedback_gateway(&self) -> PgFeedbackGateway {
        PgFeedbackGateway::new(self.pool.clone())
    }
}
