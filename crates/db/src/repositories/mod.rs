//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod analytics_repo;
pub mod event_repo;
pub mod feedback_repo;
pub mod profile_repo;

pub use analytics_repo::AnalyticsRepo;
pub use event_repo::EventRepo;
pub use feedback_repo::FeedbackRepo;
pub use profile_repo::ProfileRepo;
