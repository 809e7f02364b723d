pub mod dashboard;
pub mod events;
pub mod feedback;
pub mod profile;
