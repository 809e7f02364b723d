//! Domain logic for the Gather event feedback service.
//!
//! This crate has no database or HTTP dependencies. Records are handed in by
//! the caller, and persistence sits behind the [`access::FeedbackGateway`]
//! trait.

pub mod access;
pub mod analytics;
pub mod error;
pub mod event;
pub mod feedback;
pub mod grouping;
pub mod search;
pub mod sentiment;
pub mod types;
pub mod validation;
