//! Event constants, lifecycle rules and validation functions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

pub const VALID_EVENT_TYPES: &[&str] = &[
    "conference",
    "workshop",
    "seminar",
    "webinar",
    "meetup",
    "other",
];

/// Audience used when an event does not name one.
pub const DEFAULT_TARGET_AUDIENCE: &str = "general";

/// Validate that the event type is one of the allowed values.
pub fn validate_event_type(event_type: &str) -> Result<(), String> {
    if VALID_EVENT_TYPES.contains(&event_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid event type '{event_type}'. Must be one of: {}",
            VALID_EVENT_TYPES.join(", ")
        ))
    }
}

/// Validate that an event does not end before it starts.
pub fn validate_time_window(start: Timestamp, end: Timestamp) -> Result<(), String> {
    if end < start {
        return Err("End date must be after start date".to_string());
    }
    Ok(())
}

/// Validate that an image URL uses the http or https scheme.
pub fn validate_image_url(url: &str) -> Result<(), String> {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err("Image URL must start with http:// or https://".to_string())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Event lifecycle status.
///
/// ```text
/// draft ──> published ──> completed
///   │           │
///   └───────────┴──> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub const ALL: [EventStatus; 4] = [
        EventStatus::Draft,
        EventStatus::Published,
        EventStatus::Cancelled,
        EventStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    /// Re-applying the current status is allowed.
    pub fn can_transition_to(self, next: EventStatus) -> bool {
        use EventStatus::*;
        self == next
            || matches!(
                (self, next),
                (Draft, Published) | (Draft, Cancelled) | (Published, Cancelled) | (Published, Completed)
            )
    }

    /// Whether the public feedback form is open for events in this status.
    pub fn accepts_feedback(self) -> bool {
        matches!(self, EventStatus::Published | EventStatus::Completed)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                format!("Invalid status '{s}'. Must be one of: draft, published, cancelled, completed")
            })
    }
}

/// Validate a lifecycle transition between two stored status strings.
pub fn validate_transition(from: &str, to: &str) -> Result<EventStatus, String> {
    let current: EventStatus = from.parse()?;
    let next: EventStatus = to.parse()?;
    if !current.can_transition_to(next) {
        return Err(format!("Cannot change event status from {current} to {next}"));
    }
    Ok(next)
}
