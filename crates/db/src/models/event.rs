//! Event entity model and DTOs.

use gather_core::access::EventRef;
use gather_core::error::CoreError;
use gather_core::event::{
    validate_event_type, validate_image_url, validate_time_window, EventStatus,
};
use gather_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use gather_core::types::{DbId, Timestamp, UserId};
use gather_core::validation::validate_input;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An event row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub location: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub max_attendees: Option<i32>,
    pub status: String,
    pub target_audience: String,
    pub image_url: Option<String>,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// Parsed lifecycle status. The column is constrained, so a parse
    /// failure means the schema and code disagree.
    pub fn lifecycle_status(&self) -> Result<EventStatus, CoreError> {
        self.status.parse().map_err(CoreError::Internal)
    }

    pub fn to_ref(&self) -> Result<EventRef, CoreError> {
        Ok(EventRef {
            id: self.id,
            title: self.title.clone(),
            status: self.lifecycle_status()?,
            created_by: self.created_by,
        })
    }
}

/// DTO for creating a new event. The owner comes from the caller's token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    #[validate(length(min = 2, message = "Location must be at least 2 characters"))]
    pub location: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[validate(range(min = 1, message = "Max attendees must be a positive number"))]
    pub max_attendees: Option<i32>,
    /// Defaults to draft if omitted.
    pub status: Option<EventStatus>,
    /// Defaults to "general" if omitted.
    pub target_audience: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

impl CreateEvent {
    /// Field rules plus the cross-field checks `validator` cannot express.
    pub fn check(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        validate_event_type(&self.event_type).map_err(CoreError::Validation)?;
        validate_time_window(self.start_date, self.end_date).map_err(CoreError::Validation)?;
        if let Some(url) = &self.image_url {
            validate_image_url(url).map_err(CoreError::Validation)?;
        }
        Ok(())
    }
}

/// DTO for updating an existing event. All fields are optional; status
/// changes go through the lifecycle endpoint instead.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    #[validate(length(min = 2, message = "Location must be at least 2 characters"))]
    pub location: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    #[validate(range(min = 1, message = "Max attendees must be a positive number"))]
    pub max_attendees: Option<i32>,
    pub target_audience: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

impl UpdateEvent {
    /// Validate the patch against the event it will be applied to.
    pub fn check(&self, current: &Event) -> Result<(), CoreError> {
        validate_input(self)?;
        if let Some(event_type) = &self.event_type {
            validate_event_type(event_type).map_err(CoreError::Validation)?;
        }
        validate_time_window(
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
        .map_err(CoreError::Validation)?;
        if let Some(url) = &self.image_url {
            validate_image_url(url).map_err(CoreError::Validation)?;
        }
        Ok(())
    }
}

/// Body of a lifecycle transition request.
#[derive(Debug, Clone, Deserialize)]
pub struct EventStatusChange {
    pub status: EventStatus,
}

/// Filters for the public event listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub event_type: Option<String>,
    /// Case-insensitive match against title, description and location.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Drafts are listed only for their owner. Set from the caller's token,
    /// never from the query string.
    #[serde(skip)]
    pub viewer: Option<UserId>,
}

impl EventFilter {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Event fields shown on the public feedback page.
#[derive(Debug, Clone, Serialize)]
pub struct PublicEvent {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub location: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: String,
    pub image_url: Option<String>,
}

impl From<Event> for PublicEvent {
    fn from(e: Event) -> Self {
        PublicEvent {
            id: e.id,
            title: e.title,
            description: e.description,
            event_type: e.event_type,
            location: e.location,
            start_date: e.start_date,
            end_date: e.end_date,
            status: e.status,
            image_url: e.image_url,
        }
    }
}
