//! Access and ownership rules, plus the feedback submission flow.
//!
//! The capability functions are plain predicates so any transport can call
//! them. Persistence is reached through [`FeedbackGateway`]; the database
//! crate provides the Postgres implementation.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::event::EventStatus;
use crate::feedback::{
    build_submission, FeedbackItemInput, NewFeedbackRecord, SubmissionCommon, SubmissionPolicy,
};
use crate::types::{DbId, UserId};

/// Message shown when an event is missing or not open to the public.
pub const EVENT_NOT_AVAILABLE: &str = "Event not available";

/// The slice of an event the access rules need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRef {
    pub id: DbId,
    pub title: String,
    pub status: EventStatus,
    pub created_by: UserId,
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Only the owner may edit, delete or change the status of an event.
pub fn can_manage_event(identity: Option<UserId>, event_owner: UserId) -> bool {
    identity == Some(event_owner)
}

/// Feedback is readable by the owner of the event it belongs to.
pub fn can_read_feedback(identity: Option<UserId>, event_owner: UserId) -> bool {
    can_manage_event(identity, event_owner)
}

pub fn accepts_public_feedback(status: EventStatus) -> bool {
    status.accepts_feedback()
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Persistence operations needed by the submission and read flows.
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    type Error: From<CoreError> + fmt::Display + Send;
    /// Stored row type returned after insertion.
    type Persisted: Send;

    async fn find_event(&self, event_id: DbId) -> Result<Option<EventRef>, Self::Error>;

    async fn is_owner(&self, identity: UserId, event_id: DbId) -> Result<bool, Self::Error>;

    /// Insert every record or none of them.
    async fn persist_submission(
        &self,
        records: &[NewFeedbackRecord],
    ) -> Result<Vec<Self::Persisted>, Self::Error>;

    /// Recompute the aggregates of one event from its stored rows.
    async fn refresh_aggregates(&self, event_id: DbId) -> Result<(), Self::Error>;
}

/// Body of a feedback submission. The event id comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub items: Vec<FeedbackItemInput>,
}

/// Validate, persist and aggregate one feedback submission.
///
/// The event must exist and accept public feedback, otherwise `NotFound`.
/// Validation runs before anything is written. The aggregate refresh runs
/// exactly once after the insert; its failure is logged and the committed
/// rows are still returned.
pub async fn submit_feedback<G: FeedbackGateway>(
    gateway: &G,
    event_id: DbId,
    caller: Option<UserId>,
    request: &SubmissionRequest,
    policy: &SubmissionPolicy,
) -> Result<Vec<G::Persisted>, G::Error> {
    let event = gateway
        .find_event(event_id)
        .await?
        .filter(|e| accepts_public_feedback(e.status))
        .ok_or(CoreError::NotFound {
            entity: "event",
            id: event_id,
        })?;

    let common = SubmissionCommon {
        event_id: event.id,
        name: request.name.clone(),
        is_anonymous: request.is_anonymous,
    };
    let records = build_submission(&common, &request.items, caller, policy)?;

    let persisted = gateway.persist_submission(&records).await?;

    if let Err(e) = gateway.refresh_aggregates(event.id).await {
        tracing::warn!(event_id = %event.id, error = %e, "Feedback aggregate refresh failed");
    }

    tracing::info!(
        event_id = %event.id,
        items = records.len(),
        anonymous = request.is_anonymous,
        "Feedback submitted",
    );

    Ok(persisted)
}

/// Check that `identity` may read the feedback of `event_id`.
///
/// A caller who does not own the event gets `NotFound` so private events
/// are not revealed.
pub async fn authorize_feedback_read<G: FeedbackGateway>(
    gateway: &G,
    identity: Option<UserId>,
    event_id: DbId,
) -> Result<(), G::Error> {
    let Some(user_id) = identity else {
        return Err(CoreError::Unauthorized("Sign in to view feedback".to_string()).into());
    };
    if !gateway.is_owner(user_id, event_id).await? {
        return Err(CoreError::NotFound {
            entity: "event",
            id: event_id,
        }
        .into());
    }
    Ok(())
}
