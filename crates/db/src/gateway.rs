//! Postgres implementation of the feedback gateway.

use async_trait::async_trait;
use gather_core::access::{EventRef, FeedbackGateway};
use gather_core::analytics::summarize_event;
use gather_core::feedback::NewFeedbackRecord;
use gather_core::grouping::group;
use gather_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::analytics::FeedbackAnalytics;
use crate::models::feedback::Feedback;
use crate::models::profile::UpsertProfile;
use crate::repositories::{AnalyticsRepo, EventRepo, FeedbackRepo, ProfileRepo};

// ---------------------------------------------------------------------------
// Aggregate refresh
// ---------------------------------------------------------------------------

/// Recompute one event's aggregates from all of its rows and upsert them.
///
/// Runs in one transaction that holds the event row lock before reading the
/// rows, so refreshes of one event apply in order and the last one to commit
/// has seen every row committed before it started reading. Returns `None` if
/// the event no longer exists.
pub async fn refresh_event_analytics(
    pool: &PgPool,
    event_id: DbId,
) -> Result<Option<FeedbackAnalytics>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(event) = EventRepo::lock_for_refresh(&mut *tx, event_id).await? else {
        return Ok(None);
    };
    let rows = FeedbackRepo::list_for_event(&mut *tx, event_id).await?;
    let row_count = rows.len() as i64;
    let summary = summarize_event(event.id, &event.title, &group(rows));
    let stored = AnalyticsRepo::upsert(&mut *tx, &summary, row_count).await?;

    tx.commit().await?;

    tracing::debug!(
        event_id = %event_id,
        total_feedback = stored.total_feedback,
        feedback_rows = row_count,
        "Feedback analytics refreshed",
    );
    Ok(Some(stored))
}

/// Cached aggregates of one event, recomputed first when the cache is
/// missing or was built from a different number of rows than are stored.
pub async fn current_event_analytics(
    pool: &PgPool,
    event_id: DbId,
) -> Result<Option<FeedbackAnalytics>, sqlx::Error> {
    if let Some(cached) = AnalyticsRepo::find_by_event(pool, event_id).await? {
        let live_rows = FeedbackRepo::count_for_event(pool, event_id).await?;
        if live_rows == cached.feedback_rows {
            return Ok(Some(cached));
        }
        tracing::debug!(
            event_id = %event_id,
            cached_rows = cached.feedback_rows,
            live_rows,
            "Feedback analytics stale",
        );
    }
    refresh_event_analytics(pool, event_id).await
}

/// Recompute every stale aggregate row of the events `owner` owns.
/// Returns how many events were refreshed.
pub async fn refresh_stale_for_owner(pool: &PgPool, owner: UserId) -> Result<usize, sqlx::Error> {
    let stale = AnalyticsRepo::stale_event_ids_for_owner(pool, owner).await?;
    for event_id in &stale {
        refresh_event_analytics(pool, *event_id).await?;
    }
    if !stale.is_empty() {
        tracing::info!(owner = %owner, refreshed = stale.len(), "Stale feedback analytics refreshed");
    }
    Ok(stale.len())
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// [`FeedbackGateway`] over a Postgres pool.
#[derive(Clone)]
pub struct PgFeedbackGateway {
    pool: PgPool,
    respondent: Option<UpsertProfile>,
}

impl PgFeedbackGateway {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            respondent: None,
        }
    }

    /// Profile claims of the signed-in caller. Written together with the
    /// submission rows when the records carry that user id.
    pub fn with_respondent(mut self, profile: UpsertProfile) -> Self {
        self.respondent = Some(profile);
        self
    }

    fn respondent_profile(&self, user_id: UserId) -> UpsertProfile {
        match &self.respondent {
            Some(profile) if profile.id == user_id => profile.clone(),
            _ => UpsertProfile {
                id: user_id,
                email: None,
                full_name: None,
            },
        }
    }
}

#[async_trait]
impl FeedbackGateway for PgFeedbackGateway {
    type Error = DbError;
    type Persisted = Feedback;

    async fn find_event(&self, event_id: DbId) -> Result<Option<EventRef>, DbError> {
        match EventRepo::find_by_id(&self.pool, event_id).await? {
            Some(event) => Ok(Some(event.to_ref()?)),
            None => Ok(None),
        }
    }

    async fn is_owner(&self, identity: UserId, event_id: DbId) -> Result<bool, DbError> {
        Ok(EventRepo::is_owner(&self.pool, identity, event_id).await?)
    }

    /// The respondent profile and every row commit together or not at all.
    async fn persist_submission(
        &self,
        records: &[NewFeedbackRecord],
    ) -> Result<Vec<Feedback>, DbError> {
        let mut tx = self.pool.begin().await?;

        if let Some(user_id) = records.first().and_then(|r| r.user_id) {
            ProfileRepo::upsert(&mut *tx, &self.respondent_profile(user_id)).await?;
        }
        let rows = FeedbackRepo::insert_rows(&mut *tx, records).await?;

        tx.commit().await?;
        Ok(rows)
    }

    async fn refresh_aggregates(&self, event_id: DbId) -> Result<(), DbError> {
        refresh_event_analytics(&self.pool, event_id).await?;
        Ok(())
    }
}
