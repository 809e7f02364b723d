//! Feedback row model.
//!
//! Rows are written only through the submission builder, so there is no
//! create DTO here; inserts take `gather_core::feedback::NewFeedbackRecord`.

use gather_core::feedback::FeedbackCategory;
use gather_core::grouping::FeedbackRecord;
use gather_core::sentiment::Sentiment;
use gather_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `feedback` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: Option<UserId>,
    pub name: Option<String>,
    pub is_anonymous: bool,
    pub submission_id: Option<Uuid>,
    pub category: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub sentiment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FeedbackRecord for Feedback {
    fn submission_id(&self) -> Option<Uuid> {
        self.submission_id
    }
    fn event_id(&self) -> DbId {
        self.event_id
    }
    fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }
    fn category(&self) -> Option<FeedbackCategory> {
        self.category.as_deref().and_then(|c| c.parse().ok())
    }
    fn rating(&self) -> i32 {
        self.rating
    }
    fn sentiment(&self) -> Sentiment {
        self.sentiment.parse().unwrap_or_default()
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// A feedback row joined with its event title and the respondent's profile
/// name, as shown in organizer listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub feedback: Feedback,
    pub event_title: String,
    pub respondent_full_name: Option<String>,
}

impl FeedbackRecord for FeedbackEntry {
    fn submission_id(&self) -> Option<Uuid> {
        self.feedback.submission_id()
    }
    fn event_id(&self) -> DbId {
        self.feedback.event_id()
    }
    fn user_id(&self) -> Option<UserId> {
        self.feedback.user_id()
    }
    fn name(&self) -> Option<&str> {
        self.feedback.name()
    }
    fn is_anonymous(&self) -> bool {
        self.feedback.is_anonymous()
    }
    fn category(&self) -> Option<FeedbackCategory> {
        self.feedback.category()
    }
    fn rating(&self) -> i32 {
        self.feedback.rating()
    }
    fn sentiment(&self) -> Sentiment {
        self.feedback.sentiment()
    }
    fn created_at(&self) -> Timestamp {
        self.feedback.created_at()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn row(category: Option<&str>, sentiment: &str) -> Feedback {
        Feedback {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_id: None,
            name: None,
            is_anonymous: false,
            submission_id: None,
            category: category.map(str::to_string),
            rating: 4,
            comment: None,
            sentiment: sentiment.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn category_parsed_from_column() {
        assert_eq!(
            row(Some("venue"), "neutral").category(),
            Some(FeedbackCategory::Venue)
        );
        assert_eq!(row(None, "neutral").category(), None);
    }

    #[test]
    fn unknown_sentiment_reads_as_neutral() {
        assert_eq!(row(None, "positive").sentiment(), Sentiment::Positive);
        assert_eq!(row(None, "mixed").sentiment(), Sentiment::Neutral);
    }
}
