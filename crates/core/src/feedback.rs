//! Feedback submission builder.
//!
//! Turns one respondent's multi-category form into the rows that get
//! persisted. Every row of a submission shares one `submission_id`; the
//! `overall` row carries the headline rating.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::sentiment::{classify_comment, Sentiment};
use crate::types::{DbId, UserId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Maximum comment length in characters.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Maximum respondent display name length in characters.
pub const MAX_NAME_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Aspect of the event a feedback row talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Content,
    Organization,
    Venue,
    Speaker,
    Overall,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 5] = [
        FeedbackCategory::Content,
        FeedbackCategory::Organization,
        FeedbackCategory::Venue,
        FeedbackCategory::Speaker,
        FeedbackCategory::Overall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackCategory::Content => "content",
            FeedbackCategory::Organization => "organization",
            FeedbackCategory::Venue => "venue",
            FeedbackCategory::Speaker => "speaker",
            FeedbackCategory::Overall => "overall",
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid category '{s}'. Must be one of: content, organization, venue, speaker, overall"
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// One category entry from the feedback form.
///
/// Non-overall entries may omit the rating; they inherit the overall rating.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackItemInput {
    pub category: FeedbackCategory,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Fields shared by every row of one submission.
#[derive(Debug, Clone)]
pub struct SubmissionCommon {
    pub event_id: DbId,
    pub name: Option<String>,
    pub is_anonymous: bool,
}

/// Tunable submission rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionPolicy {
    /// Reject non-anonymous submissions from callers without an identity.
    pub require_identity: bool,
    /// Minimum length, in characters, of a non-blank comment.
    pub min_comment_chars: usize,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            require_identity: false,
            min_comment_chars: 1,
        }
    }
}

/// A validated feedback row ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFeedbackRecord {
    pub event_id: DbId,
    pub user_id: Option<UserId>,
    pub name: Option<String>,
    pub is_anonymous: bool,
    pub submission_id: Uuid,
    pub category: FeedbackCategory,
    pub rating: i32,
    pub comment: Option<String>,
    pub sentiment: Sentiment,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate that a rating is an integer in `[MIN_RATING, MAX_RATING]`.
pub fn validate_rating(rating: i32) -> Result<(), String> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        ))
    }
}

/// Trim a comment, mapping blank text to `None`.
pub fn normalize_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Validate the length of a normalized (non-blank) comment.
pub fn validate_comment(
    category: FeedbackCategory,
    comment: &str,
    min_chars: usize,
) -> Result<(), String> {
    let len = comment.chars().count();
    if len < min_chars {
        return Err(format!(
            "Comment for {category} must be at least {min_chars} characters"
        ));
    }
    if len > MAX_COMMENT_CHARS {
        return Err(format!(
            "Comment for {category} exceeds maximum length of {MAX_COMMENT_CHARS} characters"
        ));
    }
    Ok(())
}

fn normalize_name(name: Option<&str>) -> Result<Option<String>, String> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(format!(
            "Name exceeds maximum length of {MAX_NAME_CHARS} characters"
        ));
    }
    Ok(Some(name.to_string()))
}

/// Locate the single overall item and return its rating.
fn overall_rating(items: &[FeedbackItemInput]) -> Result<i32, String> {
    let mut overall = items
        .iter()
        .filter(|i| i.category == FeedbackCategory::Overall);

    let first = overall
        .next()
        .ok_or_else(|| "An overall rating is required".to_string())?;
    if overall.next().is_some() {
        return Err("Only one overall item is allowed per submission".to_string());
    }

    let rating = first
        .rating
        .ok_or_else(|| "An overall rating is required".to_string())?;
    validate_rating(rating)?;
    Ok(rating)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the rows for one feedback submission.
///
/// `caller` is the authenticated identity, if any. When the submission is
/// anonymous the caller's identity and the supplied name are both dropped.
/// Non-overall items without a comment are skipped. Nothing is persisted.
pub fn build_submission(
    common: &SubmissionCommon,
    items: &[FeedbackItemInput],
    caller: Option<UserId>,
    policy: &SubmissionPolicy,
) -> Result<Vec<NewFeedbackRecord>, CoreError> {
    if !common.is_anonymous && caller.is_none() && policy.require_identity {
        return Err(CoreError::Unauthorized(
            "Sign in or submit anonymously to leave feedback".to_string(),
        ));
    }
    if items.is_empty() {
        return Err(CoreError::Validation(
            "At least one feedback item is required".to_string(),
        ));
    }

    let headline = overall_rating(items).map_err(CoreError::Validation)?;
    let name = normalize_name(common.name.as_deref()).map_err(CoreError::Validation)?;

    let (user_id, name) = if common.is_anonymous {
        (None, None)
    } else {
        (caller, name)
    };

    let submission_id = Uuid::new_v4();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(items.len());

    for item in items {
        let comment = normalize_comment(item.comment.as_deref());
        if item.category != FeedbackCategory::Overall && comment.is_none() {
            continue;
        }
        if !seen.insert(item.category) {
            return Err(CoreError::Validation(format!(
                "Duplicate feedback category '{}'",
                item.category
            )));
        }

        let rating = item.rating.unwrap_or(headline);
        validate_rating(rating).map_err(CoreError::Validation)?;

        if let Some(ref text) = comment {
            validate_comment(item.category, text, policy.min_comment_chars)
                .map_err(CoreError::Validation)?;
        }

        records.push(NewFeedbackRecord {
            event_id: common.event_id,
            user_id,
            name: name.clone(),
            is_anonymous: common.is_anonymous,
            submission_id,
            category: item.category,
            rating,
            sentiment: classify_comment(comment.as_deref()),
            comment,
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
