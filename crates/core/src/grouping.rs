//! Regrouping of persisted feedback rows into logical submissions.
//!
//! Rows are grouped by `submission_id`. Rows written before that column
//! existed fall back to a composite key of event, creation time and
//! respondent; this is a compatibility shim for legacy data only.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::feedback::FeedbackCategory;
use crate::sentiment::Sentiment;
use crate::types::{DbId, Timestamp, UserId};

/// Respondent placeholder used in legacy keys for rows with no user or name.
pub const ANONYMOUS_RESPONDENT: &str = "anon";

/// Read access to the fields grouping needs from a persisted feedback row.
pub trait FeedbackRecord {
    fn submission_id(&self) -> Option<Uuid>;
    fn event_id(&self) -> DbId;
    fn user_id(&self) -> Option<UserId>;
    fn name(&self) -> Option<&str>;
    fn is_anonymous(&self) -> bool;
    fn category(&self) -> Option<FeedbackCategory>;
    fn rating(&self) -> i32;
    fn sentiment(&self) -> Sentiment;
    fn created_at(&self) -> Timestamp;
}

/// Identity of one logical submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionKey {
    Submission {
        id: Uuid,
    },
    Legacy {
        event_id: DbId,
        created_at: Timestamp,
        respondent: String,
    },
}

impl SubmissionKey {
    pub fn for_record<R: FeedbackRecord>(record: &R) -> Self {
        match record.submission_id() {
            Some(id) => SubmissionKey::Submission { id },
            None => SubmissionKey::Legacy {
                event_id: record.event_id(),
                created_at: record.created_at(),
                respondent: legacy_respondent(record),
            },
        }
    }
}

fn legacy_respondent<R: FeedbackRecord>(record: &R) -> String {
    if let Some(user_id) = record.user_id() {
        return user_id.to_string();
    }
    match record.name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => ANONYMOUS_RESPONDENT.to_string(),
    }
}

/// One logical submission reconstructed from its rows.
///
/// Header fields come from the master row: the `overall` row if there is one,
/// otherwise the earliest-created row.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionGroup<R> {
    pub key: SubmissionKey,
    pub event_id: DbId,
    pub user_id: Option<UserId>,
    pub name: Option<String>,
    pub is_anonymous: bool,
    /// Headline rating; 0 when the group has no `overall` row.
    pub rating: i32,
    pub unrated: bool,
    pub sentiment: Sentiment,
    pub created_at: Timestamp,
    pub items: Vec<R>,
}

fn master_index<R: FeedbackRecord>(items: &[R]) -> usize {
    if let Some(i) = items
        .iter()
        .position(|r| r.category() == Some(FeedbackCategory::Overall))
    {
        return i;
    }
    let mut earliest = 0;
    for (i, r) in items.iter().enumerate().skip(1) {
        if r.created_at() < items[earliest].created_at() {
            earliest = i;
        }
    }
    earliest
}

impl<R: FeedbackRecord> SubmissionGroup<R> {
    fn from_items(key: SubmissionKey, items: Vec<R>) -> Self {
        let master = &items[master_index(&items)];
        let unrated = master.category() != Some(FeedbackCategory::Overall);

        Self {
            key,
            event_id: master.event_id(),
            user_id: master.user_id(),
            name: master.name().map(str::to_string),
            is_anonymous: master.is_anonymous(),
            rating: if unrated { 0 } else { master.rating() },
            unrated,
            sentiment: master.sentiment(),
            created_at: master.created_at(),
            items,
        }
    }
}

/// Group rows into submissions.
///
/// Items keep their input order within a group. Groups are ordered newest
/// first by master timestamp; equal timestamps keep first-appearance order.
pub fn group<R, I>(records: I) -> Vec<SubmissionGroup<R>>
where
    R: FeedbackRecord,
    I: IntoIterator<Item = R>,
{
    let mut index: HashMap<SubmissionKey, usize> = HashMap::new();
    let mut buckets: Vec<(SubmissionKey, Vec<R>)> = Vec::new();

    for record in records {
        let key = SubmissionKey::for_record(&record);
        match index.get(&key) {
            Some(&i) => buckets[i].1.push(record),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![record]));
            }
        }
    }

    let mut groups: Vec<_> = buckets
        .into_iter()
        .map(|(key, items)| SubmissionGroup::from_items(key, items))
        .collect();
    // Stable sort keeps first-appearance order for equal timestamps.
    groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    groups
}

/// Flatten groups back into rows, in group order.
pub fn flatten<R>(groups: Vec<SubmissionGroup<R>>) -> Vec<R> {
    groups.into_iter().flat_map(|g| g.items).collect()
}

/// Number of distinct submissions among `records`, regardless of how many
/// rows each one spans.
pub fn count_unique_submissions<R: FeedbackRecord>(records: &[R]) -> usize {
    records
        .iter()
        .map(SubmissionKey::for_record)
        .collect::<HashSet<_>>()
        .len()
}

/// Display label for a submission's respondent.
///
/// `profile_name` is the full name from the respondent's profile, if known.
pub fn respondent_label<R>(group: &SubmissionGroup<R>, profile_name: Option<&str>) -> String {
    if group.is_anonymous {
        return "Anonymous".to_string();
    }
    if let Some(name) = profile_name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(name) = group.name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if group.user_id.is_none() {
        "Guest".to_string()
    } else {
        "User".to_string()
    }
}
