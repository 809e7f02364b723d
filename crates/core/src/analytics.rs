//! Per-event feedback aggregates.
//!
//! Every figure here counts submissions, never rows: a submission spanning
//! three categories contributes one to `total_feedback` and one to exactly
//! one sentiment bucket (its master row's sentiment).

use std::cmp::Ordering;

use serde::Serialize;

use crate::grouping::SubmissionGroup;
use crate::sentiment::Sentiment;
use crate::types::{DbId, Timestamp};

/// Aggregate feedback figures for one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAnalytics {
    pub event_id: DbId,
    pub event_title: String,
    /// Unique submission count.
    pub total_feedback: i64,
    /// Mean headline rating over rated submissions, two decimals.
    pub avg_rating: Option<f64>,
    pub positive_count: i64,
    pub neutral_count: i64,
    pub negative_count: i64,
    pub last_feedback_at: Option<Timestamp>,
}

/// Round to two decimal places.
pub fn round_rating(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Summarize the grouped submissions of one event.
///
/// `groups` must all belong to `event_id`; unrated groups count towards the
/// totals but not towards the average.
pub fn summarize_event<R>(
    event_id: DbId,
    event_title: &str,
    groups: &[SubmissionGroup<R>],
) -> EventAnalytics {
    let mut rated = 0_i64;
    let mut rating_sum = 0_i64;
    let (mut positive, mut neutral, mut negative) = (0, 0, 0);

    for g in groups {
        if !g.unrated {
            rated += 1;
            rating_sum += i64::from(g.rating);
        }
        match g.sentiment {
            Sentiment::Positive => positive += 1,
            Sentiment::Neutral => neutral += 1,
            Sentiment::Negative => negative += 1,
        }
    }

    let avg_rating = (rated > 0).then(|| round_rating(rating_sum as f64 / rated as f64));

    EventAnalytics {
        event_id,
        event_title: event_title.to_string(),
        total_feedback: groups.len() as i64,
        avg_rating,
        positive_count: positive,
        neutral_count: neutral,
        negative_count: negative,
        last_feedback_at: groups.iter().map(|g| g.created_at).max(),
    }
}

/// Total unique feedback across an organizer's events.
pub fn dashboard_total<'a>(rows: impl IntoIterator<Item = &'a EventAnalytics>) -> i64 {
    rows.into_iter().map(|a| a.total_feedback).sum()
}

/// Mean of the per-event averages, ignoring events without ratings.
pub fn mean_of_averages<'a>(rows: impl IntoIterator<Item = &'a EventAnalytics>) -> Option<f64> {
    let averages: Vec<f64> = rows.into_iter().filter_map(|a| a.avg_rating).collect();
    if averages.is_empty() {
        return None;
    }
    Some(round_rating(
        averages.iter().sum::<f64>() / averages.len() as f64,
    ))
}

/// Highest-rated events first; ties go to the event with more feedback.
/// Events without a rating are left out.
pub fn top_rated(rows: Vec<EventAnalytics>, limit: usize) -> Vec<EventAnalytics> {
    let mut rated: Vec<_> = rows.into_iter().filter(|a| a.avg_rating.is_some()).collect();
    rated.sort_by(|a, b| {
        b.avg_rating
            .partial_cmp(&a.avg_rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total_feedback.cmp(&a.total_feedback))
    });
    rated.truncate(limit);
    rated
}
