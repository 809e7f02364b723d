//! Keyword-based comment sentiment.
//!
//! Matching is a plain substring test on the lower-cased text, so a stem
//! also matches inside longer words ("hatefully" counts as "hate"). Each
//! keyword counts at most once no matter how often it appears.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stems that count towards a positive classification.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "good",
    "love",
    "liked",
    "best",
    "useful",
    "nice",
];

/// Stems that count towards a negative classification.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad",
    "poor",
    "terrible",
    "horrible",
    "hate",
    "awful",
    "worst",
    "useless",
    "boring",
];

/// Sentiment label stored alongside every feedback row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// The database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("Invalid sentiment '{other}'")),
        }
    }
}

fn count_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

/// Classify free text by comparing positive and negative keyword hits.
///
/// Ties, including no hits at all, are neutral.
pub fn classify(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive = count_hits(&lower, POSITIVE_KEYWORDS);
    let negative = count_hits(&lower, NEGATIVE_KEYWORDS);

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Classify an optional comment. Missing or blank comments are neutral and
/// never reach the classifier.
pub fn classify_comment(comment: Option<&str>) -> Sentiment {
    match comment {
        Some(text) if !text.trim().is_empty() => classify(text),
        _ => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_positive_keyword() {
        assert_eq!(classify("This was GREAT"), Sentiment::Positive);
    }

    #[test]
    fn two_negative_keywords() {
        assert_eq!(classify("it was bad and boring"), Sentiment::Negative);
    }

    #[test]
    fn no_keywords_is_neutral() {
        assert_eq!(classify("it happened"), Sentiment::Neutral);
    }

    #[test]
    fn empty_text_is_neutral() {
        assert_eq!(classify(""), Sentiment::Neutral);
    }

    #[test]
    fn tie_is_neutral() {
        assert_eq!(classify("good talk, bad room"), Sentiment::Neutral);
    }

    #[test]
    fn majority_wins() {
        assert_eq!(
            classify("Great speakers, excellent content, poor coffee"),
            Sentiment::Positive
        );
    }

    #[test]
    fn repeated_keyword_counts_once() {
        // "bad" three times is still one negative hit against one positive.
        assert_eq!(classify("bad bad bad but useful"), Sentiment::Neutral);
    }

    #[test]
    fn substring_matches_inside_words() {
        assert_eq!(classify("a hatefully long queue"), Sentiment::Negative);
        assert_eq!(classify("goodness"), Sentiment::Positive);
    }

    #[test]
    fn nice_counts_as_positive() {
        assert_eq!(classify("nice venue"), Sentiment::Positive);
    }

    #[test]
    fn deterministic() {
        let text = "Loved the venue, awful parking";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn missing_comment_is_neutral() {
        assert_eq!(classify_comment(None), Sentiment::Neutral);
        assert_eq!(classify_comment(Some("   ")), Sentiment::Neutral);
        assert_eq!(classify_comment(Some("great")), Sentiment::Positive);
    }

    #[test]
    fn parse_round_trips_labels() {
        for s in [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative] {
            assert_eq!(s.as_str().parse::<Sentiment>(), Ok(s));
        }
        assert!("mixed".parse::<Sentiment>().is_err());
    }
}
