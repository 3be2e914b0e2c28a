use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::SentimentResult;

/// Reviewer name used when no author element is found
pub const ANONYMOUS: &str = "Anonymous";

/// Provenance tag attached to every review by default
pub const DEFAULT_SOURCE: &str = "BestBuy Canada";

/// Minimum number of characters a review body must exceed to be kept
pub const MIN_TEXT_CHARS: usize = 10;

/// One harvested customer review.
///
/// Built once by the extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub title: String,
    pub review_text: String,
    /// ISO `YYYY-MM-DD`, or empty when no date could be parsed
    pub date: String,
    /// Star rating on a 0-5 scale
    pub rating: Option<f64>,
    pub source: String,
    pub reviewer_name: String,
}

/// Why a parsed container did not make it into the validated set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Review text is empty or no longer than [`MIN_TEXT_CHARS`]
    TextTooShort,
    /// No rating could be recovered
    MissingRating,
}

impl Review {
    /// Generate a short, process-unique review ID.
    ///
    /// Not derived from content, so two runs over the same page produce
    /// different IDs.
    pub fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    /// Apply the validity gate: text longer than ten characters AND a rating.
    pub fn validate(&self) -> std::result::Result<(), Rejection> {
        if self.review_text.chars().count() <= MIN_TEXT_CHARS {
            return Err(Rejection::TextTooShort);
        }
        if self.rating.is_none() {
            return Err(Rejection::MissingRating);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Text handed to the sentiment scorer: title and body as one blob
    pub fn sentiment_text(&self) -> String {
        format!("{} {}", self.title, self.review_text)
    }
}

/// A review paired with its sentiment, produced by classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledReview {
    pub review: Review,
    pub sentiment: SentimentResult,
}

impl LabeledReview {
    pub fn new(review: Review, sentiment: SentimentResult) -> Self {
        Self { review, sentiment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(text: &str, rating: Option<f64>) -> Review {
        Review {
            id: Review::generate_id(),
            title: String::new(),
            review_text: text.into(),
            date: String::new(),
            rating,
            source: DEFAULT_SOURCE.into(),
            reviewer_name: ANONYMOUS.into(),
        }
    }

    #[test]
    fn test_generated_ids_are_short_and_unique() {
        let a = Review::generate_id();
        let b = Review::generate_id();
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_text_of_eleven_chars_passes() {
        assert!(review("abcdefghijk", Some(4.0)).is_valid());
    }

    #[test]
    fn test_text_of_ten_chars_fails() {
        assert_eq!(
            review("abcdefghij", Some(4.0)).validate(),
            Err(Rejection::TextTooShort)
        );
    }

    #[test]
    fn test_missing_rating_always_fails() {
        let long = "x".repeat(500);
        assert_eq!(
            review(&long, None).validate(),
            Err(Rejection::MissingRating)
        );
    }

    #[test]
    fn test_empty_text_fails() {
        assert_eq!(review("", Some(5.0)).validate(), Err(Rejection::TextTooShort));
    }

    #[test]
    fn test_sentiment_text_joins_title_and_body() {
        let mut r = review("Works well every day", Some(5.0));
        r.title = "Great".into();
        assert_eq!(r.sentiment_text(), "Great Works well every day");
    }
}
