use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_SOURCE;

/// Selector hints and limits for review extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Stop once this many valid reviews were extracted from one page (default: 100)
    pub max_reviews: usize,

    /// Provenance tag stored on every review
    pub source: String,

    /// Class substrings marking a review container, matched case-insensitively
    pub class_indicators: Vec<String>,

    /// CSS selectors for the review body, in priority order
    pub text_selectors: Vec<String>,

    /// CSS selectors for the review title, in priority order
    pub title_selectors: Vec<String>,

    /// CSS selectors for the review date, in priority order
    pub date_selectors: Vec<String>,

    /// CSS selectors for the reviewer name, in priority order
    pub name_selectors: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_reviews: 100,
            source: DEFAULT_SOURCE.to_string(),
            class_indicators: vec![
                "review".to_string(),
                "reviewItem".to_string(),
                "customerReview".to_string(),
            ],
            text_selectors: vec![
                ".reviewText".to_string(),
                ".review-body".to_string(),
                ".review-content".to_string(),
                "[data-automation=\"review-body\"]".to_string(),
                ".comment".to_string(),
                ".content".to_string(),
            ],
            title_selectors: vec![
                "h3".to_string(),
                "h4".to_string(),
                ".review-title".to_string(),
                ".title".to_string(),
            ],
            date_selectors: vec![
                ".review-date".to_string(),
                ".date".to_string(),
                "time".to_string(),
                "[data-automation=\"review-date\"]".to_string(),
            ],
            name_selectors: vec![
                ".reviewer-name".to_string(),
                ".author".to_string(),
                ".user-name".to_string(),
                "[data-automation=\"reviewer-name\"]".to_string(),
            ],
        }
    }
}

impl ExtractionConfig {
    pub fn with_max_reviews(mut self, max_reviews: usize) -> Self {
        self.max_reviews = max_reviews;
        self
    }
}
