//! Sentiment classification for review text.
//!
//! Text is normalized, handed to a [`PolarityScorer`], and the resulting
//! polarity is mapped to a three-way label with strict comparisons against
//! a [`ThresholdConfig`].

pub mod lexicon;

pub use lexicon::LexiconScorer;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::ConfigError;
use crate::domain::{LabeledReview, Review, SentimentLabel, SentimentResult};

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Scorer produced a non-finite value")]
    NonFinite,

    #[error("Scorer failed: {0}")]
    Failed(String),
}

/// Raw scorer output before labeling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Anything that can turn normalized text into polarity and subjectivity
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<Score, ScoreError>;
}

/// Polarity cutoffs for the three-way label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Polarity strictly above this is Positive (default: 0.1)
    pub positive: f64,
    /// Polarity strictly below this is Negative (default: -0.1)
    pub negative: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            positive: 0.1,
            negative: -0.1,
        }
    }
}

impl ThresholdConfig {
    pub fn new(positive: f64, negative: f64) -> Result<Self, ConfigError> {
        let thresholds = Self { positive, negative };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.negative < self.positive) {
            return Err(ConfigError::Invalid(format!(
                "sentiment.negative ({}) must be below sentiment.positive ({})",
                self.negative, self.positive
            )));
        }
        Ok(())
    }

    pub fn label(&self, polarity: f64) -> SentimentLabel {
        if polarity > self.positive {
            SentimentLabel::Positive
        } else if polarity < self.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Lower-case, drop punctuation and collapse whitespace.
///
/// Punctuation is removed outright, so "don't" becomes "dont".
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct SentimentClassifier<S = LexiconScorer> {
    scorer: S,
    thresholds: ThresholdConfig,
}

impl SentimentClassifier<LexiconScorer> {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self::with_scorer(LexiconScorer::new(), thresholds)
    }
}

impl Default for SentimentClassifier<LexiconScorer> {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl<S: PolarityScorer> SentimentClassifier<S> {
    pub fn with_scorer(scorer: S, thresholds: ThresholdConfig) -> Self {
        Self { scorer, thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Classify free text. Scorer faults degrade to a zero neutral result.
    pub fn classify(&self, text: &str) -> SentimentResult {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return SentimentResult::neutral();
        }

        let score = self.scorer.score(&normalized).and_then(|s| {
            if s.polarity.is_finite() && s.subjectivity.is_finite() {
                Ok(s)
            } else {
                Err(ScoreError::NonFinite)
            }
        });

        match score {
            Ok(s) => {
                let polarity = s.polarity.clamp(-1.0, 1.0);
                SentimentResult {
                    polarity,
                    subjectivity: s.subjectivity.clamp(0.0, 1.0),
                    label: self.thresholds.label(polarity),
                }
            }
            Err(e) => {
                warn!("Sentiment scoring failed, using neutral: {}", e);
                SentimentResult::neutral()
            }
        }
    }

    /// Classify title and body together
    pub fn classify_review(&self, review: Review) -> LabeledReview {
        let sentiment = self.classify(&review.sentiment_text());
        LabeledReview::new(review, sentiment)
    }

    pub fn classify_all(&self, reviews: Vec<Review>) -> Vec<LabeledReview> {
        reviews
            .into_iter()
            .map(|r| self.classify_review(r))
            .collect()
    }
}
