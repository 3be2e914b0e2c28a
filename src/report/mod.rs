//! Aggregation over labeled reviews and the artifacts built from it.

pub mod export;
pub mod markdown;

pub use export::CsvExporter;
pub use markdown::MarkdownReport;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::domain::{LabeledReview, SentimentLabel};

/// Highlights shown per side
pub const TOP_N: usize = 3;

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Cut text to `max_chars`, appending "..." when something was dropped
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

/// Headline statistics over every labeled review
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Mean over reviews that carry a rating
    pub avg_rating: Option<f64>,
    pub avg_polarity: f64,
    pub avg_subjectivity: f64,
}

impl Summary {
    pub fn from_records(records: &[LabeledReview]) -> Self {
        let count = |label: SentimentLabel| {
            records
                .iter()
                .filter(|r| r.sentiment.label == label)
                .count()
        };

        Self {
            total: records.len(),
            positive: count(SentimentLabel::Positive),
            negative: count(SentimentLabel::Negative),
            neutral: count(SentimentLabel::Neutral),
            avg_rating: mean(records.iter().filter_map(|r| r.review.rating)),
            avg_polarity: mean(records.iter().map(|r| r.sentiment.polarity)).unwrap_or(0.0),
            avg_subjectivity: mean(records.iter().map(|r| r.sentiment.subjectivity))
                .unwrap_or(0.0),
        }
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn percentage(&self, label: SentimentLabel) -> f64 {
        percent(self.count(label), self.total)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total reviews: {}", self.total)?;
        for label in SentimentLabel::ALL {
            writeln!(
                f,
                "{}: {} ({:.1}%)",
                label,
                self.count(label),
                self.percentage(label)
            )?;
        }
        match self.avg_rating {
            Some(avg) => writeln!(f, "Average rating: {:.2}", avg)?,
            None => writeln!(f, "No ratings found")?,
        }
        writeln!(f, "Average polarity: {:.3}", self.avg_polarity)?;
        write!(f, "Average subjectivity: {:.3}", self.avg_subjectivity)
    }
}

/// One bar of the rating histogram
#[derive(Debug, Clone, PartialEq)]
pub struct RatingBucket {
    pub rating: f64,
    pub count: usize,
    pub percentage: f64,
}

/// Label counts for one rating value
#[derive(Debug, Clone, PartialEq)]
pub struct RatingLabels {
    pub rating: f64,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Highlights and distributions over the reviews, de-duplicated by text
#[derive(Debug, Clone, Default)]
pub struct Insights {
    /// Reviews left after de-duplication
    pub unique: usize,
    /// Rating >= 4 and Positive, strongest first
    pub top_positive: Vec<LabeledReview>,
    /// Rating <= 2 and Negative, strongest first
    pub top_negative: Vec<LabeledReview>,
    /// Ascending by rating
    pub distribution: Vec<RatingBucket>,
    /// Ascending by rating
    pub by_rating: Vec<RatingLabels>,
}

/// Ratings are grouped on tenths so 4.5 and 4.0 stay apart
fn rating_key(rating: f64) -> i64 {
    (rating * 10.0).round() as i64
}

impl Insights {
    pub fn from_records(records: &[LabeledReview]) -> Self {
        let mut seen = HashSet::new();
        let unique: Vec<&LabeledReview> = records
            .iter()
            .filter(|r| seen.insert(r.review.review_text.as_str()))
            .collect();

        let mut top_positive: Vec<LabeledReview> = unique
            .iter()
            .filter(|r| {
                r.sentiment.label == SentimentLabel::Positive
                    && r.review.rating.is_some_and(|v| v >= 4.0)
            })
            .map(|r| (*r).clone())
            .collect();
        top_positive.sort_by(|a, b| b.sentiment.polarity.total_cmp(&a.sentiment.polarity));
        top_positive.truncate(TOP_N);

        let mut top_negative: Vec<LabeledReview> = unique
            .iter()
            .filter(|r| {
                r.sentiment.label == SentimentLabel::Negative
                    && r.review.rating.is_some_and(|v| v <= 2.0)
            })
            .map(|r| (*r).clone())
            .collect();
        top_negative.sort_by(|a, b| a.sentiment.polarity.total_cmp(&b.sentiment.polarity));
        top_negative.truncate(TOP_N);

        let mut groups: BTreeMap<i64, RatingLabels> = BTreeMap::new();
        for r in &unique {
            let Some(rating) = r.review.rating else {
                continue;
            };
            let row = groups.entry(rating_key(rating)).or_insert(RatingLabels {
                rating,
                positive: 0,
                negative: 0,
                neutral: 0,
            });
            match r.sentiment.label {
                SentimentLabel::Positive => row.positive += 1,
                SentimentLabel::Negative => row.negative += 1,
                SentimentLabel::Neutral => row.neutral += 1,
            }
        }

        let distribution = groups
            .values()
            .map(|row| {
                let count = row.positive + row.negative + row.neutral;
                RatingBucket {
                    rating: row.rating,
                    count,
                    percentage: percent(count, unique.len()),
                }
            })
            .collect();

        Self {
            unique: unique.len(),
            top_positive,
            top_negative,
            distribution,
            by_rating: groups.into_values().collect(),
        }
    }
}

fn write_highlights(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    empty: &str,
    reviews: &[LabeledReview],
) -> fmt::Result {
    writeln!(f, "{heading}")?;
    if reviews.is_empty() {
        return writeln!(f, "  {empty}");
    }
    for (i, r) in reviews.iter().enumerate() {
        let rating = r.review.rating.unwrap_or_default();
        writeln!(f, "  {}. {}/5 - {}", i + 1, rating, truncate(&r.review.title, 80))?;
        writeln!(f, "     \"{}\"", truncate(&r.review.review_text, 100))?;
    }
    Ok(())
}

impl fmt::Display for Insights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_highlights(
            f,
            "Top positive (high rating, positive sentiment):",
            "No strongly positive reviews found",
            &self.top_positive,
        )?;
        write_highlights(
            f,
            "Top negative (low rating, negative sentiment):",
            "No strongly negative reviews found",
            &self.top_negative,
        )?;

        writeln!(f, "Rating distribution:")?;
        for bucket in &self.distribution {
            writeln!(
                f,
                "  {} stars: {} reviews ({:.1}%)",
                bucket.rating, bucket.count, bucket.percentage
            )?;
        }

        writeln!(f, "Sentiment by rating:")?;
        writeln!(f, "  {:>6} {:>8} {:>8} {:>8}", "rating", "Positive", "Negative", "Neutral")?;
        for row in &self.by_rating {
            writeln!(
                f,
                "  {:>6} {:>8} {:>8} {:>8}",
                row.rating, row.positive, row.negative, row.neutral
            )?;
        }
        Ok(())
    }
}
