use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::Result;
use crate::domain::{LabeledReview, Review, SentimentLabel, SentimentResult};

pub const COLUMNS: [&str; 10] = [
    "id",
    "title",
    "review_text",
    "date",
    "rating",
    "source",
    "reviewer_name",
    "sentiment_polarity",
    "sentiment_subjectivity",
    "sentiment_label",
];

/// Flat CSV row, one column per field
#[derive(Debug, Serialize, Deserialize)]
struct ReviewRow {
    id: String,
    title: String,
    review_text: String,
    date: String,
    rating: Option<f64>,
    source: String,
    reviewer_name: String,
    sentiment_polarity: f64,
    sentiment_subjectivity: f64,
    sentiment_label: SentimentLabel,
}

impl From<&LabeledReview> for ReviewRow {
    fn from(r: &LabeledReview) -> Self {
        Self {
            id: r.review.id.clone(),
            title: r.review.title.clone(),
            review_text: r.review.review_text.clone(),
            date: r.review.date.clone(),
            rating: r.review.rating,
            source: r.review.source.clone(),
            reviewer_name: r.review.reviewer_name.clone(),
            sentiment_polarity: r.sentiment.polarity,
            sentiment_subjectivity: r.sentiment.subjectivity,
            sentiment_label: r.sentiment.label,
        }
    }
}

impl From<ReviewRow> for LabeledReview {
    fn from(row: ReviewRow) -> Self {
        LabeledReview::new(
            Review {
                id: row.id,
                title: row.title,
                review_text: row.review_text,
                date: row.date,
                rating: row.rating,
                source: row.source,
                reviewer_name: row.reviewer_name,
            },
            SentimentResult {
                polarity: row.sentiment_polarity,
                subjectivity: row.sentiment_subjectivity,
                label: row.sentiment_label,
            },
        )
    }
}

/// Reads and writes the labeled-review CSV export
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every record, replacing the file. The header is written even
    /// when there are no records.
    pub fn write(&self, records: &[LabeledReview]) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(COLUMNS)?;
        for record in records {
            writer.serialize(ReviewRow::from(record))?;
        }
        writer.flush()?;

        debug!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(records.len())
    }

    pub fn read(&self) -> Result<Vec<LabeledReview>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize::<ReviewRow>() {
            records.push(row?.into());
        }
        Ok(records)
    }
}
