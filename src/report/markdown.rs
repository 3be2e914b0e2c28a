use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::app::Result;
use crate::domain::{LabeledReview, SentimentLabel};
use crate::report::{truncate, Insights, Summary};

/// Narrative markdown summary of one run
pub struct MarkdownReport {
    path: PathBuf,
}

impl MarkdownReport {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(
        &self,
        summary: &Summary,
        insights: &Insights,
        source: &str,
        csv_path: &Path,
    ) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = render(summary, insights, source, csv_path, Local::now());
        fs::write(&self.path, content)?;
        Ok(())
    }
}

fn highlight_lines(out: &mut String, reviews: &[LabeledReview], empty: &str) {
    if reviews.is_empty() {
        let _ = writeln!(out, "- {empty}");
        return;
    }
    for r in reviews {
        let _ = writeln!(
            out,
            "- **{}/5** {} (polarity {:.2})\n  > {}",
            r.review.rating.unwrap_or_default(),
            truncate(&r.review.title, 80),
            r.sentiment.polarity,
            truncate(&r.review.review_text, 100)
        );
    }
}

pub fn render(
    summary: &Summary,
    insights: &Insights,
    source: &str,
    csv_path: &Path,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Review Sentiment Report\n");
    let _ = writeln!(out, "## Overview\n");
    let _ = writeln!(out, "- **Reviews analysed**: {}", summary.total);
    let _ = writeln!(out, "- **Unique reviews**: {}", insights.unique);
    let _ = writeln!(
        out,
        "- **Generated**: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "- **Source**: {source}");
    match summary.avg_rating {
        Some(avg) => {
            let _ = writeln!(out, "- **Average rating**: {avg:.2}");
        }
        None => {
            let _ = writeln!(out, "- **Average rating**: n/a");
        }
    }
    let _ = writeln!(out, "- **Average polarity**: {:.3}", summary.avg_polarity);
    let _ = writeln!(
        out,
        "- **Average subjectivity**: {:.3}\n",
        summary.avg_subjectivity
    );

    let _ = writeln!(out, "## Sentiment\n");
    let _ = writeln!(out, "| Label | Reviews | Share |");
    let _ = writeln!(out, "|---|---:|---:|");
    for label in SentimentLabel::ALL {
        let _ = writeln!(
            out,
            "| {} | {} | {:.1}% |",
            label,
            summary.count(label),
            summary.percentage(label)
        );
    }

    let _ = writeln!(out, "\n## What customers love\n");
    highlight_lines(
        &mut out,
        &insights.top_positive,
        "No strongly positive reviews found",
    );

    let _ = writeln!(out, "\n## Pain points\n");
    highlight_lines(
        &mut out,
        &insights.top_negative,
        "No strongly negative reviews found",
    );

    let _ = writeln!(out, "\n## Ratings\n");
    let _ = writeln!(out, "| Rating | Reviews | Share | Positive | Negative | Neutral |");
    let _ = writeln!(out, "|---:|---:|---:|---:|---:|---:|");
    for (bucket, row) in insights.distribution.iter().zip(&insights.by_rating) {
        let _ = writeln!(
            out,
            "| {} | {} | {:.1}% | {} | {} | {} |",
            bucket.rating, bucket.count, bucket.percentage, row.positive, row.negative, row.neutral
        );
    }

    let _ = writeln!(out, "\n## Files\n");
    let _ = writeln!(out, "- `{}`: every review with its sentiment", csv_path.display());

    out
}
