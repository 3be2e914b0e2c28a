pub mod sqlite;

use chrono::{DateTime, Utc};

use crate::app::Result;
use crate::domain::LabeledReview;

pub use sqlite::SqliteStore;

/// One archived scrape
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub urls: Vec<String>,
    pub review_count: usize,
}

pub trait ReviewStore {
    // Run operations
    fn record_run(
        &self,
        started_at: DateTime<Utc>,
        urls: &[String],
        records: &[LabeledReview],
    ) -> Result<i64>;
    fn get_run(&self, id: i64) -> Result<Option<Run>>;
    fn latest_run(&self) -> Result<Option<Run>>;

    // Review operations
    fn reviews_for_run(&self, run_id: i64) -> Result<Vec<LabeledReview>>;
}
