use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{DriftnetError, Result};
use crate::domain::{LabeledReview, Review, SentimentLabel, SentimentResult};
use crate::store::{ReviewStore, Run};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;

        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| DriftnetError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            DriftnetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn run_from_row(row: &Row<'_>) -> rusqlite::Result<Run> {
        Ok(Run {
            id: row.get(0)?,
            started_at: row
                .get::<_, String>(1)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            urls: row
                .get::<_, String>(2)
                .ok()
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            review_count: row.get::<_, i64>(3)? as usize,
        })
    }
}

impl ReviewStore for SqliteStore {
    fn record_run(
        &self,
        started_at: DateTime<Utc>,
        urls: &[String],
        records: &[LabeledReview],
    ) -> Result<i64> {
        let urls_json =
            serde_json::to_string(urls).map_err(|e| DriftnetError::Other(e.to_string()))?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (started_at, urls, review_count) VALUES (?1, ?2, ?3)",
            params![started_at.to_rfc3339(), urls_json, records.len() as i64],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO reviews (run_id, position, id, title, review_text, date, rating,
                                      source, reviewer_name, polarity, subjectivity, label)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for (position, r) in records.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    position as i64,
                    r.review.id,
                    r.review.title,
                    r.review.review_text,
                    r.review.date,
                    r.review.rating,
                    r.review.source,
                    r.review.reviewer_name,
                    r.sentiment.polarity,
                    r.sentiment.subjectivity,
                    r.sentiment.label.as_str(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }

    fn get_run(&self, id: i64) -> Result<Option<Run>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                "SELECT id, started_at, urls, review_count FROM runs WHERE id = ?1",
                params![id],
                Self::run_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn latest_run(&self) -> Result<Option<Run>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                "SELECT id, started_at, urls, review_count FROM runs
                 ORDER BY started_at DESC, id DESC LIMIT 1",
                [],
                Self::run_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn reviews_for_run(&self, run_id: i64) -> Result<Vec<LabeledReview>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, review_text, date, rating, source, reviewer_name,
                    polarity, subjectivity, label
             FROM reviews WHERE run_id = ?1 ORDER BY position",
        )?;

        let reviews = stmt
            .query_map(params![run_id], |row| {
                Ok(LabeledReview::new(
                    Review {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        review_text: row.get(2)?,
                        date: row.get(3)?,
                        rating: row.get(4)?,
                        source: row.get(5)?,
                        reviewer_name: row.get(6)?,
                    },
                    SentimentResult {
                        polarity: row.get(7)?,
                        subjectivity: row.get(8)?,
                        label: row
                            .get::<_, String>(9)?
                            .parse()
                            .unwrap_or(SentimentLabel::Neutral),
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::labeled;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_record_and_read_back_run() {
        let store = SqliteStore::in_memory().unwrap();
        let records = vec![
            labeled("Clear calls even outdoors", Some(5.0), 0.4),
            labeled("Case hinge snapped", None, -0.4),
        ];
        let urls = vec!["https://shop.test/a".to_string()];

        let id = store.record_run(at(9), &urls, &records).unwrap();
        let run = store.get_run(id).unwrap().unwrap();
        assert_eq!(run.urls, urls);
        assert_eq!(run.review_count, 2);
        assert_eq!(run.started_at, at(9));

        assert_eq!(store.reviews_for_run(id).unwrap(), records);
    }

    #[test]
    fn test_latest_run() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.latest_run().unwrap().is_none());

        store.record_run(at(8), &[], &[]).unwrap();
        let newest = store.record_run(at(10), &[], &[]).unwrap();
        store.record_run(at(9), &[], &[]).unwrap();

        assert_eq!(store.latest_run().unwrap().unwrap().id, newest);
    }

    #[test]
    fn test_unknown_run() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_run(42).unwrap().is_none());
        assert!(store.reviews_for_run(42).unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driftnet.db");
        let id = {
            let store = SqliteStore::new(&path).unwrap();
            store
                .record_run(at(7), &[], &[labeled("Solid purchase", Some(4.0), 0.2)])
                .unwrap()
        };

        let reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(reopened.reviews_for_run(id).unwrap().len(), 1);
    }
}
