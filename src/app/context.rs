use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{DriftnetError, Result};
use crate::config::Config;
use crate::extract::ReviewExtractor;
use crate::sentiment::SentimentClassifier;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub classifier: SentimentClassifier,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = match &config.run.database {
            Some(p) => p.clone(),
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Ok(Self::with_store(config, store))
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Ok(Self::with_store(config, store))
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Self {
        let classifier = SentimentClassifier::new(config.sentiment);
        Self {
            config,
            store,
            classifier,
        }
    }

    /// Extractor built from the current extraction settings
    pub fn extractor(&self) -> ReviewExtractor {
        ReviewExtractor::new(self.config.extraction.clone())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| DriftnetError::Other("Could not find data directory".into()))?;
        let driftnet_dir = data_dir.join("driftnet");
        std::fs::create_dir_all(&driftnet_dir)?;
        Ok(driftnet_dir.join("driftnet.db"))
    }
}
