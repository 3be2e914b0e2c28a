use std::path::{Path, PathBuf};

use chrono::Local;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

use crate::domain::Review;
use crate::extract::ReviewExtractor;
use crate::scraper::config::ScraperConfig;
use crate::scraper::{
    PaginationController, RenderClient, RenderClientFactory, SessionError,
    SessionReport, Severity,
};

/// Reviews harvested from one product page
#[derive(Debug, Clone)]
pub struct UrlHarvest {
    pub url: String,
    pub reviews: Vec<Review>,
    /// Containers the extractor looked at
    pub candidates: usize,
    /// Containers that failed the validity gate
    pub rejected: usize,
    /// Reveal clicks performed
    pub clicks: u32,
}

/// Outcome of a multi-URL run; failed URLs do not poison the batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reviews: Vec<Review>,
    pub sessions: Vec<(String, Result<usize, SessionError>)>,
}

impl BatchOutcome {
    pub fn failed(&self) -> usize {
        self.sessions.iter().filter(|(_, r)| r.is_err()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.sessions.len() - self.failed()
    }
}

/// Runs scrape sessions over a list of product URLs.
///
/// Each session opens its own browsing context from the factory and
/// releases it whatever the outcome.
pub struct Harvester<F: RenderClientFactory> {
    factory: F,
    controller: PaginationController,
    extractor: ReviewExtractor,
    max_sessions: usize,
    raw_dir: Option<PathBuf>,
}

impl<F: RenderClientFactory> Harvester<F> {
    pub fn new(factory: F, config: ScraperConfig, extractor: ReviewExtractor) -> Self {
        let max_sessions = config.max_sessions.max(1);
        Self {
            factory,
            controller: PaginationController::new(config),
            extractor,
            max_sessions,
            raw_dir: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.controller = self.controller.with_cancel(cancel);
        self
    }

    /// Save every rendered snapshot under this directory
    pub fn with_raw_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw_dir = Some(dir.into());
        self
    }

    /// Scrape a single product page
    pub async fn harvest(&self, url: &str) -> Result<UrlHarvest, SessionError> {
        let client = self.factory.open().await.map_err(SessionError::Open)?;
        let result = self.controller.run(&client, url).await;
        client.close().await;
        let report = result?;

        if let Some(ref dir) = self.raw_dir {
            save_snapshot(dir, &report).await;
        }

        let extraction = self.extractor.extract(&report.markup);
        info!(
            "Scraped {} reviews from {} ({} candidates, {} rejected)",
            extraction.reviews.len(),
            url,
            extraction.candidates,
            extraction.rejected
        );

        Ok(UrlHarvest {
            url: url.to_string(),
            reviews: extraction.reviews,
            candidates: extraction.candidates,
            rejected: extraction.rejected,
            clicks: report.pagination.clicks,
        })
    }

    /// Scrape every URL, `max_sessions` at a time, with a long pause
    /// before each session after the first
    pub async fn harvest_all(&self, urls: &[String]) -> BatchOutcome {
        let results: Vec<(String, Result<UrlHarvest, SessionError>)> =
            stream::iter(urls.iter().enumerate())
                .map(|(i, url)| async move {
                    if i > 0 {
                        let pause = self
                            .controller
                            .pacer()
                            .pause(Severity::Long, self.controller.cancel_token())
                            .await;
                        if let Err(e) = pause {
                            return (url.clone(), Err(e));
                        }
                    }
                    (url.clone(), self.harvest(url).await)
                })
                .buffered(self.max_sessions)
                .collect()
                .await;

        let mut batch = BatchOutcome::default();
        for (url, result) in results {
            match result {
                Ok(harvest) => {
                    batch
                        .sessions
                        .push((url, Ok(harvest.reviews.len())));
                    batch.reviews.extend(harvest.reviews);
                }
                Err(e) => {
                    warn!("Error scraping {}: {}", url, e);
                    batch.sessions.push((url, Err(e)));
                }
            }
        }
        batch
    }
}

/// File name for a raw snapshot: timestamp plus the last path segment of the URL
fn snapshot_name(url: &str) -> String {
    let slug = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()?
                .filter(|s| !s.trim().is_empty())
                .next_back()
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "page".to_string());
    let slug: String = slug
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}-{}.html", Local::now().format("%Y%m%d-%H%M%S"), slug)
}

async fn save_snapshot(dir: &Path, report: &SessionReport) {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!("Failed to create raw snapshot dir {}: {}", dir.display(), e);
        return;
    }
    let path = dir.join(snapshot_name(&report.url));
    match tokio::fs::write(&path, &report.markup).await {
        Ok(()) => info!("Saved raw page to {}", path.display()),
        Err(e) => warn!("Failed to save raw page to {}: {}", path.display(), e),
    }
}
