//! Browser-driven review harvesting.
//!
//! This module reveals the full review list of a product page and hands
//! the rendered markup to the extractor.
//!
//! # Architecture
//!
//! ```text
//! URL → RenderClient → PaginationController → markup → ReviewExtractor
//! ```
//!
//! The controller only talks to the [`RenderClient`] trait, so the Chrome
//! transport can be swapped for a scripted fake in tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use driftnet::scraper::{ChromeLauncher, Harvester, ScraperConfig};
//!
//! let config = ScraperConfig::default();
//! let harvester = Harvester::new(ChromeLauncher::new(config.clone()), config, extractor);
//!
//! let batch = harvester.harvest_all(&urls).await;
//! ```

mod chrome;
mod config;
mod controller;
mod harvest;
mod pacer;
mod scripts;

#[cfg(test)]
pub(crate) mod testing;

pub use chrome::{ChromeLauncher, ChromeRenderClient};
pub use config::{DelayConfig, DelayRange, ScraperConfig};
pub use controller::{
    ActionOutcome, PaginationController, PaginationState, SessionError, SessionReport,
};
pub use harvest::{BatchOutcome, Harvester, UrlHarvest};
pub use pacer::{Pacer, Severity};

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An XPath expression identifying candidate elements on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator {
    xpath: String,
}

impl Locator {
    pub fn new(xpath: impl Into<String>) -> Self {
        Self {
            xpath: xpath.into(),
        }
    }

    pub fn xpath(&self) -> &str {
        &self.xpath
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xpath)
    }
}

/// How a click attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Native click went through
    Clicked,
    /// Click point was intercepted, a programmatic click was dispatched instead
    ForcedClick,
    /// Neither click worked
    Failed,
}

impl ClickOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Page load timed out after {0:?}")]
    Timeout(Duration),

    #[error("Script execution failed: {0}")]
    Script(String),

    #[error("Browser session closed")]
    Closed,
}

/// Narrow interface over a scriptable browsing context.
///
/// Every method except `load` and `current_markup` reports failure through
/// its return value instead of an error: a missing element, a wait that
/// timed out and a click that went nowhere are all ordinary outcomes.
#[async_trait]
pub trait RenderClient: Send + Sync {
    /// Element handle type of this transport
    type Handle: Send + Sync;

    /// Navigate to a URL and wait for the document to load
    async fn load(&self, url: &str) -> Result<(), RenderError>;

    /// All elements matching any of the locators, in locator order
    async fn find_candidates(&self, locators: &[Locator]) -> Vec<Self::Handle>;

    /// Whether the element is currently rendered with a non-empty box
    async fn is_visible(&self, handle: &Self::Handle) -> bool;

    /// Scroll the element to the middle of the viewport
    async fn scroll_into_view(&self, handle: &Self::Handle);

    /// Click the element, falling back to a programmatic click when intercepted
    async fn click(&self, handle: &Self::Handle) -> ClickOutcome;

    /// Wait until an element matching the locator is visible and enabled
    async fn wait_until_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Option<Self::Handle>;

    /// Snapshot of the rendered document
    async fn current_markup(&self) -> Result<String, RenderError>;

    /// Release the browsing context. Called on every exit path.
    async fn close(&self);
}

/// Opens one isolated browsing context per scrape session
#[async_trait]
pub trait RenderClientFactory: Send + Sync {
    type Client: RenderClient;

    async fn open(&self) -> Result<Self::Client, RenderError>;
}
