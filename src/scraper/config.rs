use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scraper::Locator;

/// Inclusive `[min, max]` sampling interval in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange(pub u64, pub u64);

impl DelayRange {
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.0.min(self.1))
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.0.max(self.1))
    }
}

/// Jittered pacing intervals for each delay severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub short_ms: DelayRange,
    pub medium_ms: DelayRange,
    pub long_ms: DelayRange,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            short_ms: DelayRange(1000, 3000),
            medium_ms: DelayRange(3000, 6000),
            long_ms: DelayRange(5000, 10000),
        }
    }
}

impl DelayConfig {
    /// No pacing at all. Useful for tests and replaying saved pages.
    pub fn none() -> Self {
        Self {
            short_ms: DelayRange(0, 0),
            medium_ms: DelayRange(0, 0),
            long_ms: DelayRange(0, 0),
        }
    }
}

/// Configuration for the browser session and pagination controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Page load timeout in seconds (default: 30)
    pub page_load_timeout_secs: u64,

    /// Per-candidate wait for a consent button in seconds (default: 5)
    pub consent_timeout_secs: u64,

    /// Per-candidate wait for the reviews tab in seconds (default: 10)
    pub navigation_timeout_secs: u64,

    /// Per-candidate wait for a reveal control in seconds (default: 5)
    pub reveal_timeout_secs: u64,

    /// Polling interval while waiting for an element in milliseconds (default: 250)
    pub poll_interval_ms: u64,

    /// Hard cap on reveal clicks per session (default: 20)
    pub max_clicks: u32,

    /// Number of product pages scraped at the same time (default: 1)
    pub max_sessions: usize,

    /// Whether to block images for faster loading (default: true)
    pub block_images: bool,

    /// Pacing intervals
    pub delays: DelayConfig,

    /// User agents to rotate through, one picked at random per session
    pub user_agents: Vec<String>,

    /// Cookie/consent buttons, in priority order
    pub consent_locators: Vec<Locator>,

    /// Reviews tab or link, in priority order
    pub navigation_locators: Vec<Locator>,

    /// "Show more" style controls, in priority order
    pub reveal_locators: Vec<Locator>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            page_load_timeout_secs: 30,
            consent_timeout_secs: 5,
            navigation_timeout_secs: 10,
            reveal_timeout_secs: 5,
            poll_interval_ms: 250,
            max_clicks: 20,
            max_sessions: 1,
            block_images: true,
            delays: DelayConfig::default(),
            user_agents: vec![
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
                    .to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ],
            consent_locators: vec![
                Locator::new("//button[contains(text(), 'Accept')]"),
                Locator::new("//button[contains(text(), 'Agree')]"),
                Locator::new("//button[contains(@id, 'accept')]"),
                Locator::new("//button[contains(@class, 'accept')]"),
            ],
            navigation_locators: vec![
                Locator::new("//a[contains(@href, 'reviews')]"),
                Locator::new("//button[contains(text(), 'Reviews')]"),
                Locator::new("//span[contains(text(), 'Reviews')]/.."),
                Locator::new("//*[contains(@data-automation, 'review')]"),
            ],
            reveal_locators: vec![
                Locator::new("//button[contains(text(), 'Show more')]"),
                Locator::new("//button[contains(text(), 'Load more')]"),
                Locator::new("//button[contains(@class, 'showMore')]"),
                Locator::new("//*[contains(@data-automation, 'show-more')]"),
            ],
        }
    }
}

impl ScraperConfig {
    /// Get the page load timeout as a Duration
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn consent_timeout(&self) -> Duration {
        Duration::from_secs(self.consent_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn reveal_timeout(&self) -> Duration {
        Duration::from_secs(self.reveal_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }
}
