//! Configuration management for driftnet.
//!
//! Configuration is read from `~/.config/driftnet/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! Command-line flags are applied on top of the loaded values.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::extract::ExtractionConfig;
use crate::scraper::{Locator, ScraperConfig};
use crate::sentiment::ThresholdConfig;

/// Product page scraped when no URL is given
pub const DEFAULT_PRODUCT_URL: &str = "https://www.bestbuy.ca/en-ca/product/apple-airpods-pro-2-noise-cancelling-true-wireless-earbuds-with-usb-c-magsafe-charging-case/17278649";

/// What to scrape and where results go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Product pages scraped by `driftnet scrape` without `--url`
    pub product_urls: Vec<String>,

    /// CSV export of every labeled review
    pub output_csv: PathBuf,

    /// Markdown summary report
    pub report_path: PathBuf,

    /// Directory for raw page snapshots
    pub raw_dir: PathBuf,

    /// Whether to keep raw page snapshots (default: false)
    pub save_raw: bool,

    /// Run archive; `None` puts it in the platform data directory
    pub database: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            product_urls: vec![DEFAULT_PRODUCT_URL.to_string()],
            output_csv: PathBuf::from("data/processed/scraped_reviews.csv"),
            report_path: PathBuf::from("reports/summary_report.md"),
            raw_dir: PathBuf::from("data/raw"),
            save_raw: false,
            database: None,
        }
    }
}

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub scraper: ScraperConfig,
    pub extraction: ExtractionConfig,
    pub sentiment: ThresholdConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/driftnet/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("driftnet").join("config.toml"))
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sentiment.validate()?;

        for raw in &self.run.product_urls {
            url::Url::parse(raw.trim())
                .map_err(|e| ConfigError::Invalid(format!("run.product_urls: {raw}: {e}")))?;
        }

        if self.scraper.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "scraper.max_sessions must be at least 1".into(),
            ));
        }

        if self.scraper.user_agents.is_empty() {
            return Err(ConfigError::Invalid(
                "scraper.user_agents must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    ///
    /// Every value comes from `Config::default()`, so the file written on
    /// first run parses back to the built-in defaults.
    fn default_config_content() -> String {
        let Config {
            run,
            scraper,
            extraction,
            sentiment,
        } = Config::default();
        let delays = &scraper.delays;
        let locators = |list: &[Locator]| toml_array(list.iter().map(Locator::xpath));

        format!(
            r##"# driftnet configuration
#
# Every key is optional; anything left out falls back to the built-in
# default. Command-line flags override values from this file.

[run]
# Product pages scraped when `driftnet scrape` is run without --url
product_urls = {product_urls}

# Where the labeled reviews and the summary report are written
output_csv = {output_csv}
report_path = {report_path}

# Keep a copy of every rendered page
save_raw = {save_raw}
raw_dir = {raw_dir}

# Run archive used by `driftnet summary --latest`
# database = "/path/to/driftnet.db"

[scraper]
# Run browser in headless mode (no visible window)
headless = {headless}

# Timeouts in seconds
page_load_timeout_secs = {page_load}
consent_timeout_secs = {consent}
navigation_timeout_secs = {navigation}
reveal_timeout_secs = {reveal}

# How often to re-check for an element while waiting (milliseconds)
poll_interval_ms = {poll}

# Maximum "show more" clicks per page
max_clicks = {max_clicks}

# Product pages scraped at the same time
max_sessions = {max_sessions}

# Block images for faster loading
block_images = {block_images}

# User agents, one picked at random per page
user_agents = {user_agents}

# XPath candidates, tried in order
consent_locators = {consent_locators}
navigation_locators = {navigation_locators}
reveal_locators = {reveal_locators}

[scraper.delays]
# Random pause ranges in milliseconds: [min, max]
short_ms = [{short_min}, {short_max}]
medium_ms = [{medium_min}, {medium_max}]
long_ms = [{long_min}, {long_max}]

[extraction]
# Stop after this many valid reviews per page
max_reviews = {max_reviews}

# Provenance tag stored on every review
source = {source}

# Class-name fragments that mark a review container
class_indicators = {class_indicators}

# CSS selectors for each field, tried in order
text_selectors = {text_selectors}
title_selectors = {title_selectors}
date_selectors = {date_selectors}
name_selectors = {name_selectors}

[sentiment]
# Polarity above `positive` is Positive, below `negative` is Negative
positive = {positive:?}
negative = {negative:?}
"##,
            product_urls = toml_array(&run.product_urls),
            output_csv = toml_string(&run.output_csv.to_string_lossy()),
            report_path = toml_string(&run.report_path.to_string_lossy()),
            save_raw = run.save_raw,
            raw_dir = toml_string(&run.raw_dir.to_string_lossy()),
            headless = scraper.headless,
            page_load = scraper.page_load_timeout_secs,
            consent = scraper.consent_timeout_secs,
            navigation = scraper.navigation_timeout_secs,
            reveal = scraper.reveal_timeout_secs,
            poll = scraper.poll_interval_ms,
            max_clicks = scraper.max_clicks,
            max_sessions = scraper.max_sessions,
            block_images = scraper.block_images,
            user_agents = toml_array(&scraper.user_agents),
            consent_locators = locators(&scraper.consent_locators),
            navigation_locators = locators(&scraper.navigation_locators),
            reveal_locators = locators(&scraper.reveal_locators),
            short_min = delays.short_ms.0,
            short_max = delays.short_ms.1,
            medium_min = delays.medium_ms.0,
            medium_max = delays.medium_ms.1,
            long_min = delays.long_ms.0,
            long_max = delays.long_ms.1,
            max_reviews = extraction.max_reviews,
            source = toml_string(&extraction.source),
            class_indicators = toml_array(&extraction.class_indicators),
            text_selectors = toml_array(&extraction.text_selectors),
            title_selectors = toml_array(&extraction.title_selectors),
            date_selectors = toml_array(&extraction.date_selectors),
            name_selectors = toml_array(&extraction.name_selectors),
            positive = sentiment.positive,
            negative = sentiment.negative,
        )
    }
}

/// Quote a string as a TOML value
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Multi-line TOML array, one quoted entry per line
fn toml_array<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::from("[\n");
    for item in items {
        out.push_str("    ");
        out.push_str(&toml_string(item.as_ref()));
        out.push_str(",\n");
    }
    out.push(']');
    out
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
