//! # driftnet
//!
//! Harvests customer reviews from JavaScript-heavy product pages and labels
//! each one with a sentiment.
//!
//! ## Architecture
//!
//! driftnet follows a pipeline architecture:
//!
//! ```text
//! Browser session → markup snapshot → Extractor → Classifier → Reports
//! ```
//!
//! - [`scraper`]: drives a headless Chrome page through consent, the
//!   reviews tab and every "show more" click
//! - [`extract`]: finds review containers in the rendered markup and parses
//!   them into records
//! - [`sentiment`]: polarity, subjectivity and a three-way label
//! - [`report`]: summary statistics, CSV export, markdown report
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape the configured product pages
//! driftnet scrape
//!
//! # Scrape one page with a visible browser
//! driftnet scrape --url https://www.bestbuy.ca/en-ca/product/... --headed
//!
//! # Classify a sentence
//! driftnet classify "Battery life is not great"
//!
//! # Summarize the last export again
//! driftnet summary
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// the run archive and the sentiment classifier.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/driftnet/config.toml`.
pub mod config;

/// Command-line interface using clap.
///
/// - `scrape` - Harvest, classify and report
/// - `classify <text>` - Classify free text
/// - `summary [--input <csv> | --latest]` - Summarize earlier results
pub mod cli;

/// Core domain models.
///
/// - [`Review`](domain::Review): one harvested review
/// - [`SentimentResult`](domain::SentimentResult): polarity, subjectivity, label
/// - [`LabeledReview`](domain::LabeledReview): the two together
pub mod domain;

/// Review discovery and field parsing over rendered markup.
pub mod extract;

/// Summary statistics, insights and output files.
pub mod report;

/// Browser automation: render client, pagination controller, harvester.
pub mod scraper;

/// Text normalization and lexicon-based sentiment scoring.
pub mod sentiment;

/// SQLite archive of past runs.
///
/// - [`ReviewStore`](store::ReviewStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
