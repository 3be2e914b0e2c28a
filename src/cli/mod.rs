pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "driftnet")]
#[command(about = "Harvest product reviews and classify their sentiment", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/driftnet/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape product pages, classify the reviews and write the reports
    Scrape(ScrapeArgs),
    /// Classify free text with the configured thresholds
    Classify {
        /// Text to classify; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Recompute the summary from a CSV export or an archived run
    Summary {
        /// CSV export to read (default: the configured output file)
        #[arg(short, long, conflicts_with_all = ["latest", "run"])]
        input: Option<PathBuf>,

        /// Use the most recent run from the archive
        #[arg(long, conflicts_with = "run")]
        latest: bool,

        /// Use the archived run with this id
        #[arg(long)]
        run: Option<i64>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// Product page to scrape; repeat for several pages
    #[arg(short, long = "url")]
    pub urls: Vec<String>,

    /// Maximum number of reviews kept per page
    #[arg(short, long)]
    pub max_reviews: Option<usize>,

    /// Run the browser without a window
    #[arg(long, conflicts_with = "headed")]
    pub headless: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// CSV output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Markdown report path
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Keep a copy of every rendered page
    #[arg(long)]
    pub save_raw: bool,
}

impl ScrapeArgs {
    /// Apply flags on top of file configuration
    pub fn apply(&self, config: &mut Config) {
        if !self.urls.is_empty() {
            config.run.product_urls = self.urls.iter().map(|u| u.trim().to_string()).collect();
        }
        if let Some(max) = self.max_reviews {
            config.extraction.max_reviews = max;
        }
        if self.headless {
            config.scraper.headless = true;
        }
        if self.headed {
            config.scraper.headless = false;
        }
        if let Some(ref output) = self.output {
            config.run.output_csv = output.clone();
        }
        if let Some(ref report) = self.report {
            config.run.report_path = report.clone();
        }
        if self.save_raw {
            config.run.save_raw = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_scrape_flags_override_config() {
        let cli = parse(&[
            "driftnet",
            "scrape",
            "--url",
            "https://shop.test/a",
            "--url",
            "https://shop.test/b",
            "--max-reviews",
            "5",
            "--headed",
            "--output",
            "out.csv",
        ]);
        let Commands::Scrape(args) = cli.command else {
            panic!("expected scrape");
        };

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.run.product_urls.len(), 2);
        assert_eq!(config.extraction.max_reviews, 5);
        assert!(!config.scraper.headless);
        assert_eq!(config.run.output_csv, PathBuf::from("out.csv"));
        assert!(!config.run.save_raw);
    }

    #[test]
    fn test_scrape_without_flags_keeps_config() {
        let Commands::Scrape(args) = parse(&["driftnet", "scrape"]).command else {
            panic!("expected scrape");
        };
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.run.product_urls, Config::default().run.product_urls);
        assert!(config.scraper.headless);
    }

    #[test]
    fn test_conflicting_flags() {
        assert!(Cli::try_parse_from(["driftnet", "scrape", "--headless", "--headed"]).is_err());
        assert!(
            Cli::try_parse_from(["driftnet", "summary", "--latest", "--input", "a.csv"]).is_err()
        );
        assert!(
            Cli::try_parse_from(["driftnet", "summary", "--latest", "--run", "3"]).is_err()
        );
        assert!(Cli::try_parse_from(["driftnet", "classify"]).is_err());
    }

    #[test]
    fn test_summary_run_id() {
        let cli = parse(&["driftnet", "summary", "--run", "7"]);
        let Commands::Summary { input, latest, run } = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(run, Some(7));
        assert!(input.is_none());
        assert!(!latest);
    }
}
