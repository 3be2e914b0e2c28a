use std::path::Path;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::app::{AppContext, DriftnetError, Result};
use crate::domain::LabeledReview;
use crate::report::{CsvExporter, Insights, MarkdownReport, Summary};
use crate::scraper::{ChromeLauncher, Harvester};
use crate::store::{ReviewStore, Run};

const RULE: &str = "==================================================";

fn section(title: &str) {
    println!("\n{}\n{}\n{}", RULE, title, RULE);
}

/// Print summary and insights for a set of labeled reviews
fn print_analysis(records: &[LabeledReview]) -> (Summary, Insights) {
    let summary = Summary::from_records(records);
    let insights = Insights::from_records(records);

    section("Sentiment Analysis Summary");
    println!("{}", summary);
    section("Insights");
    print!("{}", insights);

    (summary, insights)
}

pub async fn scrape(ctx: &AppContext, cancel: CancellationToken) -> Result<()> {
    let urls = ctx.config.run.product_urls.clone();
    if urls.is_empty() {
        println!("No product URLs configured");
        return Ok(());
    }

    let started_at = Utc::now();
    println!("Scraping {} product page(s)...", urls.len());

    let scraper_config = ctx.config.scraper.clone();
    let mut harvester = Harvester::new(
        ChromeLauncher::new(scraper_config.clone()),
        scraper_config,
        ctx.extractor(),
    )
    .with_cancel(cancel);
    if ctx.config.run.save_raw {
        harvester = harvester.with_raw_dir(ctx.config.run.raw_dir.clone());
    }

    let batch = harvester.harvest_all(&urls).await;
    for (url, result) in &batch.sessions {
        match result {
            Ok(count) => println!("  {} reviews from {}", count, url),
            Err(e) => eprintln!("  Error scraping {}: {}", url, e),
        }
    }
    println!(
        "Scrape complete: {} reviews, {} pages ok, {} failed",
        batch.reviews.len(),
        batch.succeeded(),
        batch.failed()
    );

    if batch.reviews.is_empty() {
        println!("No reviews were scraped");
        return Ok(());
    }

    let records = ctx.classifier.classify_all(batch.reviews);

    let exporter = CsvExporter::new(&ctx.config.run.output_csv);
    exporter.write(&records)?;
    println!("Results saved to: {}", exporter.path().display());

    let (summary, insights) = print_analysis(&records);

    match ctx.store.record_run(started_at, &urls, &records) {
        Ok(run_id) => println!("Archived as run {}", run_id),
        Err(e) => warn!("Failed to archive run: {}", e),
    }

    let report = MarkdownReport::new(&ctx.config.run.report_path);
    report.write(
        &summary,
        &insights,
        &ctx.config.extraction.source,
        exporter.path(),
    )?;
    println!("Summary report saved to: {}", report.path().display());

    Ok(())
}

pub fn classify(ctx: &AppContext, text: &[String]) -> Result<()> {
    let text = text.join(" ");
    let result = ctx.classifier.classify(&text);

    println!("{}", result.label);
    println!("  polarity:     {:.3}", result.polarity);
    println!("  subjectivity: {:.3}", result.subjectivity);
    Ok(())
}

fn archived_run(ctx: &AppContext, id: Option<i64>) -> Result<Run> {
    match id {
        Some(id) => ctx.store.get_run(id)?.ok_or(DriftnetError::RunNotFound(id)),
        None => ctx
            .store
            .latest_run()?
            .ok_or_else(|| DriftnetError::Other("No archived runs".into())),
    }
}

/// Summarize a CSV export, or an archived run when `run` or `latest` is given
pub fn summary(
    ctx: &AppContext,
    input: Option<&Path>,
    run: Option<i64>,
    latest: bool,
) -> Result<()> {
    let records = if latest || run.is_some() {
        let run = archived_run(ctx, run)?;
        println!(
            "Run {} started {} ({} reviews)",
            run.id,
            run.started_at.format("%Y-%m-%d %H:%M:%S"),
            run.review_count
        );
        for url in &run.urls {
            println!("  {}", url);
        }
        ctx.store.reviews_for_run(run.id)?
    } else {
        let path = input.unwrap_or(ctx.config.run.output_csv.as_path());
        println!("Reading {}", path.display());
        CsvExporter::new(path).read()?
    };

    if records.is_empty() {
        println!("No reviews to summarize");
        return Ok(());
    }

    print_analysis(&records);
    Ok(())
}
