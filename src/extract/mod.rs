//! Turning rendered review markup into validated [`Review`] records.
//!
//! Extraction runs in three steps:
//!
//! 1. **Discovery** - find candidate containers with several independent
//!    heuristics and keep each DOM node once
//! 2. **Field parsing** - each field has an ordered [`Chain`] of strategies;
//!    the first one that yields a value wins
//! 3. **Validation** - containers without a usable body or rating are
//!    dropped
//!
//! Everything here is synchronous and works on a markup snapshot, so it can
//! be tested without a browser.

pub mod config;
pub mod date;
pub mod discovery;
pub mod fields;
pub mod strategy;

pub use config::ExtractionConfig;
pub use discovery::discover;
pub use strategy::{Chain, FieldStrategy};

use scraper::{ElementRef, Html};
use tracing::{debug, trace};

use crate::domain::{Review, ANONYMOUS, MIN_TEXT_CHARS};
use fields::{AriaLabelRating, FlattenedText, SelectorDate, SelectorText, TextPatternRating};

/// Result of extracting one snapshot
#[derive(Debug, Default)]
pub struct Extraction {
    /// Valid reviews in discovery order
    pub reviews: Vec<Review>,
    /// Containers that were parsed
    pub candidates: usize,
    /// Parsed containers that failed validation
    pub rejected: usize,
}

/// Review extractor built from an [`ExtractionConfig`]
pub struct ReviewExtractor {
    config: ExtractionConfig,
    rating: Chain<f64>,
    text: Chain<String>,
    title: Chain<String>,
    date: Chain<String>,
    name: Chain<String>,
}

fn selector_chain<T>(
    selectors: &[String],
    build: impl Fn(&str) -> Option<Box<dyn FieldStrategy<T>>>,
) -> Chain<T> {
    let mut chain = Chain::new();
    for strategy in selectors.iter().filter_map(|css| build(css)) {
        chain.push(strategy);
    }
    chain
}

impl ReviewExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        let rating = Chain::new().with(AriaLabelRating).with(TextPatternRating);

        let mut text = selector_chain(&config.text_selectors, |css| {
            SelectorText::new(css, MIN_TEXT_CHARS).map(|s| Box::new(s) as Box<dyn FieldStrategy<String>>)
        });
        text.push(Box::new(FlattenedText::default()));

        let title = selector_chain(&config.title_selectors, |css| {
            SelectorText::new(css, 0).map(|s| Box::new(s) as Box<dyn FieldStrategy<String>>)
        });
        let date = selector_chain(&config.date_selectors, |css| {
            SelectorDate::new(css).map(|s| Box::new(s) as Box<dyn FieldStrategy<String>>)
        });
        let name = selector_chain(&config.name_selectors, |css| {
            SelectorText::new(css, 0).map(|s| Box::new(s) as Box<dyn FieldStrategy<String>>)
        });

        Self {
            config,
            rating,
            text,
            title,
            date,
            name,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract valid reviews from a markup snapshot.
    ///
    /// Stops as soon as `max_reviews` valid reviews were collected.
    pub fn extract(&self, markup: &str) -> Extraction {
        let document = Html::parse_document(markup);
        let containers = discover(&document, &self.config.class_indicators);
        debug!("Discovered {} candidate review containers", containers.len());

        let mut extraction = Extraction::default();
        for container in containers {
            if extraction.reviews.len() >= self.config.max_reviews {
                debug!("Reached max_reviews ({})", self.config.max_reviews);
                break;
            }

            extraction.candidates += 1;
            let review = self.parse_container(container);
            match review.validate() {
                Ok(()) => extraction.reviews.push(review),
                Err(reason) => {
                    trace!("Rejected container: {:?}", reason);
                    extraction.rejected += 1;
                }
            }
        }

        extraction
    }

    /// Build a review from one container; fields that cannot be found are left empty
    pub fn parse_container(&self, container: ElementRef<'_>) -> Review {
        Review {
            id: Review::generate_id(),
            title: self.title.run(container).unwrap_or_default(),
            review_text: self.text.run(container).unwrap_or_default(),
            date: self.date.run(container).unwrap_or_default(),
            rating: self.rating.run(container),
            source: self.config.source.clone(),
            reviewer_name: self
                .name
                .run(container)
                .unwrap_or_else(|| ANONYMOUS.to_string()),
        }
    }
}

impl Default for ReviewExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_SOURCE;

    fn card(rating: u8, body: &str) -> String {
        format!(
            r#"<article>
                 <h3>Title {rating}</h3>
                 <div aria-label="{rating} stars out of 5"></div>
                 <p class="review-body">{body}</p>
               </article>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body>{}</body></html>", cards.concat())
    }

    #[test]
    fn test_three_well_formed_reviews() {
        let markup = page(&[
            card(5, "Crisp sound and a snug fit."),
            card(3, "Decent, but the case scratches easily."),
            card(1, "Left earbud died within a week."),
        ]);
        let extraction = ReviewExtractor::default().extract(&markup);

        assert_eq!(extraction.reviews.len(), 3);
        // Each `review-body` paragraph is also a class-matched container
        assert_eq!(extraction.candidates, 6);
        assert_eq!(extraction.rejected, 3);
        let ratings: Vec<_> = extraction.reviews.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![Some(5.0), Some(3.0), Some(1.0)]);
        assert!(extraction.reviews.iter().all(|r| r.source == DEFAULT_SOURCE));
        assert_eq!(extraction.reviews[1].title, "Title 3");
    }

    #[test]
    fn test_short_body_is_discarded() {
        let markup = page(&[card(4, "Too bad.")]);
        let extraction = ReviewExtractor::default().extract(&markup);

        assert!(extraction.reviews.is_empty());
        assert_eq!(extraction.candidates, 2);
        assert_eq!(extraction.rejected, 2);
    }

    #[test]
    fn test_missing_rating_is_discarded() {
        let markup = r#"<article><p class="review-body">Plenty of words but no score at all.</p></article>"#;
        let extraction = ReviewExtractor::default().extract(markup);
        assert!(extraction.reviews.is_empty());
        assert_eq!(extraction.candidates, 2);
        assert_eq!(extraction.rejected, 2);
    }

    #[test]
    fn test_inner_review_classed_elements_are_candidates() {
        let markup = r#"
            <div class="reviewItem">
              <div aria-label="4 stars out of 5"></div>
              <p class="reviewText">Battery easily lasts a full work day.</p>
              <span class="reviewer-name">Sam</span>
            </div>"#;
        let extraction = ReviewExtractor::default().extract(markup);

        // The item itself plus its `reviewText` and `reviewer-name` children
        assert_eq!(extraction.candidates, 3);
        assert_eq!(extraction.rejected, 2);
        assert_eq!(extraction.reviews.len(), 1);
        assert_eq!(extraction.reviews[0].reviewer_name, "Sam");
        assert_eq!(extraction.reviews[0].rating, Some(4.0));
    }

    #[test]
    fn test_max_reviews_caps_output() {
        let cards: Vec<String> = (0..10)
            .map(|i| card(4, &format!("Review number {i} is fine")))
            .collect();
        let extractor = ReviewExtractor::new(ExtractionConfig::default().with_max_reviews(4));
        let extraction = extractor.extract(&page(&cards));

        assert_eq!(extraction.reviews.len(), 4);
        assert_eq!(extraction.candidates, 4);
        assert_eq!(extraction.reviews[3].review_text, "Review number 3 is fine");
    }

    #[test]
    fn test_extraction_is_idempotent_apart_from_ids() {
        let markup = page(&[card(5, "Would buy these again."), card(2, "Muffled and uncomfortable.")]);
        let extractor = ReviewExtractor::default();

        let strip = |mut reviews: Vec<Review>| {
            for r in &mut reviews {
                r.id.clear();
            }
            reviews
        };
        let first = strip(extractor.extract(&markup).reviews);
        let second = strip(extractor.extract(&markup).reviews);
        assert_eq!(first, second);
    }

    #[test]
    fn test_optional_fields() {
        let markup = r#"
            <div class="reviewItem">
              <span class="reviewer-name">Priya</span>
              <span class="review-date">Reviewed on March 3, 2024</span>
              <p class="reviewText">Noise cancelling works on the subway.</p>
              <span>4.5/5</span>
            </div>
            <div class="reviewItem">
              <p class="reviewText">Pairs instantly with my laptop too.</p>
              <span>4 stars</span>
            </div>"#;
        let reviews = ReviewExtractor::default().extract(markup).reviews;

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].reviewer_name, "Priya");
        assert_eq!(reviews[0].date, "2024-03-03");
        assert_eq!(reviews[0].rating, Some(4.5));
        assert_eq!(reviews[1].reviewer_name, ANONYMOUS);
        assert_eq!(reviews[1].date, "");
        assert_eq!(reviews[1].title, "");
    }

    #[test]
    fn test_flattened_fallback_when_no_body_selector_matches() {
        let markup = r#"<article><div aria-label="5 stars out of 5"></div>
            <span>Honestly the best pair of earbuds I have owned in years, no regrets.</span></article>"#;
        let reviews = ReviewExtractor::default().extract(markup).reviews;
        assert_eq!(reviews.len(), 1);
        assert!(reviews[0].review_text.starts_with("Honestly the best"));
    }

    #[test]
    fn test_empty_markup() {
        let extraction = ReviewExtractor::default().extract("");
        assert!(extraction.reviews.is_empty());
        assert_eq!(extraction.candidates, 0);
    }
}
