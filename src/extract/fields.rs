use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::warn;

use crate::extract::date;
use crate::extract::strategy::FieldStrategy;

static ARIA_LABELLED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[aria-label]").unwrap());

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

static TEXT_RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d(?:\.\d)?)\s*(?:/5|out of 5|stars?)").unwrap());

const MAX_RATING: f64 = 5.0;

/// Whitespace-joined text of every text node under the element
pub fn flatten_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn in_range(rating: f64) -> Option<f64> {
    (0.0..=MAX_RATING).contains(&rating).then_some(rating)
}

/// Parse a CSS selector from configuration, logging and skipping bad ones
pub fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Ignoring invalid selector {:?}: {}", css, e);
            None
        }
    }
}

/// Rating from an accessibility label such as "4 stars out of 5"
pub struct AriaLabelRating;

impl AriaLabelRating {
    fn parse_label(label: &str) -> Option<f64> {
        let lower = label.to_lowercase();
        if !lower.contains("star") {
            return None;
        }
        let idx = lower.find("out of")?;
        let left = &lower[..idx];
        let number = NUMBER.find(left)?;
        number.as_str().parse().ok().and_then(in_range)
    }
}

impl FieldStrategy<f64> for AriaLabelRating {
    fn name(&self) -> &str {
        "aria-label rating"
    }

    fn extract(&self, container: ElementRef<'_>) -> Option<f64> {
        std::iter::once(container)
            .chain(container.select(&ARIA_LABELLED))
            .filter_map(|el| el.value().attr("aria-label"))
            .find_map(Self::parse_label)
    }
}

/// Rating from text like "4.5/5", "4 out of 5" or "5 stars"
pub struct TextPatternRating;

impl FieldStrategy<f64> for TextPatternRating {
    fn name(&self) -> &str {
        "text pattern rating"
    }

    fn extract(&self, container: ElementRef<'_>) -> Option<f64> {
        let text = flatten_text(container);
        let captures = TEXT_RATING.captures(&text)?;
        captures[1].parse().ok().and_then(in_range)
    }
}

/// Text of the first element matching a selector, if longer than `min_chars`
pub struct SelectorText {
    css: String,
    selector: Selector,
    min_chars: usize,
}

impl SelectorText {
    pub fn new(css: &str, min_chars: usize) -> Option<Self> {
        Some(Self {
            css: css.to_string(),
            selector: parse_selector(css)?,
            min_chars,
        })
    }
}

impl FieldStrategy<String> for SelectorText {
    fn name(&self) -> &str {
        &self.css
    }

    fn extract(&self, container: ElementRef<'_>) -> Option<String> {
        let element = container.select(&self.selector).next()?;
        let text = flatten_text(element);
        (text.chars().count() > self.min_chars).then_some(text)
    }
}

/// Whole container text as a last resort, capped to `max_tokens` words
pub struct FlattenedText {
    pub min_chars: usize,
    pub max_tokens: usize,
}

impl Default for FlattenedText {
    fn default() -> Self {
        Self {
            min_chars: 50,
            max_tokens: 100,
        }
    }
}

impl FieldStrategy<String> for FlattenedText {
    fn name(&self) -> &str {
        "flattened container text"
    }

    fn extract(&self, container: ElementRef<'_>) -> Option<String> {
        let text = flatten_text(container);
        if text.chars().count() <= self.min_chars {
            return None;
        }
        Some(
            text.split_whitespace()
                .take(self.max_tokens)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// ISO date from the first element matching a selector.
///
/// A machine-readable `datetime` attribute wins over the visible text.
pub struct SelectorDate {
    css: String,
    selector: Selector,
}

impl SelectorDate {
    pub fn new(css: &str) -> Option<Self> {
        Some(Self {
            css: css.to_string(),
            selector: parse_selector(css)?,
        })
    }
}

impl FieldStrategy<String> for SelectorDate {
    fn name(&self) -> &str {
        &self.css
    }

    fn extract(&self, container: ElementRef<'_>) -> Option<String> {
        let element = container.select(&self.selector).next()?;

        if let Some(date) = element.value().attr("datetime").and_then(date::normalize) {
            return Some(date);
        }

        let text = date::strip_review_prefix(&flatten_text(element));
        date::normalize(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn test_aria_label_rating_variants() {
        assert_eq!(AriaLabelRating::parse_label("4 stars out of 5"), Some(4.0));
        assert_eq!(AriaLabelRating::parse_label("Rated 4.5 star out of 5"), Some(4.5));
        assert_eq!(AriaLabelRating::parse_label("4 out of 5"), None);
        assert_eq!(AriaLabelRating::parse_label("5 stars"), None);
        assert_eq!(AriaLabelRating::parse_label("9 stars out of 10"), None);
    }

    #[test]
    fn test_aria_label_rating_from_descendant() {
        let doc = Html::parse_document(
            r#"<div id="c"><span aria-label="Add to cart"></span>
               <span aria-label="3 Stars out of 5"></span></div>"#,
        );
        assert_eq!(AriaLabelRating.extract(first(&doc, "#c")), Some(3.0));
    }

    #[test]
    fn test_text_pattern_rating() {
        let doc = Html::parse_document(
            r#"<div id="a">Rated 4.5/5 by a buyer</div>
               <div id="b">Gave it 2 stars</div>
               <div id="c">I have 3 kids</div>"#,
        );
        assert_eq!(TextPatternRating.extract(first(&doc, "#a")), Some(4.5));
        assert_eq!(TextPatternRating.extract(first(&doc, "#b")), Some(2.0));
        assert_eq!(TextPatternRating.extract(first(&doc, "#c")), None);
    }

    #[test]
    fn test_selector_text_requires_more_than_min_chars() {
        let doc = Html::parse_document(
            r#"<div id="c"><p class="body">  Too short </p></div>
               <div id="d"><p class="body">This one is long enough</p></div>"#,
        );
        let strategy = SelectorText::new(".body", 10).unwrap();
        assert_eq!(strategy.extract(first(&doc, "#c")), None);
        assert_eq!(
            strategy.extract(first(&doc, "#d")),
            Some("This one is long enough".to_string())
        );
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        assert!(SelectorText::new("div[[", 0).is_none());
        assert!(SelectorDate::new(":::").is_none());
    }

    #[test]
    fn test_flattened_text_truncates_to_token_cap() {
        let words: Vec<String> = (0..150).map(|i| format!("w{}", i)).collect();
        let html = format!("<div id=\"c\"><p>{}</p></div>", words.join(" "));
        let doc = Html::parse_document(&html);

        let text = FlattenedText::default().extract(first(&doc, "#c")).unwrap();
        assert_eq!(text.split_whitespace().count(), 100);
        assert!(text.ends_with("w99"));
    }

    #[test]
    fn test_flattened_text_needs_more_than_fifty_chars() {
        let doc = Html::parse_document(r#"<div id="c"><p>Nice.</p><p>Works.</p></div>"#);
        assert_eq!(FlattenedText::default().extract(first(&doc, "#c")), None);
    }

    #[test]
    fn test_selector_date_prefers_datetime_attribute() {
        let doc = Html::parse_document(
            r#"<div id="c"><time datetime="2024-02-10T08:00:00Z">last month</time></div>"#,
        );
        let strategy = SelectorDate::new("time").unwrap();
        assert_eq!(strategy.extract(first(&doc, "#c")), Some("2024-02-10".to_string()));
    }

    #[test]
    fn test_selector_date_strips_reviewed_on() {
        let doc = Html::parse_document(
            r#"<div id="c"><span class="date">Reviewed on November 3, 2024</span></div>"#,
        );
        let strategy = SelectorDate::new(".date").unwrap();
        assert_eq!(strategy.extract(first(&doc, "#c")), Some("2024-11-03".to_string()));
    }

    #[test]
    fn test_flatten_text_joins_nodes_with_spaces() {
        let doc = Html::parse_document("<div id=\"c\"><b>Great</b><i>value</i>\n  here</div>");
        assert_eq!(flatten_text(first(&doc, "#c")), "Great value here");
    }
}
