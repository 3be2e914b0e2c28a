use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static ARTICLES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article").unwrap());
static CLASSED: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[class]").unwrap());
static ARIA_LABELLED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[aria-label]").unwrap());

/// Tags treated as the enclosing block of a star widget
const BLOCK_TAGS: &[&str] = &["div", "article", "section", "li"];

/// Every `<article>` element
fn articles(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.select(&ARTICLES)
}

/// Whether any class token contains one of the (lower-cased) indicators
fn has_review_class(element: &ElementRef<'_>, indicators: &[String]) -> bool {
    element.value().classes().any(|class| {
        let class = class.to_lowercase();
        indicators.iter().any(|needle| class.contains(needle.as_str()))
    })
}

/// Nearest block-level ancestor of every star-rating widget
fn star_blocks(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .select(&ARIA_LABELLED)
        .filter(|el| {
            el.value()
                .attr("aria-label")
                .is_some_and(|label| label.to_lowercase().contains("star"))
        })
        .filter_map(block_ancestor)
}

fn block_ancestor(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| BLOCK_TAGS.contains(&a.value().name()))
}

/// Union of the three discovery strategies, in strategy order.
///
/// Containers are de-duplicated by node identity, so two identical-looking
/// reviews in different places are both kept.
pub fn discover<'a>(document: &'a Html, class_indicators: &[String]) -> Vec<ElementRef<'a>> {
    let indicators: Vec<String> = class_indicators.iter().map(|s| s.to_lowercase()).collect();

    let mut seen = HashSet::new();
    articles(document)
        .chain(
            document
                .select(&CLASSED)
                .filter(|el| has_review_class(el, &indicators)),
        )
        .chain(star_blocks(document))
        .filter(|el| seen.insert(el.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators() -> Vec<String> {
        vec!["review".into(), "reviewItem".into(), "customerReview".into()]
    }

    fn ids(found: &[ElementRef<'_>]) -> Vec<String> {
        found
            .iter()
            .map(|el| el.value().attr("id").unwrap_or("-").to_string())
            .collect()
    }

    #[test]
    fn test_union_in_strategy_order() {
        let doc = Html::parse_document(
            r#"<section id="s"><span aria-label="4 stars"></span></section>
               <div id="d" class="CustomerReview-Card">x</div>
               <article id="a">y</article>"#,
        );
        let found = discover(&doc, &indicators());
        assert_eq!(ids(&found), vec!["a", "d", "s"]);
    }

    #[test]
    fn test_same_node_found_twice_is_kept_once() {
        let doc = Html::parse_document(
            r#"<article id="a" class="review"><div aria-label="5 stars out of 5"></div></article>"#,
        );
        let found = discover(&doc, &indicators());
        // article (1), class match (2) and star ancestor (3) all hit the same
        // node; the star div itself is not a block ancestor of itself
        assert_eq!(ids(&found), vec!["a"]);
    }

    #[test]
    fn test_identical_content_in_distinct_nodes_is_not_merged() {
        let doc = Html::parse_document(r#"<article>same</article><article>same</article>"#);
        assert_eq!(discover(&doc, &indicators()).len(), 2);
    }

    #[test]
    fn test_star_widget_walks_to_nearest_block() {
        let doc = Html::parse_document(
            r#"<li id="outer"><div id="inner"><p><span aria-label="Rated 3 Stars"></span></p></div></li>"#,
        );
        let found = discover(&doc, &[]);
        assert_eq!(ids(&found), vec!["inner"]);
    }

    #[test]
    fn test_discovery_is_idempotent() {
        let html = r#"<article id="a"></article><div id="b" class="reviewItem"></div>"#;
        let doc = Html::parse_document(html);
        let first = ids(&discover(&doc, &indicators()));
        let again = ids(&discover(&Html::parse_document(html), &indicators()));
        assert_eq!(first, again);
    }

    #[test]
    fn test_unrelated_aria_labels_are_ignored() {
        let doc = Html::parse_document(r#"<div id="d"><button aria-label="Close"></button></div>"#);
        assert!(discover(&doc, &indicators()).is_empty());
    }
}
