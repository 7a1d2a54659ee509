use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// ASINs are ten uppercase alphanumeric characters; anything else on a
/// result tile (sponsored separators, empty data-asin) is skipped
fn asin_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{10}$").unwrap())
}

/// Extracts product identifiers from a rendered search-results page
///
/// Returns `None` when the results-list container is absent (the page never
/// reached its expected state), which callers treat as an empty expansion
/// rather than a crawl failure. A present container with no usable tiles
/// yields `Some` of an empty vector.
pub fn parse(html: &str) -> Option<Vec<String>> {
    let doc = Html::parse_document(html);

    let list_selector = Selector::parse(".s-result-list").unwrap();
    let container = doc.select(&list_selector).next()?;

    let asins = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter_map(|tile| tile.value().attr("data-asin"))
        .filter(|asin| asin_pattern().is_match(asin))
        .map(|asin| asin.to_string())
        .collect::<Vec<String>>();

    ::log::debug!("Search page yielded {} ASINs", asins.len());

    Some(asins)
}
