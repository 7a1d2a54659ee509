pub mod offers;
pub mod product;
pub mod search;

use scraper::ElementRef;

/// Collapses an element's text nodes into one whitespace-normalized string
///
/// scraper yields fragmented text nodes, so the pieces are joined and excess
/// whitespace squeezed to approximate the page's visible text.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
