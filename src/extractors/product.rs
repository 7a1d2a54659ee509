use scraper::{Html, Selector};

use crate::extractors::element_text;

/// Placeholder used when a product page has no title element
pub const NO_TITLE: &str = "No title available.";

/// Placeholder used when a product page has no description element
pub const NO_DESCRIPTION: &str = "No description available.";

/// Title and description read from a product detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub title: String,
    pub description: String,
}

/// Extracts title and description from a rendered product page
///
/// Both elements are optional; a missing or empty one yields its placeholder
/// text. This extractor never fails the page.
pub fn parse(html: &str) -> ProductInfo {
    let doc = Html::parse_document(html);

    let title_selector = Selector::parse("#title").unwrap();
    let description_selector = Selector::parse("#productDescription").unwrap();

    let title = doc
        .select(&title_selector)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = doc
        .select(&description_selector)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    ProductInfo { title, description }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_title_and_description() {
        let html = r#"
            <html><body>
              <span id="title">  Widget
                 Deluxe </span>
              <div id="productDescription"><p>A very fine widget.</p></div>
            </body></html>
        "#;

        let info = parse(html);
        assert_eq!(info.title, "Widget Deluxe");
        assert_eq!(info.description, "A very fine widget.");
    }

    #[test]
    fn test_missing_elements_yield_placeholders() {
        let html = "<html><body><div id='other'></div></body></html>";

        let info = parse(html);
        assert_eq!(info.title, NO_TITLE);
        assert_eq!(info.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_missing_description_only() {
        let html = r#"<html><body><span id="title">Widget</span></body></html>"#;

        let info = parse(html);
        assert_eq!(info.title, "Widget");
        assert_eq!(info.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_empty_title_element_yields_placeholder() {
        let html = r#"<html><body><span id="title">   </span></body></html>"#;

        let info = parse(html);
        assert_eq!(info.title, NO_TITLE);
    }
}
