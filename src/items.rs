use serde::{Deserialize, Serialize};

use crate::records::Offer;

/// Base URL for keyword searches
pub const SEARCH_BASE_URL: &str = "https://www.amazon.com/s?k=";

/// Base URL for product detail pages
pub const PRODUCT_BASE_URL: &str = "https://www.amazon.com/dp/";

/// Base URL for offer-listing pages
pub const OFFER_BASE_URL: &str = "https://www.amazon.com/gp/offer-listing/";

/// Payload for the search stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchJob {
    /// URL of the search-results page
    pub url: String,

    /// Keyword the run was started with
    pub keyword: String,
}

/// Payload for the product-detail stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductJob {
    /// URL of the product detail page
    pub url: String,

    /// Keyword the run was started with
    pub keyword: String,

    /// Product identifier discovered on the search page
    pub asin: String,

    /// Canonical product page URL (kept for the final record)
    pub product_url: String,

    /// URL of the first offer-listing page for this product
    pub offers_url: String,
}

/// Payload for the offer-listing stage
///
/// Carries everything accumulated so far for one product. The `offers`
/// vector grows as pagination is followed; the `url` is replaced with the
/// next-page cursor on each hop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffersJob {
    /// URL of the offer-listing page to visit (first page or a cursor)
    pub url: String,

    /// Keyword the run was started with
    pub keyword: String,

    /// Product identifier
    pub asin: String,

    /// Canonical product page URL
    pub product_url: String,

    /// Title extracted on the product page
    pub title: String,

    /// Description extracted on the product page
    pub description: String,

    /// Offers accumulated across previously visited listing pages,
    /// in visitation order
    pub offers: Vec<Offer>,
}

/// A unit of pending crawl work, tagged with its stage
///
/// Each variant carries exactly the fields its stage's extractor and
/// transition need, so a dispatched item is always fully populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum WorkItem {
    /// Keyword search-results page
    Search(SearchJob),

    /// Product detail page
    Product(ProductJob),

    /// One page of a paginated offer listing
    Offers(OffersJob),
}

impl WorkItem {
    /// Create the initial search item for a keyword
    pub fn search(keyword: &str) -> Self {
        WorkItem::Search(SearchJob {
            url: search_url(keyword),
            keyword: keyword.to_string(),
        })
    }

    /// Target page URL; unique key for frontier deduplication
    pub fn url(&self) -> &str {
        match self {
            WorkItem::Search(job) => &job.url,
            WorkItem::Product(job) => &job.url,
            WorkItem::Offers(job) => &job.url,
        }
    }

    /// CSS selector the renderer waits for before extraction begins
    pub fn wait_selector(&self) -> &'static str {
        match self {
            WorkItem::Search(_) => ".s-result-list",
            WorkItem::Product(_) => "#title",
            WorkItem::Offers(_) => "#olpOfferList",
        }
    }

    /// Stage name for logging
    pub fn stage_name(&self) -> &'static str {
        match self {
            WorkItem::Search(_) => "search",
            WorkItem::Product(_) => "product",
            WorkItem::Offers(_) => "offers",
        }
    }
}

/// Search-results URL for a keyword
pub fn search_url(keyword: &str) -> String {
    format!("{}{}", SEARCH_BASE_URL, keyword)
}

/// Product detail URL for an ASIN
pub fn product_url(asin: &str) -> String {
    format!("{}{}", PRODUCT_BASE_URL, asin)
}

/// First offer-listing URL for an ASIN
pub fn offers_url(asin: &str) -> String {
    format!("{}{}", OFFER_BASE_URL, asin)
}
