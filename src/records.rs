use serde::{Deserialize, Serialize};

/// Seller name used when an offer row carries no third-party seller
pub const DEFAULT_SELLER_NAME: &str = "Amazon.com";

/// Status text written for a search page without a results list
pub const NO_RESULTS_STATUS: &str = "No results for this search keyword.";

/// One offer from an offer-listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Price text as shown on the page
    pub price: String,

    /// Item condition text
    pub condition: String,

    /// Shipping/delivery text
    pub shipping: String,

    /// Seller name, defaulting to the platform's own-listing label
    #[serde(rename = "sellerName")]
    pub seller_name: String,
}

/// Final output for one product, with offers merged across all of its
/// offer-listing pages in visitation order
///
/// Emitted exactly once per product, when the last listing page yields no
/// further pagination cursor, and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title (or its placeholder)
    pub title: String,

    /// Canonical product page URL
    #[serde(rename = "itemUrl")]
    pub item_url: String,

    /// Product description (or its placeholder)
    pub description: String,

    /// Keyword the run was started with
    pub keyword: String,

    /// Product identifier
    pub asin: String,

    /// Merged offers, in page-visit order
    pub offers: Vec<Offer>,
}

/// A row appended to the output sink
///
/// Untagged so each variant serializes as the plain object shape the sink
/// stores: a full product record, a no-results status row, or a failure row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputRecord {
    /// Completed product with merged offers
    Product(ProductRecord),

    /// Search page whose results list never appeared
    NoResults {
        /// URL of the search page
        url: String,
        /// Human-readable status text
        status: String,
    },

    /// WorkItem that exhausted its retry budget
    Failure {
        /// URL of the failed item
        url: String,
        /// Error messages collected across attempts
        errors: Vec<String>,
    },
}

impl OutputRecord {
    /// Short kind label for logging and run summaries
    pub fn kind(&self) -> &'static str {
        match self {
            OutputRecord::Product(_) => "product",
            OutputRecord::NoResults { .. } => "no-results",
            OutputRecord::Failure { .. } => "failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_record_serializes_flat() {
        let record = OutputRecord::Product(ProductRecord {
            title: "Widget".to_string(),
            item_url: "https://www.amazon.com/dp/A1".to_string(),
            description: "A widget.".to_string(),
            keyword: "widget".to_string(),
            asin: "A1".to_string(),
            offers: vec![Offer {
                price: "$9.99".to_string(),
                condition: "New".to_string(),
                shipping: "Free shipping".to_string(),
                seller_name: DEFAULT_SELLER_NAME.to_string(),
            }],
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["asin"], "A1");
        assert_eq!(json["itemUrl"], "https://www.amazon.com/dp/A1");
        assert_eq!(json["offers"][0]["sellerName"], "Amazon.com");
        // Untagged: no wrapper key around the record
        assert!(json.get("Product").is_none());
    }

    #[test]
    fn test_failure_record_shape() {
        let record = OutputRecord::Failure {
            url: "https://www.amazon.com/dp/A1".to_string(),
            errors: vec!["timeout".to_string(), "timeout".to_string()],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["url"], "https://www.amazon.com/dp/A1");
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
        assert_eq!(record.kind(), "failure");
    }
}
