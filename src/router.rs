use crate::extractors::{offers, product, search};
use crate::items::{OffersJob, ProductJob, WorkItem, offers_url, product_url};
use crate::records::{NO_RESULTS_STATUS, OutputRecord, ProductRecord};

/// Result of routing one rendered page
#[derive(Debug, Default)]
pub struct StepOutcome {
    /// Follow-up items to enqueue on the frontier
    pub next: Vec<WorkItem>,

    /// Records to append to the output sink
    pub records: Vec<OutputRecord>,
}

/// Dispatches a rendered page to its stage's extractor and turns the result
/// into follow-up work and/or output records
///
/// This is the whole crawl state machine. It is synchronous and touches
/// neither the network nor the frontier, so it can be driven directly in
/// tests with canned HTML:
///
/// - Search expands into one Product item per discovered ASIN, or a
///   no-results status row when the results list never appeared.
/// - Product expands into exactly one Offers item carrying the extracted
///   title and description.
/// - Offers appends the page's offers to the accumulated list, then either
///   re-enqueues itself at the next-page cursor or, on the last page, emits
///   the final ProductRecord. That emission is the sole terminal transition.
pub fn process_page(item: WorkItem, html: &str) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    match item {
        WorkItem::Search(job) => match search::parse(html) {
            Some(asins) => {
                ::log::info!("Search {} found {} products", job.url, asins.len());
                for asin in asins {
                    outcome.next.push(WorkItem::Product(ProductJob {
                        url: product_url(&asin),
                        keyword: job.keyword.clone(),
                        product_url: product_url(&asin),
                        offers_url: offers_url(&asin),
                        asin,
                    }));
                }
            }
            None => {
                ::log::info!("No results list on {}", job.url);
                outcome.records.push(OutputRecord::NoResults {
                    url: job.url,
                    status: NO_RESULTS_STATUS.to_string(),
                });
            }
        },

        WorkItem::Product(job) => {
            let info = product::parse(html);
            ::log::info!("Product {}: {}", job.asin, info.title);
            outcome.next.push(WorkItem::Offers(OffersJob {
                url: job.offers_url,
                keyword: job.keyword,
                asin: job.asin,
                product_url: job.product_url,
                title: info.title,
                description: info.description,
                offers: Vec::new(),
            }));
        }

        WorkItem::Offers(mut job) => {
            let page = offers::parse(html, &job.url);
            ::log::info!(
                "Offers page for {} added {} offers ({} total)",
                job.asin,
                page.offers.len(),
                job.offers.len() + page.offers.len()
            );
            job.offers.extend(page.offers);

            match page.next_url {
                Some(next_url) => {
                    job.url = next_url;
                    outcome.next.push(WorkItem::Offers(job));
                }
                None => {
                    outcome.records.push(OutputRecord::Product(ProductRecord {
                        title: job.title,
                        item_url: job.product_url,
                        description: job.description,
                        keyword: job.keyword,
                        asin: job.asin,
                        offers: job.offers,
                    }));
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::product::{NO_DESCRIPTION, NO_TITLE};

    fn search_page(asins: &[&str]) -> String {
        let tiles = asins
            .iter()
            .map(|asin| format!(r#"<div data-asin="{}"></div>"#, asin))
            .collect::<String>();
        format!(r#"<html><body><div class="s-result-list">{}</div></body></html>"#, tiles)
    }

    fn offers_page(prices: &[&str], next_href: Option<&str>) -> String {
        let rows = prices
            .iter()
            .map(|price| {
                format!(
                    r#"<div class="a-row a-spacing-mini olpOffer">
                         <span class="olpOfferPrice">{}</span>
                         <div class="olpConditionColumn">New</div>
                         <div class="olpDeliveryColumn">Free shipping</div>
                         <h3 class="olpSellerName">Acme Corp</h3>
                       </div>"#,
                    price
                )
            })
            .collect::<String>();
        let pagination = next_href
            .map(|href| {
                format!(
                    r#"<ul class="a-pagination"><li class="a-last"><a href="{}">Next</a></li></ul>"#,
                    href
                )
            })
            .unwrap_or_default();
        format!(
            r#"<html><body><div id="olpOfferList">{}</div>{}</body></html>"#,
            rows, pagination
        )
    }

    #[test]
    fn test_search_expands_to_one_product_item_per_asin() {
        let item = WorkItem::search("widget");
        let outcome = process_page(item, &search_page(&["B00000000A", "B00000000B"]));

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.next.len(), 2);
        for (item, asin) in outcome.next.iter().zip(["B00000000A", "B00000000B"]) {
            match item {
                WorkItem::Product(job) => {
                    assert_eq!(job.asin, asin);
                    assert_eq!(job.keyword, "widget");
                    assert_eq!(job.url, format!("https://www.amazon.com/dp/{}", asin));
                    assert_eq!(
                        job.offers_url,
                        format!("https://www.amazon.com/gp/offer-listing/{}", asin)
                    );
                }
                other => panic!("expected a product item, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_search_without_results_list_emits_status_row() {
        let item = WorkItem::search("widget");
        let outcome = process_page(item, "<html><body>Robot check</body></html>");

        assert!(outcome.next.is_empty());
        assert_eq!(outcome.records.len(), 1);
        match &outcome.records[0] {
            OutputRecord::NoResults { url, status } => {
                assert_eq!(url, "https://www.amazon.com/s?k=widget");
                assert_eq!(status, NO_RESULTS_STATUS);
            }
            other => panic!("expected a no-results row, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_results_list_terminates_silently() {
        let item = WorkItem::search("widget");
        let outcome = process_page(item, &search_page(&[]));

        assert!(outcome.next.is_empty());
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_product_expands_to_exactly_one_offers_item() {
        let item = WorkItem::search("widget");
        let outcome = process_page(item, &search_page(&["B00000000A"]));
        let product_item = outcome.next.into_iter().next().unwrap();

        let html = r#"<html><body><span id="title">Widget</span></body></html>"#;
        let outcome = process_page(product_item, html);

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.next.len(), 1);
        match &outcome.next[0] {
            WorkItem::Offers(job) => {
                assert_eq!(job.url, "https://www.amazon.com/gp/offer-listing/B00000000A");
                assert_eq!(job.title, "Widget");
                assert_eq!(job.description, NO_DESCRIPTION);
                assert!(job.offers.is_empty());
            }
            other => panic!("expected an offers item, got {:?}", other),
        }
    }

    #[test]
    fn test_product_page_missing_everything_still_advances() {
        let item = WorkItem::search("widget");
        let outcome = process_page(item, &search_page(&["B00000000A"]));
        let product_item = outcome.next.into_iter().next().unwrap();

        let outcome = process_page(product_item, "<html><body></body></html>");

        assert_eq!(outcome.next.len(), 1);
        match &outcome.next[0] {
            WorkItem::Offers(job) => {
                assert_eq!(job.title, NO_TITLE);
                assert_eq!(job.description, NO_DESCRIPTION);
            }
            other => panic!("expected an offers item, got {:?}", other),
        }
    }

    #[test]
    fn test_offers_pagination_accumulates_then_terminates() {
        // Walk one product through search -> product -> two offers pages.
        let outcome = process_page(WorkItem::search("widget"), &search_page(&["B00000000A"]));
        let product_item = outcome.next.into_iter().next().unwrap();

        let outcome = process_page(
            product_item,
            r#"<html><body><span id="title">Widget</span></body></html>"#,
        );
        let offers_item = outcome.next.into_iter().next().unwrap();

        // First listing page: two offers and a next link.
        let outcome = process_page(
            offers_item,
            &offers_page(&["$9.99", "$8.99"], Some("/gp/offer-listing/B00000000A?startIndex=10")),
        );
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.next.len(), 1);
        let offers_item = outcome.next.into_iter().next().unwrap();
        match &offers_item {
            WorkItem::Offers(job) => {
                assert_eq!(job.offers.len(), 2);
                assert_eq!(
                    job.url,
                    "https://www.amazon.com/gp/offer-listing/B00000000A?startIndex=10"
                );
            }
            other => panic!("expected an offers item, got {:?}", other),
        }

        // Last listing page: one more offer, no next link.
        let outcome = process_page(offers_item, &offers_page(&["$7.99"], None));
        assert!(outcome.next.is_empty());
        assert_eq!(outcome.records.len(), 1);
        match &outcome.records[0] {
            OutputRecord::Product(record) => {
                assert_eq!(record.asin, "B00000000A");
                assert_eq!(record.title, "Widget");
                assert_eq!(record.keyword, "widget");
                assert_eq!(record.item_url, "https://www.amazon.com/dp/B00000000A");
                let prices: Vec<&str> =
                    record.offers.iter().map(|o| o.price.as_str()).collect();
                assert_eq!(prices, vec!["$9.99", "$8.99", "$7.99"]);
            }
            other => panic!("expected a product record, got {:?}", other),
        }
    }

    #[test]
    fn test_offers_page_without_container_emits_empty_record() {
        let outcome = process_page(WorkItem::search("widget"), &search_page(&["B00000000A"]));
        let product_item = outcome.next.into_iter().next().unwrap();
        let outcome = process_page(product_item, "<html><body></body></html>");
        let offers_item = outcome.next.into_iter().next().unwrap();

        let outcome = process_page(offers_item, "<html><body></body></html>");

        assert!(outcome.next.is_empty());
        assert_eq!(outcome.records.len(), 1);
        match &outcome.records[0] {
            OutputRecord::Product(record) => assert!(record.offers.is_empty()),
            other => panic!("expected a product record, got {:?}", other),
        }
    }
}
