use scraper::{Html, Selector};
use url::Url;

use crate::extractors::element_text;
use crate::records::{DEFAULT_SELLER_NAME, Offer};

/// One parsed offer-listing page: its offers and, when pagination continues,
/// the absolute URL of the next page
#[derive(Debug, Clone)]
pub struct OffersPage {
    /// Offers in row order
    pub offers: Vec<Offer>,

    /// Next-page cursor, absent on the last page
    pub next_url: Option<String>,
}

/// Extracts offers and the pagination cursor from a rendered offer-listing
/// page
///
/// A missing offer-list container is terminal, not an error: the result is an
/// empty offer list with no cursor. The next-page href is resolved against
/// `page_url` so the cursor is always absolute.
pub fn parse(html: &str, page_url: &str) -> OffersPage {
    let doc = Html::parse_document(html);

    let list_selector = Selector::parse("#olpOfferList").unwrap();
    let row_selector = Selector::parse("div.a-row.a-spacing-mini.olpOffer").unwrap();

    let offers = match doc.select(&list_selector).next() {
        Some(container) => container
            .select(&row_selector)
            .map(|row| parse_offer_row(&row))
            .collect(),
        None => {
            ::log::debug!("No offer list on {}", page_url);
            Vec::new()
        }
    };

    OffersPage {
        offers,
        next_url: parse_next_url(&doc, page_url),
    }
}

/// Reads the four offer fields from one listing row
fn parse_offer_row(row: &scraper::ElementRef) -> Offer {
    let price_selector = Selector::parse(".olpOfferPrice").unwrap();
    let condition_selector = Selector::parse(".olpConditionColumn").unwrap();
    let shipping_selector = Selector::parse(".olpDeliveryColumn").unwrap();
    let seller_selector = Selector::parse(".olpSellerName").unwrap();

    let field = |selector: &Selector| {
        row.select(selector)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_default()
    };

    let seller_name = row
        .select(&seller_selector)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| DEFAULT_SELLER_NAME.to_string());

    Offer {
        price: field(&price_selector),
        condition: field(&condition_selector),
        shipping: field(&shipping_selector),
        seller_name,
    }
}

/// Returns the absolute URL of the next listing page, if the pagination
/// control has an enabled next link
fn parse_next_url(doc: &Html, page_url: &str) -> Option<String> {
    let next_selector = Selector::parse("ul.a-pagination li.a-last:not(.a-disabled) a").unwrap();

    let href = doc
        .select(&next_selector)
        .next()
        .and_then(|link| link.value().attr("href"))?;

    match Url::parse(page_url).and_then(|base| base.join(href)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            ::log::warn!("Ignoring unresolvable next-page href {}: {}", href, e);
            None
        }
    }
}
