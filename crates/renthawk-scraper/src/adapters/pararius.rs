use renthawk_core::error::AdapterError;
use renthawk_core::Listing;
use scraper::{Html, Selector};

use super::common::{parse_area_m2, parse_first_int, parse_postal_code, parse_price_numeric, parse_price_period};
use super::SourceAdapter;

pub struct ParariusAdapter;

impl SourceAdapter for ParariusAdapter {
    fn name(&self) -> &'static str {
        "pararius"
    }

    fn build_url(&self, city: &str, days: u32) -> String {
        let since = match days {
            0..=2 => 1,
            3..=6 => 3,
            7..=13 => 5,
            14..=29 => 10,
            _ => 30,
        };
        format!(
            "https://www.pararius.com/apartments/{}?filters[since]={since}",
            city.to_lowercase()
        )
    }

    fn parse_listing_page(&self, body: &str) -> Result<Vec<Listing>, AdapterError> {
        parse(body).map_err(|reason| AdapterError::ParseError {
            source: self.name().to_string(),
            reason,
        })
    }

    fn stop_after_no_result(&self) -> bool {
        true
    }

    fn pagination_ended(&self, requested_url: &str, final_url: &str) -> bool {
        requested_url != final_url
    }
}

fn parse(body: &str) -> Result<Vec<Listing>, String> {
    let document = Html::parse_document(body);
    let item_sel = Selector::parse(".listing-search-item").map_err(|e| e.to_string())?;
    let link_sel = Selector::parse(".listing-search-item__link--title").map_err(|e| e.to_string())?;
    let sub_title_sel = Selector::parse(".listing-search-item__sub-title").map_err(|e| e.to_string())?;
    let price_sel = Selector::parse(".listing-search-item__price").map_err(|e| e.to_string())?;
    let feature_sel = Selector::parse(".illustrated-features__item").map_err(|e| e.to_string())?;

    let mut listings = Vec::new();

    for item in document.select(&item_sel) {
        let Some(link) = item.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("https://www.pararius.com{href}")
        };
        let source_id = url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&url)
            .to_string();

        let mut listing = Listing::new("pararius", source_id, url);
        listing.title = Some(link.text().collect::<String>().trim().to_string());

        if let Some(sub) = item.select(&sub_title_sel).next() {
            let text = sub.text().collect::<String>();
            let text = text.trim();
            if let Some(postal) = parse_postal_code(text) {
                listing.postal_code = Some(postal);
            }
            if let Some((_, rest)) = text.split_once(' ') {
                if let Some(city) = rest.splitn(2, '(').next() {
                    listing.city = city.trim().to_string();
                }
            }
        }

        if let Some(price) = item.select(&price_sel).next() {
            let text = price.text().collect::<String>();
            listing.price_text = Some(text.trim().to_string());
            listing.price_numeric = parse_price_numeric(&text);
            listing.price_period = parse_price_period(&text).or(Some(renthawk_core::PricePeriod::Month));
        }

        for feature in item.select(&feature_sel) {
            let class = feature.value().attr("class").unwrap_or("");
            let text = feature.text().collect::<String>();
            if class.contains("surface-area") {
                listing.living_area = parse_area_m2(&text);
            } else if class.contains("number-of-rooms") {
                listing.rooms = parse_first_int(&text);
            }
        }

        if listing.address.is_empty() {
            listing.address = listing.title.clone().unwrap_or_default();
        }

        listings.push(listing);
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <div class="listing-search-item">
            <a class="listing-search-item__link--title" href="/apartment-for-rent/utrecht/abc123/kanaalstraat">
                Kanaalstraat 12
            </a>
            <div class="listing-search-item__sub-title">3521 AB Utrecht (Lombok)</div>
            <div class="listing-search-item__price">€ 1.450 per month</div>
            <ul>
                <li class="illustrated-features__item illustrated-features__item--surface-area">75 m²</li>
                <li class="illustrated-features__item illustrated-features__item--number-of-rooms">3 rooms</li>
            </ul>
        </div>
    "#;

    #[test]
    fn parses_a_single_listing_card() {
        let listings = parse(SAMPLE).unwrap();
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.source, "pararius");
        assert_eq!(listing.price_numeric, 1450);
        assert_eq!(listing.living_area, Some(75));
        assert_eq!(listing.rooms, Some(3));
        assert_eq!(listing.postal_code.as_deref(), Some("3521 AB"));
    }

    #[test]
    fn pagination_ended_when_final_url_differs() {
        let adapter = ParariusAdapter;
        assert!(adapter.pagination_ended("https://x/page-2", "https://x/"));
        assert!(!adapter.pagination_ended("https://x/page-2", "https://x/page-2"));
    }
}
