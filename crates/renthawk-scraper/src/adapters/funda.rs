use renthawk_core::error::AdapterError;
use renthawk_core::Listing;
use scraper::{Html, Selector};

use super::common::{parse_area_m2, parse_first_int, parse_postal_code, parse_price_numeric, parse_property_class};
use super::SourceAdapter;

pub struct FundaAdapter;

impl SourceAdapter for FundaAdapter {
    fn name(&self) -> &'static str {
        "funda"
    }

    fn build_url(&self, city: &str, days: u32) -> String {
        let days = days.max(1);
        format!(
            "https://www.funda.nl/huur/{}/sinds-{days}-dagen/",
            city.to_lowercase().replace(' ', "-")
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
}

fn parse(body: &str) -> Result<Vec<Listing>, String> {
    let document = Html::parse_document(body);
    let item_sel = Selector::parse("[data-test-id='search-result-item']").map_err(|e| e.to_string())?;
    let link_sel = Selector::parse("a[data-test-id='object-image-link']").map_err(|e| e.to_string())?;
    let address_sel = Selector::parse("[data-test-id='street-name-house-number']").map_err(|e| e.to_string())?;
    let city_sel = Selector::parse("[data-test-id='postal-code-city']").map_err(|e| e.to_string())?;
    let price_sel = Selector::parse("[data-test-id='price-rent']").map_err(|e| e.to_string())?;
    let area_sel = Selector::parse("[data-test-id='floor-area']").map_err(|e| e.to_string())?;
    let rooms_sel = Selector::parse("[data-test-id='number-of-rooms']").map_err(|e| e.to_string())?;
    let type_sel = Selector::parse("[data-test-id='object-type']").map_err(|e| e.to_string())?;

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
            format!("https://www.funda.nl{href}")
        };
        let source_id = href.trim_matches('/').rsplit('/').next().unwrap_or(&url).to_string();

        let mut listing = Listing::new("funda", source_id, url);

        if let Some(addr) = item.select(&address_sel).next() {
            listing.address = addr.text().collect::<String>().trim().to_string();
            listing.title = Some(listing.address.clone());
        }
        if let Some(city_el) = item.select(&city_sel).next() {
            let text = city_el.text().collect::<String>();
            let text = text.trim();
            listing.postal_code = parse_postal_code(text);
            if let Some((_, city)) = text.split_once(' ').and_then(|(_, rest)| rest.split_once(' ')) {
                listing.city = city.trim().to_string();
            } else if let Some(city) = text.rsplit(' ').next() {
                listing.city = city.to_string();
            }
        }
        if let Some(price) = item.select(&price_sel).next() {
            let text = price.text().collect::<String>();
            listing.price_text = Some(text.trim().to_string());
            listing.price_numeric = parse_price_numeric(&text);
            listing.price_period = Some(renthawk_core::PricePeriod::Month);
        }
        if let Some(area) = item.select(&area_sel).next() {
            listing.living_area = parse_area_m2(&area.text().collect::<String>());
        }
        if let Some(rooms) = item.select(&rooms_sel).next() {
            listing.rooms = parse_first_int(&rooms.text().collect::<String>());
        }
        if let Some(kind) = item.select(&type_sel).next() {
            listing.property_type = parse_property_class(&kind.text().collect::<String>());
        }

        listings.push(listing);
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <div data-test-id="search-result-item">
            <a data-test-id="object-image-link" href="/detail/huur/amsterdam/appartement-rivierenbuurt/12345678/"></a>
            <span data-test-id="street-name-house-number">Rivierstraat 4</span>
            <span data-test-id="postal-code-city">1078 AB Amsterdam</span>
            <span data-test-id="price-rent">€ 2.100 /mnd</span>
            <span data-test-id="floor-area">90 m²</span>
            <span data-test-id="number-of-rooms">4 kamers</span>
            <span data-test-id="object-type">Appartement</span>
        </div>
    "#;

    #[test]
    fn parses_a_single_search_result_card() {
        let listings = parse(SAMPLE).unwrap();
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.address, "Rivierstraat 4");
        assert_eq!(listing.price_numeric, 2100);
        assert_eq!(listing.living_area, Some(90));
        assert_eq!(listing.rooms, Some(4));
        assert_eq!(listing.property_type, Some(renthawk_core::PropertyClass::Apartment));
    }
}
