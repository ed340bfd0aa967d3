use renthawk_core::error::AdapterError;
use renthawk_core::Listing;
use scraper::{Html, Selector};

use super::common::{parse_area_m2, parse_first_int, parse_postal_code, parse_price_numeric, parse_property_class};
use super::SourceAdapter;

pub struct BouwinvestAdapter;

impl SourceAdapter for BouwinvestAdapter {
    fn name(&self) -> &'static str {
        "bouwinvest"
    }

    fn build_url(&self, city: &str, _days: u32) -> String {
        format!("https://www.wonenbijbouwinvest.nl/huuraanbod?plaats={}", city.to_lowercase())
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
    let item_sel = Selector::parse(".residence-card, .listing-card").map_err(|e| e.to_string())?;
    let link_sel = Selector::parse("a").map_err(|e| e.to_string())?;
    let address_sel = Selector::parse(".residence-address, .listing-address").map_err(|e| e.to_string())?;
    let city_sel = Selector::parse(".residence-city, .listing-city").map_err(|e| e.to_string())?;
    let price_sel = Selector::parse(".residence-price, .listing-price").map_err(|e| e.to_string())?;
    let area_sel = Selector::parse(".residence-area, .listing-area").map_err(|e| e.to_string())?;
    let rooms_sel = Selector::parse(".residence-rooms, .listing-rooms").map_err(|e| e.to_string())?;
    let type_sel = Selector::parse(".residence-type, .listing-type").map_err(|e| e.to_string())?;

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
            format!("https://www.wonenbijbouwinvest.nl{href}")
        };
        let source_id = href.trim_matches('/').rsplit('/').next().unwrap_or(&url).to_string();

        let mut listing = Listing::new("bouwinvest", source_id, url);

        if let Some(addr) = item.select(&address_sel).next() {
            listing.address = addr.text().collect::<String>().trim().to_string();
            listing.title = Some(listing.address.clone());
        }
        if let Some(city_el) = item.select(&city_sel).next() {
            let text = city_el.text().collect::<String>();
            let text = text.trim();
            listing.postal_code = parse_postal_code(text);
            listing.city = text.rsplit(' ').next().unwrap_or(text).to_string();
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
        <div class="residence-card">
            <a href="/huuraanbod/nesselande-123"></a>
            <span class="residence-address">Waterweide 123</span>
            <span class="residence-city">3057 AA Rotterdam</span>
            <span class="residence-price">€ 1.320 per maand</span>
            <span class="residence-area">82 m²</span>
            <span class="residence-rooms">3 kamers</span>
            <span class="residence-type">Appartement</span>
        </div>
    "#;

    #[test]
    fn parses_a_bouwinvest_listing_card() {
        let listings = parse(SAMPLE).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price_numeric, 1320);
        assert_eq!(listings[0].city, "Rotterdam");
    }
}
