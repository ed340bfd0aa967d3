use renthawk_core::error::AdapterError;
use renthawk_core::{Listing, OfferingClass, PropertyClass};
use scraper::{Html, Selector};

use super::common::{parse_area_m2, parse_interior, parse_postal_code, parse_price_numeric};
use super::SourceAdapter;

pub struct KamernetAdapter;

impl SourceAdapter for KamernetAdapter {
    fn name(&self) -> &'static str {
        "kamernet"
    }

    fn build_url(&self, city: &str, _days: u32) -> String {
        if city.is_empty() {
            "https://kamernet.nl/huren/huurwoningen-nederland".to_string()
        } else {
            format!("https://kamernet.nl/huren/kamers-{}", city.to_lowercase().replace(' ', "-"))
        }
    }

    fn parse_listing_page(&self, body: &str) -> Result<Vec<Listing>, AdapterError> {
        parse(body).map_err(|reason| AdapterError::ParseError {
            source: self.name().to_string(),
            reason,
        })
    }
}

fn parse(body: &str) -> Result<Vec<Listing>, String> {
    let document = Html::parse_document(body);
    let item_sel = Selector::parse(".tile-root, .search-results-item").map_err(|e| e.to_string())?;
    let link_sel = Selector::parse("a").map_err(|e| e.to_string())?;
    let title_sel = Selector::parse(".tile-title, .listing-title").map_err(|e| e.to_string())?;
    let location_sel = Selector::parse(".tile-location, .listing-location").map_err(|e| e.to_string())?;
    let price_sel = Selector::parse(".tile-price, .listing-price").map_err(|e| e.to_string())?;
    let area_sel = Selector::parse(".tile-surface, .listing-surface").map_err(|e| e.to_string())?;
    let furnish_sel = Selector::parse(".tile-furnish, .listing-furnish").map_err(|e| e.to_string())?;

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
            format!("https://kamernet.nl{href}")
        };
        let source_id = href.trim_matches('/').rsplit('/').next().unwrap_or(&url).to_string();

        let mut listing = Listing::new("kamernet", source_id, url);
        listing.property_type = Some(PropertyClass::Room);
        listing.offering_type = OfferingClass::Rental;

        if let Some(title) = item.select(&title_sel).next() {
            listing.title = Some(title.text().collect::<String>().trim().to_string());
            listing.address = listing.title.clone().unwrap_or_default();
        }
        if let Some(location) = item.select(&location_sel).next() {
            let text = location.text().collect::<String>();
            let text = text.trim();
            listing.postal_code = parse_postal_code(text);
            if let Some(city) = text.rsplit(' ').next() {
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
        if let Some(furnish) = item.select(&furnish_sel).next() {
            listing.interior = parse_interior(&furnish.text().collect::<String>());
        }

        listings.push(listing);
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <div class="tile-root">
            <a href="/huren/kamer-utrecht/987654">
                <span class="tile-title">Kamer in studentenhuis</span>
            </a>
            <span class="tile-location">3512 CD Utrecht</span>
            <span class="tile-price">€ 550 per maand</span>
            <span class="tile-surface">18 m²</span>
            <span class="tile-furnish">Gemeubileerd</span>
        </div>
    "#;

    #[test]
    fn parses_a_room_listing_card() {
        let listings = parse(SAMPLE).unwrap();
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.property_type, Some(PropertyClass::Room));
        assert_eq!(listing.price_numeric, 550);
        assert_eq!(listing.living_area, Some(18));
        assert_eq!(listing.interior, Some(renthawk_core::InteriorClass::Furnished));
    }
}
