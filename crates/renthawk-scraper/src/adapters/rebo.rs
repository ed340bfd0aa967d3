use renthawk_core::error::AdapterError;
use renthawk_core::Listing;
use scraper::{Html, Selector};

use super::common::{parse_area_m2, parse_first_int, parse_postal_code, parse_price_numeric, parse_property_class};
use super::SourceAdapter;

pub struct ReboAdapter;

impl SourceAdapter for ReboAdapter {
    fn name(&self) -> &'static str {
        "rebo"
    }

    fn build_url(&self, city: &str, _days: u32) -> String {
        format!("https://www.rebogroep.nl/huurwoningen?plaats={}", city.to_lowercase())
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
    let item_sel = Selector::parse(".object-item, .property-card").map_err(|e| e.to_string())?;
    let link_sel = Selector::parse("a").map_err(|e| e.to_string())?;
    let address_sel = Selector::parse(".object-address, .property-address").map_err(|e| e.to_string())?;
    let city_sel = Selector::parse(".object-city, .property-city").map_err(|e| e.to_string())?;
    let price_sel = Selector::parse(".object-price, .property-price").map_err(|e| e.to_string())?;
    let area_sel = Selector::parse(".object-area, .property-area").map_err(|e| e.to_string())?;
    let rooms_sel = Selector::parse(".object-rooms, .property-rooms").map_err(|e| e.to_string())?;
    let type_sel = Selector::parse(".object-type, .property-type").map_err(|e| e.to_string())?;

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
            format!("https://www.rebogroep.nl{href}")
        };
        let source_id = href.trim_matches('/').rsplit('/').next().unwrap_or(&url).to_string();

        let mut listing = Listing::new("rebo", source_id, url);

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
        <div class="object-item">
            <a href="/woning/groningen/oosterhamrikkade-9"></a>
            <span class="object-address">Oosterhamrikkade 9</span>
            <span class="object-city">9711 AJ Groningen</span>
            <span class="object-price">€ 975 per maand</span>
            <span class="object-area">60 m²</span>
            <span class="object-rooms">2 kamers</span>
            <span class="object-type">Appartement</span>
        </div>
    "#;

    #[test]
    fn parses_a_rebo_listing_card() {
        let listings = parse(SAMPLE).unwrap();
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.price_numeric, 975);
        assert_eq!(listing.rooms, Some(2));
    }
}
