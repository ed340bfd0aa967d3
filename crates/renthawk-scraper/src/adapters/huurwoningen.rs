use renthawk_core::error::AdapterError;
use renthawk_core::{Listing, PropertyClass};
use scraper::{Html, Selector};

use super::common::{parse_area_m2, parse_first_int, parse_postal_code, parse_price_numeric};
use super::{PropertyKind, SourceAdapter};

/// huurwoningen.nl exposes one search path per property kind
/// (appartement/huis/studio/kamer); the four factory entries share this
/// one adapter, parameterized on which path and `PropertyClass` to use.
pub struct HuurwoningenAdapter {
    source_name: &'static str,
    kind: PropertyKind,
}

impl HuurwoningenAdapter {
    pub fn new(source_name: &'static str, kind: PropertyKind) -> Self {
        Self { source_name, kind }
    }

    fn path_segment(&self) -> &'static str {
        match self.kind {
            PropertyKind::Appartement => "appartementen",
            PropertyKind::Huis => "huizen",
            PropertyKind::Studio => "studios",
            PropertyKind::Kamer => "kamers",
        }
    }

    fn property_class(&self) -> PropertyClass {
        match self.kind {
            PropertyKind::Appartement => PropertyClass::Apartment,
            PropertyKind::Huis => PropertyClass::House,
            PropertyKind::Studio => PropertyClass::Studio,
            PropertyKind::Kamer => PropertyClass::Room,
        }
    }
}

impl SourceAdapter for HuurwoningenAdapter {
    fn name(&self) -> &'static str {
        self.source_name
    }

    fn build_url(&self, city: &str, _days: u32) -> String {
        format!(
            "https://www.huurwoningen.nl/{}/{}",
            self.path_segment(),
            city.to_lowercase().replace(' ', "-")
        )
    }

    fn parse_listing_page(&self, body: &str) -> Result<Vec<Listing>, AdapterError> {
        parse(body, self.source_name, self.property_class()).map_err(|reason| AdapterError::ParseError {
            source: self.source_name.to_string(),
            reason,
        })
    }

    fn stop_after_no_result(&self) -> bool {
        true
    }
}

fn parse(body: &str, source_name: &str, property_class: PropertyClass) -> Result<Vec<Listing>, String> {
    let document = Html::parse_document(body);
    let item_sel = Selector::parse(".listing-card").map_err(|e| e.to_string())?;
    let link_sel = Selector::parse("a").map_err(|e| e.to_string())?;
    let address_sel = Selector::parse(".listing-card__address").map_err(|e| e.to_string())?;
    let city_sel = Selector::parse(".listing-card__city").map_err(|e| e.to_string())?;
    let price_sel = Selector::parse(".listing-card__price").map_err(|e| e.to_string())?;
    let area_sel = Selector::parse(".listing-card__area").map_err(|e| e.to_string())?;
    let rooms_sel = Selector::parse(".listing-card__rooms").map_err(|e| e.to_string())?;

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
            format!("https://www.huurwoningen.nl{href}")
        };
        let source_id = href.trim_matches('/').rsplit('/').next().unwrap_or(&url).to_string();

        let mut listing = Listing::new(source_name, source_id, url);
        listing.property_type = Some(property_class);

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

        listings.push(listing);
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <div class="listing-card">
            <a href="/huurwoning/eindhoven/strijp-s-5"></a>
            <span class="listing-card__address">Strijp-S 5</span>
            <span class="listing-card__city">5617 AA Eindhoven</span>
            <span class="listing-card__price">€ 1.050 per maand</span>
            <span class="listing-card__area">55 m²</span>
            <span class="listing-card__rooms">2 kamers</span>
        </div>
    "#;

    #[test]
    fn assigns_the_property_class_from_the_source_variant() {
        let adapter = HuurwoningenAdapter::new("huurwoningenstudio", PropertyKind::Studio);
        let listings = adapter.parse_listing_page(SAMPLE).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].property_type, Some(PropertyClass::Studio));
        assert_eq!(listings[0].source, "huurwoningenstudio");
    }

    #[test]
    fn build_url_uses_the_kind_specific_path_segment() {
        let adapter = HuurwoningenAdapter::new("huurwoningenkamer", PropertyKind::Kamer);
        assert_eq!(adapter.build_url("Eindhoven", 1), "https://www.huurwoningen.nl/kamers/eindhoven");
    }
}
