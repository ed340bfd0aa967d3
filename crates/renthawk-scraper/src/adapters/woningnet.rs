use renthawk_core::error::AdapterError;
use renthawk_core::Listing;
use scraper::{Html, Selector};

use super::common::{parse_area_m2, parse_first_int, parse_postal_code, parse_price_numeric, parse_property_class};
use super::SourceAdapter;

/// WoningNet runs one portal per housing region (Amsterdam, Utrecht, ...);
/// the dozen `regio*` factory entries share this adapter, parameterized
/// by the region slug carried in the source name itself.
pub struct WoningNetAdapter {
    source_name: String,
}

impl WoningNetAdapter {
    pub fn new(source_name: String) -> Self {
        Self { source_name }
    }

    fn region_slug(&self) -> &str {
        self.source_name.strip_prefix("regio").unwrap_or(&self.source_name)
    }
}

impl SourceAdapter for WoningNetAdapter {
    fn name(&self) -> &str {
        &self.source_name
    }

    fn build_url(&self, city: &str, _days: u32) -> String {
        let region = self.region_slug();
        format!("https://www.woningnet{region}.nl/aanbod?plaats={}", city.to_lowercase())
    }

    fn parse_listing_page(&self, body: &str) -> Result<Vec<Listing>, AdapterError> {
        parse(body, &self.source_name).map_err(|reason| AdapterError::ParseError {
            source: self.source_name.clone(),
            reason,
        })
    }
}

fn parse(body: &str, source_name: &str) -> Result<Vec<Listing>, String> {
    let document = Html::parse_document(body);
    let item_sel = Selector::parse(".aanbod-item, .listing-row").map_err(|e| e.to_string())?;
    let link_sel = Selector::parse("a").map_err(|e| e.to_string())?;
    let address_sel = Selector::parse(".aanbod-adres, .listing-address").map_err(|e| e.to_string())?;
    let city_sel = Selector::parse(".aanbod-plaats, .listing-city").map_err(|e| e.to_string())?;
    let price_sel = Selector::parse(".aanbod-prijs, .listing-price").map_err(|e| e.to_string())?;
    let area_sel = Selector::parse(".aanbod-oppervlakte, .listing-area").map_err(|e| e.to_string())?;
    let rooms_sel = Selector::parse(".aanbod-kamers, .listing-rooms").map_err(|e| e.to_string())?;
    let type_sel = Selector::parse(".aanbod-type, .listing-type").map_err(|e| e.to_string())?;

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
            format!("https://www.woningnet.nl{href}")
        };
        let source_id = href.trim_matches('/').rsplit('/').next().unwrap_or(&url).to_string();

        let mut listing = Listing::new(source_name, source_id, url);

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
        <div class="aanbod-item">
            <a href="/aanbod/utrecht/kanaleneiland-7"></a>
            <span class="aanbod-adres">Kanaleneiland 7</span>
            <span class="aanbod-plaats">3526 AA Utrecht</span>
            <span class="aanbod-prijs">€ 825 per maand</span>
            <span class="aanbod-oppervlakte">50 m²</span>
            <span class="aanbod-kamers">2 kamers</span>
            <span class="aanbod-type">Appartement</span>
        </div>
    "#;

    #[test]
    fn region_slug_strips_the_regio_prefix() {
        let adapter = WoningNetAdapter::new("regioutrecht".to_string());
        assert_eq!(adapter.region_slug(), "utrecht");
    }

    #[test]
    fn parses_a_woningnet_listing_card() {
        let adapter = WoningNetAdapter::new("regioutrecht".to_string());
        let listings = adapter.parse_listing_page(SAMPLE).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].source, "regioutrecht");
        assert_eq!(listings[0].price_numeric, 825);
    }
}
