use renthawk_core::error::AdapterError;
use renthawk_core::{Listing, OfferingClass, PricePeriod};
use serde_json::Value;

use super::common::parse_property_class;
use super::SourceAdapter;

/// Vesteda serves its search results as a JSON payload rather than
/// rendered HTML, so this adapter parses `body` as JSON instead of DOM.
pub struct VestedaAdapter;

impl SourceAdapter for VestedaAdapter {
    fn name(&self) -> &'static str {
        "vesteda"
    }

    fn build_url(&self, city: &str, days: u32) -> String {
        format!(
            "https://www.vesteda.com/api/aanbod?plaats={}&dagen={days}",
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
}

fn parse(body: &str) -> Result<Vec<Listing>, String> {
    let root: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let items = root
        .get("results")
        .or_else(|| root.get("items"))
        .and_then(Value::as_array)
        .ok_or("missing results array")?;

    let mut listings = Vec::new();
    for item in items {
        let Some(source_id) = item.get("id").and_then(Value::as_str) else {
            continue;
        };
        let slug = item.get("slug").and_then(Value::as_str).unwrap_or(source_id);
        let url = format!("https://www.vesteda.com/huurwoningen/{slug}");

        let mut listing = Listing::new("vesteda", source_id, url);
        listing.address = item
            .get("street")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        listing.title = Some(listing.address.clone());
        listing.city = item.get("city").and_then(Value::as_str).unwrap_or_default().to_string();
        listing.postal_code = item.get("postalCode").and_then(Value::as_str).map(str::to_string);
        listing.price_numeric = item
            .get("rentPriceMonthly")
            .and_then(Value::as_f64)
            .map(|v| v.round() as i64)
            .unwrap_or(0);
        listing.price_text = Some(format!("€ {} per maand", listing.price_numeric));
        listing.price_period = Some(PricePeriod::Month);
        listing.living_area = item.get("livingArea").and_then(Value::as_i64).map(|v| v as i32);
        listing.rooms = item.get("numberOfRooms").and_then(Value::as_i64).map(|v| v as i32);
        listing.property_type = item
            .get("propertyType")
            .and_then(Value::as_str)
            .and_then(parse_property_class);
        listing.offering_type = OfferingClass::Rental;

        listings.push(listing);
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "results": [
            {
                "id": "vst-001",
                "slug": "hoofdweg-10-amsterdam",
                "street": "Hoofdweg 10",
                "city": "Amsterdam",
                "postalCode": "1054 AB",
                "rentPriceMonthly": 1875.0,
                "livingArea": 68,
                "numberOfRooms": 3,
                "propertyType": "appartement"
            }
        ]
    }"#;

    #[test]
    fn parses_the_vesteda_json_payload() {
        let listings = parse(SAMPLE).unwrap();
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.city, "Amsterdam");
        assert_eq!(listing.price_numeric, 1875);
        assert_eq!(listing.property_type, Some(renthawk_core::PropertyClass::Apartment));
    }

    #[test]
    fn missing_results_key_is_a_parse_error() {
        assert!(parse("{}").is_err());
    }
}
