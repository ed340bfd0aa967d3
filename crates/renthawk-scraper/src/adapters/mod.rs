mod bouwinvest;
pub mod common;
mod funda;
mod huurwoningen;
mod kamernet;
mod pararius;
mod rebo;
mod vesteda;
mod woningnet;

use renthawk_core::error::AdapterError;
use renthawk_core::Listing;

/// One scraping target: how to build its search URL and how to turn a
/// fetched list page into listings. Adapters extract everything
/// from the list page alone; detail-page fetching is out of scope.
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn build_url(&self, city: &str, days: u32) -> String;

    fn parse_listing_page(&self, body: &str) -> Result<Vec<Listing>, AdapterError>;

    /// Whether "zero new results on the first page of a cycle" should stop
    /// pagination for this source.
    fn stop_after_no_result(&self) -> bool {
        false
    }

    /// Pararius-only pagination signal: a list-page fetch that redirects
    /// to a URL other than the one requested means the page was beyond
    /// the last real result.
    fn pagination_ended(&self, requested_url: &str, final_url: &str) -> bool {
        let _ = (requested_url, final_url);
        false
    }
}

/// Resolves a source name to its adapter. Mirrors the one-branch-per-site
/// dispatch of the original scraper factory, flattening the huurwoningen
/// and woningnet site-name families into their parameterized adapters.
pub fn adapter_for(source: &str) -> Result<Box<dyn SourceAdapter>, AdapterError> {
    match source {
        "pararius" => Ok(Box::new(pararius::ParariusAdapter)),
        "funda" => Ok(Box::new(funda::FundaAdapter)),
        "vesteda" => Ok(Box::new(vesteda::VestedaAdapter)),
        "rebo" => Ok(Box::new(rebo::ReboAdapter)),
        "kamernet" => Ok(Box::new(kamernet::KamernetAdapter)),
        "bouwinvest" => Ok(Box::new(bouwinvest::BouwinvestAdapter)),
        "huurwoningenappartement" => Ok(Box::new(huurwoningen::HuurwoningenAdapter::new(
            "huurwoningenappartement",
            PropertyKind::Appartement,
        ))),
        "huurwoningenhuis" => Ok(Box::new(huurwoningen::HuurwoningenAdapter::new(
            "huurwoningenhuis",
            PropertyKind::Huis,
        ))),
        "huurwoningenstudio" => Ok(Box::new(huurwoningen::HuurwoningenAdapter::new(
            "huurwoningenstudio",
            PropertyKind::Studio,
        ))),
        "huurwoningenkamer" => Ok(Box::new(huurwoningen::HuurwoningenAdapter::new(
            "huurwoningenkamer",
            PropertyKind::Kamer,
        ))),
        s if s.starts_with("regio") => Ok(Box::new(woningnet::WoningNetAdapter::new(s.to_string()))),
        other => Err(AdapterError::UnknownSource(other.to_string())),
    }
}

/// All source names the factory can dispatch, for the CLI's `--list-sources`.
pub fn known_sources() -> Vec<&'static str> {
    vec![
        "pararius",
        "funda",
        "vesteda",
        "rebo",
        "kamernet",
        "bouwinvest",
        "huurwoningenappartement",
        "huurwoningenhuis",
        "huurwoningenstudio",
        "huurwoningenkamer",
        "regioamsterdam",
        "regioutrecht",
        "regiogroningen",
        "regiogooienvecht",
        "regioalmere",
        "regiomiddenholland",
        "regioeemvallei",
        "regiobovengroningen",
        "regiowoonkeus",
        "regiowoongaard",
        "regiohuiswaarts",
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Appartement,
    Huis,
    Studio,
    Kamer,
}

/// Fill in a listing's `city` from scan context when the adapter could not
/// determine it from the page itself.
pub fn fill_city_from_context(listings: &mut [Listing], scanned_city: &str, known_cities: &[&str]) {
    for listing in listings.iter_mut() {
        if !listing.city.is_empty() {
            continue;
        }
        if !scanned_city.is_empty() {
            listing.city = scanned_city.to_string();
            continue;
        }
        let lower_url = listing.url.to_lowercase();
        if let Some(found) = known_cities.iter().find(|c| lower_url.contains(&c.to_lowercase())) {
            listing.city = found.to_string();
        } else {
            listing.city = "unknown".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_source_name_is_rejected() {
        assert!(adapter_for("not-a-real-site").is_err());
    }

    #[test]
    fn every_known_source_resolves_to_an_adapter() {
        for source in known_sources() {
            assert!(adapter_for(source).is_ok(), "expected adapter for {source}");
        }
    }

    #[test]
    fn missing_city_falls_back_to_scanned_city() {
        let mut listings = vec![Listing::new("pararius", "1", "https://pararius.com/x")];
        fill_city_from_context(&mut listings, "Utrecht", &["Utrecht", "Amsterdam"]);
        assert_eq!(listings[0].city, "Utrecht");
    }

    #[test]
    fn missing_city_and_context_falls_back_to_url_substring_match() {
        let mut listings = vec![Listing::new("pararius", "1", "https://pararius.com/amsterdam/woonruimte")];
        fill_city_from_context(&mut listings, "", &["Utrecht", "Amsterdam"]);
        assert_eq!(listings[0].city, "Amsterdam");
    }

    #[test]
    fn missing_city_with_no_match_falls_back_to_unknown() {
        let mut listings = vec![Listing::new("pararius", "1", "https://pararius.com/x")];
        fill_city_from_context(&mut listings, "", &["Utrecht", "Amsterdam"]);
        assert_eq!(listings[0].city, "unknown");
    }
}
