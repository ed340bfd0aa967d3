use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Billing period a listed price applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePeriod {
    Month,
    Week,
}

/// Finish level of the unit, as advertised by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteriorClass {
    Shell,
    Upholstered,
    Furnished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyClass {
    Apartment,
    House,
    Room,
    Studio,
}

impl PropertyClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyClass::Apartment => "apartment",
            PropertyClass::House => "house",
            PropertyClass::Room => "room",
            PropertyClass::Studio => "studio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferingClass {
    Rental,
    Sale,
}

/// A normalized property listing, the unit every adapter produces and the
/// Listing Store persists. Fields an adapter could not determine are left
/// `None`; the store fills `city` from scan context when an adapter can't.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub source: String,
    pub source_id: String,
    pub url: String,
    pub title: Option<String>,
    pub address: String,
    pub postal_code: Option<String>,
    pub city: String,
    pub neighborhood: Option<String>,

    pub price_text: Option<String>,
    pub price_numeric: i64,
    pub price_period: Option<PricePeriod>,
    pub service_costs: Option<f64>,

    pub lat: Option<f64>,
    pub lon: Option<f64>,

    pub living_area: Option<i32>,
    pub plot_area: Option<i32>,
    pub volume: Option<i32>,
    pub rooms: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub floors: Option<i32>,

    pub balcony: bool,
    pub garden: bool,
    pub parking: bool,

    pub construction_year: Option<i32>,
    pub energy_label: Option<String>,
    pub interior: Option<InteriorClass>,
    pub property_type: Option<PropertyClass>,
    pub offering_type: OfferingClass,

    pub description: Option<String>,
    pub images: Vec<String>,
    pub features: Value,

    pub date_listed: Option<String>,
    pub date_available: Option<String>,

    /// Set only on rows already persisted; `None` for a freshly parsed,
    /// not-yet-stored listing.
    pub id: Option<i64>,
    pub first_scraped: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn new(source: impl Into<String>, source_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_id: source_id.into(),
            url: url.into(),
            title: None,
            address: String::new(),
            postal_code: None,
            city: String::new(),
            neighborhood: None,
            price_text: None,
            price_numeric: 0,
            price_period: None,
            service_costs: None,
            lat: None,
            lon: None,
            living_area: None,
            plot_area: None,
            volume: None,
            rooms: None,
            bedrooms: None,
            bathrooms: None,
            floors: None,
            balcony: false,
            garden: false,
            parking: false,
            construction_year: None,
            energy_label: None,
            interior: None,
            property_type: None,
            offering_type: OfferingClass::Rental,
            description: None,
            images: Vec::new(),
            features: Value::Null,
            date_listed: None,
            date_available: None,
            id: None,
            first_scraped: None,
        }
    }

    /// Content hash: MD5 over the pipe-joined non-null components
    /// `url | address | source_id | city`.
    pub fn content_hash(&self) -> String {
        crate::content_hash::compute(&self.url, &self.address, &self.source_id, &self.city)
    }
}
