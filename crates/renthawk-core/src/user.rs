use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::listing::{Listing, PropertyClass};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub active: bool,
    pub admin: bool,
    pub notifications_enabled: bool,
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One preference record per user. `0` for a `max_*` field means "no
/// upper bound"; an empty `cities`/`classes` list means "never
/// match"/"match any class" respectively — these are *not* symmetric,
/// matching the source behavior.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Preferences {
    pub cities: Vec<String>,
    pub min_price: i64,
    pub max_price: i64,
    pub min_rooms: i32,
    pub max_rooms: i32,
    pub min_area: i32,
    pub max_area: i32,
    pub neighborhood: Option<String>,
    pub classes: Vec<PropertyClass>,
}

impl Preferences {
    /// The single set-valued matching predicate, evaluated in-process.
    /// The store additionally expresses this as one SQL statement for the
    /// fan-out insert; this method exists so the predicate's semantics can
    /// be unit-tested without a database.
    pub fn matches(&self, listing: &Listing) -> bool {
        if self.cities.is_empty() {
            return false;
        }
        if !self.cities.iter().any(|c| c.eq_ignore_ascii_case(&listing.city)) {
            return false;
        }
        if listing.price_numeric < self.min_price {
            return false;
        }
        if self.max_price != 0 && listing.price_numeric > self.max_price {
            return false;
        }
        if let Some(rooms) = listing.rooms {
            if rooms < self.min_rooms {
                return false;
            }
            if self.max_rooms != 0 && rooms > self.max_rooms {
                return false;
            }
        } else if self.min_rooms > 0 {
            return false;
        }
        if let Some(area) = listing.living_area {
            if area < self.min_area {
                return false;
            }
            if self.max_area != 0 && area > self.max_area {
                return false;
            }
        } else if self.min_area > 0 {
            return false;
        }
        if !self.classes.is_empty() {
            match listing.property_type {
                Some(class) if self.classes.contains(&class) => {}
                _ => return false,
            }
        }
        if let Some(ref needle) = self.neighborhood {
            if !needle.is_empty() {
                match &listing.neighborhood {
                    Some(hay) if hay.to_lowercase().contains(&needle.to_lowercase()) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::OfferingClass;

    fn listing(city: &str, price: i64) -> Listing {
        let mut l = Listing::new("x", "1", "https://x/1");
        l.city = city.to_string();
        l.price_numeric = price;
        l.offering_type = OfferingClass::Rental;
        l
    }

    #[test]
    fn empty_cities_never_matches() {
        let prefs = Preferences::default();
        assert!(!prefs.matches(&listing("UTRECHT", 1000)));
    }

    #[test]
    fn zero_max_means_no_upper_bound() {
        let prefs = Preferences {
            cities: vec!["UTRECHT".into()],
            max_price: 0,
            max_rooms: 0,
            max_area: 0,
            ..Default::default()
        };
        assert!(prefs.matches(&listing("UTRECHT", 50_000)));
    }

    #[test]
    fn city_mismatch_excludes() {
        let prefs = Preferences {
            cities: vec!["UTRECHT".into()],
            max_price: 2000,
            ..Default::default()
        };
        assert!(prefs.matches(&listing("UTRECHT", 1500)));
        assert!(!prefs.matches(&listing("DEN HAAG", 1500)));
    }
}
