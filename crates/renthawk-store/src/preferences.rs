use anyhow::Result;
use renthawk_core::listing::PropertyClass;
use renthawk_core::{Preferences, User};

use crate::backend::DuckDbBackend;

fn parse_property_class(s: &str) -> Option<PropertyClass> {
    match s {
        "apartment" => Some(PropertyClass::Apartment),
        "house" => Some(PropertyClass::House),
        "room" => Some(PropertyClass::Room),
        "studio" => Some(PropertyClass::Studio),
        _ => None,
    }
}

impl DuckDbBackend {
    pub async fn upsert_user(&self, user_id: i64, display_name: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT INTO telegram_users (user_id, display_name, last_active)
               VALUES (?1, ?2, CURRENT_TIMESTAMP)
               ON CONFLICT (user_id) DO UPDATE SET last_active = CURRENT_TIMESTAMP"#,
            rusqlite::params![user_id, display_name],
        )?;
        Ok(())
    }

    pub async fn set_user_active(&self, user_id: i64, active: bool) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE telegram_users SET active = ?1 WHERE user_id = ?2",
            rusqlite::params![active, user_id],
        )?;
        Ok(())
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        let row = conn
            .prepare(
                "SELECT user_id, display_name, active, admin, notifications_enabled, \
                 CAST(last_active AS VARCHAR), CAST(created_at AS VARCHAR) \
                 FROM telegram_users WHERE user_id = ?1",
            )?
            .query_row(rusqlite::params![user_id], |row| {
                Ok(User {
                    user_id: row.get(0)?,
                    display_name: row.get(1)?,
                    active: row.get(2)?,
                    admin: row.get(3)?,
                    notifications_enabled: row.get(4)?,
                    last_active: None,
                    created_at: chrono::Utc::now(),
                })
            })
            .ok();
        Ok(row)
    }

    pub async fn set_preferences(&self, user_id: i64, prefs: &Preferences) -> Result<()> {
        let conn = self.conn.lock().await;
        let classes: Vec<String> = prefs.classes.iter().map(|c| c.as_str().to_string()).collect();
        let cities_json = serde_json::to_string(&prefs.cities)?;
        let classes_json = serde_json::to_string(&classes)?;
        conn.execute(
            r#"INSERT INTO user_preferences
                   (user_id, cities, min_price, max_price, min_rooms, max_rooms, min_area, max_area, neighborhood, classes)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
               ON CONFLICT (user_id) DO UPDATE SET
                   cities = excluded.cities, min_price = excluded.min_price, max_price = excluded.max_price,
                   min_rooms = excluded.min_rooms, max_rooms = excluded.max_rooms,
                   min_area = excluded.min_area, max_area = excluded.max_area,
                   neighborhood = excluded.neighborhood, classes = excluded.classes"#,
            rusqlite::params![
                user_id,
                cities_json,
                prefs.min_price,
                prefs.max_price,
                prefs.min_rooms,
                prefs.max_rooms,
                prefs.min_area,
                prefs.max_area,
                prefs.neighborhood,
                classes_json,
            ],
        )?;
        Ok(())
    }

    pub async fn get_preferences(&self, user_id: i64) -> Result<Option<Preferences>> {
        let conn = self.conn.lock().await;
        let row = conn
            .prepare(
                "SELECT cities, min_price, max_price, min_rooms, max_rooms, min_area, max_area, neighborhood, classes \
                 FROM user_preferences WHERE user_id = ?1",
            )?
            .query_row(rusqlite::params![user_id], |row| {
                let cities_json: String = row.get(0)?;
                let classes_json: String = row.get(8)?;
                Ok(Preferences {
                    cities: serde_json::from_str(&cities_json).unwrap_or_default(),
                    min_price: row.get(1)?,
                    max_price: row.get(2)?,
                    min_rooms: row.get(3)?,
                    max_rooms: row.get(4)?,
                    min_area: row.get(5)?,
                    max_area: row.get(6)?,
                    neighborhood: row.get(7)?,
                    classes: serde_json::from_str::<Vec<String>>(&classes_json)
                        .unwrap_or_default()
                        .iter()
                        .filter_map(|s| parse_property_class(s))
                        .collect(),
                })
            })
            .ok();
        Ok(row)
    }
}
