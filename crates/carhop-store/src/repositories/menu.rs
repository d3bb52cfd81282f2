//! Menu repository — CRUD for the `menu_items` table.
//!
//! The primary key is the derived id (lowercased, whitespace-stripped
//! display name); it is the sole lookup key used by every other component.

use rusqlite::{Connection, OptionalExtension, params};

use carhop_core::ids::MenuItemId;
use carhop_core::menu::MenuItem;
use carhop_core::money::Price;

/// Menu repository — stateless, every method takes `&Connection`.
pub struct MenuRepo;

impl MenuRepo {
    /// Insert a catalog entry. Fails on a duplicate derived id.
    pub fn insert(conn: &Connection, item: &MenuItem) -> rusqlite::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let defaults = serde_json::to_string(&item.default_ingredients)
            .unwrap_or_else(|_| "[]".into());
        let customizable = serde_json::to_string(&item.customizable_ingredients)
            .unwrap_or_else(|_| "[]".into());
        let _ = conn.execute(
            "INSERT INTO menu_items (id, name, price_cents, default_ingredients, customizable_ingredients, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![item.id.as_str(), item.name, item.price.cents(), defaults, customizable, now],
        )?;
        Ok(())
    }

    /// Check if an entry exists for the derived id (used by idempotent
    /// seeding).
    pub fn exists(conn: &Connection, id: &MenuItemId) -> rusqlite::Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM menu_items WHERE id = ?1)",
            params![id.as_str()],
            |row| row.get(0),
        )
    }

    /// Get an entry by derived id.
    pub fn get(conn: &Connection, id: &MenuItemId) -> rusqlite::Result<Option<MenuItem>> {
        conn.query_row(
            "SELECT id, name, price_cents, default_ingredients, customizable_ingredients
             FROM menu_items WHERE id = ?1",
            params![id.as_str()],
            Self::map_row,
        )
        .optional()
    }

    /// List the whole catalog, alphabetically by name.
    pub fn list(conn: &Connection) -> rusqlite::Result<Vec<MenuItem>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, price_cents, default_ingredients, customizable_ingredients
             FROM menu_items ORDER BY name",
        )?;
        let rows = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Remove an entry by display name. Returns `true` if a row was
    /// deleted.
    pub fn remove_by_name(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
        let id = MenuItemId::derive(name);
        let changed = conn.execute(
            "DELETE FROM menu_items WHERE id = ?1",
            params![id.as_str()],
        )?;
        Ok(changed > 0)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MenuItem> {
        let defaults: String = row.get(3)?;
        let customizable: String = row.get(4)?;
        Ok(MenuItem {
            id: MenuItemId::from(row.get::<_, String>(0)?),
            name: row.get(1)?,
            price: Price::from_cents(row.get(2)?),
            default_ingredients: serde_json::from_str(&defaults).unwrap_or_default(),
            customizable_ingredients: serde_json::from_str(&customizable).unwrap_or_default(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn hot_dog() -> MenuItem {
        MenuItem::new(
            "Hot Dog",
            Price::from_cents(499),
            vec!["bun".into(), "sausage".into(), "relish".into()],
            vec!["relish".into()],
        )
    }

    #[test]
    fn insert_then_get_round_trips() {
        let conn = setup();
        MenuRepo::insert(&conn, &hot_dog()).unwrap();

        let got = MenuRepo::get(&conn, &MenuItemId::derive("Hot Dog"))
            .unwrap()
            .unwrap();
        assert_eq!(got.name, "Hot Dog");
        assert_eq!(got.price.cents(), 499);
        assert_eq!(got.default_ingredients, vec!["bun", "sausage", "relish"]);
        assert_eq!(got.customizable_ingredients, vec!["relish"]);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let conn = setup();
        assert!(MenuRepo::get(&conn, &MenuItemId::derive("Pizza")).unwrap().is_none());
    }

    #[test]
    fn exists_tracks_inserts() {
        let conn = setup();
        let id = MenuItemId::derive("Hot Dog");
        assert!(!MenuRepo::exists(&conn, &id).unwrap());
        MenuRepo::insert(&conn, &hot_dog()).unwrap();
        assert!(MenuRepo::exists(&conn, &id).unwrap());
    }

    #[test]
    fn duplicate_insert_fails() {
        let conn = setup();
        MenuRepo::insert(&conn, &hot_dog()).unwrap();
        assert!(MenuRepo::insert(&conn, &hot_dog()).is_err());
    }

    #[test]
    fn list_is_sorted_by_name() {
        let conn = setup();
        MenuRepo::insert(&conn, &hot_dog()).unwrap();
        MenuRepo::insert(
            &conn,
            &MenuItem::new("Fries", Price::from_cents(299), vec![], vec![]),
        )
        .unwrap();
        let names: Vec<_> = MenuRepo::list(&conn).unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Fries", "Hot Dog"]);
    }

    #[test]
    fn remove_by_name_uses_derived_id() {
        let conn = setup();
        MenuRepo::insert(&conn, &hot_dog()).unwrap();
        assert!(MenuRepo::remove_by_name(&conn, "hot dog").unwrap());
        assert!(!MenuRepo::remove_by_name(&conn, "hot dog").unwrap());
        assert!(!MenuRepo::exists(&conn, &MenuItemId::derive("Hot Dog")).unwrap());
    }
}
