//! Menu catalog seed data and idempotent seeding.

use rusqlite::Connection;
use tracing::info;

use carhop_core::menu::MenuItem;
use carhop_core::money::Price;

use crate::repositories::MenuRepo;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// The default drive-thru menu.
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new(
            "Burger",
            Price::from_cents(699),
            strings(&[
                "bun", "patty", "cheese", "lettuce", "tomato", "pickles", "onions", "ketchup",
                "mustard",
            ]),
            strings(&["cheese", "lettuce", "tomato", "pickles", "onions", "ketchup", "mustard"]),
        ),
        MenuItem::new(
            "Fries",
            Price::from_cents(299),
            strings(&["potatoes", "salt"]),
            strings(&["salt"]),
        ),
        MenuItem::new(
            "Hot Dog",
            Price::from_cents(499),
            strings(&["bun", "sausage", "ketchup", "mustard", "onions", "relish"]),
            strings(&["ketchup", "mustard", "onions", "relish"]),
        ),
        MenuItem::new(
            "Soda",
            Price::from_cents(199),
            strings(&["carbonated water", "syrup", "ice"]),
            strings(&["ice"]),
        ),
    ]
}

/// Insert every entry whose derived id is not yet present. Re-seeding is a
/// no-op for existing entries, so this is safe to run at every startup.
/// Returns the number of entries inserted.
pub fn seed(conn: &Connection, items: &[MenuItem]) -> rusqlite::Result<usize> {
    let mut inserted = 0;
    for item in items {
        if MenuRepo::exists(conn, &item.id)? {
            continue;
        }
        MenuRepo::insert(conn, item)?;
        inserted += 1;
    }
    if inserted > 0 {
        info!(inserted, "seeded menu catalog");
    }
    Ok(inserted)
}
