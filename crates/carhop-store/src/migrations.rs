//! Schema migrations, gated on `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::debug;

const MIGRATIONS: &[&str] = &[
    // v1 — initial schema: catalog, orders, line items, modifications.
    "
    CREATE TABLE menu_items (
        id                       TEXT PRIMARY KEY,
        name                     TEXT NOT NULL,
        price_cents              INTEGER NOT NULL CHECK (price_cents >= 0),
        default_ingredients      TEXT NOT NULL,
        customizable_ingredients TEXT NOT NULL,
        created_at               TEXT NOT NULL
    );

    CREATE TABLE orders (
        id                TEXT PRIMARY KEY,
        total_price_cents INTEGER NOT NULL DEFAULT 0 CHECK (total_price_cents >= 0),
        created_at        TEXT NOT NULL
    );

    CREATE TABLE line_items (
        id          TEXT PRIMARY KEY,
        order_id    TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        name        TEXT NOT NULL,
        price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
        quantity    INTEGER NOT NULL CHECK (quantity >= 1),
        position    INTEGER NOT NULL,
        created_at  TEXT NOT NULL
    );
    CREATE INDEX idx_line_items_order ON line_items(order_id);

    CREATE TABLE modifications (
        id                  TEXT PRIMARY KEY,
        line_item_id        TEXT NOT NULL REFERENCES line_items(id) ON DELETE CASCADE,
        instruction         TEXT,
        custom_instructions TEXT,
        position            INTEGER NOT NULL,
        created_at          TEXT NOT NULL
    );
    CREATE INDEX idx_modifications_line_item ON modifications(line_item_id);
    ",
];

/// Bring the database up to the current schema version. Idempotent.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (idx, migration) in MIGRATIONS.iter().enumerate() {
        let version = idx as i64 + 1;
        if version <= current {
            continue;
        }
        debug!(version, "applying migration");
        conn.execute_batch(&format!(
            "BEGIN; {migration}; PRAGMA user_version = {version}; COMMIT;"
        ))?;
    }
    Ok(())
}
