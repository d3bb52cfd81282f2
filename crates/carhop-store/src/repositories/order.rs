//! Order repository — the `orders`, `line_items`, and `modifications`
//! tables.
//!
//! Line items and modifications carry a `position` column so snapshots can
//! be reassembled in insertion order (application order, for
//! modifications). The total is only ever moved with a relative
//! `total_price_cents = total_price_cents + ?` update — never read out and
//! written back — so a bumped total can never lose a concurrent update.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};

use carhop_core::ids::{LineItemId, ModificationId, OrderId};
use carhop_core::money::Price;
use carhop_core::order::{Modification, Order, OrderLineItem};

/// Order repository — stateless, every method takes `&Connection`.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert an empty order with a zero total.
    pub fn create(
        conn: &Connection,
        order_id: &OrderId,
        created_at: DateTime<Utc>,
    ) -> rusqlite::Result<()> {
        let _ = conn.execute(
            "INSERT INTO orders (id, total_price_cents, created_at) VALUES (?1, 0, ?2)",
            params![order_id.as_str(), created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Check if an order exists.
    pub fn exists(conn: &Connection, order_id: &OrderId) -> rusqlite::Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)",
            params![order_id.as_str()],
            |row| row.get(0),
        )
    }

    /// Move the total by a relative amount (positive or negative cents).
    /// Returns `false` when the order does not exist.
    pub fn bump_total(
        conn: &Connection,
        order_id: &OrderId,
        delta: Price,
    ) -> rusqlite::Result<bool> {
        let changed = conn.execute(
            "UPDATE orders SET total_price_cents = total_price_cents + ?1 WHERE id = ?2",
            params![delta.cents(), order_id.as_str()],
        )?;
        Ok(changed > 0)
    }

    /// Append a line item at the next position.
    pub fn insert_line_item(
        conn: &Connection,
        order_id: &OrderId,
        line_item_id: &LineItemId,
        name: &str,
        price: Price,
        quantity: u32,
        created_at: DateTime<Utc>,
    ) -> rusqlite::Result<()> {
        let _ = conn.execute(
            "INSERT INTO line_items (id, order_id, name, price_cents, quantity, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5,
                     (SELECT COALESCE(MAX(position) + 1, 0) FROM line_items WHERE order_id = ?2),
                     ?6)",
            params![
                line_item_id.as_str(),
                order_id.as_str(),
                name,
                price.cents(),
                quantity,
                created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// The snapshot line total (`price × quantity`) of a line item, or
    /// `None` if it is not part of the order.
    pub fn line_item_total(
        conn: &Connection,
        order_id: &OrderId,
        line_item_id: &LineItemId,
    ) -> rusqlite::Result<Option<Price>> {
        conn.query_row(
            "SELECT price_cents * quantity FROM line_items WHERE id = ?1 AND order_id = ?2",
            params![line_item_id.as_str(), order_id.as_str()],
            |row| row.get::<_, i64>(0).map(Price::from_cents),
        )
        .optional()
    }

    /// Whether a line item is part of the order.
    pub fn line_item_exists(
        conn: &Connection,
        order_id: &OrderId,
        line_item_id: &LineItemId,
    ) -> rusqlite::Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM line_items WHERE id = ?1 AND order_id = ?2)",
            params![line_item_id.as_str(), order_id.as_str()],
            |row| row.get(0),
        )
    }

    /// Delete a line item (modifications cascade). Returns `true` if a row
    /// was deleted.
    pub fn delete_line_item(
        conn: &Connection,
        order_id: &OrderId,
        line_item_id: &LineItemId,
    ) -> rusqlite::Result<bool> {
        let changed = conn.execute(
            "DELETE FROM line_items WHERE id = ?1 AND order_id = ?2",
            params![line_item_id.as_str(), order_id.as_str()],
        )?;
        Ok(changed > 0)
    }

    /// Append a modification to a line item at the next position.
    pub fn insert_modification(
        conn: &Connection,
        line_item_id: &LineItemId,
        modification_id: &ModificationId,
        modification: &Modification,
    ) -> rusqlite::Result<()> {
        let _ = conn.execute(
            "INSERT INTO modifications (id, line_item_id, instruction, custom_instructions, position, created_at)
             VALUES (?1, ?2, ?3, ?4,
                     (SELECT COALESCE(MAX(position) + 1, 0) FROM modifications WHERE line_item_id = ?2),
                     ?5)",
            params![
                modification_id.as_str(),
                line_item_id.as_str(),
                modification.instruction,
                modification.custom_instructions,
                modification.timestamp.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Assemble the full order snapshot, or `None` if the order does not
    /// exist.
    pub fn load(conn: &Connection, order_id: &OrderId) -> rusqlite::Result<Option<Order>> {
        let header = conn
            .query_row(
                "SELECT total_price_cents, created_at FROM orders WHERE id = ?1",
                params![order_id.as_str()],
                |row| {
                    let total: i64 = row.get(0)?;
                    let created: String = row.get(1)?;
                    Ok((total, created))
                },
            )
            .optional()?;
        let Some((total, created)) = header else {
            return Ok(None);
        };

        let mut order = Order::empty(order_id.clone(), parse_timestamp(&created, 1)?);
        order.total_price = Price::from_cents(total);

        let mut stmt = conn.prepare(
            "SELECT id, name, price_cents, quantity FROM line_items
             WHERE order_id = ?1 ORDER BY position",
        )?;
        let lines = stmt
            .query_map(params![order_id.as_str()], |row| {
                Ok((
                    LineItemId::from(row.get::<_, String>(0)?),
                    OrderLineItem {
                        name: row.get(1)?,
                        price: Price::from_cents(row.get(2)?),
                        quantity: row.get(3)?,
                        modifications: IndexMap::new(),
                    },
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut mod_stmt = conn.prepare(
            "SELECT id, instruction, custom_instructions, created_at FROM modifications
             WHERE line_item_id = ?1 ORDER BY position",
        )?;
        for (line_item_id, mut line) in lines {
            let mods = mod_stmt
                .query_map(params![line_item_id.as_str()], |row| {
                    let created: String = row.get(3)?;
                    Ok((
                        ModificationId::from(row.get::<_, String>(0)?),
                        Modification {
                            instruction: row.get(1)?,
                            custom_instructions: row.get(2)?,
                            timestamp: parse_timestamp(&created, 3)?,
                        },
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            line.modifications = mods.into_iter().collect();
            let _ = order.items.insert(line_item_id, line);
        }

        Ok(Some(order))
    }
}

fn parse_timestamp(raw: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
