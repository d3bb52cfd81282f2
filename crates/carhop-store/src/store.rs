//! High-level transactional order store.
//!
//! [`SqliteOrderStore`] implements the [`OrderLedger`] seam. Every
//! mutation runs as an atomic read-modify-write: a per-order in-process
//! lock serializes writers on the same order, and a `SQLite` IMMEDIATE
//! transaction wraps the whole check/insert/total-bump so the record is
//! either fully updated or untouched. Totals are only ever moved with
//! relative updates, never read out and written back.
//!
//! After each commit the store publishes a fresh snapshot to its
//! [`OrderFeed`]; delivery runs on the watch channel and never blocks the
//! writer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, instrument, warn};

use carhop_core::errors::{OrderError, Result};
use carhop_core::ids::{LineItemId, MenuItemId, ModificationId, OrderId};
use carhop_core::ledger::OrderLedger;
use carhop_core::menu::MenuItem;
use carhop_core::order::{Modification, Order};

use crate::catalog;
use crate::connection::{ConnectionPool, StoreConfig};
use crate::feed::{OrderFeed, OrderSubscription};
use crate::repositories::{MenuRepo, OrderRepo};

/// The `SQLite`-backed order ledger.
///
/// INVARIANT: order writes are serialized per-order via in-process mutex
/// locks; each write is a single transaction, so
/// `total == Σ price × quantity` holds after every commit.
pub struct SqliteOrderStore {
    pool: ConnectionPool,
    feed: OrderFeed,
    order_write_locks: Mutex<HashMap<OrderId, Weak<Mutex<()>>>>,
}

impl SqliteOrderStore {
    /// Open the store and seed the default menu (idempotent).
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::open_with_menu(config, &catalog::default_menu())
    }

    /// Open the store and seed the given catalog entries (idempotent).
    pub fn open_with_menu(config: &StoreConfig, menu: &[MenuItem]) -> Result<Self> {
        let pool = ConnectionPool::open(config)?;
        let conn = pool.get()?;
        let _ = catalog::seed(&conn, menu).map_err(OrderError::storage)?;
        drop(conn);
        Ok(Self {
            pool,
            feed: OrderFeed::new(),
            order_write_locks: Mutex::new(HashMap::new()),
        })
    }

    /// In-memory store with the default menu (tests, demos).
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&StoreConfig::default())
    }

    fn acquire_order_write_lock(&self, order_id: &OrderId) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .order_write_locks
            .lock()
            .map_err(|_| OrderError::Storage("order lock map poisoned".into()))?;

        // Opportunistically prune dead weak refs when the map grows.
        if locks.len() > 128 {
            locks.retain(|_, weak| weak.strong_count() > 0);
        }

        if let Some(existing) = locks.get(order_id).and_then(Weak::upgrade) {
            return Ok(existing);
        }

        let lock = Arc::new(Mutex::new(()));
        let _ = locks.insert(order_id.clone(), Arc::downgrade(&lock));
        Ok(lock)
    }

    /// Reload the committed snapshot and push it to subscribers. Called
    /// while still holding the order write lock so publishes happen in
    /// commit order.
    fn publish_snapshot(&self, conn: &Connection, order_id: &OrderId) {
        match OrderRepo::load(conn, order_id) {
            Ok(Some(order)) => self.feed.publish(order),
            Ok(None) => {}
            Err(e) => warn!(order_id = %order_id, error = %e, "failed to load snapshot for feed"),
        }
    }

    /// Create a new empty order.
    #[instrument(skip(self))]
    pub fn create_order(&self) -> Result<OrderId> {
        let order_id = OrderId::generate();
        let conn = self.pool.get()?;
        OrderRepo::create(&conn, &order_id, Utc::now()).map_err(OrderError::storage)?;
        self.publish_snapshot(&conn, &order_id);
        counter!("carhop_store_writes_total", "op" => "create_order").increment(1);
        debug!(order_id = %order_id, "order created");
        Ok(order_id)
    }

    /// Resolve the item through the catalog and append a new line item.
    #[instrument(skip(self, modifications))]
    pub fn add_item(
        &self,
        order_id: &OrderId,
        item_name: &str,
        modifications: &[String],
    ) -> Result<LineItemId> {
        let lock = self.acquire_order_write_lock(order_id)?;
        let guard = lock
            .lock()
            .map_err(|_| OrderError::Storage("order write lock poisoned".into()))?;

        let mut conn = self.pool.get()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(OrderError::storage)?;

        if !OrderRepo::exists(&tx, order_id).map_err(OrderError::storage)? {
            return Err(OrderError::OrderNotFound(order_id.clone()));
        }
        let menu_item = MenuRepo::get(&tx, &MenuItemId::derive(item_name))
            .map_err(OrderError::storage)?
            .ok_or_else(|| OrderError::MenuItemNotFound(item_name.to_owned()))?;

        let line_item_id = LineItemId::generate(&menu_item.id);
        let now = Utc::now();
        OrderRepo::insert_line_item(
            &tx,
            order_id,
            &line_item_id,
            &menu_item.name,
            menu_item.price,
            1,
            now,
        )
        .map_err(OrderError::storage)?;

        for instruction in modifications {
            // An empty entry in the list is dropped, same as an empty
            // modify request.
            if let Some(modification) = Modification::from_parts(Some(instruction), None, now) {
                OrderRepo::insert_modification(
                    &tx,
                    &line_item_id,
                    &ModificationId::generate(),
                    &modification,
                )
                .map_err(OrderError::storage)?;
            }
        }

        let _ = OrderRepo::bump_total(&tx, order_id, menu_item.price).map_err(OrderError::storage)?;
        tx.commit().map_err(OrderError::storage)?;

        self.publish_snapshot(&conn, order_id);
        drop(guard);
        counter!("carhop_store_writes_total", "op" => "add_item").increment(1);
        debug!(order_id = %order_id, line_item_id = %line_item_id, item_name, "item added");
        Ok(line_item_id)
    }

    /// Delete a line item and decrement the total by its snapshot price.
    #[instrument(skip(self))]
    pub fn remove_item(&self, order_id: &OrderId, line_item_id: &LineItemId) -> Result<()> {
        let lock = self.acquire_order_write_lock(order_id)?;
        let guard = lock
            .lock()
            .map_err(|_| OrderError::Storage("order write lock poisoned".into()))?;

        let mut conn = self.pool.get()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(OrderError::storage)?;

        if !OrderRepo::exists(&tx, order_id).map_err(OrderError::storage)? {
            return Err(OrderError::OrderNotFound(order_id.clone()));
        }
        let line_total = OrderRepo::line_item_total(&tx, order_id, line_item_id)
            .map_err(OrderError::storage)?
            .ok_or_else(|| OrderError::LineItemNotFound(line_item_id.clone()))?;

        let _ = OrderRepo::delete_line_item(&tx, order_id, line_item_id)
            .map_err(OrderError::storage)?;
        let _ = OrderRepo::bump_total(&tx, order_id, carhop_core::money::Price::ZERO - line_total)
            .map_err(OrderError::storage)?;
        tx.commit().map_err(OrderError::storage)?;

        self.publish_snapshot(&conn, order_id);
        drop(guard);
        counter!("carhop_store_writes_total", "op" => "remove_item").increment(1);
        debug!(order_id = %order_id, line_item_id = %line_item_id, "item removed");
        Ok(())
    }

    /// Attach a modification to a line item. `Ok(None)` when the request
    /// carries no content — a documented no-op. Never touches the total.
    #[instrument(skip(self, modification, custom_instructions))]
    pub fn modify_item(
        &self,
        order_id: &OrderId,
        line_item_id: &LineItemId,
        modification: Option<&str>,
        custom_instructions: Option<&str>,
    ) -> Result<Option<ModificationId>> {
        let lock = self.acquire_order_write_lock(order_id)?;
        let guard = lock
            .lock()
            .map_err(|_| OrderError::Storage("order write lock poisoned".into()))?;

        let mut conn = self.pool.get()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(OrderError::storage)?;

        if !OrderRepo::exists(&tx, order_id).map_err(OrderError::storage)? {
            return Err(OrderError::OrderNotFound(order_id.clone()));
        }
        if !OrderRepo::line_item_exists(&tx, order_id, line_item_id)
            .map_err(OrderError::storage)?
        {
            return Err(OrderError::LineItemNotFound(line_item_id.clone()));
        }

        let Some(record) = Modification::from_parts(modification, custom_instructions, Utc::now())
        else {
            debug!(order_id = %order_id, line_item_id = %line_item_id, "empty modification, no-op");
            return Ok(None);
        };

        let modification_id = ModificationId::generate();
        OrderRepo::insert_modification(&tx, line_item_id, &modification_id, &record)
            .map_err(OrderError::storage)?;
        tx.commit().map_err(OrderError::storage)?;

        self.publish_snapshot(&conn, order_id);
        drop(guard);
        counter!("carhop_store_writes_total", "op" => "modify_item").increment(1);
        debug!(order_id = %order_id, line_item_id = %line_item_id, modification_id = %modification_id, "item modified");
        Ok(Some(modification_id))
    }

    /// Fetch the current snapshot.
    pub fn get_order(&self, order_id: &OrderId) -> Result<Order> {
        let conn = self.pool.get()?;
        OrderRepo::load(&conn, order_id)
            .map_err(OrderError::storage)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))
    }

    /// Resolve a menu item by display name or derived id.
    pub fn lookup_menu_item(&self, name_or_id: &str) -> Result<MenuItem> {
        let conn = self.pool.get()?;
        MenuRepo::get(&conn, &MenuItemId::derive(name_or_id))
            .map_err(OrderError::storage)?
            .ok_or_else(|| OrderError::MenuItemNotFound(name_or_id.to_owned()))
    }

    /// The full catalog (display layer).
    pub fn list_menu(&self) -> Result<Vec<MenuItem>> {
        let conn = self.pool.get()?;
        MenuRepo::list(&conn).map_err(OrderError::storage)
    }

    /// Open a live subscription to an order's snapshots.
    ///
    /// Delivers the current state immediately and again after every
    /// committed change, until cancelled. The initial snapshot is read
    /// under the order's write lock — publishes happen under the same
    /// lock, so the first delivery is never older than the last commit.
    pub fn subscribe(&self, order_id: &OrderId) -> Result<OrderSubscription> {
        let lock = self.acquire_order_write_lock(order_id)?;
        let guard = lock
            .lock()
            .map_err(|_| OrderError::Storage("order write lock poisoned".into()))?;
        let current = self.get_order(order_id)?;
        let subscription = self.feed.subscribe(order_id, Arc::new(current));
        drop(guard);
        Ok(subscription)
    }
}

#[async_trait]
impl OrderLedger for SqliteOrderStore {
    async fn create_order(&self) -> Result<OrderId> {
        self.create_order()
    }

    async fn add_item(
        &self,
        order_id: &OrderId,
        item_name: &str,
        modifications: &[String],
    ) -> Result<LineItemId> {
        self.add_item(order_id, item_name, modifications)
    }

    async fn remove_item(&self, order_id: &OrderId, line_item_id: &LineItemId) -> Result<()> {
        self.remove_item(order_id, line_item_id)
    }

    async fn modify_item(
        &self,
        order_id: &OrderId,
        line_item_id: &LineItemId,
        modification: Option<&str>,
        custom_instructions: Option<&str>,
    ) -> Result<Option<ModificationId>> {
        self.modify_item(order_id, line_item_id, modification, custom_instructions)
    }

    async fn get_order(&self, order_id: &OrderId) -> Result<Order> {
        self.get_order(order_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn setup() -> SqliteOrderStore {
        SqliteOrderStore::open_in_memory().unwrap()
    }

    #[test]
    fn round_trip_create_add_get() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let line_item_id = store.add_item(&order_id, "Burger", &[]).unwrap();

        let order = store.get_order(&order_id).unwrap();
        assert_eq!(order.items.len(), 1);
        let line = &order.items[&line_item_id];
        assert_eq!(line.name, "Burger");
        assert_eq!(line.price.cents(), 699);
        assert_eq!(line.quantity, 1);
        assert_eq!(order.total_price.cents(), 699);
        assert_eq!(order.computed_total(), order.total_price);
    }

    #[test]
    fn fries_and_soda_then_remove_fries() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let fries = store.add_item(&order_id, "Fries", &[]).unwrap();
        let _soda = store.add_item(&order_id, "Soda", &[]).unwrap();

        store.remove_item(&order_id, &fries).unwrap();

        let order = store.get_order(&order_id).unwrap();
        assert_eq!(order.total_price.cents(), 199);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.computed_total(), order.total_price);
    }

    #[test]
    fn add_resolves_names_case_and_space_insensitively() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let hot_dog = store.add_item(&order_id, "hot dog", &[]).unwrap();
        let order = store.get_order(&order_id).unwrap();
        // The snapshot keeps the catalog's display name.
        assert_eq!(order.items[&hot_dog].name, "Hot Dog");
    }

    #[test]
    fn identical_adds_create_separate_line_items() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let first = store.add_item(&order_id, "Burger", &[]).unwrap();
        let second = store.add_item(&order_id, "Burger", &[]).unwrap();
        assert_ne!(first, second);

        let order = store.get_order(&order_id).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total_price.cents(), 2 * 699);
    }

    #[test]
    fn add_unknown_menu_item_fails_without_side_effects() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let err = store.add_item(&order_id, "Pizza", &[]).unwrap_err();
        assert_matches!(err, OrderError::MenuItemNotFound(_));

        let order = store.get_order(&order_id).unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.total_price, carhop_core::money::Price::ZERO);
    }

    #[test]
    fn add_to_unknown_order_fails() {
        let store = setup();
        let err = store
            .add_item(&OrderId::from("ord_nope"), "Burger", &[])
            .unwrap_err();
        assert_matches!(err, OrderError::OrderNotFound(_));
    }

    #[test]
    fn remove_missing_line_item_leaves_order_unchanged() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let burger = store.add_item(&order_id, "Burger", &[]).unwrap();

        let err = store
            .remove_item(&order_id, &LineItemId::from("fries_gone"))
            .unwrap_err();
        assert_matches!(err, OrderError::LineItemNotFound(_));

        let order = store.get_order(&order_id).unwrap();
        assert_eq!(order.total_price.cents(), 699);
        assert!(order.items.contains_key(&burger));
    }

    #[test]
    fn removed_line_item_cannot_be_removed_twice() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let fries = store.add_item(&order_id, "Fries", &[]).unwrap();
        store.remove_item(&order_id, &fries).unwrap();
        let err = store.remove_item(&order_id, &fries).unwrap_err();
        assert_matches!(err, OrderError::LineItemNotFound(_));
    }

    #[test]
    fn modify_attaches_text_without_touching_total() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let burger = store.add_item(&order_id, "Burger", &[]).unwrap();

        let modification_id = store
            .modify_item(&order_id, &burger, Some("NO onions"), None)
            .unwrap()
            .unwrap();

        let order = store.get_order(&order_id).unwrap();
        let mods = &order.items[&burger].modifications;
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[&modification_id].instruction.as_deref(), Some("NO onions"));
        assert_eq!(order.total_price.cents(), 699);
    }

    #[test]
    fn empty_modify_is_a_noop() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let burger = store.add_item(&order_id, "Burger", &[]).unwrap();

        let result = store
            .modify_item(&order_id, &burger, Some("  "), Some(""))
            .unwrap();
        assert_eq!(result, None);

        let order = store.get_order(&order_id).unwrap();
        assert!(order.items[&burger].modifications.is_empty());
    }

    #[test]
    fn modify_missing_line_item_fails_even_when_empty() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let err = store
            .modify_item(&order_id, &LineItemId::from("nope"), None, None)
            .unwrap_err();
        assert_matches!(err, OrderError::LineItemNotFound(_));
    }

    #[test]
    fn custom_instructions_alone_are_persisted() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let burger = store.add_item(&order_id, "Burger", &[]).unwrap();

        let modification_id = store
            .modify_item(&order_id, &burger, None, Some("cut in half"))
            .unwrap()
            .unwrap();

        let order = store.get_order(&order_id).unwrap();
        let record = &order.items[&burger].modifications[&modification_id];
        assert_eq!(record.instruction, None);
        assert_eq!(record.custom_instructions.as_deref(), Some("cut in half"));
    }

    #[test]
    fn add_time_modifications_attach_to_the_new_line() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let burger = store
            .add_item(&order_id, "Burger", &["NO onions".into(), "EX cheese".into()])
            .unwrap();

        let order = store.get_order(&order_id).unwrap();
        let texts: Vec<_> = order.items[&burger]
            .modifications
            .values()
            .map(|m| m.instruction.clone().unwrap())
            .collect();
        assert_eq!(texts, vec!["NO onions", "EX cheese"]);
    }

    #[test]
    fn get_unknown_order_fails() {
        let store = setup();
        let err = store.get_order(&OrderId::from("ord_nope")).unwrap_err();
        assert_matches!(err, OrderError::OrderNotFound(_));
    }

    #[test]
    fn menu_lookup_by_name_or_derived_id() {
        let store = setup();
        assert_eq!(store.lookup_menu_item("Hot Dog").unwrap().price.cents(), 499);
        assert_eq!(store.lookup_menu_item("hotdog").unwrap().price.cents(), 499);
        assert_matches!(
            store.lookup_menu_item("Pizza").unwrap_err(),
            OrderError::MenuItemNotFound(_)
        );
    }

    #[test]
    fn reopening_a_file_store_reseeds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            path: Some(dir.path().join("carhop.db")),
            pool_size: 2,
        };
        let store = SqliteOrderStore::open(&config).unwrap();
        let order_id = store.create_order().unwrap();
        drop(store);

        let store = SqliteOrderStore::open(&config).unwrap();
        assert_eq!(store.list_menu().unwrap().len(), 4);
        assert!(store.get_order(&order_id).is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_never_lose_an_update() {
        let store = Arc::new(setup());
        let order_id = store.create_order().unwrap();

        let mut handles = Vec::new();
        for name in ["Fries", "Soda", "Burger", "Hot Dog"] {
            let store = Arc::clone(&store);
            let order_id = order_id.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                store.add_item(&order_id, name, &[]).unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let order = store.get_order(&order_id).unwrap();
        assert_eq!(order.items.len(), 4);
        assert_eq!(order.total_price.cents(), 299 + 199 + 699 + 499);
        assert_eq!(order.computed_total(), order.total_price);
    }

    #[tokio::test]
    async fn subscription_tracks_writes_until_cancelled() {
        let store = setup();
        let order_id = store.create_order().unwrap();
        let mut sub = store.subscribe(&order_id).unwrap();

        let initial = sub.recv().await.unwrap();
        assert!(initial.items.is_empty());

        let _ = store.add_item(&order_id, "Fries", &[]).unwrap();
        let after_add = sub.recv().await.unwrap();
        assert_eq!(after_add.total_price.cents(), 299);

        sub.cancel();
        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn subscribe_to_unknown_order_fails() {
        let store = setup();
        assert_matches!(
            store.subscribe(&OrderId::from("ord_nope")).unwrap_err(),
            OrderError::OrderNotFound(_)
        );
    }
}
