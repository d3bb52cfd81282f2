//! # carhop-store
//!
//! SQLite-backed persistence for the Carhop ordering agent.
//!
//! - **[`connection`]**: r2d2 connection pool with WAL/foreign-key pragmas
//!   and a small [`connection::StoreConfig`]
//! - **[`migrations`]**: `user_version`-gated schema setup
//! - **[`repositories`]**: stateless per-table repositories taking
//!   `&Connection`
//! - **[`catalog`]**: default menu seed data and idempotent seeding
//! - **[`store`]**: [`store::SqliteOrderStore`] — the transactional
//!   [`carhop_core::ledger::OrderLedger`] implementation with per-order
//!   write serialization
//! - **[`feed`]**: watch-channel order subscriptions with explicit
//!   cancellation
//!
//! ## Crate Position
//!
//! Implements the ledger seam declared in `carhop-core`. Consumed by
//! whatever wires the agent together; `carhop-tools` only ever sees the
//! trait object.

#![deny(unsafe_code)]

pub mod catalog;
pub mod connection;
pub mod feed;
pub mod migrations;
pub mod repositories;
pub mod store;

pub use connection::{ConnectionPool, StoreConfig};
pub use feed::{OrderFeed, OrderSubscription, SubscriptionHandle};
pub use store::SqliteOrderStore;
