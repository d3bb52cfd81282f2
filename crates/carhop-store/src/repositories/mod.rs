//! Stateless per-table repositories.
//!
//! Each repository is a unit struct whose methods take `&Connection`, so
//! the caller decides the transaction boundary. The high-level store wraps
//! them in per-order transactions.

pub mod menu;
pub mod order;

pub use menu::MenuRepo;
pub use order::OrderRepo;
