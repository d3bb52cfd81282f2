//! # carhop-tools
//!
//! The tool-invocation layer of the Carhop ordering agent.
//!
//! The conversational driver invokes named tools asynchronously, in any
//! order, with no deduplication guarantee. This crate exposes the ledger
//! operations as five such tools, each with a declared argument schema:
//!
//! - `create_order`
//! - `add_item_to_order`
//! - `remove_item_from_order`
//! - `modify_item_in_order`
//! - `get_order_details`
//!
//! [`router::ToolRouter`] validates arguments at the boundary, delegates
//! to the injected [`carhop_core::ledger::OrderLedger`], wraps every
//! outcome into the uniform `{success, …, error}` response, and appends an
//! audit entry per invocation. The router never retries on the caller's
//! behalf: the driver is known to report spurious "tool not available"
//! errors for calls that eventually succeed, so retry policy belongs to
//! the driver alone.

#![deny(unsafe_code)]

pub mod audit;
pub mod ordering;
#[cfg(test)]
mod testutil;
pub mod router;
pub mod schema;
pub mod traits;
pub mod validation;

pub use audit::{AuditEntry, AuditLog};
pub use router::ToolRouter;
pub use traits::OrderTool;
