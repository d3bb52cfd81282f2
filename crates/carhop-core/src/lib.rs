//! # carhop-core
//!
//! Foundation types for the Carhop voice-ordering agent.
//!
//! This crate provides the shared vocabulary that the storage and tool
//! crates depend on:
//!
//! - **Branded IDs**: [`ids::OrderId`], [`ids::LineItemId`],
//!   [`ids::ModificationId`], [`ids::MenuItemId`] as newtypes
//! - **Money**: [`money::Price`] — integer cents with dollar-valued JSON
//! - **Menu**: [`menu::MenuItem`] catalog entries
//! - **Orders**: [`order::Order`], [`order::OrderLineItem`],
//!   [`order::Modification`]
//! - **Errors**: [`errors::OrderError`] taxonomy via `thiserror`
//! - **Ledger seam**: [`ledger::OrderLedger`] — the store interface
//!   injected into every tool (no ambient singletons)
//! - **Tool surface**: [`tools::ToolDefinition`] schemas and the uniform
//!   [`tools::ToolResponse`] shape
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other carhop crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod ledger;
pub mod menu;
pub mod money;
pub mod order;
pub mod tools;
