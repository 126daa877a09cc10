//! Core business logic for ShareDesk.
//!
//! This crate contains pure business logic with ZERO web or HTTP dependencies.
//! Persistence is reached only through the [`ledger::LedgerStore`] trait.
//!
//! # Modules
//!
//! - `ledger` - Position ledger: average cost, realized profit/loss, holding checks

pub mod ledger;
