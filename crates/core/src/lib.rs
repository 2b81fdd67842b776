//! Core business logic for Contar.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and state machine
//! logic live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry line model and validation
//! - `lifecycle` - Transaction state machine and reversal logic
//! - `adapters` - Source-document adapters producing balanced line sets

pub mod adapters;
pub mod ledger;
pub mod lifecycle;
