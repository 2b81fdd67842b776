//! Shared types and configuration for Contar.
//!
//! This crate holds the pieces every other crate depends on:
//! typed identifiers and application configuration. No business logic.

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{AccountId, CompanyId, LedgerLineId, TransactionId};
