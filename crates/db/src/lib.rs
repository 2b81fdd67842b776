//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Tenant scoping is an explicit `company_id` predicate on every query
//! path. There is no ambient tenant state anywhere in this crate.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{AccountRepository, LifecycleRepository, TransactionRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
