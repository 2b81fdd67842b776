//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a transaction (`transaction_status` enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    /// Transaction can still be modified or deleted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Transaction is posted and immutable.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Transaction was annulled via a compensating transaction.
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

/// Originating module of a transaction (`source_module` enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "source_module")]
pub enum SourceModule {
    /// Manual journal entry.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Sales documents.
    #[sea_orm(string_value = "ventas")]
    Ventas,
    /// Purchase documents.
    #[sea_orm(string_value = "compras")]
    Compras,
    /// Bank movements.
    #[sea_orm(string_value = "bancos")]
    Bancos,
    /// Accounts receivable collections.
    #[sea_orm(string_value = "cxc")]
    Cxc,
    /// Accounts payable payments.
    #[sea_orm(string_value = "cxp")]
    Cxp,
}
