//! Repository abstractions for data access.
//!
//! Every repository method takes the company id explicitly and applies
//! it as a query predicate. Errors surface as [`LedgerError`] so callers
//! see one typed error set across core and persistence.

pub mod account;
pub mod lifecycle;
pub mod transaction;

pub use account::AccountRepository;
pub use lifecycle::{AnnulResult, LifecycleRepository};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionRepository, TransactionWithLines,
    UpdateTransactionInput,
};

use rust_decimal::Decimal;
use sea_orm::DbErr;

use contar_core::ledger::{EntrySide, LedgerError, LedgerLine, LineInput, SourceModule};
use contar_core::lifecycle::TransactionStatus;
use contar_shared::{AccountId, LedgerLineId, TransactionId};

use crate::entities::{ledger_lines, sea_orm_active_enums};

/// Maps a database error to the typed storage error.
pub(crate) fn storage(err: DbErr) -> LedgerError {
    LedgerError::Storage(err.to_string())
}

/// How many times a lost compare-and-swap is retried before giving up.
pub(crate) const MAX_SWAP_ATTEMPTS: u32 = 3;

/// Classifies a lost compare-and-swap after re-reading the row.
///
/// When the observed status still matches what the caller expected, the
/// row merely changed version under a concurrent edit and the operation
/// can be retried. Any other status is a real state change and surfaces
/// through `state_error`.
pub(crate) fn lost_swap_outcome(
    observed: TransactionStatus,
    expected: TransactionStatus,
    state_error: impl FnOnce(TransactionStatus) -> LedgerError,
) -> Result<(), LedgerError> {
    if observed == expected {
        Ok(())
    } else {
        Err(state_error(observed))
    }
}

/// Converts a lifecycle status to its database representation.
pub(crate) fn status_to_db(status: TransactionStatus) -> sea_orm_active_enums::TransactionStatus {
    match status {
        TransactionStatus::Draft => sea_orm_active_enums::TransactionStatus::Draft,
        TransactionStatus::Posted => sea_orm_active_enums::TransactionStatus::Posted,
        TransactionStatus::Reversed => sea_orm_active_enums::TransactionStatus::Reversed,
    }
}

/// Converts a database status to the lifecycle status.
pub(crate) fn status_from_db(
    status: &sea_orm_active_enums::TransactionStatus,
) -> TransactionStatus {
    match status {
        sea_orm_active_enums::TransactionStatus::Draft => TransactionStatus::Draft,
        sea_orm_active_enums::TransactionStatus::Posted => TransactionStatus::Posted,
        sea_orm_active_enums::TransactionStatus::Reversed => TransactionStatus::Reversed,
    }
}

/// Converts a source module to its database representation.
pub(crate) fn module_to_db(module: SourceModule) -> sea_orm_active_enums::SourceModule {
    match module {
        SourceModule::Manual => sea_orm_active_enums::SourceModule::Manual,
        SourceModule::Ventas => sea_orm_active_enums::SourceModule::Ventas,
        SourceModule::Compras => sea_orm_active_enums::SourceModule::Compras,
        SourceModule::Bancos => sea_orm_active_enums::SourceModule::Bancos,
        SourceModule::Cxc => sea_orm_active_enums::SourceModule::Cxc,
        SourceModule::Cxp => sea_orm_active_enums::SourceModule::Cxp,
    }
}

/// Converts a database module to the core source module.
pub(crate) fn module_from_db(module: &sea_orm_active_enums::SourceModule) -> SourceModule {
    match module {
        sea_orm_active_enums::SourceModule::Manual => SourceModule::Manual,
        sea_orm_active_enums::SourceModule::Ventas => SourceModule::Ventas,
        sea_orm_active_enums::SourceModule::Compras => SourceModule::Compras,
        sea_orm_active_enums::SourceModule::Bancos => SourceModule::Bancos,
        sea_orm_active_enums::SourceModule::Cxc => SourceModule::Cxc,
        sea_orm_active_enums::SourceModule::Cxp => SourceModule::Cxp,
    }
}

/// Converts a persisted line row to the core line type.
pub(crate) fn line_to_core(model: &ledger_lines::Model) -> LedgerLine {
    LedgerLine {
        id: LedgerLineId::from_uuid(model.id),
        transaction_id: TransactionId::from_uuid(model.transaction_id),
        account_id: AccountId::from_uuid(model.account_id),
        debit: model.debit,
        credit: model.credit,
        description: model.description.clone(),
        correlation_id: model.correlation_id.clone(),
    }
}

/// Converts a persisted line row back into validator input.
///
/// Informational (zero/zero) rows become zero-amount debit inputs, the
/// same shape the validator accepts for modules that allow them.
pub(crate) fn line_input_from_model(model: &ledger_lines::Model) -> LineInput {
    let (amount, side) = if model.debit > Decimal::ZERO {
        (model.debit, EntrySide::Debit)
    } else if model.credit > Decimal::ZERO {
        (model.credit, EntrySide::Credit)
    } else {
        (Decimal::ZERO, EntrySide::Debit)
    };

    LineInput {
        account_id: AccountId::from_uuid(model.account_id),
        amount,
        side,
        description: model.description.clone(),
        correlation_id: model.correlation_id.clone(),
    }
}
