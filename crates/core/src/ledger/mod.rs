//! Double-entry ledger domain.
//!
//! The ledger module owns the line model and the validation rules that
//! every transaction must satisfy before it may be posted: at least two
//! lines, postable same-tenant accounts, one-sided amounts, and exact
//! balance between debits and credits.

pub mod error;
pub mod line;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use line::LedgerLine;
pub use types::{
    EntrySide, LineInput, SourceModule, TransactionHeader, TransactionTotals,
};
pub use validation::{AccountRef, compute_totals, validate_lines};
