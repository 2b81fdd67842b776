//! Error types for ledger and lifecycle operations.
//!
//! One closed error enum covers both validation failures and lifecycle
//! contract violations, so every caller (repositories, HTTP routes,
//! adapters) handles the same set of typed results.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use contar_shared::AccountId;

use crate::lifecycle::TransactionStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction must have at least 2 lines.
    #[error("Transaction must have at least 2 lines")]
    InsufficientLines,

    /// Account does not resolve for the company or is not postable.
    #[error("Account is invalid or not postable: {0}")]
    InvalidAccount(AccountId),

    /// Line does not have exactly one positive side.
    #[error("Line {0} must have exactly one of debit or credit positive")]
    MalformedLine(usize),

    /// Transaction is not balanced (debits != credits).
    #[error("Transaction is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== State Errors ==========
    /// Transaction cannot be edited in its current status.
    #[error("Cannot edit transaction in status {0}")]
    InvalidStateForEdit(TransactionStatus),

    /// Transaction cannot be deleted in its current status.
    #[error("Cannot delete transaction in status {0}")]
    InvalidStateForDelete(TransactionStatus),

    /// Transaction cannot be applied in its current status.
    #[error("Cannot apply transaction in status {0}")]
    InvalidStateForApply(TransactionStatus),

    /// Transaction cannot be annulled in its current status.
    #[error("Cannot annul transaction in status {0}")]
    InvalidStateForAnnul(TransactionStatus),

    // ========== Lookup Errors ==========
    /// Referenced transaction or account does not exist within the
    /// caller's company. Deliberately indistinguishable from "exists in
    /// another company" to avoid tenant-existence leakage.
    #[error("Not found: {0}")]
    NotFound(Uuid),

    /// A query attempted to cross company scope.
    #[error("Query crosses company scope")]
    TenantMismatch,

    // ========== Infrastructure Errors ==========
    /// Transient storage failure; nothing partially committed.
    #[error("Storage unavailable: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::InvalidAccount(_) => "INVALID_ACCOUNT",
            Self::MalformedLine(_) => "MALFORMED_LINE",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::InvalidStateForEdit(_) => "INVALID_STATE_FOR_EDIT",
            Self::InvalidStateForDelete(_) => "INVALID_STATE_FOR_DELETE",
            Self::InvalidStateForApply(_) => "INVALID_STATE_FOR_APPLY",
            Self::InvalidStateForAnnul(_) => "INVALID_STATE_FOR_ANNUL",
            Self::NotFound(_) => "NOT_FOUND",
            Self::TenantMismatch => "TENANT_MISMATCH",
            Self::Storage(_) => "STORAGE_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines
            | Self::InvalidAccount(_)
            | Self::MalformedLine(_)
            | Self::UnbalancedEntry { .. } => 400,

            // 403 Forbidden - cross-tenant queries
            Self::TenantMismatch => 403,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict - lifecycle contract violations
            Self::InvalidStateForEdit(_)
            | Self::InvalidStateForDelete(_)
            | Self::InvalidStateForApply(_)
            | Self::InvalidStateForAnnul(_) => 409,

            // 500 Internal Server Error
            Self::Storage(_) => 500,
        }
    }

    /// Returns true if the whole operation is safe to retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
