//! Source-document adapters.
//!
//! Every functional area that produces accounting effect goes through
//! the same narrow door: a document describes itself via
//! [`SourceDocument`], and the lifecycle engine turns it into a
//! transaction. Adapters own the mapping from business amounts to
//! balanced debit/credit line sets; they never touch persistence.

pub mod documents;

use chrono::NaiveDate;

use contar_shared::CompanyId;

use crate::ledger::types::{LineInput, SourceModule, TransactionHeader};

pub use documents::{
    BankDirection, BankMovement, Collection, CreditNote, ManualEntry, PurchaseInvoice,
    SaleInvoice, SupplierPayment,
};

/// A business document that produces a ledger transaction.
///
/// Implementors supply the header fields and the line set; the engine
/// validates and persists. `post_immediately` decides whether the
/// resulting transaction is created as a draft or posted in one step.
pub trait SourceDocument {
    /// The company the document belongs to.
    fn company_id(&self) -> CompanyId;

    /// The business date of the resulting transaction.
    fn business_date(&self) -> NaiveDate;

    /// Human-readable description of the resulting transaction.
    fn description(&self) -> String;

    /// The module tag stamped on the resulting transaction.
    fn module(&self) -> SourceModule;

    /// Reference back to the originating document, if any.
    fn correlation_id(&self) -> Option<String>;

    /// Whether the transaction should be posted as part of creation.
    fn post_immediately(&self) -> bool;

    /// The ledger lines this document produces.
    fn lines(&self) -> Vec<LineInput>;

    /// The transaction header this document produces.
    fn header(&self) -> TransactionHeader {
        TransactionHeader {
            company_id: self.company_id(),
            business_date: self.business_date(),
            description: self.description(),
            module: self.module(),
            correlation_id: self.correlation_id(),
        }
    }
}
