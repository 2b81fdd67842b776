//! Concrete source documents for each functional module.
//!
//! Each document carries the business amounts and the accounts they hit,
//! and knows how to express itself as a balanced line set. Sales and
//! purchase documents post immediately; manual entries start as drafts
//! so bookkeepers can review them first.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use contar_shared::{AccountId, CompanyId};

use crate::ledger::types::{EntrySide, LineInput, SourceModule};

use super::SourceDocument;

fn line(account_id: AccountId, amount: Decimal, side: EntrySide) -> LineInput {
    LineInput {
        account_id,
        amount,
        side,
        description: None,
        correlation_id: None,
    }
}

/// A manual journal entry, drafted line by line by a bookkeeper.
///
/// The only document whose lines are free-form, and the only module that
/// accepts zero/zero informational lines.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    /// The company the entry belongs to.
    pub company_id: CompanyId,
    /// The business date.
    pub business_date: NaiveDate,
    /// Description of the entry.
    pub description: String,
    /// The lines as drafted.
    pub lines: Vec<LineInput>,
    /// Optional external reference.
    pub reference: Option<String>,
}

impl SourceDocument for ManualEntry {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    fn business_date(&self) -> NaiveDate {
        self.business_date
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn module(&self) -> SourceModule {
        SourceModule::Manual
    }

    fn correlation_id(&self) -> Option<String> {
        self.reference.clone()
    }

    fn post_immediately(&self) -> bool {
        false
    }

    fn lines(&self) -> Vec<LineInput> {
        self.lines.clone()
    }
}

/// A sales invoice: debit accounts receivable, credit revenue.
#[derive(Debug, Clone)]
pub struct SaleInvoice {
    /// The company issuing the invoice.
    pub company_id: CompanyId,
    /// The invoice date.
    pub invoice_date: NaiveDate,
    /// The invoice number.
    pub invoice_number: String,
    /// The customer name, for the transaction description.
    pub customer_name: String,
    /// The invoice total.
    pub total: Decimal,
    /// The accounts receivable account.
    pub receivable_account: AccountId,
    /// The revenue account.
    pub revenue_account: AccountId,
}

impl SourceDocument for SaleInvoice {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    fn business_date(&self) -> NaiveDate {
        self.invoice_date
    }

    fn description(&self) -> String {
        format!("Invoice {} - {}", self.invoice_number, self.customer_name)
    }

    fn module(&self) -> SourceModule {
        SourceModule::Ventas
    }

    fn correlation_id(&self) -> Option<String> {
        Some(self.invoice_number.clone())
    }

    fn post_immediately(&self) -> bool {
        true
    }

    fn lines(&self) -> Vec<LineInput> {
        vec![
            line(self.receivable_account, self.total, EntrySide::Debit),
            line(self.revenue_account, self.total, EntrySide::Credit),
        ]
    }
}

/// A credit note: the mirror of a sales invoice.
///
/// Debits revenue and credits accounts receivable, reducing what the
/// customer owes.
#[derive(Debug, Clone)]
pub struct CreditNote {
    /// The company issuing the credit note.
    pub company_id: CompanyId,
    /// The credit note date.
    pub note_date: NaiveDate,
    /// The credit note number.
    pub note_number: String,
    /// The customer name, for the transaction description.
    pub customer_name: String,
    /// The credited amount.
    pub total: Decimal,
    /// The accounts receivable account.
    pub receivable_account: AccountId,
    /// The revenue account.
    pub revenue_account: AccountId,
}

impl SourceDocument for CreditNote {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    fn business_date(&self) -> NaiveDate {
        self.note_date
    }

    fn description(&self) -> String {
        format!("Credit note {} - {}", self.note_number, self.customer_name)
    }

    fn module(&self) -> SourceModule {
        SourceModule::Ventas
    }

    fn correlation_id(&self) -> Option<String> {
        Some(self.note_number.clone())
    }

    fn post_immediately(&self) -> bool {
        true
    }

    fn lines(&self) -> Vec<LineInput> {
        vec![
            line(self.revenue_account, self.total, EntrySide::Debit),
            line(self.receivable_account, self.total, EntrySide::Credit),
        ]
    }
}

/// A purchase invoice: debit expense, credit accounts payable.
#[derive(Debug, Clone)]
pub struct PurchaseInvoice {
    /// The company receiving the invoice.
    pub company_id: CompanyId,
    /// The invoice date.
    pub invoice_date: NaiveDate,
    /// The vendor's invoice number.
    pub invoice_number: String,
    /// The vendor name, for the transaction description.
    pub vendor_name: String,
    /// The invoice total.
    pub total: Decimal,
    /// The expense (or asset) account.
    pub expense_account: AccountId,
    /// The accounts payable account.
    pub payable_account: AccountId,
}

impl SourceDocument for PurchaseInvoice {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    fn business_date(&self) -> NaiveDate {
        self.invoice_date
    }

    fn description(&self) -> String {
        format!("Bill {} - {}", self.invoice_number, self.vendor_name)
    }

    fn module(&self) -> SourceModule {
        SourceModule::Compras
    }

    fn correlation_id(&self) -> Option<String> {
        Some(self.invoice_number.clone())
    }

    fn post_immediately(&self) -> bool {
        true
    }

    fn lines(&self) -> Vec<LineInput> {
        vec![
            line(self.expense_account, self.total, EntrySide::Debit),
            line(self.payable_account, self.total, EntrySide::Credit),
        ]
    }
}

/// Direction of a bank movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankDirection {
    /// Money entering the bank account.
    Inflow,
    /// Money leaving the bank account.
    Outflow,
}

/// A bank movement: cash in or out against a counterpart account.
#[derive(Debug, Clone)]
pub struct BankMovement {
    /// The company owning the bank account.
    pub company_id: CompanyId,
    /// The value date of the movement.
    pub value_date: NaiveDate,
    /// Description of the movement.
    pub description: String,
    /// The amount moved.
    pub amount: Decimal,
    /// Whether money entered or left the bank account.
    pub direction: BankDirection,
    /// The bank (cash) account.
    pub bank_account: AccountId,
    /// The counterpart account.
    pub counterpart_account: AccountId,
    /// Optional bank statement reference.
    pub statement_reference: Option<String>,
}

impl SourceDocument for BankMovement {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    fn business_date(&self) -> NaiveDate {
        self.value_date
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn module(&self) -> SourceModule {
        SourceModule::Bancos
    }

    fn correlation_id(&self) -> Option<String> {
        self.statement_reference.clone()
    }

    fn post_immediately(&self) -> bool {
        true
    }

    fn lines(&self) -> Vec<LineInput> {
        let (bank_side, counterpart_side) = match self.direction {
            BankDirection::Inflow => (EntrySide::Debit, EntrySide::Credit),
            BankDirection::Outflow => (EntrySide::Credit, EntrySide::Debit),
        };
        vec![
            line(self.bank_account, self.amount, bank_side),
            line(self.counterpart_account, self.amount, counterpart_side),
        ]
    }
}

/// A customer collection: debit cash, credit accounts receivable.
#[derive(Debug, Clone)]
pub struct Collection {
    /// The company collecting.
    pub company_id: CompanyId,
    /// The date the payment was received.
    pub received_date: NaiveDate,
    /// The customer name, for the transaction description.
    pub customer_name: String,
    /// The amount collected.
    pub amount: Decimal,
    /// The cash or bank account receiving the money.
    pub cash_account: AccountId,
    /// The accounts receivable account.
    pub receivable_account: AccountId,
    /// Optional receipt reference.
    pub receipt_reference: Option<String>,
}

impl SourceDocument for Collection {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    fn business_date(&self) -> NaiveDate {
        self.received_date
    }

    fn description(&self) -> String {
        format!("Collection from {}", self.customer_name)
    }

    fn module(&self) -> SourceModule {
        SourceModule::Cxc
    }

    fn correlation_id(&self) -> Option<String> {
        self.receipt_reference.clone()
    }

    fn post_immediately(&self) -> bool {
        true
    }

    fn lines(&self) -> Vec<LineInput> {
        vec![
            line(self.cash_account, self.amount, EntrySide::Debit),
            line(self.receivable_account, self.amount, EntrySide::Credit),
        ]
    }
}

/// A supplier payment: debit accounts payable, credit cash.
#[derive(Debug, Clone)]
pub struct SupplierPayment {
    /// The company paying.
    pub company_id: CompanyId,
    /// The date the payment was made.
    pub paid_date: NaiveDate,
    /// The vendor name, for the transaction description.
    pub vendor_name: String,
    /// The amount paid.
    pub amount: Decimal,
    /// The accounts payable account.
    pub payable_account: AccountId,
    /// The cash or bank account the money leaves.
    pub cash_account: AccountId,
    /// Optional payment reference.
    pub payment_reference: Option<String>,
}

impl SourceDocument for SupplierPayment {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    fn business_date(&self) -> NaiveDate {
        self.paid_date
    }

    fn description(&self) -> String {
        format!("Payment to {}", self.vendor_name)
    }

    fn module(&self) -> SourceModule {
        SourceModule::Cxp
    }

    fn correlation_id(&self) -> Option<String> {
        self.payment_reference.clone()
    }

    fn post_immediately(&self) -> bool {
        true
    }

    fn lines(&self) -> Vec<LineInput> {
        vec![
            line(self.payable_account, self.amount, EntrySide::Debit),
            line(self.cash_account, self.amount, EntrySide::Credit),
        ]
    }
}
