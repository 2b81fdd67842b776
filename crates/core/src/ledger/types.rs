//! Ledger domain types for transaction creation and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contar_shared::{AccountId, CompanyId};

/// Side of a ledger line: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl EntrySide {
    /// Returns the opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Originating module of a transaction.
///
/// Every transaction carries the tag of the module that produced it. The
/// set is closed: adding a module means adding a variant, never a free
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceModule {
    /// Manual journal entry.
    Manual,
    /// Sales documents (invoices and credit notes).
    Ventas,
    /// Purchase documents (vendor bills).
    Compras,
    /// Bank movements.
    Bancos,
    /// Accounts receivable collections.
    Cxc,
    /// Accounts payable payments.
    Cxp,
}

impl SourceModule {
    /// Returns the module tag as stored and exchanged with callers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Ventas => "VENTAS",
            Self::Compras => "COMPRAS",
            Self::Bancos => "BANCOS",
            Self::Cxc => "CXC",
            Self::Cxp => "CXP",
        }
    }

    /// Parses a module tag from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MANUAL" => Some(Self::Manual),
            "VENTAS" => Some(Self::Ventas),
            "COMPRAS" => Some(Self::Compras),
            "BANCOS" => Some(Self::Bancos),
            "CXC" => Some(Self::Cxc),
            "CXP" => Some(Self::Cxp),
            _ => None,
        }
    }

    /// Returns true if this module may submit zero/zero informational lines.
    ///
    /// Only manual journal entries carry memo-only lines; every other
    /// module produces strictly one-sided amounts.
    #[must_use]
    pub fn allows_informational_lines(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl std::fmt::Display for SourceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for a single ledger line in a transaction.
///
/// This is the shape every source-document adapter produces: one account,
/// one positive amount, one side. A zero amount marks an informational
/// line, accepted only from modules that allow them.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// The amount (non-negative).
    pub amount: Decimal,
    /// Whether this is a debit or credit line.
    pub side: EntrySide,
    /// Optional description for this line.
    pub description: Option<String>,
    /// Optional reference back to the originating document.
    pub correlation_id: Option<String>,
}

impl LineInput {
    /// Returns the (debit, credit) pair this input resolves to.
    #[must_use]
    pub fn amounts(&self) -> (Decimal, Decimal) {
        match self.side {
            EntrySide::Debit => (self.amount, Decimal::ZERO),
            EntrySide::Credit => (Decimal::ZERO, self.amount),
        }
    }
}

/// Header of a transaction, supplied by the originating adapter.
#[derive(Debug, Clone)]
pub struct TransactionHeader {
    /// The company (tenant) this transaction belongs to.
    pub company_id: CompanyId,
    /// The business date of the transaction.
    pub business_date: NaiveDate,
    /// A description of the transaction.
    pub description: String,
    /// The originating module.
    pub module: SourceModule,
    /// Optional reference back to the originating document.
    pub correlation_id: Option<String>,
}

/// Transaction totals, always recomputed from lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl TransactionTotals {
    /// Creates new transaction totals from debit and credit sums.
    #[must_use]
    pub const fn new(debit: Decimal, credit: Decimal) -> Self {
        Self { debit, credit }
    }

    /// Returns true if debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_side_opposite() {
        assert_eq!(EntrySide::Debit.opposite(), EntrySide::Credit);
        assert_eq!(EntrySide::Credit.opposite(), EntrySide::Debit);
    }

    #[test]
    fn test_module_tag_round_trip() {
        for module in [
            SourceModule::Manual,
            SourceModule::Ventas,
            SourceModule::Compras,
            SourceModule::Bancos,
            SourceModule::Cxc,
            SourceModule::Cxp,
        ] {
            assert_eq!(SourceModule::parse(module.as_str()), Some(module));
        }
        assert_eq!(SourceModule::parse("NOMINA"), None);
    }

    #[test]
    fn test_module_parse_is_case_insensitive() {
        assert_eq!(SourceModule::parse("ventas"), Some(SourceModule::Ventas));
        assert_eq!(SourceModule::parse("Cxc"), Some(SourceModule::Cxc));
    }

    #[test]
    fn test_only_manual_allows_informational_lines() {
        assert!(SourceModule::Manual.allows_informational_lines());
        assert!(!SourceModule::Ventas.allows_informational_lines());
        assert!(!SourceModule::Compras.allows_informational_lines());
        assert!(!SourceModule::Bancos.allows_informational_lines());
        assert!(!SourceModule::Cxc.allows_informational_lines());
        assert!(!SourceModule::Cxp.allows_informational_lines());
    }

    #[test]
    fn test_line_input_amounts() {
        let line = LineInput {
            account_id: contar_shared::AccountId::new(),
            amount: dec!(100.00),
            side: EntrySide::Debit,
            description: None,
            correlation_id: None,
        };
        assert_eq!(line.amounts(), (dec!(100.00), Decimal::ZERO));

        let line = LineInput {
            side: EntrySide::Credit,
            ..line
        };
        assert_eq!(line.amounts(), (Decimal::ZERO, dec!(100.00)));
    }

    #[test]
    fn test_totals_balanced() {
        let totals = TransactionTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced());
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_totals_unbalanced() {
        let totals = TransactionTotals::new(dec!(100.00), dec!(50.00));
        assert!(!totals.is_balanced());
        assert_eq!(totals.difference(), dec!(50.00));
    }
}
