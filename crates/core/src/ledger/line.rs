//! Ledger line domain type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contar_shared::{AccountId, LedgerLineId, TransactionId};

use super::types::EntrySide;

/// A single ledger line in a transaction.
///
/// Carries a debit amount and a credit amount, at most one of which is
/// non-zero. A zero/zero line is informational (memo-only) and permitted
/// only for modules that allow them. Lines are immutable once the owning
/// transaction is posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Unique identifier for this line.
    pub id: LedgerLineId,
    /// The transaction this line belongs to.
    pub transaction_id: TransactionId,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Optional description for this line.
    pub description: Option<String>,
    /// Optional reference back to the originating document.
    pub correlation_id: Option<String>,
}

impl LedgerLine {
    /// Returns the side of this line, or `None` for an informational line.
    #[must_use]
    pub fn side(&self) -> Option<EntrySide> {
        if self.debit > Decimal::ZERO {
            Some(EntrySide::Debit)
        } else if self.credit > Decimal::ZERO {
            Some(EntrySide::Credit)
        } else {
            None
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_line(debit: Decimal, credit: Decimal) -> LedgerLine {
        LedgerLine {
            id: LedgerLineId::new(),
            transaction_id: TransactionId::new(),
            account_id: AccountId::new(),
            debit,
            credit,
            description: None,
            correlation_id: None,
        }
    }

    #[test]
    fn test_side_debit() {
        let line = make_line(dec!(100.00), Decimal::ZERO);
        assert_eq!(line.side(), Some(EntrySide::Debit));
        assert_eq!(line.signed_amount(), dec!(100.00));
    }

    #[test]
    fn test_side_credit() {
        let line = make_line(Decimal::ZERO, dec!(75.50));
        assert_eq!(line.side(), Some(EntrySide::Credit));
        assert_eq!(line.signed_amount(), dec!(-75.50));
    }

    #[test]
    fn test_informational_line_has_no_side() {
        let line = make_line(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(line.side(), None);
        assert_eq!(line.signed_amount(), Decimal::ZERO);
    }
}
