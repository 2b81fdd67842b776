//! Property-based tests for compensating line construction.

use proptest::prelude::*;
use rust_decimal::Decimal;

use contar_shared::{AccountId, LedgerLineId, TransactionId};

use crate::ledger::line::LedgerLine;
use crate::ledger::validation::compute_totals;
use crate::lifecycle::reversal::ReversalService;

/// Strategy to generate a positive amount from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a (debit, credit) pair for a one-sided line.
fn one_sided_pair() -> impl Strategy<Value = (Decimal, Decimal)> {
    (positive_amount(), any::<bool>()).prop_map(|(amount, is_debit)| {
        if is_debit {
            (amount, Decimal::ZERO)
        } else {
            (Decimal::ZERO, amount)
        }
    })
}

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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Mirroring swaps the totals: the mirror's debit total equals the
    /// original's credit total and vice versa, so original plus mirror
    /// nets to zero on every side.
    #[test]
    fn prop_mirror_swaps_totals(
        pairs in prop::collection::vec(one_sided_pair(), 2..10),
    ) {
        let original: Vec<LedgerLine> = pairs
            .iter()
            .map(|&(debit, credit)| make_line(debit, credit))
            .collect();
        let original_debit: Decimal = original.iter().map(|l| l.debit).sum();
        let original_credit: Decimal = original.iter().map(|l| l.credit).sum();

        let mirrored = ReversalService::mirror_lines(&original);
        let totals = compute_totals(&mirrored);

        prop_assert_eq!(totals.debit, original_credit);
        prop_assert_eq!(totals.credit, original_debit);
    }

    /// A balanced original produces a balanced mirror.
    #[test]
    fn prop_mirror_preserves_balance(
        amounts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut original: Vec<LedgerLine> = amounts
            .iter()
            .map(|&amount| make_line(amount, Decimal::ZERO))
            .collect();
        original.push(make_line(Decimal::ZERO, total));

        let mirrored = ReversalService::mirror_lines(&original);
        prop_assert!(compute_totals(&mirrored).is_balanced());
    }

    /// Mirroring preserves line count and account identity position by
    /// position.
    #[test]
    fn prop_mirror_preserves_accounts(
        pairs in prop::collection::vec(one_sided_pair(), 2..10),
    ) {
        let original: Vec<LedgerLine> = pairs
            .iter()
            .map(|&(debit, credit)| make_line(debit, credit))
            .collect();

        let mirrored = ReversalService::mirror_lines(&original);
        prop_assert_eq!(mirrored.len(), original.len());
        for (mirror, source) in mirrored.iter().zip(original.iter()) {
            prop_assert_eq!(mirror.account_id, source.account_id);
        }
    }
}
