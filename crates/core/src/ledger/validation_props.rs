//! Property-based tests for line validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use contar_shared::{AccountId, CompanyId};

use super::error::LedgerError;
use super::types::{EntrySide, LineInput, SourceModule};
use super::validation::{AccountRef, compute_totals, validate_lines};

/// Strategy to generate a positive amount from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a side.
fn side_strategy() -> impl Strategy<Value = EntrySide> {
    prop_oneof![Just(EntrySide::Debit), Just(EntrySide::Credit)]
}

/// Strategy to generate a non-manual module.
fn strict_module() -> impl Strategy<Value = SourceModule> {
    prop_oneof![
        Just(SourceModule::Ventas),
        Just(SourceModule::Compras),
        Just(SourceModule::Bancos),
        Just(SourceModule::Cxc),
        Just(SourceModule::Cxp),
    ]
}

fn make_line(account_id: AccountId, amount: Decimal, side: EntrySide) -> LineInput {
    LineInput {
        account_id,
        amount,
        side,
        description: None,
        correlation_id: None,
    }
}

/// Builds a lookup over the distinct accounts used by a line set, all
/// postable and owned by `company_id`.
fn lookup_for(
    company_id: CompanyId,
    lines: &[LineInput],
) -> impl Fn(AccountId) -> Option<AccountRef> {
    let accounts: HashMap<AccountId, AccountRef> = lines
        .iter()
        .map(|l| {
            (
                l.account_id,
                AccountRef {
                    id: l.account_id,
                    company_id,
                    is_postable: true,
                },
            )
        })
        .collect();
    move |id| accounts.get(&id).copied()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any split of an amount into debit pieces against one credit line
    /// of the total passes validation.
    #[test]
    fn prop_balanced_split_passes(
        pieces in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let company_id = CompanyId::new();
        let total: Decimal = pieces.iter().copied().sum();

        let mut lines: Vec<LineInput> = pieces
            .iter()
            .map(|&amount| make_line(AccountId::new(), amount, EntrySide::Debit))
            .collect();
        lines.push(make_line(AccountId::new(), total, EntrySide::Credit));

        let lookup = lookup_for(company_id, &lines);
        let result = validate_lines(company_id, SourceModule::Manual, &lines, lookup);
        prop_assert!(result.is_ok(), "balanced split should pass, got: {:?}", result);
    }

    /// Perturbing one side by any non-zero amount makes validation fail
    /// with the exact totals in the error.
    #[test]
    fn prop_unbalanced_entry_rejected(
        amount in positive_amount(),
        skew in positive_amount(),
    ) {
        let company_id = CompanyId::new();
        let lines = vec![
            make_line(AccountId::new(), amount + skew, EntrySide::Debit),
            make_line(AccountId::new(), amount, EntrySide::Credit),
        ];

        let lookup = lookup_for(company_id, &lines);
        let result = validate_lines(company_id, SourceModule::Manual, &lines, lookup);
        match result {
            Err(LedgerError::UnbalancedEntry { debit, credit }) => {
                prop_assert_eq!(debit, amount + skew);
                prop_assert_eq!(credit, amount);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got: {:?}", other),
        }
    }

    /// A zero-amount line is rejected by every module except Manual, and
    /// the error names the offending index.
    #[test]
    fn prop_zero_line_rejected_outside_manual(
        module in strict_module(),
        amount in positive_amount(),
        side in side_strategy(),
    ) {
        let company_id = CompanyId::new();
        let lines = vec![
            make_line(AccountId::new(), amount, EntrySide::Debit),
            make_line(AccountId::new(), amount, EntrySide::Credit),
            make_line(AccountId::new(), Decimal::ZERO, side),
        ];

        let lookup = lookup_for(company_id, &lines);
        let result = validate_lines(company_id, module, &lines, lookup);
        prop_assert!(
            matches!(result, Err(LedgerError::MalformedLine(2))),
            "zero line should be rejected for {}, got: {:?}",
            module,
            result
        );
    }

    /// An account owned by another company is rejected no matter how the
    /// amounts look.
    #[test]
    fn prop_foreign_account_rejected(amount in positive_amount()) {
        let company_id = CompanyId::new();
        let foreign_company = CompanyId::new();
        let foreign_account = AccountId::new();
        let local_account = AccountId::new();

        let lines = vec![
            make_line(foreign_account, amount, EntrySide::Debit),
            make_line(local_account, amount, EntrySide::Credit),
        ];

        let result = validate_lines(company_id, SourceModule::Manual, &lines, |id| {
            let owner = if id == foreign_account {
                foreign_company
            } else {
                company_id
            };
            Some(AccountRef {
                id,
                company_id: owner,
                is_postable: true,
            })
        });
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidAccount(id)) if id == foreign_account),
            "foreign account should be rejected, got: {:?}",
            result
        );
    }

    /// Totals computed from any line set satisfy
    /// difference = debit - credit.
    #[test]
    fn prop_totals_difference(
        amounts in prop::collection::vec((positive_amount(), side_strategy()), 0..8),
    ) {
        let lines: Vec<LineInput> = amounts
            .into_iter()
            .map(|(amount, side)| make_line(AccountId::new(), amount, side))
            .collect();

        let totals = compute_totals(&lines);
        prop_assert_eq!(totals.difference(), totals.debit - totals.credit);
        prop_assert_eq!(totals.is_balanced(), totals.difference() == Decimal::ZERO);
    }
}
