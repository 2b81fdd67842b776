//! Validation rules for transaction lines.
//!
//! A single entry point, [`validate_lines`], runs every structural check a
//! line set must pass before posting. Account resolution is injected as a
//! closure so this module stays free of database dependencies. Checks run
//! in a fixed order and the first failure wins.

use rust_decimal::Decimal;

use contar_shared::{AccountId, CompanyId};

use super::error::LedgerError;
use super::types::{LineInput, SourceModule, TransactionTotals};

/// A resolved account, as seen by the validator.
///
/// Repositories build these from the chart of accounts; tests build them
/// by hand. The validator only needs to know who owns the account and
/// whether lines may be posted to it.
#[derive(Debug, Clone, Copy)]
pub struct AccountRef {
    /// The account identifier.
    pub id: AccountId,
    /// The company that owns the account.
    pub company_id: CompanyId,
    /// Whether lines may be posted to this account (leaf accounts only).
    pub is_postable: bool,
}

/// Computes the debit and credit totals over a line set.
#[must_use]
pub fn compute_totals(lines: &[LineInput]) -> TransactionTotals {
    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;
    for line in lines {
        let (d, c) = line.amounts();
        debit += d;
        credit += c;
    }
    TransactionTotals::new(debit, credit)
}

/// Validates a line set for posting.
///
/// Checks run in order and short-circuit on the first failure:
///
/// 1. The set has at least two lines.
/// 2. Every account resolves, belongs to `company_id`, and is postable.
/// 3. Every amount is positive, or zero when `module` allows
///    informational lines.
/// 4. Debit and credit totals match exactly.
///
/// # Errors
///
/// Returns the first [`LedgerError`] encountered, per the order above.
pub fn validate_lines<L>(
    company_id: CompanyId,
    module: SourceModule,
    lines: &[LineInput],
    account_lookup: L,
) -> Result<(), LedgerError>
where
    L: Fn(AccountId) -> Option<AccountRef>,
{
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    for line in lines {
        let account = account_lookup(line.account_id)
            .ok_or(LedgerError::InvalidAccount(line.account_id))?;
        if account.company_id != company_id || !account.is_postable {
            return Err(LedgerError::InvalidAccount(line.account_id));
        }
    }

    for (index, line) in lines.iter().enumerate() {
        if line.amount < Decimal::ZERO {
            return Err(LedgerError::MalformedLine(index));
        }
        if line.amount == Decimal::ZERO && !module.allows_informational_lines() {
            return Err(LedgerError::MalformedLine(index));
        }
    }

    let totals = compute_totals(lines);
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::EntrySide;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn line(account_id: AccountId, amount: Decimal, side: EntrySide) -> LineInput {
        LineInput {
            account_id,
            amount,
            side,
            description: None,
            correlation_id: None,
        }
    }

    struct Fixture {
        company_id: CompanyId,
        cash: AccountId,
        revenue: AccountId,
        accounts: HashMap<AccountId, AccountRef>,
    }

    impl Fixture {
        fn new() -> Self {
            let company_id = CompanyId::new();
            let cash = AccountId::new();
            let revenue = AccountId::new();
            let mut accounts = HashMap::new();
            for id in [cash, revenue] {
                accounts.insert(
                    id,
                    AccountRef {
                        id,
                        company_id,
                        is_postable: true,
                    },
                );
            }
            Self {
                company_id,
                cash,
                revenue,
                accounts,
            }
        }

        fn lookup(&self) -> impl Fn(AccountId) -> Option<AccountRef> + '_ {
            |id| self.accounts.get(&id).copied()
        }
    }

    #[test]
    fn test_valid_balanced_entry_passes() {
        let fx = Fixture::new();
        let lines = vec![
            line(fx.cash, dec!(100.00), EntrySide::Debit),
            line(fx.revenue, dec!(100.00), EntrySide::Credit),
        ];
        let result = validate_lines(fx.company_id, SourceModule::Ventas, &lines, fx.lookup());
        assert!(result.is_ok());
    }

    #[test]
    fn test_single_line_rejected() {
        let fx = Fixture::new();
        let lines = vec![line(fx.cash, dec!(100.00), EntrySide::Debit)];
        let result = validate_lines(fx.company_id, SourceModule::Manual, &lines, fx.lookup());
        assert!(matches!(result, Err(LedgerError::InsufficientLines)));
    }

    #[test]
    fn test_empty_lines_rejected() {
        let fx = Fixture::new();
        let result = validate_lines(fx.company_id, SourceModule::Manual, &[], fx.lookup());
        assert!(matches!(result, Err(LedgerError::InsufficientLines)));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let fx = Fixture::new();
        let stranger = AccountId::new();
        let lines = vec![
            line(stranger, dec!(100.00), EntrySide::Debit),
            line(fx.revenue, dec!(100.00), EntrySide::Credit),
        ];
        let result = validate_lines(fx.company_id, SourceModule::Manual, &lines, fx.lookup());
        assert!(matches!(result, Err(LedgerError::InvalidAccount(id)) if id == stranger));
    }

    #[test]
    fn test_other_company_account_rejected() {
        let fx = Fixture::new();
        let other_company = CompanyId::new();
        let lines = vec![
            line(fx.cash, dec!(100.00), EntrySide::Debit),
            line(fx.revenue, dec!(100.00), EntrySide::Credit),
        ];
        let result = validate_lines(other_company, SourceModule::Manual, &lines, fx.lookup());
        assert!(matches!(result, Err(LedgerError::InvalidAccount(_))));
    }

    #[test]
    fn test_non_postable_account_rejected() {
        let fx = Fixture::new();
        let header = AccountId::new();
        let mut accounts = fx.accounts.clone();
        accounts.insert(
            header,
            AccountRef {
                id: header,
                company_id: fx.company_id,
                is_postable: false,
            },
        );
        let lines = vec![
            line(header, dec!(100.00), EntrySide::Debit),
            line(fx.revenue, dec!(100.00), EntrySide::Credit),
        ];
        let result = validate_lines(fx.company_id, SourceModule::Manual, &lines, |id| {
            accounts.get(&id).copied()
        });
        assert!(matches!(result, Err(LedgerError::InvalidAccount(id)) if id == header));
    }

    #[test]
    fn test_negative_amount_rejected_with_index() {
        let fx = Fixture::new();
        let lines = vec![
            line(fx.cash, dec!(100.00), EntrySide::Debit),
            line(fx.revenue, dec!(-100.00), EntrySide::Credit),
        ];
        let result = validate_lines(fx.company_id, SourceModule::Manual, &lines, fx.lookup());
        assert!(matches!(result, Err(LedgerError::MalformedLine(1))));
    }

    #[test]
    fn test_zero_line_allowed_only_for_manual() {
        let fx = Fixture::new();
        let lines = vec![
            line(fx.cash, dec!(100.00), EntrySide::Debit),
            line(fx.revenue, dec!(100.00), EntrySide::Credit),
            line(fx.cash, Decimal::ZERO, EntrySide::Debit),
        ];

        let result = validate_lines(fx.company_id, SourceModule::Manual, &lines, fx.lookup());
        assert!(result.is_ok());

        let result = validate_lines(fx.company_id, SourceModule::Ventas, &lines, fx.lookup());
        assert!(matches!(result, Err(LedgerError::MalformedLine(2))));
    }

    #[test]
    fn test_unbalanced_entry_rejected_with_totals() {
        let fx = Fixture::new();
        let lines = vec![
            line(fx.cash, dec!(100.00), EntrySide::Debit),
            line(fx.revenue, dec!(90.00), EntrySide::Credit),
        ];
        let result = validate_lines(fx.company_id, SourceModule::Manual, &lines, fx.lookup());
        match result {
            Err(LedgerError::UnbalancedEntry { debit, credit }) => {
                assert_eq!(debit, dec!(100.00));
                assert_eq!(credit, dec!(90.00));
            }
            other => panic!("expected UnbalancedEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_cent_difference_rejected() {
        let fx = Fixture::new();
        let lines = vec![
            line(fx.cash, dec!(100.00), EntrySide::Debit),
            line(fx.revenue, dec!(99.99), EntrySide::Credit),
        ];
        let result = validate_lines(fx.company_id, SourceModule::Manual, &lines, fx.lookup());
        assert!(matches!(result, Err(LedgerError::UnbalancedEntry { .. })));
    }

    #[test]
    fn test_multi_line_split_balances() {
        let fx = Fixture::new();
        let lines = vec![
            line(fx.cash, dec!(60.00), EntrySide::Debit),
            line(fx.cash, dec!(40.00), EntrySide::Debit),
            line(fx.revenue, dec!(100.00), EntrySide::Credit),
        ];
        let result = validate_lines(fx.company_id, SourceModule::Ventas, &lines, fx.lookup());
        assert!(result.is_ok());
    }

    #[test]
    fn test_account_check_runs_before_amount_check() {
        let fx = Fixture::new();
        let stranger = AccountId::new();
        let lines = vec![
            line(stranger, dec!(-5.00), EntrySide::Debit),
            line(fx.revenue, dec!(100.00), EntrySide::Credit),
        ];
        let result = validate_lines(fx.company_id, SourceModule::Manual, &lines, fx.lookup());
        assert!(matches!(result, Err(LedgerError::InvalidAccount(_))));
    }

    #[test]
    fn test_compute_totals() {
        let fx = Fixture::new();
        let lines = vec![
            line(fx.cash, dec!(60.00), EntrySide::Debit),
            line(fx.revenue, dec!(100.00), EntrySide::Credit),
        ];
        let totals = compute_totals(&lines);
        assert_eq!(totals.debit, dec!(60.00));
        assert_eq!(totals.credit, dec!(100.00));
        assert!(!totals.is_balanced());
    }
}
