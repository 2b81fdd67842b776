//! Reversal service for annulling posted transactions.
//!
//! Annulling never touches the original lines. Instead a new posted
//! transaction is created whose lines mirror the originals, so the net
//! effect on every account is zero while the full history stays intact.

use rust_decimal::Decimal;

use contar_shared::TransactionId;

use crate::ledger::line::LedgerLine;
use crate::ledger::types::{EntrySide, LineInput};

/// Stateless service for building compensating line sets.
pub struct ReversalService;

impl ReversalService {
    /// Create mirrored line inputs from the lines of a posted transaction.
    ///
    /// For each original line:
    /// - Debits become credits and credits become debits
    /// - Informational (zero/zero) lines stay informational
    /// - The description is prefixed with "Reversal: "
    /// - The correlation reference is carried over unchanged
    #[must_use]
    pub fn mirror_lines(original_lines: &[LedgerLine]) -> Vec<LineInput> {
        original_lines
            .iter()
            .map(|line| {
                let (amount, side) = match line.side() {
                    Some(side) => (line.debit.max(line.credit), side.opposite()),
                    None => (Decimal::ZERO, EntrySide::Debit),
                };

                LineInput {
                    account_id: line.account_id,
                    amount,
                    side,
                    description: Some(format!(
                        "Reversal: {}",
                        line.description.clone().unwrap_or_default()
                    )),
                    correlation_id: line.correlation_id.clone(),
                }
            })
            .collect()
    }

    /// Description for the compensating transaction.
    #[must_use]
    pub fn reversal_description(original_id: TransactionId) -> String {
        format!("Reversal of transaction {original_id}")
    }
}
