//! Lifecycle service for transaction state transitions.
//!
//! A stateless service that validates and executes the two lifecycle
//! transitions, apply and annul, plus the guards that protect drafts.
//! Persistence is handled by the caller; this module only decides
//! whether a transition is legal and what it produces.

use chrono::{DateTime, Utc};

use crate::ledger::LedgerError;
use crate::lifecycle::status::TransactionStatus;

/// A validated state transition with its timestamp.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    /// The status the transaction moved from.
    pub from: TransactionStatus,
    /// The status the transaction moved to.
    pub to: TransactionStatus,
    /// When the transition occurred.
    pub occurred_at: DateTime<Utc>,
}

/// Stateless service for managing transaction lifecycle transitions.
pub struct LifecycleService;

impl LifecycleService {
    /// Apply (post) a draft transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateForApply` if the transaction is not in Draft.
    pub fn apply(current_status: TransactionStatus) -> Result<Transition, LedgerError> {
        if !current_status.can_transition_to(TransactionStatus::Posted) {
            return Err(LedgerError::InvalidStateForApply(current_status));
        }
        Ok(Transition {
            from: current_status,
            to: TransactionStatus::Posted,
            occurred_at: Utc::now(),
        })
    }

    /// Annul (reverse) a posted transaction.
    ///
    /// The caller must create the compensating transaction in the same
    /// atomic step that records this transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateForAnnul` if the transaction is not in Posted.
    pub fn annul(current_status: TransactionStatus) -> Result<Transition, LedgerError> {
        if !current_status.can_transition_to(TransactionStatus::Reversed) {
            return Err(LedgerError::InvalidStateForAnnul(current_status));
        }
        Ok(Transition {
            from: current_status,
            to: TransactionStatus::Reversed,
            occurred_at: Utc::now(),
        })
    }

    /// Check that a transaction may be edited.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateForEdit` unless the transaction is in Draft.
    pub fn guard_edit(current_status: TransactionStatus) -> Result<(), LedgerError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(LedgerError::InvalidStateForEdit(current_status))
        }
    }

    /// Check that a transaction may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateForDelete` unless the transaction is in Draft.
    pub fn guard_delete(current_status: TransactionStatus) -> Result<(), LedgerError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(LedgerError::InvalidStateForDelete(current_status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_apply_from_draft() {
        let transition = LifecycleService::apply(TransactionStatus::Draft).unwrap();
        assert_eq!(transition.from, TransactionStatus::Draft);
        assert_eq!(transition.to, TransactionStatus::Posted);
    }

    #[rstest]
    #[case(TransactionStatus::Posted)]
    #[case(TransactionStatus::Reversed)]
    fn test_apply_rejects_non_draft(#[case] status: TransactionStatus) {
        let result = LifecycleService::apply(status);
        assert!(matches!(result, Err(LedgerError::InvalidStateForApply(s)) if s == status));
    }

    #[test]
    fn test_annul_from_posted() {
        let transition = LifecycleService::annul(TransactionStatus::Posted).unwrap();
        assert_eq!(transition.from, TransactionStatus::Posted);
        assert_eq!(transition.to, TransactionStatus::Reversed);
    }

    #[rstest]
    #[case(TransactionStatus::Draft)]
    #[case(TransactionStatus::Reversed)]
    fn test_annul_rejects_non_posted(#[case] status: TransactionStatus) {
        let result = LifecycleService::annul(status);
        assert!(matches!(result, Err(LedgerError::InvalidStateForAnnul(s)) if s == status));
    }

    #[test]
    fn test_guards_allow_only_draft() {
        assert!(LifecycleService::guard_edit(TransactionStatus::Draft).is_ok());
        assert!(LifecycleService::guard_delete(TransactionStatus::Draft).is_ok());

        assert!(matches!(
            LifecycleService::guard_edit(TransactionStatus::Posted),
            Err(LedgerError::InvalidStateForEdit(TransactionStatus::Posted))
        ));
        assert!(matches!(
            LifecycleService::guard_delete(TransactionStatus::Reversed),
            Err(LedgerError::InvalidStateForDelete(TransactionStatus::Reversed))
        ));
    }
}
