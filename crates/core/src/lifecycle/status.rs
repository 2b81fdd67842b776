//! Transaction status and the transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a transaction in its lifecycle.
///
/// The valid transitions are:
/// - Draft → Posted (apply)
/// - Posted → Reversed (annul)
///
/// Reversed is terminal. There is no way back from Posted to Draft;
/// undoing a posted transaction means annulling it, which produces a
/// compensating transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Transaction is being drafted and can be modified or deleted.
    Draft,
    /// Transaction has been posted to the ledger (immutable).
    Posted,
    /// Transaction has been annulled via a compensating transaction (immutable).
    Reversed,
}

/// The complete set of legal transitions.
const TRANSITIONS: &[(TransactionStatus, TransactionStatus)] = &[
    (TransactionStatus::Draft, TransactionStatus::Posted),
    (TransactionStatus::Posted, TransactionStatus::Reversed),
];

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Reversed => "reversed",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "posted" => Some(Self::Posted),
            "reversed" => Some(Self::Reversed),
            _ => None,
        }
    }

    /// Returns true if the transaction can be modified or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the transaction and its lines are immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Reversed)
    }

    /// Returns true if no further transitions exist from this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        TRANSITIONS.iter().all(|(from, _)| *from != *self)
    }

    /// Returns true if the transition to `target` is legal.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        TRANSITIONS.contains(&(*self, target))
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Draft,
        TransactionStatus::Posted,
        TransactionStatus::Reversed,
    ];

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransactionStatus::parse("voided"), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            TransactionStatus::parse("POSTED"),
            Some(TransactionStatus::Posted)
        );
        assert_eq!(
            TransactionStatus::parse("Draft"),
            Some(TransactionStatus::Draft)
        );
    }

    #[test]
    fn test_only_legal_transitions_allowed() {
        for from in ALL {
            for to in ALL {
                let legal = matches!(
                    (from, to),
                    (TransactionStatus::Draft, TransactionStatus::Posted)
                        | (TransactionStatus::Posted, TransactionStatus::Reversed)
                );
                assert_eq!(from.can_transition_to(to), legal, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_editable_and_immutable() {
        assert!(TransactionStatus::Draft.is_editable());
        assert!(!TransactionStatus::Posted.is_editable());
        assert!(!TransactionStatus::Reversed.is_editable());

        assert!(!TransactionStatus::Draft.is_immutable());
        assert!(TransactionStatus::Posted.is_immutable());
        assert!(TransactionStatus::Reversed.is_immutable());
    }

    #[test]
    fn test_reversed_is_the_only_terminal_status() {
        assert!(!TransactionStatus::Draft.is_terminal());
        assert!(!TransactionStatus::Posted.is_terminal());
        assert!(TransactionStatus::Reversed.is_terminal());
    }
}
