//! Transaction lifecycle state machine and reversal logic.
//!
//! Transactions move Draft → Posted → Reversed. Posting validates and
//! freezes the transaction; reversing never mutates posted lines but
//! produces a mirrored compensating transaction instead.

pub mod reversal;
pub mod service;
pub mod status;

#[cfg(test)]
mod reversal_props;

pub use reversal::ReversalService;
pub use service::{LifecycleService, Transition};
pub use status::TransactionStatus;
