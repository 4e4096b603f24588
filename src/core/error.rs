//! Error taxonomy for the settlement core.
//!
//! - [`ValidationError`] — malformed input handed to the aggregator or the
//!   money helpers. Never corrected silently.
//! - [`InvariantViolation`] — the zero-sum precondition of the optimizer
//!   failed. This is a defect upstream, not a user mistake.
//! - [`StoreError`] — failures reported by a storage port.
//! - [`EngineError`] — everything a whole-group run can fail with.

use crate::core::currency::CurrencyCode;
use crate::core::expense::ExpenseId;
use crate::core::participant::ParticipantId;
use crate::settlement::record::StatusError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Malformed expense or share input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expense {expense} has non-positive amount {amount}")]
    NonPositiveAmount { expense: ExpenseId, amount: i64 },

    #[error("share of {participant} in expense {expense} is negative ({share})")]
    NegativeShare {
        expense: ExpenseId,
        participant: ParticipantId,
        share: i64,
    },

    #[error("share of {participant} references unknown expense {expense}")]
    UnknownExpense {
        expense: ExpenseId,
        participant: ParticipantId,
    },

    #[error("shares of expense {expense} sum to {actual}, expected {expected}")]
    ShareSumMismatch {
        expense: ExpenseId,
        expected: i64,
        actual: i128,
    },

    #[error("expense {0} appears more than once")]
    DuplicateExpense(ExpenseId),

    #[error("{participant} has more than one share in expense {expense}")]
    DuplicateShare {
        expense: ExpenseId,
        participant: ParticipantId,
    },

    #[error("expense {expense} is in {found}, but this run settles {expected}")]
    CurrencyMismatch {
        expense: ExpenseId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },

    #[error("expense {0} cannot be split among zero participants")]
    EmptySplit(ExpenseId),

    #[error("{amount} has more than {exponent} fractional digits")]
    FractionalMinorUnits { amount: Decimal, exponent: u32 },

    #[error("{0} minor-unit digits is more than an i64 amount can carry")]
    UnsupportedExponent(u32),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}

/// The balances handed to the optimizer do not sum to zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("balances in {currency} sum to {total}, expected 0")]
pub struct InvariantViolation {
    pub currency: CurrencyCode,
    pub total: i128,
}

/// Failures reported by a storage port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("expense {0} already exists")]
    DuplicateExpense(ExpenseId),

    #[error("expense {0} not found")]
    ExpenseNotFound(ExpenseId),

    #[error("settlement {0} not found")]
    SettlementNotFound(Uuid),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Any failure of a whole-group settlement run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("internal error: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("settlement status error: {0}")]
    Status(#[from] StatusError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = ValidationError::ShareSumMismatch {
            expense: ExpenseId::new(3),
            expected: 900,
            actual: 899,
        };
        assert_eq!(
            err.to_string(),
            "shares of expense 3 sum to 899, expected 900"
        );
    }

    #[test]
    fn test_engine_error_wraps_invariant() {
        let err: EngineError = InvariantViolation {
            currency: CurrencyCode::new("EUR"),
            total: 5,
        }
        .into();
        assert!(matches!(err, EngineError::Invariant(_)));
        assert_eq!(
            err.to_string(),
            "internal error: balances in EUR sum to 5, expected 0"
        );
    }
}
