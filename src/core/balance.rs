use crate::core::currency::CurrencyCode;
use crate::core::error::ValidationError;
use crate::core::money::{wide_sum, MinorUnits};
use crate::core::participant::ParticipantId;
use crate::settlement::payment::Payment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net balance of each participant of a group, in one currency.
///
/// A positive balance means the group owes the participant (creditor).
/// A negative balance means the participant owes the group (debtor).
///
/// The sheet is the hand-off between the aggregator and the optimizer. A sheet
/// produced by the aggregator always sums to zero; a hand-built one may not,
/// which the optimizer reports as an invariant violation.
///
/// Participants are kept in ascending id order so every traversal is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    currency: CurrencyCode,
    balances: BTreeMap<ParticipantId, MinorUnits>,
}

impl BalanceSheet {
    pub fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            balances: BTreeMap::new(),
        }
    }

    /// Build a sheet from explicit balances. Later entries for the same
    /// participant replace earlier ones.
    pub fn from_balances<I>(currency: CurrencyCode, balances: I) -> Self
    where
        I: IntoIterator<Item = (ParticipantId, MinorUnits)>,
    {
        Self {
            currency,
            balances: balances.into_iter().collect(),
        }
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Add `delta` to a participant's balance, failing on overflow.
    pub fn adjust(
        &mut self,
        participant: ParticipantId,
        delta: MinorUnits,
    ) -> Result<(), ValidationError> {
        let balance = self.balances.entry(participant).or_insert(0);
        *balance = balance.checked_add(delta).ok_or_else(|| {
            ValidationError::Overflow(format!("balance of {participant} exceeds the i64 range"))
        })?;
        Ok(())
    }

    /// Apply a settlement payment: the debtor's debt shrinks and the
    /// creditor's claim shrinks by the same amount.
    ///
    /// Either both balances change or neither does.
    pub fn apply_payment(&mut self, payment: &Payment) -> Result<(), ValidationError> {
        let overflow = |participant: ParticipantId| {
            ValidationError::Overflow(format!("balance of {participant} exceeds the i64 range"))
        };

        let debtor = self
            .balance(&payment.from)
            .checked_add(payment.amount)
            .ok_or_else(|| overflow(payment.from))?;
        let outgoing = payment.amount.checked_neg().ok_or_else(|| {
            ValidationError::Overflow(format!("payment amount {} cannot be negated", payment.amount))
        })?;
        let before = if payment.to == payment.from {
            debtor
        } else {
            self.balance(&payment.to)
        };
        let creditor = before
            .checked_add(outgoing)
            .ok_or_else(|| overflow(payment.to))?;

        self.balances.insert(payment.from, debtor);
        self.balances.insert(payment.to, creditor);
        Ok(())
    }

    /// Net balance of a participant; zero for unknown participants.
    pub fn balance(&self, participant: &ParticipantId) -> MinorUnits {
        self.balances.get(participant).copied().unwrap_or(0)
    }

    /// All balances, ascending by participant.
    pub fn balances(&self) -> &BTreeMap<ParticipantId, MinorUnits> {
        &self.balances
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all balances, computed without overflow.
    pub fn total(&self) -> i128 {
        wide_sum(self.balances.values().copied())
    }

    /// True when the sheet satisfies the zero-sum invariant.
    pub fn is_balanced(&self) -> bool {
        self.total() == 0
    }

    /// True when every participant is settled.
    pub fn is_settled(&self) -> bool {
        self.balances.values().all(|b| *b == 0)
    }

    /// Number of participants with a non-zero balance.
    pub fn nonzero_count(&self) -> usize {
        self.balances.values().filter(|b| **b != 0).count()
    }

    /// Participants owed money, ascending by id.
    pub fn creditors(&self) -> impl Iterator<Item = (ParticipantId, MinorUnits)> + '_ {
        self.balances
            .iter()
            .filter(|(_, b)| **b > 0)
            .map(|(p, b)| (*p, *b))
    }

    /// Participants owing money, ascending by id.
    pub fn debtors(&self) -> impl Iterator<Item = (ParticipantId, MinorUnits)> + '_ {
        self.balances
            .iter()
            .filter(|(_, b)| **b < 0)
            .map(|(p, b)| (*p, *b))
    }

    /// Total owed to creditors, i.e. the money that has to move to settle.
    pub fn outstanding(&self) -> i128 {
        wide_sum(self.creditors().map(|(_, b)| b))
    }
}
