use crate::core::currency::CurrencyCode;
use crate::core::error::ValidationError;
use crate::core::money::{split_evenly, MinorUnits};
use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an expense record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(i64);

impl ExpenseId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an expense group (typically one group chat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(i64);

impl GroupId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared expense: one participant laid out `amount` on behalf of the group.
///
/// Expenses are immutable once created. An edit is modelled by the caller as
/// deleting the expense and recreating it with its new shares.
///
/// Construction does not validate the amount; the balance aggregator rejects
/// non-positive amounts so that bad records surface as a
/// [`ValidationError`] instead of a panic.
///
/// # Examples
///
/// ```
/// use grouppay_engine::core::currency::CurrencyCode;
/// use grouppay_engine::core::expense::{Expense, ExpenseId, GroupId};
/// use grouppay_engine::core::participant::ParticipantId;
///
/// let dinner = Expense::new(
///     ExpenseId::new(1),
///     GroupId::new(10),
///     ParticipantId::new(1),
///     9_000,
///     CurrencyCode::new("EUR"),
/// )
/// .with_description("Dinner");
///
/// assert_eq!(dinner.amount(), 9_000);
/// assert_eq!(dinner.description(), Some("Dinner"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    group_id: GroupId,
    /// Amount in minor units. Must be positive.
    amount: MinorUnits,
    paid_by: ParticipantId,
    currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        group_id: GroupId,
        paid_by: ParticipantId,
        amount: MinorUnits,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            id,
            group_id,
            amount,
            paid_by,
            currency,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Split this expense evenly among `participants`.
    ///
    /// Participants are taken in ascending id order (duplicates collapse), and
    /// the remainder of the division goes one unit each to the lowest ids, so
    /// the shares always sum to the expense amount exactly.
    pub fn even_shares(&self, participants: &[ParticipantId]) -> Result<Vec<Share>, ValidationError> {
        let mut members = participants.to_vec();
        members.sort();
        members.dedup();
        if members.is_empty() {
            return Err(ValidationError::EmptySplit(self.id));
        }
        if self.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount {
                expense: self.id,
                amount: self.amount,
            });
        }

        let parts = split_evenly(self.amount, members.len());
        Ok(members
            .into_iter()
            .zip(parts)
            .map(|(participant, share)| Share::new(self.id, participant, share))
            .collect())
    }

    // --- Accessors ---

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn amount(&self) -> MinorUnits {
        self.amount
    }

    pub fn paid_by(&self) -> ParticipantId {
        self.paid_by
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One participant's part of an expense, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub expense_id: ExpenseId,
    pub participant: ParticipantId,
    pub share: MinorUnits,
}

impl Share {
    pub fn new(expense_id: ExpenseId, participant: ParticipantId, share: MinorUnits) -> Self {
        Self {
            expense_id,
            participant,
            share,
        }
    }
}

/// Read-only view of a group's expenses in one currency, with their shares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSnapshot {
    pub expenses: Vec<Expense>,
    pub shares: Vec<Share>,
}

impl ExpenseSnapshot {
    pub fn new(expenses: Vec<Expense>, shares: Vec<Share>) -> Self {
        Self { expenses, shares }
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total laid out across all expenses.
    pub fn gross_total(&self) -> i128 {
        self.expenses.iter().map(|e| i128::from(e.amount())).sum()
    }

    /// All participants referenced as payer or share holder, ascending.
    pub fn participants(&self) -> Vec<ParticipantId> {
        let mut participants: Vec<ParticipantId> = self
            .expenses
            .iter()
            .map(|e| e.paid_by())
            .chain(self.shares.iter().map(|s| s.participant))
            .collect();
        participants.sort();
        participants.dedup();
        participants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dinner(amount: MinorUnits) -> Expense {
        Expense::new(
            ExpenseId::new(1),
            GroupId::new(1),
            ParticipantId::new(1),
            amount,
            CurrencyCode::new("EUR"),
        )
    }

    #[test]
    fn test_expense_creation() {
        let ex = dinner(900);
        assert_eq!(ex.id(), ExpenseId::new(1));
        assert_eq!(ex.paid_by(), ParticipantId::new(1));
        assert_eq!(ex.currency().as_str(), "EUR");
        assert!(ex.description().is_none());
    }

    #[test]
    fn test_even_shares_sum_to_amount() {
        let ex = dinner(1000);
        let shares = ex
            .even_shares(&[ParticipantId::new(3), ParticipantId::new(1), ParticipantId::new(2)])
            .unwrap();
        let amounts: Vec<_> = shares.iter().map(|s| (s.participant.value(), s.share)).collect();
        assert_eq!(amounts, vec![(1, 334), (2, 333), (3, 333)]);
    }

    #[test]
    fn test_even_shares_collapses_duplicates() {
        let ex = dinner(100);
        let shares = ex
            .even_shares(&[ParticipantId::new(2), ParticipantId::new(2)])
            .unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].share, 100);
    }

    #[test]
    fn test_even_shares_rejects_empty_split() {
        assert_eq!(
            dinner(100).even_shares(&[]).unwrap_err(),
            ValidationError::EmptySplit(ExpenseId::new(1))
        );
    }

    #[test]
    fn test_snapshot_participants() {
        let ex = dinner(900);
        let shares = ex
            .even_shares(&[ParticipantId::new(2), ParticipantId::new(3)])
            .unwrap();
        let snapshot = ExpenseSnapshot::new(vec![ex], shares);
        assert_eq!(snapshot.participants().len(), 3);
        assert_eq!(snapshot.gross_total(), 900);
    }
}
