use crate::core::currency::CurrencyCode;
use crate::core::error::StoreError;
use crate::core::expense::{Expense, ExpenseId, ExpenseSnapshot, GroupId, Share};
use crate::settlement::record::SettlementRecord;
use crate::store::{ExpenseSource, SettlementSink};
use log::{debug, info};
use std::collections::BTreeMap;
use uuid::Uuid;

/// In-memory expense and settlement storage.
///
/// Expenses are kept in id order, so snapshots are reproducible.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    expenses: BTreeMap<ExpenseId, (Expense, Vec<Share>)>,
    settlements: Vec<SettlementRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an expense together with its shares.
    ///
    /// Shares are stored as given; they are validated when balances are
    /// computed.
    pub fn add_expense(&mut self, expense: Expense, shares: Vec<Share>) -> Result<(), StoreError> {
        if self.expenses.contains_key(&expense.id()) {
            return Err(StoreError::DuplicateExpense(expense.id()));
        }
        debug!(
            "storing expense {} ({} shares) for group {}",
            expense.id(),
            shares.len(),
            expense.group_id()
        );
        self.expenses.insert(expense.id(), (expense, shares));
        Ok(())
    }

    /// Remove an expense and its shares.
    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense, StoreError> {
        self.expenses
            .remove(&id)
            .map(|(expense, _)| expense)
            .ok_or(StoreError::ExpenseNotFound(id))
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.get(&id).map(|(expense, _)| expense)
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    /// Settlements recorded for a group, oldest first.
    pub fn group_settlements(&self, group: GroupId) -> Vec<&SettlementRecord> {
        self.settlements
            .iter()
            .filter(|r| r.group_id() == group)
            .collect()
    }

    pub fn settlement(&self, id: Uuid) -> Option<&SettlementRecord> {
        self.settlements.iter().find(|r| r.id() == id)
    }

    /// Replace a stored settlement with an updated copy (same id).
    pub fn update_settlement(&mut self, record: SettlementRecord) -> Result<(), StoreError> {
        let slot = self
            .settlements
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or(StoreError::SettlementNotFound(record.id()))?;
        *slot = record;
        Ok(())
    }
}

impl ExpenseSource for MemoryStore {
    fn snapshot(&self, group: GroupId, currency: &CurrencyCode) -> Result<ExpenseSnapshot, StoreError> {
        let mut snapshot = ExpenseSnapshot::default();
        for (expense, shares) in self.expenses.values() {
            if expense.group_id() == group && expense.currency() == currency {
                snapshot.expenses.push(expense.clone());
                snapshot.shares.extend_from_slice(shares);
            }
        }
        Ok(snapshot)
    }
}

impl SettlementSink for MemoryStore {
    fn record_settlements(&mut self, records: Vec<SettlementRecord>) -> Result<(), StoreError> {
        info!("recording {} pending settlements", records.len());
        self.settlements.extend(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::participant::ParticipantId;
    use crate::settlement::payment::Payment;
    use crate::settlement::record::SettlementStatus;

    fn eur() -> CurrencyCode {
        CurrencyCode::new("EUR")
    }

    fn expense(id: i64, group: i64, currency: &str) -> Expense {
        Expense::new(
            ExpenseId::new(id),
            GroupId::new(group),
            ParticipantId::new(1),
            100,
            CurrencyCode::new(currency),
        )
    }

    #[test]
    fn test_snapshot_filters_group_and_currency() {
        let mut store = MemoryStore::new();
        for (id, group, currency) in [(1, 1, "EUR"), (2, 1, "USD"), (3, 2, "EUR"), (4, 1, "EUR")] {
            let ex = expense(id, group, currency);
            let shares = ex.even_shares(&[ParticipantId::new(1), ParticipantId::new(2)]).unwrap();
            store.add_expense(ex, shares).unwrap();
        }

        let snapshot = store.snapshot(GroupId::new(1), &eur()).unwrap();
        let ids: Vec<_> = snapshot.expenses.iter().map(|e| e.id().value()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(snapshot.shares.len(), 4);
    }

    #[test]
    fn test_duplicate_expense_rejected() {
        let mut store = MemoryStore::new();
        store.add_expense(expense(1, 1, "EUR"), vec![]).unwrap();
        assert_eq!(
            store.add_expense(expense(1, 1, "EUR"), vec![]).unwrap_err(),
            StoreError::DuplicateExpense(ExpenseId::new(1))
        );
    }

    #[test]
    fn test_delete_removes_shares() {
        let mut store = MemoryStore::new();
        let ex = expense(1, 1, "EUR");
        let shares = ex.even_shares(&[ParticipantId::new(2)]).unwrap();
        store.add_expense(ex, shares).unwrap();
        assert_eq!(store.expense(ExpenseId::new(1)).map(|e| e.amount()), Some(100));

        store.delete_expense(ExpenseId::new(1)).unwrap();
        assert!(store.expense(ExpenseId::new(1)).is_none());
        assert!(store.snapshot(GroupId::new(1), &eur()).unwrap().is_empty());
        assert!(store.delete_expense(ExpenseId::new(1)).is_err());
    }

    #[test]
    fn test_record_and_update_settlements() {
        let mut store = MemoryStore::new();
        let payment = Payment::new(ParticipantId::new(2), ParticipantId::new(1), 50, eur());
        let record = SettlementRecord::pending(GroupId::new(1), &payment);
        let id = record.id();
        store.record_settlements(vec![record]).unwrap();

        let mut stored = store.settlement(id).cloned().unwrap();
        stored.complete().unwrap();
        store.update_settlement(stored).unwrap();

        let group = store.group_settlements(GroupId::new(1));
        assert_eq!(group.len(), 1);
        assert_eq!(group[0].status(), SettlementStatus::Completed);
        assert!(store.group_settlements(GroupId::new(2)).is_empty());
    }
}
