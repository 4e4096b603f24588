use crate::core::balance::BalanceSheet;
use crate::core::currency::CurrencyCode;
use crate::core::error::InvariantViolation;
use crate::core::expense::GroupId;
use crate::core::money::wide_sum;
use crate::settlement::optimizer::SettlementOptimizer;
use crate::settlement::payment::Payment;
use crate::settlement::record::SettlementRecord;
use serde::{Deserialize, Serialize};

/// The optimizer's output together with the figures a caller usually shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    currency: CurrencyCode,
    payments: Vec<Payment>,
    /// Sum of all payment amounts.
    total_transferred: i128,
    creditor_count: usize,
    debtor_count: usize,
}

impl SettlementPlan {
    /// Optimize a balance sheet into a plan.
    pub fn from_balances(balances: &BalanceSheet) -> Result<Self, InvariantViolation> {
        let payments = SettlementOptimizer::optimize_settlements(balances)?;
        Ok(Self {
            currency: balances.currency().clone(),
            total_transferred: wide_sum(payments.iter().map(|p| p.amount)),
            creditor_count: balances.creditors().count(),
            debtor_count: balances.debtors().count(),
            payments,
        })
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Payments in the order they were matched.
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn total_transferred(&self) -> i128 {
        self.total_transferred
    }

    pub fn creditor_count(&self) -> usize {
        self.creditor_count
    }

    pub fn debtor_count(&self) -> usize {
        self.debtor_count
    }

    /// Check that applying every payment to `balances` settles everyone.
    pub fn verify(&self, balances: &BalanceSheet) -> bool {
        let mut remaining = balances.clone();
        self.payments
            .iter()
            .all(|p| p.currency == self.currency && remaining.apply_payment(p).is_ok())
            && remaining.is_settled()
    }

    /// Turn the plan into pending settlement records for a group.
    pub fn into_records(self, group_id: GroupId) -> Vec<SettlementRecord> {
        self.payments
            .iter()
            .map(|p| SettlementRecord::pending(group_id, p))
            .collect()
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Plan ({}) ===", self.currency)?;
        writeln!(f, "Creditors:   {}", self.creditor_count)?;
        writeln!(f, "Debtors:     {}", self.debtor_count)?;
        writeln!(f, "Payments:    {}", self.payments.len())?;
        writeln!(f, "Transferred: {}", self.total_transferred)?;

        if !self.payments.is_empty() {
            writeln!(f)?;
        }
        for (i, payment) in self.payments.iter().enumerate() {
            writeln!(f, "  {:>3}. {}", i + 1, payment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::participant::ParticipantId;

    fn sheet(balances: &[(i64, i64)]) -> BalanceSheet {
        BalanceSheet::from_balances(
            CurrencyCode::new("EUR"),
            balances.iter().map(|&(id, b)| (ParticipantId::new(id), b)),
        )
    }

    #[test]
    fn test_plan_summary() {
        let balances = sheet(&[(1, 600), (2, -300), (3, -300)]);
        let plan = SettlementPlan::from_balances(&balances).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.total_transferred(), 600);
        assert_eq!(plan.creditor_count(), 1);
        assert_eq!(plan.debtor_count(), 2);
        assert!(plan.verify(&balances));
    }

    #[test]
    fn test_plan_does_not_verify_against_other_sheet() {
        let plan = SettlementPlan::from_balances(&sheet(&[(1, 600), (2, -300), (3, -300)])).unwrap();
        assert!(!plan.verify(&sheet(&[(1, 500), (2, -250), (3, -250)])));
    }

    #[test]
    fn test_plan_into_pending_records() {
        let plan = SettlementPlan::from_balances(&sheet(&[(1, -500), (2, -300), (3, 800)])).unwrap();
        let records = plan.into_records(GroupId::new(9));

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.group_id() == GroupId::new(9)));
        assert_ne!(records[0].id(), records[1].id());
    }

    #[test]
    fn test_plan_display() {
        let plan = SettlementPlan::from_balances(&sheet(&[(1, 50), (2, -50)])).unwrap();
        let text = plan.to_string();
        assert!(text.contains("Settlement Plan (EUR)"));
        assert!(text.contains("#2 → #1: 50 EUR"));
    }
}
