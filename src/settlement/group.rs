use crate::aggregation::aggregator::BalanceAggregator;
use crate::core::balance::BalanceSheet;
use crate::core::currency::CurrencyCode;
use crate::core::error::EngineError;
use crate::core::expense::{Expense, ExpenseId, GroupId, Share};
use crate::core::participant::ParticipantId;
use crate::settlement::plan::SettlementPlan;
use crate::store::ExpenseSource;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Both stages of a settlement run for one group and currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSettlement {
    balances: BalanceSheet,
    plan: SettlementPlan,
    /// Payments needed if every share holder repaid each payer directly.
    direct_payment_count: usize,
}

impl GroupSettlement {
    /// Aggregate balances and optimize them into a plan.
    pub fn compute(
        currency: &CurrencyCode,
        expenses: &[Expense],
        shares: &[Share],
    ) -> Result<Self, EngineError> {
        let balances = BalanceAggregator::compute_balances(currency, expenses, shares)?;
        let plan = SettlementPlan::from_balances(&balances)?;
        Ok(Self {
            balances,
            plan,
            direct_payment_count: direct_payment_count(expenses, shares),
        })
    }

    /// Run the pipeline on a snapshot taken from storage.
    pub fn from_source<S>(source: &S, group: GroupId, currency: &CurrencyCode) -> Result<Self, EngineError>
    where
        S: ExpenseSource + ?Sized,
    {
        let snapshot = source.snapshot(group, currency)?;
        Self::compute(currency, &snapshot.expenses, &snapshot.shares)
    }

    pub fn balances(&self) -> &BalanceSheet {
        &self.balances
    }

    pub fn plan(&self) -> &SettlementPlan {
        &self.plan
    }

    pub fn into_plan(self) -> SettlementPlan {
        self.plan
    }

    pub fn direct_payment_count(&self) -> usize {
        self.direct_payment_count
    }

    /// How many fewer payments the plan needs than direct repayment, in percent.
    ///
    /// Negative when the greedy plan happens to need more payments.
    pub fn payment_reduction_percent(&self) -> f64 {
        if self.direct_payment_count == 0 {
            return 0.0;
        }
        let direct = self.direct_payment_count as f64;
        (direct - self.plan.len() as f64) * 100.0 / direct
    }
}

/// Distinct (share holder, payer) pairs with something owed.
fn direct_payment_count(expenses: &[Expense], shares: &[Share]) -> usize {
    let payers: HashMap<ExpenseId, ParticipantId> =
        expenses.iter().map(|e| (e.id(), e.paid_by())).collect();

    shares
        .iter()
        .filter(|s| s.share > 0)
        .filter_map(|s| {
            let payer = *payers.get(&s.expense_id)?;
            (payer != s.participant).then_some((s.participant, payer))
        })
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;
    use approx::assert_relative_eq;

    fn eur() -> CurrencyCode {
        CurrencyCode::new("EUR")
    }

    fn p(id: i64) -> ParticipantId {
        ParticipantId::new(id)
    }

    fn split(id: i64, payer: i64, amount: i64, among: &[i64]) -> (Expense, Vec<Share>) {
        let ex = Expense::new(ExpenseId::new(id), GroupId::new(1), p(payer), amount, eur());
        let members: Vec<_> = among.iter().copied().map(p).collect();
        let shares = ex.even_shares(&members).unwrap();
        (ex, shares)
    }

    #[test]
    fn test_round_robin_dinners() {
        // Everyone pays one dinner for everyone: direct repayment needs 6
        // transfers, netting needs none.
        let mut expenses = Vec::new();
        let mut shares = Vec::new();
        for (id, payer) in [(1, 1), (2, 2), (3, 3)] {
            let (ex, sh) = split(id, payer, 900, &[1, 2, 3]);
            expenses.push(ex);
            shares.extend(sh);
        }

        let run = GroupSettlement::compute(&eur(), &expenses, &shares).unwrap();
        assert!(run.balances().is_settled());
        assert!(run.plan().is_empty());
        assert_eq!(run.direct_payment_count(), 6);
        assert_relative_eq!(run.payment_reduction_percent(), 100.0);
    }

    #[test]
    fn test_chain_of_expenses() {
        let (e1, s1) = split(1, 1, 900, &[1, 2, 3]);
        let (e2, s2) = split(2, 2, 300, &[2, 3, 4]);
        let expenses = vec![e1, e2];
        let shares: Vec<_> = s1.into_iter().chain(s2).collect();

        let run = GroupSettlement::compute(&eur(), &expenses, &shares).unwrap();
        // 1: +600, 2: -300 + 200 = -100, 3: -400, 4: -100
        assert_eq!(run.balances().balance(&p(1)), 600);
        assert_eq!(run.balances().balance(&p(2)), -100);
        assert_eq!(run.balances().balance(&p(3)), -400);
        assert_eq!(run.balances().balance(&p(4)), -100);
        assert_eq!(run.plan().len(), 3);
        assert!(run.plan().verify(run.balances()));
        assert_eq!(run.direct_payment_count(), 4);
        assert_relative_eq!(run.payment_reduction_percent(), 25.0);
    }

    #[test]
    fn test_validation_error_surfaces() {
        let (ex, mut shares) = split(1, 1, 900, &[1, 2, 3]);
        shares[0].share -= 1;
        let err = GroupSettlement::compute(&eur(), &[ex], &shares).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::ShareSumMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_group() {
        let run = GroupSettlement::compute(&eur(), &[], &[]).unwrap();
        assert!(run.plan().is_empty());
        assert_relative_eq!(run.payment_reduction_percent(), 0.0);
    }
}
