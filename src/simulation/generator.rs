//! Random expense groups for stress testing and benchmarks.

use crate::core::currency::CurrencyCode;
use crate::core::expense::{Expense, ExpenseId, ExpenseSnapshot, GroupId};
use crate::core::money::MinorUnits;
use crate::core::participant::ParticipantId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Configuration for generating a random expense group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub group_id: GroupId,
    /// Number of group members.
    pub participant_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    pub currency: CurrencyCode,
    /// Smallest expense amount, in minor units.
    pub min_amount: MinorUnits,
    /// Largest expense amount, in minor units.
    pub max_amount: MinorUnits,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            group_id: GroupId::new(1),
            participant_count: 6,
            expense_count: 20,
            currency: CurrencyCode::new("EUR"),
            min_amount: 100,
            max_amount: 50_000,
        }
    }
}

/// Generate a random, valid expense group.
///
/// Each expense has a random payer and is split evenly among a random
/// non-empty subset of the members, so the snapshot always passes
/// aggregation. Returns an empty snapshot when there are no members.
pub fn generate_random_group(config: &GroupConfig) -> ExpenseSnapshot {
    let mut rng = rand::thread_rng();
    let mut snapshot = ExpenseSnapshot::default();

    let members: Vec<ParticipantId> = (1..=config.participant_count as i64)
        .map(ParticipantId::new)
        .collect();
    if members.is_empty() {
        return snapshot;
    }

    let min = config.min_amount.max(1);
    let max = config.max_amount.max(min);

    for i in 0..config.expense_count {
        let payer = members[rng.gen_range(0..members.len())];
        let amount = rng.gen_range(min..=max);
        let split_size = rng.gen_range(1..=members.len());
        let among: Vec<ParticipantId> = members
            .choose_multiple(&mut rng, split_size)
            .copied()
            .collect();

        let expense = Expense::new(
            ExpenseId::new(i as i64 + 1),
            config.group_id,
            payer,
            amount,
            config.currency.clone(),
        );
        // `among` is non-empty and `amount` positive, so the split cannot fail.
        if let Ok(shares) = expense.even_shares(&among) {
            snapshot.shares.extend(shares);
            snapshot.expenses.push(expense);
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::group::GroupSettlement;

    #[test]
    fn test_random_group_generation() {
        let config = GroupConfig {
            participant_count: 5,
            expense_count: 12,
            ..Default::default()
        };

        let snapshot = generate_random_group(&config);
        assert_eq!(snapshot.expenses.len(), 12);
        assert!(snapshot.participants().len() <= 5);
        assert!(snapshot
            .expenses
            .iter()
            .all(|e| (config.min_amount..=config.max_amount).contains(&e.amount())));
    }

    #[test]
    fn test_random_group_settles() {
        let config = GroupConfig {
            participant_count: 25,
            expense_count: 100,
            ..Default::default()
        };

        let snapshot = generate_random_group(&config);
        let run = GroupSettlement::compute(&config.currency, &snapshot.expenses, &snapshot.shares)
            .unwrap();

        assert!(run.balances().is_balanced());
        assert!(run.plan().verify(run.balances()));
        assert!(run.plan().len() < config.participant_count);
    }

    #[test]
    fn test_no_members_no_expenses() {
        let config = GroupConfig {
            participant_count: 0,
            ..Default::default()
        };
        assert!(generate_random_group(&config).is_empty());
    }
}
