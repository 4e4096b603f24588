use crate::core::balance::BalanceSheet;
use crate::core::error::InvariantViolation;
use crate::core::participant::ParticipantId;
use crate::settlement::payment::Payment;
use log::{debug, error};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// An open position in one of the two heaps.
///
/// Field order matters: the derived ordering compares the outstanding
/// magnitude first and then prefers the lower participant id, so the heap
/// maximum is "largest amount, lowest id".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenPosition {
    outstanding: u64,
    participant: Reverse<ParticipantId>,
}

impl OpenPosition {
    fn new(participant: ParticipantId, outstanding: u64) -> Self {
        Self {
            outstanding,
            participant: Reverse(participant),
        }
    }

    fn id(&self) -> ParticipantId {
        self.participant.0
    }
}

/// Turns net balances into a short list of payments that settles everyone.
///
/// Finding the true minimum number of payments is a subset-partition
/// problem; the optimizer instead uses the greedy largest-creditor /
/// largest-debtor matching, which is bounded by `N - 1` payments for `N`
/// participants with a non-zero balance and runs in `O(N log N)`.
pub struct SettlementOptimizer;

impl SettlementOptimizer {
    /// Compute the ordered payment list for a balance sheet.
    ///
    /// # Algorithm
    ///
    /// 1. Split participants into creditors (balance > 0) and debtors
    ///    (balance < 0); zero balances take no part.
    /// 2. Pop the creditor with the largest claim and the debtor with the
    ///    largest debt. Ties go to the lower participant id.
    /// 3. The debtor pays `min(claim, debt)` to the creditor.
    /// 4. Whoever still has something outstanding goes back into their heap.
    /// 5. Stop when either heap is empty. With a zero-sum sheet both empty
    ///    together.
    ///
    /// Each step closes at least one position and the last step closes two,
    /// hence the `N - 1` bound. Identical sheets produce identical lists.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation`] when the balances do not sum to zero.
    /// That means the aggregator was bypassed or is broken; it is not a user
    /// input error.
    pub fn optimize_settlements(balances: &BalanceSheet) -> Result<Vec<Payment>, InvariantViolation> {
        let total = balances.total();
        if total != 0 {
            error!(
                "refusing to settle unbalanced sheet: {} {} across {} participants",
                total,
                balances.currency(),
                balances.len()
            );
            return Err(InvariantViolation {
                currency: balances.currency().clone(),
                total,
            });
        }

        let mut creditors: BinaryHeap<OpenPosition> = balances
            .creditors()
            .map(|(p, b)| OpenPosition::new(p, b.unsigned_abs()))
            .collect();
        let mut debtors: BinaryHeap<OpenPosition> = balances
            .debtors()
            .map(|(p, b)| OpenPosition::new(p, b.unsigned_abs()))
            .collect();

        let mut payments = Vec::with_capacity(creditors.len() + debtors.len());

        while let (Some(creditor), Some(debtor)) = (creditors.peek().copied(), debtors.peek().copied()) {
            creditors.pop();
            debtors.pop();

            // Bounded by a creditor balance, which came from a positive i64.
            let amount = creditor.outstanding.min(debtor.outstanding);
            payments.push(Payment::new(
                debtor.id(),
                creditor.id(),
                amount as i64,
                balances.currency().clone(),
            ));

            if creditor.outstanding > amount {
                creditors.push(OpenPosition::new(creditor.id(), creditor.outstanding - amount));
            }
            if debtor.outstanding > amount {
                debtors.push(OpenPosition::new(debtor.id(), debtor.outstanding - amount));
            }
        }

        debug_assert!(creditors.is_empty() && debtors.is_empty());
        debug!(
            "settled {} non-zero balances in {} with {} payments",
            balances.nonzero_count(),
            balances.currency(),
            payments.len()
        );
        Ok(payments)
    }
}
