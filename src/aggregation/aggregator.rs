use crate::core::balance::BalanceSheet;
use crate::core::currency::CurrencyCode;
use crate::core::error::ValidationError;
use crate::core::expense::{Expense, ExpenseId, Share};
use crate::core::participant::ParticipantId;
use log::debug;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Reduces a group's expenses to net balances.
///
/// For every expense the payer is credited the full amount (they laid out the
/// cash) and every share holder is debited their share (they consumed the
/// value). A payer who is also a share holder therefore nets
/// `amount - own share`; a payer who is not a share holder nets `amount`.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Compute the balance sheet of one settlement run.
    ///
    /// Every participant that appears as a payer or a share holder is present
    /// in the result, possibly with a zero balance. The result always sums to
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when an expense has a non-positive amount,
    /// a different currency than `currency`, or a duplicate id; when a share
    /// is negative, duplicated, or references an unknown expense; when the
    /// shares of an expense do not add up to its amount; or when a balance
    /// leaves the `i64` range. Nothing is rounded or rebalanced.
    pub fn compute_balances(
        currency: &CurrencyCode,
        expenses: &[Expense],
        shares: &[Share],
    ) -> Result<BalanceSheet, ValidationError> {
        let mut share_sums: HashMap<ExpenseId, i128> = HashMap::with_capacity(expenses.len());

        for expense in expenses {
            if expense.currency() != currency {
                return Err(ValidationError::CurrencyMismatch {
                    expense: expense.id(),
                    expected: currency.clone(),
                    found: expense.currency().clone(),
                });
            }
            if expense.amount() <= 0 {
                return Err(ValidationError::NonPositiveAmount {
                    expense: expense.id(),
                    amount: expense.amount(),
                });
            }
            if share_sums.insert(expense.id(), 0).is_some() {
                return Err(ValidationError::DuplicateExpense(expense.id()));
            }
        }

        let mut seen: HashSet<(ExpenseId, ParticipantId)> = HashSet::with_capacity(shares.len());
        for share in shares {
            let sum = share_sums.get_mut(&share.expense_id).ok_or(
                ValidationError::UnknownExpense {
                    expense: share.expense_id,
                    participant: share.participant,
                },
            )?;
            if share.share < 0 {
                return Err(ValidationError::NegativeShare {
                    expense: share.expense_id,
                    participant: share.participant,
                    share: share.share,
                });
            }
            if !seen.insert((share.expense_id, share.participant)) {
                return Err(ValidationError::DuplicateShare {
                    expense: share.expense_id,
                    participant: share.participant,
                });
            }
            *sum += i128::from(share.share);
        }

        // Checked in input order so the reported expense is reproducible.
        for expense in expenses {
            let actual = share_sums.get(&expense.id()).copied().unwrap_or(0);
            if actual != i128::from(expense.amount()) {
                return Err(ValidationError::ShareSumMismatch {
                    expense: expense.id(),
                    expected: expense.amount(),
                    actual,
                });
            }
        }

        let mut net: BTreeMap<ParticipantId, i128> = BTreeMap::new();
        for expense in expenses {
            *net.entry(expense.paid_by()).or_insert(0) += i128::from(expense.amount());
        }
        for share in shares {
            *net.entry(share.participant).or_insert(0) -= i128::from(share.share);
        }

        let balances = net
            .into_iter()
            .map(|(participant, balance)| {
                i64::try_from(balance)
                    .map(|b| (participant, b))
                    .map_err(|_| {
                        ValidationError::Overflow(format!(
                            "balance of {participant} ({balance}) exceeds the i64 range"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sheet = BalanceSheet::from_balances(currency.clone(), balances);
        debug!(
            "aggregated {} expenses / {} shares into {} balances ({} {} outstanding)",
            expenses.len(),
            shares.len(),
            sheet.len(),
            sheet.outstanding(),
            currency
        );
        debug_assert!(sheet.is_balanced());
        Ok(sheet)
    }
}
