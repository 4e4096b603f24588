//! # grouppay-engine
//!
//! Balance aggregation and settlement optimization for shared group expenses.
//!
//! Given the expenses of a group, each paid by one member and split into
//! shares, the engine computes every member's net balance and a short list of
//! payments that brings all balances to zero. All money is integer minor
//! units; nothing is ever rounded.
//!
//! ## Architecture
//!
//! - **core** — Identifiers, currency, money helpers, expenses, balance sheet, errors
//! - **aggregation** — Expenses and shares to net balances
//! - **settlement** — Greedy payment optimizer, plans, settlement records
//! - **store** — Storage ports and an in-memory adapter
//! - **simulation** — Random expense groups for stress tests and benchmarks

pub mod aggregation;
pub mod core;
pub mod settlement;
pub mod simulation;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::aggregation::aggregator::BalanceAggregator;
    pub use crate::core::balance::BalanceSheet;
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::error::{EngineError, InvariantViolation, ValidationError};
    pub use crate::core::expense::{Expense, ExpenseId, ExpenseSnapshot, GroupId, Share};
    pub use crate::core::participant::ParticipantId;
    pub use crate::settlement::group::GroupSettlement;
    pub use crate::settlement::optimizer::SettlementOptimizer;
    pub use crate::settlement::payment::Payment;
    pub use crate::settlement::plan::SettlementPlan;
    pub use crate::settlement::record::{SettlementRecord, SettlementStatus};
}
